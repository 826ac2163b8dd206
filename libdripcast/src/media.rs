//! Media attachment resolution
//!
//! Attachments are resolved per post, immediately before its publish call.
//! The extension lookup runs before the file is read, so an unsupported
//! type fails without touching the filesystem.

use std::path::Path;

use crate::error::{MediaError, Result};
use crate::types::{MediaAttachment, MediaType};

/// Resolve one media path: extension lookup, then file read.
pub fn load_attachment(path: &str) -> Result<MediaAttachment> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    let media_type = MediaType::from_extension(ext).ok_or_else(|| MediaError::UnsupportedType {
        path: path.to_string(),
    })?;

    let bytes = std::fs::read(path).map_err(|source| MediaError::ReadError {
        path: path.to_string(),
        source,
    })?;

    Ok(MediaAttachment {
        path: path.to_string(),
        media_type,
        bytes,
    })
}

/// Resolve all attachments for one post, enforcing the client's limits.
pub fn resolve_attachments(
    paths: &[String],
    max_count: usize,
    max_size: u64,
) -> Result<Vec<MediaAttachment>> {
    if paths.len() > max_count {
        return Err(MediaError::TooManyAttachments {
            count: paths.len(),
            limit: max_count,
        }
        .into());
    }

    let mut attachments = Vec::with_capacity(paths.len());
    for path in paths {
        let attachment = load_attachment(path)?;
        let size = attachment.bytes.len() as u64;
        if size > max_size {
            return Err(MediaError::TooLarge {
                path: path.clone(),
                size,
                limit: max_size,
            }
            .into());
        }
        attachments.push(attachment);
    }

    Ok(attachments)
}
