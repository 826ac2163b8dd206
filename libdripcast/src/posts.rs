//! Post-definition store loading
//!
//! The store is a JSON array of `{content, media}` records. Validation
//! happens here, before any authentication or dispatch: a store that is not
//! a sequence, or a record without usable content, rejects the whole run.

use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::types::PostDefinition;

/// Load the ordered list of post definitions from a JSON file.
pub fn load_post_definitions(path: &Path) -> Result<Vec<PostDefinition>> {
    let content = std::fs::read_to_string(path).map_err(ConfigError::PostStoreRead)?;

    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(ConfigError::PostStoreParse)?;
    if !value.is_array() {
        return Err(ConfigError::PostStoreNotASequence.into());
    }

    let posts: Vec<PostDefinition> =
        serde_json::from_value(value).map_err(ConfigError::PostStoreParse)?;

    for (index, post) in posts.iter().enumerate() {
        if post.content.trim().is_empty() {
            return Err(ConfigError::InvalidPost {
                index,
                reason: "missing or empty content".to_string(),
            }
            .into());
        }
    }

    Ok(posts)
}
