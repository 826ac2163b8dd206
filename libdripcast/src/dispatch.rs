//! Sequential post dispatch with a throttled cadence
//!
//! The dispatcher publishes one post at a time with a timed pause between
//! them. The pause exists to stay clear of platform rate limits, so the
//! loop never overlaps a wait with a publish, and the first failure aborts
//! the run instead of skipping ahead.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::Result;
use crate::media::resolve_attachments;
use crate::platforms::PostClient;
use crate::types::PostDefinition;

/// Platform-safe minimum pause between posts, in minutes.
pub const MIN_DELAY_MINUTES: u64 = 2;

/// Options controlling a dispatch run.
#[derive(Debug, Clone, Copy)]
pub struct DispatchOptions {
    /// Requested inter-post pause in minutes; clamped to [`MIN_DELAY_MINUTES`].
    pub delay_minutes: u64,
    /// Number of posts to dispatch; 0 dispatches the whole store.
    pub count: usize,
}

/// Outcome of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Posts actually published.
    pub published: usize,
    /// True when a shutdown signal stopped the run between posts.
    pub interrupted: bool,
}

/// The pause actually enforced between posts.
pub fn effective_delay(delay_minutes: u64) -> Duration {
    if delay_minutes < MIN_DELAY_MINUTES {
        warn!(
            "Requested delay of {}m is below the platform-safe minimum; using {}m",
            delay_minutes, MIN_DELAY_MINUTES
        );
    }
    Duration::from_secs(delay_minutes.max(MIN_DELAY_MINUTES) * 60)
}

/// The truncated, ordered subset of definitions actually dispatched.
pub fn working_set(posts: &[PostDefinition], count: usize) -> &[PostDefinition] {
    if count > 0 && count < posts.len() {
        &posts[..count]
    } else {
        posts
    }
}

pub struct Dispatcher {
    options: DispatchOptions,
}

impl Dispatcher {
    pub fn new(options: DispatchOptions) -> Self {
        Self { options }
    }

    /// Publish the working set in order, pausing between posts.
    ///
    /// The first post publishes immediately; every later post waits the full
    /// effective delay first. A media or publish failure aborts the run;
    /// posts already published stay published (publishing is not
    /// transactional and is never retried).
    pub async fn run(
        &self,
        client: &dyn PostClient,
        posts: &[PostDefinition],
        shutdown: Arc<AtomicBool>,
    ) -> Result<DispatchOutcome> {
        let delay = effective_delay(self.options.delay_minutes);
        let working = working_set(posts, self.options.count);

        if working.is_empty() {
            info!("No posts to dispatch");
            return Ok(DispatchOutcome {
                published: 0,
                interrupted: false,
            });
        }

        info!(
            "Dispatching {} post(s) to {} with a {}s pause between them",
            working.len(),
            client.name(),
            delay.as_secs()
        );

        let mut published = 0;
        for (index, post) in working.iter().enumerate() {
            if index > 0 {
                wait_between_posts(delay, &shutdown).await;
                if shutdown.load(Ordering::Relaxed) {
                    info!("Shutdown requested, stopping after {} post(s)", published);
                    return Ok(DispatchOutcome {
                        published,
                        interrupted: true,
                    });
                }
            }

            let attachments = resolve_attachments(
                &post.media,
                client.max_attachments(),
                client.max_attachment_size(),
            )?;

            let post_id = client.publish(&post.content, &attachments).await?;
            published += 1;
            info!("Published {}/{}: {}", index + 1, working.len(), post_id);
        }

        Ok(DispatchOutcome {
            published,
            interrupted: false,
        })
    }
}

/// Sleep for the inter-post delay, checking the shutdown flag once per second.
async fn wait_between_posts(delay: Duration, shutdown: &AtomicBool) {
    let mut remaining = delay;
    while !remaining.is_zero() {
        if shutdown.load(Ordering::Relaxed) {
            return;
        }
        let step = remaining.min(Duration::from_secs(1));
        sleep(step).await;
        remaining -= step;
    }
}
