//! Periodic cooldowns between page requests.
//!
//! The listing site starts refusing requests after a burst of pages, so the
//! page loop pauses for a fixed interval after every N completed pages.
//! [`Pacer`] only decides when to pause; the pause itself goes through a
//! [`Sleeper`] so tests can observe it without waiting.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::traits::Sleeper;

/// Fire every `every` completed units, pausing for `pause`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    /// Zero disables pacing.
    pub every: u32,
    pub pause: Duration,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            every: 20,
            pause: Duration::from_secs(310),
        }
    }
}

impl PacingPolicy {
    pub fn disabled() -> Self {
        Self {
            every: 0,
            pause: Duration::ZERO,
        }
    }

    /// Whether completing unit number `completed` (one-based) triggers a pause.
    pub fn fires_after(&self, completed: u32) -> bool {
        self.every != 0 && completed != 0 && completed % self.every == 0
    }
}

pub struct Pacer<'a, S: Sleeper + ?Sized> {
    policy: PacingPolicy,
    sleeper: &'a S,
    cooldowns: u32,
}

impl<'a, S: Sleeper + ?Sized> Pacer<'a, S> {
    pub fn new(policy: PacingPolicy, sleeper: &'a S) -> Self {
        Self {
            policy,
            sleeper,
            cooldowns: 0,
        }
    }

    /// Report that `page` finished; sleeps when the policy says so.
    pub async fn page_completed(&mut self, page: u32) {
        if !self.policy.fires_after(page) {
            return;
        }

        info!(
            "Cooling down for {}s after page {}",
            self.policy.pause.as_secs(),
            page
        );
        self.sleeper.sleep(self.policy.pause).await;
        self.cooldowns += 1;
    }

    /// Number of cooldowns taken so far.
    pub fn cooldowns(&self) -> u32 {
        self.cooldowns
    }
}

/// Real-time sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
