use kinotop_config::PacingConfig;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Pauses between page loads so the site doesn't flag the session as a bot
#[derive(Debug, Clone)]
pub struct Pacer {
    enabled: bool,
    captcha_pause: Duration,
    jitter_max_secs: u64,
}

impl Pacer {
    pub fn from_config(config: &PacingConfig) -> Self {
        Self {
            enabled: config.enabled,
            captcha_pause: Duration::from_secs(config.captcha_pause_secs),
            jitter_max_secs: config.jitter_max_secs,
        }
    }

    /// No pauses at all
    pub fn none() -> Self {
        Self {
            enabled: false,
            captcha_pause: Duration::ZERO,
            jitter_max_secs: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Delay after loading listing page `page_no` (1-based)
    pub fn listing_delay(&self, page_no: u32) -> Duration {
        if !self.enabled {
            return Duration::ZERO;
        }
        if page_no == 1 {
            self.captcha_pause
        } else {
            self.jitter()
        }
    }

    /// Delay after finishing a detail page
    pub fn detail_delay(&self) -> Duration {
        if !self.enabled {
            return Duration::ZERO;
        }
        self.jitter()
    }

    /// Whole seconds drawn uniformly from `[0, jitter_max_secs)`
    fn jitter(&self) -> Duration {
        if self.jitter_max_secs == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs(rand::rng().random_range(0..self.jitter_max_secs))
    }

    pub async fn after_listing_page(&self, page_no: u32) {
        pause(self.listing_delay(page_no)).await;
    }

    pub async fn after_detail_page(&self) {
        pause(self.detail_delay()).await;
    }
}

async fn pause(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    debug!("Pausing for {}s", delay.as_secs());
    sleep(delay).await;
}
