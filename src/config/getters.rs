//! Getter methods for `InspectConfig`

use std::num::NonZeroUsize;
use std::time::Duration;

use super::types::InspectConfig;

impl InspectConfig {
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    #[must_use]
    pub fn highlight_duration(&self) -> Duration {
        self.highlight_duration
    }

    #[must_use]
    pub fn top_image_limit(&self) -> usize {
        self.top_image_limit
    }

    #[must_use]
    pub fn inferred_color_limit(&self) -> usize {
        self.inferred_color_limit
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn page_load_timeout_secs(&self) -> u64 {
        self.page_load_timeout_secs
    }

    /// Cache capacity; `build()` guarantees it is non-zero
    #[must_use]
    pub fn report_cache_capacity(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.report_cache_capacity).unwrap_or(NonZeroUsize::MIN)
    }
}
