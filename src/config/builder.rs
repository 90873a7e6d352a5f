//! Builder for `InspectConfig`
//!
//! Every field starts at its default; `build()` rejects combinations the
//! engine cannot honor.

use std::time::Duration;

use super::types::InspectConfig;
use crate::errors::{InspectError, InspectResult};

/// Fluent builder for `InspectConfig`
#[derive(Debug, Clone)]
pub struct InspectConfigBuilder {
    config: InspectConfig,
}

impl InspectConfig {
    #[must_use]
    pub fn builder() -> InspectConfigBuilder {
        InspectConfigBuilder::default()
    }
}

impl Default for InspectConfigBuilder {
    fn default() -> Self {
        Self {
            config: InspectConfig::default(),
        }
    }
}

impl InspectConfigBuilder {
    /// Set the wait before service detection
    ///
    /// Zero is allowed and makes detection run right after the immediate
    /// pass.
    #[must_use]
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    #[must_use]
    pub fn highlight_duration(mut self, duration: Duration) -> Self {
        self.config.highlight_duration = duration;
        self
    }

    #[must_use]
    pub fn top_image_limit(mut self, limit: usize) -> Self {
        self.config.top_image_limit = limit;
        self
    }

    #[must_use]
    pub fn inferred_color_limit(mut self, limit: usize) -> Self {
        self.config.inferred_color_limit = limit;
        self
    }

    /// Set browser headless mode for live inspection
    ///
    /// Headed mode shows the browser window, which helps when checking what
    /// the inspector sees. Debug builds only; release builds force headless.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    #[must_use]
    pub fn page_load_timeout_secs(mut self, secs: u64) -> Self {
        self.config.page_load_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn report_cache_capacity(mut self, capacity: usize) -> Self {
        self.config.report_cache_capacity = capacity;
        self
    }

    /// Validate and produce the configuration
    ///
    /// # Errors
    ///
    /// Returns `InspectError::Config` when the highlight duration, page load
    /// timeout or cache capacity is zero.
    pub fn build(self) -> InspectResult<InspectConfig> {
        let config = self.config;

        if config.highlight_duration.is_zero() {
            return Err(InspectError::Config(
                "highlight_duration must be greater than zero".to_string(),
            ));
        }
        if config.page_load_timeout_secs == 0 {
            return Err(InspectError::Config(
                "page_load_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if config.report_cache_capacity == 0 {
            return Err(InspectError::Config(
                "report_cache_capacity must be greater than zero".to_string(),
            ));
        }

        // Enforce headless mode in release builds
        #[cfg(not(debug_assertions))]
        let headless = if config.headless {
            true
        } else {
            tracing::warn!(
                "Forcing headless mode in release build. \
                Headed mode is only available in debug builds for development."
            );
            true
        };

        #[cfg(debug_assertions)]
        let headless = config.headless;

        Ok(InspectConfig { headless, ..config })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{DEFAULT_SETTLE_DELAY, DEFAULT_TOP_IMAGE_LIMIT};

    #[test]
    fn test_defaults() {
        let config = InspectConfig::builder().build().unwrap();
        assert_eq!(config.settle_delay(), DEFAULT_SETTLE_DELAY);
        assert_eq!(config.top_image_limit(), DEFAULT_TOP_IMAGE_LIMIT);
        assert!(config.headless());
        assert_eq!(config, InspectConfig::default());
    }

    #[test]
    fn test_zero_settle_delay_is_allowed() {
        let config = InspectConfig::builder()
            .settle_delay(Duration::ZERO)
            .top_image_limit(10)
            .build()
            .unwrap();
        assert!(config.settle_delay().is_zero());
        assert_eq!(config.top_image_limit(), 10);
    }

    #[test]
    fn test_rejects_zero_values() {
        let err = InspectConfig::builder()
            .highlight_duration(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, InspectError::Config(_)));

        assert!(
            InspectConfig::builder()
                .report_cache_capacity(0)
                .build()
                .is_err()
        );
        assert!(
            InspectConfig::builder()
                .page_load_timeout_secs(0)
                .build()
                .is_err()
        );
    }
}
