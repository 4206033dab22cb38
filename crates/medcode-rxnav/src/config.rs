//! RxNav client configuration.

use std::time::Duration;

/// Public RxNav REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://rxnav.nlm.nih.gov/REST";

/// Pause taken before each NDC resolution.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(150);

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!("medcode/", env!("CARGO_PKG_VERSION"));

/// Configuration for [`RxNavClient`](crate::RxNavClient) and
/// [`MedicationStandardizer`](crate::MedicationStandardizer).
#[derive(Debug, Clone)]
pub struct RxNavConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Delay before each NDC resolution.
    pub request_delay: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for RxNavConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_delay: DEFAULT_REQUEST_DELAY,
            timeout: Duration::from_secs(30),
            user_agent: USER_AGENT_VALUE.to_string(),
        }
    }
}

impl RxNavConfig {
    /// Creates a config with no delay between resolutions.
    pub fn without_delay() -> Self {
        Self {
            request_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Joins `path` onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
