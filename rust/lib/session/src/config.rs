use std::time::Duration;

/// Session settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Upper bound on the startup "who am I" call. On expiry the session
    /// settles unauthenticated but the stored token is kept.
    pub check_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            check_timeout: Duration::from_secs(10),
        }
    }
}
