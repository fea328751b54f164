use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

/// Process-level facilities the client reads from: environment variables and
/// the wall clock. Tests swap in `MockRuntime` to pin both.
#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, env::VarError>;

    // Clock
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RealRuntime;

impl Runtime for RealRuntime {
    #[tracing::instrument(skip(self))]
    fn env_var(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }

    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_runtime_env_var_missing() {
        let runtime = RealRuntime;
        let result = runtime.env_var("ZOOM_CLIENT_SURELY_UNSET_VARIABLE");
        assert!(matches!(result, Err(env::VarError::NotPresent)));
    }

    #[test]
    fn test_real_runtime_now_millis_is_monotone_enough() {
        let runtime = RealRuntime;
        let first = runtime.now_millis();
        let second = runtime.now_millis();
        // 2020-01-01T00:00:00Z
        assert!(first > 1_577_836_800_000);
        assert!(second >= first);
    }
}
