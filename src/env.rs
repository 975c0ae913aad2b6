//! Injectable access to environment variables.
//!
//! Every environment fallback in the crate goes through [`Environment`] so
//! resolution logic is unit-testable without mutating the real process
//! environment.

use std::collections::HashMap;

/// Read access to environment variables.
pub trait Environment {
    /// Returns the value of `name`, or `None` if it is unset or empty.
    ///
    /// Empty values are treated as unset, matching how the schema layer's
    /// environment defaults behave.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }
}

/// In-memory environment, used by tests.
impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.is_empty()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_env_returns_value() {
        let mut env = HashMap::new();
        env.insert("KEY".to_string(), "value".to_string());
        assert_eq!(env.var("KEY"), Some("value".to_string()));
        assert_eq!(env.var("MISSING"), None);
    }

    #[test]
    fn map_env_empty_is_unset() {
        let mut env = HashMap::new();
        env.insert("KEY".to_string(), String::new());
        assert_eq!(env.var("KEY"), None);
    }

    #[test]
    fn process_env_reads_real_variable() {
        let name = "TENCENTCLOUD_PROVIDER_ENV_TEST";
        unsafe {
            std::env::set_var(name, "from-process");
        }
        assert_eq!(ProcessEnv.var(name), Some("from-process".to_string()));
        unsafe {
            std::env::remove_var(name);
        }
        assert_eq!(ProcessEnv.var(name), None);
    }
}
