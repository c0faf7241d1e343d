//! Credentials and API key, read from the environment.
//!
//! All three variables are required before any browser is launched; a
//! missing one is fatal up front rather than three minutes into a login.

use crate::error::Error;

pub const EMAIL_VAR: &str = "MW_EMAIL";
pub const PASSWORD_VAR: &str = "MW_PASSWORD";
pub const API_KEY_VAR: &str = "MW_API_KEY";

/// Account credentials plus the dictionary API key.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    /// Key for the public collegiate dictionary API.
    pub api_key: String,
}

impl Credentials {
    /// Read all required variables, failing on the first absent or empty one.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            email: require(EMAIL_VAR)?,
            password: require(PASSWORD_VAR)?,
            api_key: require(API_KEY_VAR)?,
        })
    }
}

fn require(name: &'static str) -> Result<String, Error> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::MissingEnv(name)),
    }
}

/// Whether a variable is present and non-empty, without reading it out.
/// Used by `doctor` so secrets never travel further than a yes/no.
pub fn env_present(name: &str) -> bool {
    std::env::var(name).map(|v| !v.trim().is_empty()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state; each test uses its own variable
    // name so they stay independent under the parallel test runner.

    #[test]
    fn test_require_missing() {
        assert!(matches!(require("WORDVAULT_TEST_UNSET"), Err(Error::MissingEnv(_))));
    }

    #[test]
    fn test_require_empty_counts_as_missing() {
        std::env::set_var("WORDVAULT_TEST_EMPTY", "   ");
        assert!(require("WORDVAULT_TEST_EMPTY").is_err());
        std::env::remove_var("WORDVAULT_TEST_EMPTY");
    }

    #[test]
    fn test_env_present() {
        assert!(!env_present("WORDVAULT_TEST_ABSENT"));
        std::env::set_var("WORDVAULT_TEST_PRESENT", "x");
        assert!(env_present("WORDVAULT_TEST_PRESENT"));
        std::env::remove_var("WORDVAULT_TEST_PRESENT");
    }
}
