//! Typed errors for the fatal failure modes of the export pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Required credential or API key is absent from the environment.
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),

    /// A login-page element never appeared. The selector is included so the
    /// failure points at the exact form field that changed.
    #[error("element `{selector}` did not appear within {timeout_ms}ms")]
    ElementTimeout { selector: String, timeout_ms: u64 },

    /// The URL still contained `/login` after the wait. Almost always bad
    /// credentials, sometimes a captcha interstitial.
    #[error("still on the login page after {timeout_ms}ms; check credentials")]
    LoginStalled { timeout_ms: u64 },

    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_culprit() {
        let e = Error::MissingEnv("MW_EMAIL");
        assert!(e.to_string().contains("MW_EMAIL"));

        let e = Error::ElementTimeout {
            selector: "#ul-email".to_string(),
            timeout_ms: 15_000,
        };
        assert!(e.to_string().contains("#ul-email"));
        assert!(e.to_string().contains("15000ms"));
    }
}
