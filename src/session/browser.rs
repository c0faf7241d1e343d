//! Browser-assisted login and cookie harvest.
//!
//! Drives a Chromium instance through the site's login form, waits for the
//! URL to leave `/login` as the success signal, then loads the saved-words
//! page so the wordlist API cookies get issued before the jar is exported.

use crate::config::Credentials;
use crate::error::Error;
use crate::session::ApiSession;
use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

pub const LOGIN_URL: &str = "https://www.merriam-webster.com/login";
pub const SAVED_WORDS_URL: &str = "https://www.merriam-webster.com/saved-words";
pub const SITE_DOMAIN: &str = "www.merriam-webster.com";

const EMAIL_SELECTOR: &str = "#ul-email";
const PASSWORD_SELECTOR: &str = "#ul-password";
const SUBMIT_SELECTOR: &str = "#ul-login";

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How the login browser is launched.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Run with a visible window instead of headless.
    pub headed: bool,
    /// Upper bound for each login wait: form elements and the post-login
    /// redirect.
    pub login_timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headed: false,
            login_timeout: Duration::from_secs(15),
        }
    }
}

/// Log in through the browser and return the harvested session.
///
/// The browser is closed on both the success and failure paths; only the
/// cookie jar survives.
pub async fn acquire_session(creds: &Credentials, opts: &BrowserOptions) -> Result<ApiSession> {
    let mut builder = BrowserConfig::builder();
    if opts.headed {
        builder = builder.with_head();
    }
    let config = builder.build().map_err(anyhow::Error::msg)?;

    let (mut browser, mut handler) = Browser::launch(config)
        .await
        .context("launching Chromium")?;

    // The CDP event stream must be drained for the whole browser lifetime.
    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    let result = login_and_harvest(&browser, creds, opts).await;

    browser.close().await.ok();
    let _ = browser.wait().await;
    handler_task.abort();

    result
}

async fn login_and_harvest(
    browser: &Browser,
    creds: &Credentials,
    opts: &BrowserOptions,
) -> Result<ApiSession> {
    let page = browser
        .new_page(LOGIN_URL)
        .await
        .context("opening login page")?;
    page.wait_for_navigation().await?;

    let email = wait_for_element(&page, EMAIL_SELECTOR, opts.login_timeout).await?;
    email.click().await?;
    email.type_str(&creds.email).await?;

    let password = wait_for_element(&page, PASSWORD_SELECTOR, opts.login_timeout).await?;
    password.click().await?;
    password.type_str(&creds.password).await?;

    // Consent overlays can swallow a native click on the submit button, so
    // the click is dispatched from inside the page.
    wait_for_element(&page, SUBMIT_SELECTOR, opts.login_timeout).await?;
    page.evaluate(format!(
        "document.querySelector('{SUBMIT_SELECTOR}').click()"
    ))
    .await
    .context("submitting login form")?;

    wait_until_off_login(&page, opts.login_timeout).await?;
    info!("logged in");

    // The wordlist API cookies are only issued once an authenticated page
    // has been served.
    page.goto(SAVED_WORDS_URL)
        .await
        .context("opening saved-words page")?;
    page.wait_for_navigation().await?;
    wait_for_element(&page, "body", opts.login_timeout).await?;

    let cookies = page
        .get_cookies()
        .await
        .context("exporting browser cookies")?;
    debug!(count = cookies.len(), "harvested cookies");

    let mut session = ApiSession::new(SITE_DOMAIN, SAVED_WORDS_URL);
    for cookie in &cookies {
        session.add_cookie(&cookie.name, &cookie.value);
    }
    Ok(session)
}

/// Poll for a selector until it resolves or the timeout lapses.
async fn wait_for_element(
    page: &Page,
    selector: &str,
    timeout: Duration,
) -> Result<Element, Error> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Ok(element) = page.find_element(selector).await {
            return Ok(element);
        }
        if Instant::now() >= deadline {
            return Err(Error::ElementTimeout {
                selector: selector.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// Poll the current URL until it no longer contains `/login`.
async fn wait_until_off_login(page: &Page, timeout: Duration) -> Result<(), Error> {
    let deadline = Instant::now() + timeout;
    loop {
        let url = page.url().await?.unwrap_or_default();
        if !url.contains("/login") {
            debug!(%url, "left the login page");
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(Error::LoginStalled {
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        sleep(POLL_INTERVAL).await;
    }
}
