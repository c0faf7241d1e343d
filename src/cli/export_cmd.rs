//! The `wordvault export` subcommand, end to end.
//!
//! Login through the browser, page through the saved-word list, enrich each
//! word against the dictionary API, write the merged report.

use crate::cli::output::{self, Styled};
use crate::config::Credentials;
use crate::pipeline::throttle::Throttle;
use crate::pipeline::{dictionary, wordlist};
use crate::report::Report;
use crate::session::browser::{self, BrowserOptions};
use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;
use url::Url;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Where to write the JSON report.
    #[arg(long, default_value = "saved_words.json")]
    pub output: PathBuf,

    /// Items per wordlist page.
    #[arg(long, default_value_t = 16)]
    pub per_page: u32,

    /// Minimum delay between consecutive API calls, in milliseconds.
    #[arg(long, default_value_t = 1_000)]
    pub delay_ms: u64,

    /// Seconds to wait for login-form elements and the post-login redirect.
    #[arg(long, default_value_t = 15)]
    pub login_timeout: u64,

    /// Run the browser with a visible window.
    #[arg(long)]
    pub headed: bool,

    /// Base URL of the dictionary site.
    #[arg(long, default_value = "https://www.merriam-webster.com", hide = true)]
    pub site_base: Url,

    /// Base URL of the public dictionary API.
    #[arg(long, default_value = "https://www.dictionaryapi.com", hide = true)]
    pub api_base: Url,
}

/// Run the export pipeline.
pub async fn run(args: ExportArgs) -> Result<()> {
    let s = Styled::new();
    let started = Instant::now();

    // Fail on missing credentials before a browser ever launches.
    let creds = Credentials::from_env()?;

    output::print_header(&s);
    eprintln!("  Logging in to {}...", args.site_base);

    let opts = BrowserOptions {
        headed: args.headed,
        login_timeout: Duration::from_secs(args.login_timeout),
    };
    let session = browser::acquire_session(&creds, &opts).await?;
    eprintln!(
        "  {} Logged in ({} cookies)",
        s.ok_sym(),
        session.cookie_count()
    );

    let client = session.client()?;
    let throttle = Throttle::new(args.delay_ms);

    let words =
        wordlist::fetch_saved_words(&client, &args.site_base, args.per_page, &throttle).await?;
    eprintln!("  {} {} saved words fetched", s.ok_sym(), words.len());

    // Lookups go to the public API: fresh client, no session cookies.
    let api_client = reqwest::Client::new();
    let bar = ProgressBar::new(words.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("  {bar:30} {pos}/{len} {msg}")
            .expect("progress template is valid"),
    );
    let entries = dictionary::enrich_words(
        &api_client,
        &args.api_base,
        &creds.api_key,
        &words,
        &throttle,
        |word| {
            bar.set_message(word.to_string());
            bar.inc(1);
        },
    )
    .await;
    bar.finish_and_clear();

    let skipped = words.len() - entries.len();
    if skipped > 0 {
        eprintln!(
            "  {} {} word(s) had no usable entry and were skipped",
            s.warn_sym(),
            skipped
        );
    }

    let report = Report::new(entries);
    report.write_to(&args.output)?;

    info!(
        total_words = report.total_words,
        output = %args.output.display(),
        "export complete"
    );
    eprintln!(
        "  {} Report written to {} ({} words, {:.1}s)",
        s.ok_sym(),
        args.output.display(),
        report.total_words,
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
