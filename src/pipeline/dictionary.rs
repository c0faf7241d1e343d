//! Per-word enrichment through the public collegiate dictionary API.
//!
//! A lookup response is a JSON array. Well-formed hits carry entry objects;
//! unknown words come back as a bare list of spelling suggestions. Anything
//! unusable is skipped with a warning, never fatal.

use crate::pipeline::throttle::Throttle;
use crate::report::DictionaryEntry;
use anyhow::{Context, Result};
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::warn;
use url::Url;

pub const COLLEGIATE_PATH: &str = "/api/v3/references/collegiate/json/";

/// Enrich every word sequentially, skipping the ones that fail.
///
/// `on_progress` fires once per word before its lookup; the export command
/// hangs its progress bar on it.
pub async fn enrich_words(
    client: &Client,
    base: &Url,
    api_key: &str,
    words: &[String],
    throttle: &Throttle,
    mut on_progress: impl FnMut(&str),
) -> Vec<DictionaryEntry> {
    let mut entries = Vec::new();
    for word in words {
        on_progress(word);
        throttle.pause().await;
        match lookup(client, base, api_key, word).await {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => warn!(word = %word, "no usable dictionary entry, skipping"),
            Err(err) => warn!(word = %word, error = %err, "lookup failed, skipping"),
        }
    }
    entries
}

/// Look up a single word. `Ok(None)` means the response decoded but carried
/// no usable entry.
pub async fn lookup(
    client: &Client,
    base: &Url,
    api_key: &str,
    word: &str,
) -> Result<Option<DictionaryEntry>> {
    let url = base
        .join(&format!("{COLLEGIATE_PATH}{word}"))
        .with_context(|| format!("building lookup URL for {word:?}"))?;
    let body: Value = client
        .get(url)
        .query(&[("key", api_key)])
        .send()
        .await
        .with_context(|| format!("requesting definition for {word:?}"))?
        .error_for_status()
        .with_context(|| format!("definition for {word:?}"))?
        .json()
        .await
        .with_context(|| format!("decoding definition for {word:?}"))?;

    Ok(parse_entry(word, &body))
}

/// Extract a `DictionaryEntry` from a lookup response.
///
/// A usable response is an array whose first element is an entry object
/// with at least one shortdef. Suggestion lists are arrays of plain strings
/// and fall out at the `as_object` step.
pub fn parse_entry(word: &str, body: &Value) -> Option<DictionaryEntry> {
    let entry = body.as_array()?.first()?.as_object()?;
    let description = entry
        .get("shortdef")?
        .as_array()?
        .first()?
        .as_str()?
        .to_string();

    Some(DictionaryEntry {
        word: word.to_string(),
        description,
        examples: collect_examples(entry),
    })
}

/// Walk `def[] -> sseq[] -> sense pair -> dt[]`, collecting every verbal
/// illustration. Markup is stripped and exact duplicates are dropped,
/// first occurrence wins.
fn collect_examples(entry: &serde_json::Map<String, Value>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut examples = Vec::new();

    for def in entry.get("def").and_then(Value::as_array).into_iter().flatten() {
        for group in def.get("sseq").and_then(Value::as_array).into_iter().flatten() {
            for sense in group.as_array().into_iter().flatten() {
                // Each sense is a ["sense", {...}] pair; dt lives in the body.
                let Some(sense_body) = sense.get(1).and_then(Value::as_object) else {
                    continue;
                };
                for dt in sense_body
                    .get("dt")
                    .and_then(Value::as_array)
                    .into_iter()
                    .flatten()
                {
                    if dt.get(0).and_then(Value::as_str) != Some("vis") {
                        continue;
                    }
                    for vis in dt.get(1).and_then(Value::as_array).into_iter().flatten() {
                        if let Some(text) = vis.get("t").and_then(Value::as_str) {
                            let clean = strip_markup(text);
                            if seen.insert(clean.clone()) {
                                examples.push(clean);
                            }
                        }
                    }
                }
            }
        }
    }
    examples
}

/// Remove the `{it}` and `{wi}` inline markers (and their closing forms)
/// that the API embeds in example text.
pub fn strip_markup(text: &str) -> String {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    let tags = TAGS.get_or_init(|| Regex::new(r"\{/?(?:it|wi)\}").expect("tag regex is valid"));
    tags.replace_all(text, "").into_owned()
}
