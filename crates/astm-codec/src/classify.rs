//! Component F: classifying a message by the alphabet of record-type
//! letters it contains, without fully decoding it (spec §4.F).

use std::sync::OnceLock;

use regex::Regex;

use astm_schema::Error;

use crate::config::Config;
use crate::lines::split_lines;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Query,
    OrdersOnly,
    OrdersAndResults,
    Unknown,
}

const RECORD_LETTERS: &[u8] = b"HPOMRCQL";

fn query_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(HQ+)+L?$").unwrap())
}

fn orders_only_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(H(PM?C?M?OM?C?M?)+)+L?$").unwrap())
}

fn orders_and_results_strict_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(H(PM*C?M*OM*C?M*(RM*C?M*)+)+)+L?$").unwrap())
}

fn orders_and_results_permissive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(H(PM*C?M*(OM*C?M*(RM*C?M*)+)*)+)L?$").unwrap())
}

/// Build the record-letter alphabet string for `bytes`, reusing component
/// C's line splitting so that blank/trimmed lines do not pollute it.
fn letter_string(bytes: &[u8], config: &Config) -> Result<String, Error> {
    let text = crate::encoding::transcode_to_utf8(bytes, config.encoding)?;
    let separator = if config.auto_detect_line_separator {
        None
    } else {
        Some(config.line_separator.as_str())
    };
    let lines = split_lines(&text, separator, config.auto_detect_line_separator)?;
    Ok(lines
        .into_iter()
        .filter_map(|line| line.as_bytes().first().copied())
        .filter(|b| RECORD_LETTERS.contains(b))
        .map(|b| b as char)
        .collect())
}

/// Classify a raw message into one of the four shapes, per spec §4.F.
/// First match wins in the order query, orders-only, orders-and-results.
pub fn classify(bytes: &[u8], config: &Config) -> Result<MessageKind, Error> {
    let letters = letter_string(bytes, config)?;

    let kind = if query_re().is_match(&letters) {
        MessageKind::Query
    } else if orders_only_re().is_match(&letters) {
        MessageKind::OrdersOnly
    } else if orders_and_results_strict_re().is_match(&letters)
        || orders_and_results_permissive_re().is_match(&letters)
    {
        MessageKind::OrdersAndResults
    } else {
        MessageKind::Unknown
    };
    tracing::debug!(letters = %letters, ?kind, "classified message");
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Config {
        Config {
            encoding: crate::config::Encoding::Ascii,
            ..Config::default()
        }
    }

    #[test]
    fn classifies_query() {
        let kind = classify(b"H|1\nQ|1\nL|1\n", &cfg()).unwrap();
        assert_eq!(kind, MessageKind::Query);
    }

    #[test]
    fn classifies_orders_only() {
        let kind = classify(b"H|1\nP|1\nO|1\nL|1\n", &cfg()).unwrap();
        assert_eq!(kind, MessageKind::OrdersOnly);
    }

    #[test]
    fn classifies_orders_and_results() {
        let kind = classify(b"H|1\nP|1\nO|1\nR|1\nL|1\n", &cfg()).unwrap();
        assert_eq!(kind, MessageKind::OrdersAndResults);
    }

    #[test]
    fn permissive_variant_allows_patient_without_order() {
        let kind = classify(b"H|1\nP|1\nP|2\nO|1\nR|1\nL|1\n", &cfg()).unwrap();
        assert_eq!(kind, MessageKind::OrdersAndResults);
    }

    #[test]
    fn unknown_for_garbage_sequence() {
        let kind = classify(b"H|1\nR|1\nO|1\nL|1\n", &cfg()).unwrap();
        assert_eq!(kind, MessageKind::Unknown);
    }
}
