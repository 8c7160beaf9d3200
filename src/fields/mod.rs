//! Heuristic classification of recognized text into typed form fields.
//!
//! Span texts are concatenated into a working corpus in detection order,
//! then an ordered list of named rules runs over it. Rule priority resolves
//! overlaps: once a rule accepts a match, its corpus range is claimed and
//! lower-priority rules skip candidates that intersect it. The first
//! accepted match per field wins; fields with no accepted match are absent
//! from the result.

mod rules;

use crate::domain::{ExtractedField, FieldKind, TextSpan};
use regex::Captures;
use rules::RULES;
use std::collections::BTreeMap;
use std::ops::Range;

/// Classifies recognized spans into form fields.
///
/// The confidence of each extracted field is the minimum confidence among
/// the spans whose corpus range overlaps the match.
pub fn extract(spans: &[TextSpan]) -> BTreeMap<FieldKind, ExtractedField> {
    let mut fields = BTreeMap::new();
    if spans.is_empty() {
        return fields;
    }

    let (corpus, span_ranges) = build_corpus(spans);
    let mut claimed: Vec<Range<usize>> = Vec::new();

    for rule in RULES.iter() {
        for caps in rule.pattern.captures_iter(&corpus) {
            let whole = caps.get(0).expect("group 0 always present").range();
            if overlaps_any(&claimed, &whole) || extends_digit_run(&corpus, &whole) {
                continue;
            }

            let value = capture_value(&caps)
                .trim()
                .trim_end_matches([',', '.', ';', ':']);
            if value.len() < 2 || !(rule.validate)(value) {
                continue;
            }

            let confidence = supporting_confidence(spans, &span_ranges, &whole);
            fields.insert(
                rule.kind,
                ExtractedField::new(rule.kind, value, confidence),
            );
            claimed.push(whole);
            break;
        }
    }

    fields
}

/// Joins span texts with single spaces, recording each span's byte range in
/// the corpus.
fn build_corpus(spans: &[TextSpan]) -> (String, Vec<Range<usize>>) {
    let mut corpus = String::new();
    let mut ranges = Vec::with_capacity(spans.len());
    for span in spans {
        if !corpus.is_empty() {
            corpus.push(' ');
        }
        let start = corpus.len();
        corpus.push_str(span.text.trim());
        ranges.push(start..corpus.len());
    }
    (corpus, ranges)
}

/// The value of a match: the named value group when the rule captures one,
/// otherwise the whole match.
fn capture_value<'t>(caps: &Captures<'t>) -> &'t str {
    caps.name("v")
        .or_else(|| caps.name("w"))
        .or_else(|| caps.get(0))
        .map(|m| m.as_str())
        .unwrap_or_default()
}

fn overlaps_any(claimed: &[Range<usize>], candidate: &Range<usize>) -> bool {
    claimed
        .iter()
        .any(|range| range.start < candidate.end && candidate.start < range.end)
}

/// Rejects matches that are a slice of a longer digit run, e.g. a
/// phone-length suffix inside a 16-digit account number.
fn extends_digit_run(corpus: &str, range: &Range<usize>) -> bool {
    let bytes = corpus.as_bytes();
    if range.is_empty() {
        return false;
    }
    let starts_with_digit = bytes[range.start].is_ascii_digit();
    let ends_with_digit = bytes[range.end - 1].is_ascii_digit();
    let digit_before = range
        .start
        .checked_sub(1)
        .is_some_and(|i| bytes[i].is_ascii_digit());
    let digit_after = bytes.get(range.end).is_some_and(|b| b.is_ascii_digit());
    (starts_with_digit && digit_before) || (ends_with_digit && digit_after)
}

/// Minimum confidence among spans whose corpus range overlaps the match.
fn supporting_confidence(
    spans: &[TextSpan],
    span_ranges: &[Range<usize>],
    matched: &Range<usize>,
) -> f32 {
    let minimum = spans
        .iter()
        .zip(span_ranges)
        .filter(|(_, range)| range.start < matched.end && matched.start < range.end)
        .map(|(span, _)| span.confidence)
        .fold(f32::INFINITY, f32::min);
    if minimum.is_finite() {
        minimum
    } else {
        0.0
    }
}
