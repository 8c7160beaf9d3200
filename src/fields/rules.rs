//! The ordered rule table mapping corpus text to typed form fields.
//!
//! Each rule is a pattern plus a post-validation check. Rules execute in
//! [`FieldKind`] priority order; the capitalized-word-pair name heuristic
//! runs last because it is the most false-positive-prone.

use crate::domain::FieldKind;
use once_cell::sync::Lazy;
use regex::Regex;

/// A single extraction rule: the field it produces, the pattern that finds
/// candidates, and the validation that rejects malformed matches.
pub(crate) struct FieldRule {
    pub kind: FieldKind,
    pub pattern: Regex,
    pub validate: fn(&str) -> bool,
}

/// Words that disqualify a capitalized pair from being a person name.
/// These are form labels and street nouns that routinely appear
/// capitalized.
const NAME_STOPWORDS: &[&str] = &[
    "name", "email", "phone", "mobile", "address", "date", "order", "invoice", "total",
    "amount", "account", "reference", "street", "avenue", "road", "lane", "drive", "court",
    "main", "city", "state",
];

pub(crate) static RULES: Lazy<Vec<FieldRule>> = Lazy::new(|| {
    vec![
        FieldRule {
            kind: FieldKind::Email,
            pattern: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
                .expect("email pattern"),
            validate: validate_email,
        },
        FieldRule {
            kind: FieldKind::Phone,
            pattern: Regex::new(r"(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b")
                .expect("phone pattern"),
            validate: validate_phone,
        },
        FieldRule {
            kind: FieldKind::Date,
            pattern: Regex::new(r"\b(?:\d{4}-\d{2}-\d{2}|\d{1,2}[/-]\d{1,2}[/-]\d{2,4})\b")
                .expect("date pattern"),
            validate: validate_date,
        },
        FieldRule {
            kind: FieldKind::Amount,
            pattern: Regex::new(
                r"\$\s?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{2})?\b|\b(?i:amount|total|sum|price|cost)\b\s*[:=]?\s*\$?\s?(?P<v>(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{2})?)\b",
            )
            .expect("amount pattern"),
            validate: validate_amount,
        },
        FieldRule {
            kind: FieldKind::IdNumber,
            pattern: Regex::new(
                r"(?:\b(?i:order|invoice|ref(?:erence)?|account|id|no)\b\s*[#:.]?\s*|#)(?P<v>[A-Za-z0-9][A-Za-z0-9-]{3,})\b",
            )
            .expect("id pattern"),
            validate: validate_id,
        },
        FieldRule {
            kind: FieldKind::Address,
            pattern: Regex::new(
                r"\b(?i:address|addr)\b\s*[:=]?\s*(?P<v>[0-9A-Za-z][0-9A-Za-z\s,.'-]{4,79})|\b(?P<w>\d{1,5}\s+[A-Za-z][A-Za-z\s]{2,40}\s+(?i:street|st|avenue|ave|road|rd|blvd|boulevard|lane|ln|drive|dr|court|ct|way)\b)",
            )
            .expect("address pattern"),
            validate: validate_address,
        },
        FieldRule {
            kind: FieldKind::Name,
            pattern: Regex::new(
                r"\b(?i:name)\b\s*[:=]?\s*(?P<v>[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+)|\b(?P<w>[A-Z][a-z]+\s+[A-Z][a-z]+)\b",
            )
            .expect("name pattern"),
            validate: validate_name,
        },
    ]
});

fn validate_email(value: &str) -> bool {
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let Some(domain) = parts.next() else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Truncated or padded digit sequences are rejected here rather than
/// accepted with lowered confidence.
fn validate_phone(value: &str) -> bool {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    (10..=11).contains(&digits)
}

fn validate_date(value: &str) -> bool {
    let parts: Vec<&str> = value.split(['-', '/']).collect();
    if parts.len() != 3 {
        return false;
    }
    let numbers: Vec<u32> = match parts.iter().map(|p| p.parse()).collect() {
        Ok(numbers) => numbers,
        Err(_) => return false,
    };
    if parts[0].len() == 4 {
        // ISO year-month-day.
        (1..=12).contains(&numbers[1]) && (1..=31).contains(&numbers[2])
    } else {
        // Month/day or day/month with a trailing year.
        (1..=31).contains(&numbers[0])
            && (1..=31).contains(&numbers[1])
            && (numbers[0] <= 12 || numbers[1] <= 12)
            && numbers[2] > 0
    }
}

fn validate_amount(value: &str) -> bool {
    let cleaned = value.trim_start_matches('$').trim().replace(',', "");
    !cleaned.is_empty() && cleaned.parse::<f64>().is_ok()
}

fn validate_id(value: &str) -> bool {
    value.len() >= 4 && value.chars().any(|c| c.is_ascii_digit())
}

fn validate_address(value: &str) -> bool {
    value.trim().len() >= 5
}

fn validate_name(value: &str) -> bool {
    value.split_whitespace().all(|word| {
        let lowered = word.to_lowercase();
        !NAME_STOPWORDS.contains(&lowered.as_str())
    })
}
