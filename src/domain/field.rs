//! Typed form fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of form fields the extractor recognizes.
///
/// Declaration order is rule priority order: more specific, less
/// false-positive-prone fields come first, so the generic name heuristic
/// can never shadow them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// An email address.
    Email,
    /// A phone number.
    Phone,
    /// A calendar date.
    Date,
    /// A monetary amount.
    Amount,
    /// An order/invoice/reference identifier.
    IdNumber,
    /// A postal address fragment.
    Address,
    /// A person name (capitalized word pair heuristic).
    Name,
}

impl FieldKind {
    /// All field kinds in rule priority order.
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Email,
        FieldKind::Phone,
        FieldKind::Date,
        FieldKind::Amount,
        FieldKind::IdNumber,
        FieldKind::Address,
        FieldKind::Name,
    ];

    /// The wire name of this field, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Email => "email",
            FieldKind::Phone => "phone",
            FieldKind::Date => "date",
            FieldKind::Amount => "amount",
            FieldKind::IdNumber => "id_number",
            FieldKind::Address => "address",
            FieldKind::Name => "name",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value extracted for one field of a form.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedField {
    /// Which field this value belongs to.
    pub kind: FieldKind,
    /// The extracted text value.
    pub value: String,
    /// Minimum recognition confidence among the spans that contributed to
    /// the match. A field is only as trustworthy as its weakest span.
    pub confidence: f32,
}

impl ExtractedField {
    /// Creates a new extracted field.
    pub fn new(kind: FieldKind, value: impl Into<String>, confidence: f32) -> Self {
        Self {
            kind,
            value: value.into(),
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_matches_declaration_order() {
        assert!(FieldKind::Email < FieldKind::Phone);
        assert!(FieldKind::Address < FieldKind::Name);
        assert_eq!(FieldKind::ALL[0], FieldKind::Email);
        assert_eq!(FieldKind::ALL[6], FieldKind::Name);
    }

    #[test]
    fn wire_names_match_serde() {
        for kind in FieldKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
