// 🧾 Canonical Record - One donation line item, same shape for every source
// All fields are text; numbers are only parsed at comparison/aggregation time

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// SourceRow - One raw row from a source: column name → value
///
/// Produced by the CSV reader (or any other tabular parser), consumed once by
/// the normalizer and then dropped.
pub type SourceRow = HashMap<String, String>;

// ============================================================================
// FIELD (column key)
// ============================================================================

/// The eight canonical columns, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    LastName,
    FirstName,
    PostalCode,
    City,
    Party,
    SpecificCampaign,
    Date,
    Donation,
}

impl Field {
    /// Fixed display order, independent of any source's column order
    pub const ALL: [Field; 8] = [
        Field::LastName,
        Field::FirstName,
        Field::PostalCode,
        Field::City,
        Field::Party,
        Field::SpecificCampaign,
        Field::Date,
        Field::Donation,
    ];

    /// Canonical key (camelCase, as serialized)
    pub fn key(&self) -> &'static str {
        match self {
            Field::LastName => "lastName",
            Field::FirstName => "firstName",
            Field::PostalCode => "postalCode",
            Field::City => "city",
            Field::Party => "party",
            Field::SpecificCampaign => "specificCampaign",
            Field::Date => "date",
            Field::Donation => "donation",
        }
    }

    /// Human-readable column header
    pub fn title(&self) -> &'static str {
        match self {
            Field::LastName => "Last Name",
            Field::FirstName => "First Name",
            Field::PostalCode => "Postal Code",
            Field::City => "City",
            Field::Party => "Party",
            Field::SpecificCampaign => "Campaign",
            Field::Date => "Date",
            Field::Donation => "Donation",
        }
    }

    /// Resolve a canonical key
    ///
    /// An unknown key is a caller bug (header wiring, config typo), so it is
    /// reported instead of silently ignored.
    pub fn parse_key(key: &str) -> Result<Field> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.key() == key)
            .ok_or_else(|| anyhow!("Unknown column key: {}", key))
    }
}

// ============================================================================
// CANONICAL RECORD
// ============================================================================

/// CanonicalRecord - Unified donation line item
///
/// Every record carries all eight fields. A field the source did not provide
/// is `""`, never missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    pub last_name: String,
    pub first_name: String,
    pub postal_code: String,
    pub city: String,
    /// Party / category label, possibly already abbreviated by the source rules
    pub party: String,
    /// Campaign or recipient organization
    pub specific_campaign: String,
    /// Year or date, kept as the source wrote it
    pub date: String,
    /// Amount as text, e.g. "$1,200.50"
    pub donation: String,
}

impl CanonicalRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::LastName => &self.last_name,
            Field::FirstName => &self.first_name,
            Field::PostalCode => &self.postal_code,
            Field::City => &self.city,
            Field::Party => &self.party,
            Field::SpecificCampaign => &self.specific_campaign,
            Field::Date => &self.date,
            Field::Donation => &self.donation,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::LastName => self.last_name = value,
            Field::FirstName => self.first_name = value,
            Field::PostalCode => self.postal_code = value,
            Field::City => self.city = value,
            Field::Party => self.party = value,
            Field::SpecificCampaign => self.specific_campaign = value,
            Field::Date => self.date = value,
            Field::Donation => self.donation = value,
        }
    }

    /// Field values in display order
    pub fn values(&self) -> [&str; 8] {
        Field::ALL.map(|f| self.get(f))
    }

    /// Builder used mostly by tests and fixtures
    pub fn with(mut self, field: Field, value: &str) -> Self {
        self.set(field, value.to_string());
        self
    }
}

// ============================================================================
// AMOUNT PARSING
// ============================================================================

/// Parse a money-ish string: strip `$` and `,`, then parse as f64
///
/// Returns `None` for anything that does not yield a finite number, so
/// callers can fall back (lexical compare, or zero) without ever panicking.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

// ============================================================================
// ROW COERCION
// ============================================================================

/// Build a SourceRow from a JSON object
///
/// Strings are kept, numbers and booleans are stringified, anything else
/// (null, arrays, nested objects) becomes `""`. A non-object yields an empty row.
pub fn row_from_json(value: &serde_json::Value) -> SourceRow {
    use serde_json::Value;

    let Some(object) = value.as_object() else {
        return SourceRow::new();
    };

    object
        .iter()
        .map(|(column, cell)| {
            let text = match cell {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
            };
            (column.clone(), text)
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
