// 🔀 Record Normalizer - Per-source column tables → CanonicalRecord
// Each source is described declaratively: which column feeds which field,
// plus ordered label rewrite rules (full party name → abbreviation)

use crate::record::{CanonicalRecord, Field, SourceRow};
use serde::{Deserialize, Serialize};

// ============================================================================
// SOURCE IDENTITY
// ============================================================================

/// SourceId - Which donation return a row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    /// Provincial returns: Town/Amount/Year columns, no postal code
    NovaScotia,
    /// Federal contributions: Date_received/Monetary columns, full party names
    ElectionsCanada,
}

impl SourceId {
    /// Human-readable name for display
    pub fn name(&self) -> &str {
        match self {
            SourceId::NovaScotia => "Elections Nova Scotia",
            SourceId::ElectionsCanada => "Elections Canada",
        }
    }

    /// Short code for logs
    pub fn code(&self) -> &str {
        match self {
            SourceId::NovaScotia => "NS",
            SourceId::ElectionsCanada => "EC",
        }
    }

    /// Built-in rule set for this source
    pub fn profile(&self) -> SourceProfile {
        match self {
            SourceId::NovaScotia => SourceProfile {
                source: *self,
                columns: vec![
                    ColumnMapping::from_column(Field::City, "Town"),
                    ColumnMapping::from_column(Field::Donation, "Amount"),
                    ColumnMapping::from_column(Field::Date, "Year"),
                    ColumnMapping::absent(Field::PostalCode),
                ],
                rewrite_rules: Vec::new(),
                rewrite_fields: Vec::new(),
            },
            SourceId::ElectionsCanada => SourceProfile {
                source: *self,
                columns: vec![
                    ColumnMapping::from_column(Field::Date, "Date_received"),
                    ColumnMapping::from_column(Field::Donation, "Monetary"),
                ],
                rewrite_rules: default_federal_rewrites(),
                rewrite_fields: vec![Field::Party, Field::SpecificCampaign],
            },
        }
    }
}

// ============================================================================
// RULE TABLES
// ============================================================================

/// Where a canonical field comes from in one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub field: Field,
    /// Source column name; `None` means the source never has this field
    pub column: Option<String>,
}

impl ColumnMapping {
    pub fn from_column(field: Field, column: &str) -> Self {
        ColumnMapping {
            field,
            column: Some(column.to_string()),
        }
    }

    pub fn absent(field: Field) -> Self {
        ColumnMapping { field, column: None }
    }
}

/// Label rewrite: a value containing `contains` (case-insensitive) is
/// replaced entirely by `replacement`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub contains: String,
    pub replacement: String,
}

impl RewriteRule {
    pub fn new(contains: &str, replacement: &str) -> Self {
        RewriteRule {
            contains: contains.to_string(),
            replacement: replacement.to_string(),
        }
    }

    fn matches(&self, value_lower: &str) -> bool {
        !self.contains.is_empty() && value_lower.contains(&self.contains.to_lowercase())
    }
}

/// Federal party names, in precedence order
///
/// Order matters: a label mentioning two parties takes the first rule here.
pub fn default_federal_rewrites() -> Vec<RewriteRule> {
    vec![
        RewriteRule::new("Conservative Party of Canada", "CPC"),
        RewriteRule::new("Liberal Party of Canada", "LPC"),
        RewriteRule::new("New Democratic Party", "NDP-CA"),
        RewriteRule::new("Green Party of Canada", "Green"),
        RewriteRule::new("People's Party of Canada", "PPC"),
    ]
}

/// SourceProfile - Complete normalization rule set for one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceProfile {
    pub source: SourceId,

    /// Overrides; fields not listed read the column named by their canonical key
    pub columns: Vec<ColumnMapping>,

    /// Evaluated in order, first match wins per field
    pub rewrite_rules: Vec<RewriteRule>,

    /// Fields the rewrite rules apply to
    pub rewrite_fields: Vec<Field>,
}

impl SourceProfile {
    /// Source column feeding `field`, if any
    pub fn column_for(&self, field: Field) -> Option<&str> {
        match self.columns.iter().find(|m| m.field == field) {
            Some(mapping) => mapping.column.as_deref(),
            None => Some(field.key()),
        }
    }

    /// Replace the rewrite table (custom rules from config)
    pub fn with_rewrite_rules(mut self, rules: Vec<RewriteRule>) -> Self {
        self.rewrite_rules = rules;
        self
    }

    /// Apply the rewrite table to a single value
    ///
    /// Returns the replacement of the first matching rule, or the value unchanged.
    pub fn rewrite(&self, value: &str) -> String {
        let lower = value.to_lowercase();
        self.rewrite_rules
            .iter()
            .find(|rule| rule.matches(&lower))
            .map(|rule| rule.replacement.clone())
            .unwrap_or_else(|| value.to_string())
    }
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Map one raw row into the canonical shape
///
/// Never fails: missing columns become `""`, values are trimmed.
pub fn normalize(profile: &SourceProfile, row: &SourceRow) -> CanonicalRecord {
    let mut record = CanonicalRecord::default();

    for field in Field::ALL {
        let value = profile
            .column_for(field)
            .and_then(|column| row.get(column))
            .map(|v| v.trim().to_string())
            .unwrap_or_default();

        let value = if profile.rewrite_fields.contains(&field) {
            profile.rewrite(&value)
        } else {
            value
        };

        record.set(field, value);
    }

    record
}

/// Normalize every row of one source, preserving row order
pub fn normalize_source<I>(profile: &SourceProfile, rows: I) -> Vec<CanonicalRecord>
where
    I: IntoIterator<Item = SourceRow>,
{
    rows.into_iter().map(|row| normalize(profile, &row)).collect()
}

// ============================================================================
// TESTS
// ============================================================================
