// ↕️ Sorter - Mixed numeric/lexical column sort
// Numeric only when BOTH sides parse as amounts; otherwise lower-cased
// original text. Stable, so ties keep their input order.

use crate::record::{parse_amount, CanonicalRecord, Field};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

// ============================================================================
// COMPARISON
// ============================================================================

/// Compare two cell values
///
/// Both parse (after stripping `$` and `,`) → numeric order.
/// Otherwise → lower-cased original strings, by code point.
pub fn compare_values(a: &str, b: &str) -> Ordering {
    match (parse_amount(a), parse_amount(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

/// Sorted copy of `records`; `None` column keeps input order
pub fn sort_records(
    records: &[CanonicalRecord],
    column: Option<Field>,
    direction: SortDirection,
) -> Vec<CanonicalRecord> {
    let sorted = records.to_vec();

    let Some(field) = column else {
        return sorted;
    };

    merge_sort_by(sorted, &mut |a: &CanonicalRecord, b: &CanonicalRecord| {
        let ordering = compare_values(a.get(field), b.get(field));
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    })
}

/// Stable top-down merge sort
///
/// Mixed numeric/lexical comparison is not transitive ("2" < "10" < "1a" < "2"),
/// and `slice::sort_by` may panic on such comparators. This never does.
fn merge_sort_by<T, F>(mut items: Vec<T>, cmp: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, cmp);
    let right = merge_sort_by(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        // Left wins ties
        let next = if cmp(r, l) == Ordering::Less {
            right.next()
        } else {
            left.next()
        };
        merged.extend(next);
    }
    merged.extend(left);
    merged.extend(right);

    merged
}

// ============================================================================
// HEADER TOGGLE STATE
// ============================================================================

/// Active sort selection, driven by header clicks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub column: Option<Field>,
    pub direction: SortDirection,
}

impl SortState {
    /// Same column flips direction; another column starts ascending
    pub fn click(&mut self, field: Field) {
        if self.column == Some(field) {
            self.direction = self.direction.flipped();
        } else {
            self.column = Some(field);
            self.direction = SortDirection::Ascending;
        }
    }

    /// Header click by canonical key; unknown keys are a wiring bug
    pub fn click_key(&mut self, key: &str) -> Result<()> {
        let field = Field::parse_key(key)?;
        self.click(field);
        Ok(())
    }

    pub fn apply(&self, records: &[CanonicalRecord]) -> Vec<CanonicalRecord> {
        sort_records(records, self.column, self.direction)
    }
}
