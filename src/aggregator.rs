// 💰 Aggregator - Donation totals per party bucket
// Amounts are accumulated in whole cents so totals stay exact for display.
// Unparseable amounts count as zero; unclassified and display-only
// buckets are left out of the totals.

use crate::classifier::{CategoryBucket, Classifier};
use crate::record::{parse_amount, CanonicalRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketTotal {
    pub cents: i64,
    pub records: usize,
}

impl BucketTotal {
    pub fn amount(&self) -> f64 {
        self.cents as f64 / 100.0
    }
}

/// Totals for every aggregated bucket (zero when no records landed there)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationTotals {
    pub buckets: BTreeMap<CategoryBucket, BucketTotal>,
    /// Records whose party matched no rule
    pub unclassified: usize,
    /// Records in display-only buckets (green, atlantica)
    pub display_only: usize,
}

impl Default for DonationTotals {
    fn default() -> Self {
        DonationTotals {
            buckets: CategoryBucket::AGGREGATED
                .iter()
                .map(|bucket| (*bucket, BucketTotal::default()))
                .collect(),
            unclassified: 0,
            display_only: 0,
        }
    }
}

impl DonationTotals {
    /// Rounded total for a bucket; `None` for buckets that are never totalled
    pub fn total(&self, bucket: CategoryBucket) -> Option<f64> {
        self.buckets.get(&bucket).map(BucketTotal::amount)
    }

    /// Bucket → dollars, for summary display
    pub fn amounts(&self) -> BTreeMap<CategoryBucket, f64> {
        self.buckets
            .iter()
            .map(|(bucket, total)| (*bucket, total.amount()))
            .collect()
    }

    pub fn grand_total(&self) -> f64 {
        let cents = self
            .buckets
            .values()
            .fold(0i64, |sum, t| sum.saturating_add(t.cents));
        cents as f64 / 100.0
    }

    fn add(&mut self, bucket: CategoryBucket, cents: i64) {
        if let Some(total) = self.buckets.get_mut(&bucket) {
            total.cents = total.cents.saturating_add(cents);
            total.records += 1;
        } else {
            self.display_only += 1;
        }
    }
}

/// Donation amount in cents
///
/// Anything unparseable, or too large to hold in cents, is 0.
pub fn donation_cents(raw: &str) -> i64 {
    parse_amount(raw)
        .map(|dollars| (dollars * 100.0).round())
        .filter(|cents| cents.abs() < i64::MAX as f64)
        .map(|cents| cents as i64)
        .unwrap_or(0)
}

/// Sum donations by party bucket
pub fn aggregate(records: &[CanonicalRecord], classifier: &Classifier) -> DonationTotals {
    let mut totals = DonationTotals::default();

    for record in records {
        let cents = donation_cents(&record.donation);
        match classifier.classify(&record.party) {
            Some(bucket) => totals.add(bucket, cents),
            None => totals.unclassified += 1,
        }
    }

    totals
}

/// "$1,234.56" / "-$5.00"
pub fn format_amount(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();

    let dollars = (cents / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, digit) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}${}.{:02}", sign, grouped, cents % 100)
}
