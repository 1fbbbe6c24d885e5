// 🖥️ View State - The orchestrator's explicit state
// Records are written once on load; query and sort selection are the only
// inputs that change. Derived views are recomputed in full from the pure
// search/sort/aggregate functions, never patched incrementally.

use crate::aggregator::{aggregate, DonationTotals};
use crate::classifier::{CategoryBucket, Classifier, UNCLASSIFIED_COLOR};
use crate::record::{CanonicalRecord, Field};
use crate::search::search;
use crate::sorter::SortState;
use std::time::{Duration, Instant};

// ============================================================================
// QUERY DEBOUNCE
// ============================================================================

/// Coalesces rapid query edits; only the last value is applied, once the
/// quiet period has passed since the last edit
#[derive(Debug, Clone)]
pub struct QueryDebouncer {
    quiet: Duration,
    pending: Option<(String, Instant)>,
}

impl QueryDebouncer {
    pub fn new(quiet: Duration) -> Self {
        QueryDebouncer {
            quiet,
            pending: None,
        }
    }

    /// Record a new value, restarting the quiet period
    pub fn push(&mut self, value: String, now: Instant) {
        self.pending = Some((value, now));
    }

    /// The pending value, if it has been quiet long enough
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.quiet => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left before the pending value fires (zero if due or nothing pending)
    pub fn remaining(&self, now: Instant) -> Duration {
        match &self.pending {
            Some((_, at)) => self.quiet.saturating_sub(now.saturating_duration_since(*at)),
            None => Duration::ZERO,
        }
    }
}

// ============================================================================
// DERIVED VIEW
// ============================================================================

/// One table row with its presentation hint
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub record: CanonicalRecord,
    pub bucket: Option<CategoryBucket>,
    pub color: &'static str,
}

#[derive(Debug, Clone)]
pub struct DerivedView {
    /// Filtered then sorted
    pub rows: Vec<DisplayRow>,
    /// Over the whole merged collection
    pub totals: DonationTotals,
}

// ============================================================================
// VIEW STATE
// ============================================================================

pub struct ViewState {
    records: Vec<CanonicalRecord>,
    classifier: Classifier,
    /// What the user has typed so far
    input: String,
    /// Last debounced value actually searched for
    applied_query: String,
    sort: SortState,
    debouncer: QueryDebouncer,
}

impl ViewState {
    pub fn new(records: Vec<CanonicalRecord>, classifier: Classifier, debounce: Duration) -> Self {
        ViewState {
            records,
            classifier,
            input: String::new(),
            applied_query: String::new(),
            sort: SortState::default(),
            debouncer: QueryDebouncer::new(debounce),
        }
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn applied_query(&self) -> &str {
        &self.applied_query
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn debouncer(&self) -> &QueryDebouncer {
        &self.debouncer
    }

    /// Query setter: takes effect after the debounce quiet period
    pub fn set_query(&mut self, text: &str, now: Instant) {
        self.input = text.to_string();
        self.debouncer.push(self.input.clone(), now);
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        let mut text = self.input.clone();
        text.push(c);
        self.set_query(&text, now);
    }

    pub fn pop_char(&mut self, now: Instant) {
        let mut text = self.input.clone();
        text.pop();
        self.set_query(&text, now);
    }

    /// Apply a due query; returns true when the derived view must be recomputed
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(query) if query != self.applied_query => {
                log::debug!("Applying query {:?}", query);
                self.applied_query = query;
                true
            }
            _ => false,
        }
    }

    /// Column header click (toggle semantics); applies immediately
    pub fn click_header(&mut self, field: Field) {
        self.sort.click(field);
    }

    /// Recompute search → sort → hints, and totals
    pub fn derive(&self) -> DerivedView {
        let matched = search(&self.records, &self.applied_query);
        let sorted = self.sort.apply(&matched);

        let rows = sorted
            .into_iter()
            .map(|record| {
                let bucket = self.classifier.classify(&record.party);
                DisplayRow {
                    color: bucket.map(|b| b.color()).unwrap_or(UNCLASSIFIED_COLOR),
                    bucket,
                    record,
                }
            })
            .collect();

        DerivedView {
            rows,
            totals: aggregate(&self.records, &self.classifier),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sorter::SortDirection;

    const QUIET: Duration = Duration::from_millis(300);

    fn donor(last: &str, first: &str, party: &str, donation: &str) -> CanonicalRecord {
        CanonicalRecord::default()
            .with(Field::LastName, last)
            .with(Field::FirstName, first)
            .with(Field::Party, party)
            .with(Field::Donation, donation)
    }

    fn state() -> ViewState {
        ViewState::new(
            vec![
                donor("Smith", "John", "PC", "$1,200.00"),
                donor("Smithers", "Anne", "Green", "$300.50"),
                donor("Jones", "John", "LPC", "$20"),
            ],
            Classifier::default(),
            QUIET,
        )
    }

    #[test]
    fn test_debouncer_coalesces() {
        let start = Instant::now();
        let mut debouncer = QueryDebouncer::new(QUIET);

        debouncer.push("s".to_string(), start);
        debouncer.push("sm".to_string(), start + Duration::from_millis(100));
        debouncer.push("smi".to_string(), start + Duration::from_millis(200));

        // 300ms after the first edit but only 100ms after the last
        assert_eq!(debouncer.poll(start + Duration::from_millis(300)), None);
        assert_eq!(
            debouncer.remaining(start + Duration::from_millis(300)),
            Duration::from_millis(200)
        );

        assert_eq!(
            debouncer.poll(start + Duration::from_millis(500)),
            Some("smi".to_string())
        );
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn test_nothing_shown_until_query_applied() {
        let start = Instant::now();
        let mut view = state();
        assert!(view.derive().rows.is_empty());

        view.set_query("smith", start);
        assert_eq!(view.input(), "smith");
        assert!(!view.tick(start + Duration::from_millis(10)));
        assert!(view.derive().rows.is_empty());

        assert!(view.tick(start + QUIET));
        assert_eq!(view.applied_query(), "smith");
        assert_eq!(view.derive().rows.len(), 2);
    }

    #[test]
    fn test_same_query_does_not_recompute() {
        let start = Instant::now();
        let mut view = state();
        view.set_query("smith", start);
        assert!(view.tick(start + QUIET));

        view.push_char('x', start + QUIET);
        view.pop_char(start + QUIET);
        assert!(!view.tick(start + QUIET * 3));
    }

    #[test]
    fn test_header_click_sorts_filtered_rows() {
        let start = Instant::now();
        let mut view = state();
        view.set_query("smith", start);
        view.tick(start + QUIET);

        view.click_header(Field::Donation);
        let rows = view.derive().rows;
        assert_eq!(rows[0].record.donation, "$300.50");
        assert_eq!(rows[1].record.donation, "$1,200.00");

        view.click_header(Field::Donation);
        assert_eq!(view.sort().direction, SortDirection::Descending);
        assert_eq!(view.derive().rows[0].record.donation, "$1,200.00");
    }

    #[test]
    fn test_rows_carry_color_hints() {
        let start = Instant::now();
        let mut view = state();
        view.set_query("smith", start);
        view.tick(start + QUIET);

        let rows = view.derive().rows;
        assert_eq!(rows[0].bucket, Some(CategoryBucket::Pc));
        assert_eq!(rows[1].bucket, Some(CategoryBucket::Green));
        assert_eq!(rows[1].color, CategoryBucket::Green.color());
    }

    #[test]
    fn test_unclassified_rows_get_fallback_color() {
        let start = Instant::now();
        let mut view = ViewState::new(
            vec![donor("Doe", "Jane", "Independent", "$5")],
            Classifier::default(),
            QUIET,
        );
        view.set_query("doe", start);
        view.tick(start + QUIET);

        let rows = view.derive().rows;
        assert_eq!(rows[0].bucket, None);
        assert_eq!(rows[0].color, UNCLASSIFIED_COLOR);
        assert_eq!(rows[0].color, Classifier::default().color_hint("Independent"));
    }

    #[test]
    fn test_totals_cover_all_records_regardless_of_query() {
        let start = Instant::now();
        let mut view = state();
        view.set_query("jones", start);
        view.tick(start + QUIET);

        let derived = view.derive();
        assert_eq!(derived.rows.len(), 1);
        assert_eq!(derived.totals.total(CategoryBucket::Pc), Some(1200.0));
        assert_eq!(derived.totals.total(CategoryBucket::Lpc), Some(20.0));
        assert_eq!(view.records().len(), 3);
    }
}
