// 🧩 Merger - Concatenate normalized sources
// Source order first, row order within each source. No deduplication:
// the same donation reported by two returns shows up twice.

use crate::normalizer::{normalize_source, SourceProfile};
use crate::record::{CanonicalRecord, SourceRow};

/// Concatenate already-normalized sources in the order supplied
pub fn merge(sources: Vec<Vec<CanonicalRecord>>) -> Vec<CanonicalRecord> {
    let total = sources.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);
    for records in sources {
        merged.extend(records);
    }
    merged
}

/// Normalize each source with its own profile, then merge
pub fn merge_sources(sources: Vec<(SourceProfile, Vec<SourceRow>)>) -> Vec<CanonicalRecord> {
    merge(
        sources
            .into_iter()
            .map(|(profile, rows)| normalize_source(&profile, rows))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::SourceId;
    use crate::record::Field;

    fn named(last: &str) -> CanonicalRecord {
        CanonicalRecord::default().with(Field::LastName, last)
    }

    #[test]
    fn test_merge_preserves_source_then_row_order() {
        let source_a = vec![named("a1"), named("a2")];
        let source_b = vec![named("b1"), named("b2"), named("b3")];

        let merged = merge(vec![source_a, source_b]);
        let names: Vec<&str> = merged.iter().map(|r| r.last_name.as_str()).collect();
        assert_eq!(names, vec!["a1", "a2", "b1", "b2", "b3"]);
    }

    #[test]
    fn test_merge_keeps_duplicates() {
        let merged = merge(vec![vec![named("Smith")], vec![named("Smith")]]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], merged[1]);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge(Vec::new()).is_empty());
        assert!(merge(vec![Vec::new(), Vec::new()]).is_empty());
    }

    #[test]
    fn test_merge_sources_applies_each_profile() {
        let ns_row: SourceRow = [("Town".to_string(), "Truro".to_string())].into_iter().collect();
        let ec_row: SourceRow = [("city".to_string(), "Halifax".to_string())].into_iter().collect();

        let merged = merge_sources(vec![
            (SourceId::NovaScotia.profile(), vec![ns_row]),
            (SourceId::ElectionsCanada.profile(), vec![ec_row]),
        ]);

        assert_eq!(merged[0].city, "Truro");
        assert_eq!(merged[1].city, "Halifax");
    }
}
