// 🔍 Search Filter - "last [first]" name query
// Case-insensitive substring match; nothing is shown until something is typed

use crate::record::CanonicalRecord;

/// Parsed query: first token matches last names, second token first names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub last: String,
    pub first: Option<String>,
}

impl SearchQuery {
    /// Split on whitespace runs; tokens past the second are ignored.
    /// Returns `None` for an empty or whitespace-only query.
    pub fn parse(query: &str) -> Option<SearchQuery> {
        let mut tokens = query.split_whitespace().map(str::to_lowercase);
        let last = tokens.next()?;
        let first = tokens.next();
        Some(SearchQuery { last, first })
    }

    pub fn matches(&self, record: &CanonicalRecord) -> bool {
        if !record.last_name.to_lowercase().contains(&self.last) {
            return false;
        }
        match &self.first {
            Some(first) => record.first_name.to_lowercase().contains(first.as_str()),
            None => true,
        }
    }
}

/// Stable filter of `records` by a name query
pub fn search(records: &[CanonicalRecord], query: &str) -> Vec<CanonicalRecord> {
    let Some(query) = SearchQuery::parse(query) else {
        return Vec::new();
    };

    records
        .iter()
        .filter(|record| query.matches(record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    fn person(last: &str, first: &str) -> CanonicalRecord {
        CanonicalRecord::default()
            .with(Field::LastName, last)
            .with(Field::FirstName, first)
    }

    fn fixtures() -> Vec<CanonicalRecord> {
        vec![
            person("Smith", "John"),
            person("Smithers", "Anne"),
            person("MacDonald", "John"),
            person("Goldsmith", ""),
        ]
    }

    fn last_names(records: &[CanonicalRecord]) -> Vec<&str> {
        records.iter().map(|r| r.last_name.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let records = fixtures();
        assert!(search(&records, "").is_empty());
        assert!(search(&records, "   \t ").is_empty());
    }

    #[test]
    fn test_last_name_substring() {
        let records = fixtures();
        let found = search(&records, "Smith");
        assert_eq!(last_names(&found), vec!["Smith", "Smithers", "Goldsmith"]);

        let found = search(&records, "ith");
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_first_name_narrows() {
        let records = fixtures();
        let found = search(&records, "smith JOHN");
        assert_eq!(last_names(&found), vec!["Smith"]);
    }

    #[test]
    fn test_single_token_ignores_first_name() {
        let records = fixtures();
        // Goldsmith has an empty first name and still matches
        let found = search(&records, "gold");
        assert_eq!(last_names(&found), vec!["Goldsmith"]);
    }

    #[test]
    fn test_extra_tokens_ignored() {
        let records = fixtures();
        let found = search(&records, "  smith   john   whatever  ");
        assert_eq!(last_names(&found), vec!["Smith"]);
    }

    #[test]
    fn test_parse_query() {
        assert_eq!(SearchQuery::parse(""), None);
        assert_eq!(
            SearchQuery::parse("Smith John"),
            Some(SearchQuery {
                last: "smith".to_string(),
                first: Some("john".to_string())
            })
        );
    }
}
