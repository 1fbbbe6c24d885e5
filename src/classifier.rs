// 🏷️ Category Classifier - Party label → bucket
// One ordered rule table shared by the totals and the colour hints.
// Exact abbreviations are checked before substring fallbacks; first match wins.

use serde::{Deserialize, Serialize};

// ============================================================================
// CATEGORY BUCKET
// ============================================================================

/// Canonical classification outcome; "unclassified" is `None` at call sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryBucket {
    Pc,
    Cpc,
    Lpc,
    Nsndp,
    NdpCa,
    Ndp,
    Liberal,
    /// Display-only, never totalled
    Green,
    /// Display-only, never totalled
    Atlantica,
}

impl CategoryBucket {
    /// Buckets that take part in money totals
    pub const AGGREGATED: [CategoryBucket; 7] = [
        CategoryBucket::Pc,
        CategoryBucket::Cpc,
        CategoryBucket::Lpc,
        CategoryBucket::Nsndp,
        CategoryBucket::NdpCa,
        CategoryBucket::Ndp,
        CategoryBucket::Liberal,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CategoryBucket::Pc => "pc",
            CategoryBucket::Cpc => "cpc",
            CategoryBucket::Lpc => "lpc",
            CategoryBucket::Nsndp => "nsndp",
            CategoryBucket::NdpCa => "ndpca",
            CategoryBucket::Ndp => "ndp",
            CategoryBucket::Liberal => "liberal",
            CategoryBucket::Green => "green",
            CategoryBucket::Atlantica => "atlantica",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryBucket::Pc => "PC (Nova Scotia)",
            CategoryBucket::Cpc => "Conservative (Federal)",
            CategoryBucket::Lpc => "Liberal (Federal)",
            CategoryBucket::Nsndp => "NDP (Nova Scotia)",
            CategoryBucket::NdpCa => "NDP (Federal)",
            CategoryBucket::Ndp => "NDP",
            CategoryBucket::Liberal => "Liberal (Nova Scotia)",
            CategoryBucket::Green => "Green",
            CategoryBucket::Atlantica => "Atlantica",
        }
    }

    pub fn is_aggregated(&self) -> bool {
        !matches!(self, CategoryBucket::Green | CategoryBucket::Atlantica)
    }

    /// Presentation colour (hex), used only for row highlighting
    pub fn color(&self) -> &'static str {
        match self {
            CategoryBucket::Pc | CategoryBucket::Cpc => "#1A4782",
            CategoryBucket::Lpc | CategoryBucket::Liberal => "#D71920",
            CategoryBucket::Nsndp | CategoryBucket::NdpCa | CategoryBucket::Ndp => "#F37021",
            CategoryBucket::Green => "#3D9B35",
            CategoryBucket::Atlantica => "#00A7E1",
        }
    }
}

/// Colour for rows no rule classifies
pub const UNCLASSIFIED_COLOR: &str = "#808080";

// ============================================================================
// RULES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Whole lower-cased label must equal the pattern
    Exact,
    /// Lower-cased label must contain the pattern
    Contains,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierRule {
    pub kind: MatchKind,
    /// Lower-case pattern
    pub pattern: String,
    pub bucket: CategoryBucket,
}

impl ClassifierRule {
    pub fn exact(pattern: &str, bucket: CategoryBucket) -> Self {
        ClassifierRule {
            kind: MatchKind::Exact,
            pattern: pattern.to_lowercase(),
            bucket,
        }
    }

    pub fn contains(pattern: &str, bucket: CategoryBucket) -> Self {
        ClassifierRule {
            kind: MatchKind::Contains,
            pattern: pattern.to_lowercase(),
            bucket,
        }
    }

    /// `label_lower` must already be trimmed and lower-cased
    pub fn matches(&self, label_lower: &str) -> bool {
        match self.kind {
            MatchKind::Exact => label_lower == self.pattern,
            MatchKind::Contains => label_lower.contains(self.pattern.as_str()),
        }
    }
}

/// Toggles for the default rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierProfile {
    /// Include the `contains "ndp"` fallback after the exact checks
    #[serde(default = "default_true")]
    pub ndp_substring: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ClassifierProfile {
    fn default() -> Self {
        ClassifierProfile { ndp_substring: true }
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<ClassifierRule>,
}

impl Classifier {
    /// Default table for a profile
    ///
    /// `nsndp` and `ndp-ca` must stay ahead of `ndp`, and every exact rule
    /// ahead of the substring fallbacks.
    pub fn new(profile: ClassifierProfile) -> Self {
        use CategoryBucket::*;

        let mut rules = vec![
            ClassifierRule::exact("pc", Pc),
            ClassifierRule::exact("cpc", Cpc),
            ClassifierRule::exact("lpc", Lpc),
            ClassifierRule::exact("nsndp", Nsndp),
            ClassifierRule::exact("ndp-ca", NdpCa),
            ClassifierRule::exact("ndp", Ndp),
            ClassifierRule::contains("liberal", Liberal),
            ClassifierRule::contains("lpc", Lpc),
        ];
        if profile.ndp_substring {
            rules.push(ClassifierRule::contains("ndp", Ndp));
        }
        rules.push(ClassifierRule::contains("green", Green));
        rules.push(ClassifierRule::contains("atlantica", Atlantica));

        Classifier { rules }
    }

    /// Custom table, evaluated exactly in the given order
    pub fn from_rules(rules: Vec<ClassifierRule>) -> Self {
        Classifier { rules }
    }

    pub fn rules(&self) -> &[ClassifierRule] {
        &self.rules
    }

    /// First matching rule's bucket, or `None` when unclassified
    pub fn classify(&self, label: &str) -> Option<CategoryBucket> {
        let label_lower = label.trim().to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&label_lower))
            .map(|rule| rule.bucket)
    }

    /// Row colour for a party label
    pub fn color_hint(&self, label: &str) -> &'static str {
        self.classify(label)
            .map(|bucket| bucket.color())
            .unwrap_or(UNCLASSIFIED_COLOR)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierProfile::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_abbreviations() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("PC"), Some(CategoryBucket::Pc));
        assert_eq!(classifier.classify("cpc"), Some(CategoryBucket::Cpc));
        assert_eq!(classifier.classify("LPC"), Some(CategoryBucket::Lpc));
        assert_eq!(classifier.classify(" ndp "), Some(CategoryBucket::Ndp));
    }

    #[test]
    fn test_specific_ndp_forms_before_plain_ndp() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("NSNDP"), Some(CategoryBucket::Nsndp));
        assert_eq!(classifier.classify("NDP-CA"), Some(CategoryBucket::NdpCa));
        assert_eq!(classifier.classify("ndp"), Some(CategoryBucket::Ndp));
    }

    #[test]
    fn test_substring_fallbacks_in_order() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify("Nova Scotia Liberal Party"),
            Some(CategoryBucket::Liberal)
        );
        assert_eq!(classifier.classify("LPC Halifax"), Some(CategoryBucket::Lpc));
        assert_eq!(classifier.classify("NS NDP Caucus"), Some(CategoryBucket::Ndp));
        assert_eq!(classifier.classify("Green Party"), Some(CategoryBucket::Green));
        assert_eq!(
            classifier.classify("Atlantica Party Association"),
            Some(CategoryBucket::Atlantica)
        );
        // "liberal" is checked before "lpc"
        assert_eq!(classifier.classify("Liberal LPC"), Some(CategoryBucket::Liberal));
    }

    #[test]
    fn test_exact_checks_beat_substrings() {
        let classifier = Classifier::default();
        // "cpc" contains "pc" but matches its own exact rule
        assert_eq!(classifier.classify("CPC"), Some(CategoryBucket::Cpc));
        // Not an exact form, and no substring rule covers "pc"
        assert_eq!(classifier.classify("PC Party"), None);
    }

    #[test]
    fn test_ndp_substring_toggle() {
        let without = Classifier::new(ClassifierProfile { ndp_substring: false });
        assert_eq!(without.classify("NS NDP Caucus"), None);
        assert_eq!(without.classify("NSNDP"), Some(CategoryBucket::Nsndp));
        assert_eq!(without.rules().len(), Classifier::default().rules().len() - 1);
    }

    #[test]
    fn test_unclassified() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify(""), None);
        assert_eq!(classifier.classify("Independent"), None);
        assert_eq!(classifier.color_hint("Independent"), UNCLASSIFIED_COLOR);
    }

    #[test]
    fn test_display_only_buckets() {
        assert!(!CategoryBucket::Green.is_aggregated());
        assert!(!CategoryBucket::Atlantica.is_aggregated());
        assert!(CategoryBucket::AGGREGATED.iter().all(|b| b.is_aggregated()));
    }

    #[test]
    fn test_custom_rule_order() {
        let classifier = Classifier::from_rules(vec![
            ClassifierRule::contains("ndp", CategoryBucket::Ndp),
            ClassifierRule::exact("nsndp", CategoryBucket::Nsndp),
        ]);
        // Reordering changes the outcome
        assert_eq!(classifier.classify("NSNDP"), Some(CategoryBucket::Ndp));
    }

    #[test]
    fn test_color_hint_shared_with_classification() {
        let classifier = Classifier::default();
        assert_eq!(classifier.color_hint("pc"), CategoryBucket::Pc.color());
        assert_eq!(classifier.color_hint("Green"), "#3D9B35");
    }
}
