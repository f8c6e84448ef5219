// file: src/cleaner/similarity.rs
// description: token-set overlap matcher for near-duplicate line detection
// reference: jaccard similarity over lowercase word tokens

use super::patterns::WORD_TOKEN;
use crate::config::CleanerConfig;
use std::collections::HashSet;

/// Jaccard ratio a line pair must exceed to count as a near duplicate.
pub const FUZZY_THRESHOLD: f64 = 0.8;

/// Both token sets need strictly more members than this before fuzzy
/// matching applies.
pub const MIN_FUZZY_TOKENS: usize = 5;

pub type TokenSet = HashSet<String>;

pub fn tokenize(text: &str) -> TokenSet {
    WORD_TOKEN
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

#[derive(Debug, Clone, Copy)]
pub struct SimilarityMatcher {
    threshold: f64,
    min_tokens: usize,
}

impl SimilarityMatcher {
    pub fn new(threshold: f64, min_tokens: usize) -> Self {
        Self {
            threshold,
            min_tokens,
        }
    }

    pub fn from_config(config: &CleanerConfig) -> Self {
        Self::new(config.fuzzy_threshold, config.min_fuzzy_tokens)
    }

    pub fn is_duplicate(&self, a: &str, b: &str) -> bool {
        self.is_duplicate_tokens(&tokenize(a), &tokenize(b))
    }

    pub fn is_duplicate_tokens(&self, a: &TokenSet, b: &TokenSet) -> bool {
        if a.len() <= self.min_tokens || b.len() <= self.min_tokens {
            return false;
        }
        jaccard(a, b) > self.threshold
    }
}

impl Default for SimilarityMatcher {
    fn default() -> Self {
        Self::new(FUZZY_THRESHOLD, MIN_FUZZY_TOKENS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_strips_punctuation() {
        let tokens = tokenize("Bilen, BILEN og sykkelen!");
        assert_eq!(tokens.len(), 3);
        assert!(tokens.contains("bilen"));
        assert!(tokens.contains("sykkelen"));
    }

    #[test]
    fn test_near_duplicate_detected() {
        let matcher = SimilarityMatcher::default();
        let a = "Du må alltid tilpasse farten etter forholdene på veien i dag";
        let b = "Du må alltid tilpasse farten etter forholdene på veien";
        assert!(matcher.is_duplicate(a, b));
    }

    #[test]
    fn test_short_lines_never_match() {
        let matcher = SimilarityMatcher::default();
        assert!(!matcher.is_duplicate("Stopp her nå", "Stopp her nå"));
        assert!(!matcher.is_duplicate("en to tre fire fem", "en to tre fire fem"));
        assert!(!matcher.is_duplicate("", ""));
    }

    #[test]
    fn test_distinct_lines_do_not_match() {
        let matcher = SimilarityMatcher::default();
        let a = "Vikeplikt betyr at du skal slippe fram kjøretøy fra høyre";
        let b = "Forkjørsvei betyr at andre har vikeplikt for deg i kryss";
        assert!(!matcher.is_duplicate(a, b));
    }

    #[test]
    fn test_matcher_is_symmetric() {
        let matcher = SimilarityMatcher::default();
        let pairs = [
            (
                "en to tre fire fem seks sju",
                "en to tre fire fem seks sju åtte",
            ),
            (
                "Kjør forsiktig i tett tåke og mørke",
                "kjør forsiktig i tett tåke",
            ),
            ("", "noe tekst her"),
        ];
        for (a, b) in pairs {
            assert_eq!(matcher.is_duplicate(a, b), matcher.is_duplicate(b, a));
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let matcher = SimilarityMatcher::default();
        // 8 shared tokens of 10 total: ratio exactly 0.8
        let a = "a1 a2 a3 a4 a5 a6 a7 a8 x1";
        let b = "a1 a2 a3 a4 a5 a6 a7 a8 y1";
        assert!((jaccard(&tokenize(a), &tokenize(b)) - 0.8).abs() < f64::EPSILON);
        assert!(!matcher.is_duplicate(a, b));
    }
}
