//! Keyword extraction: the most frequent salient words of a document,
//! led by its extracted skills.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::matching::tokenize::STOP_WORDS;
use crate::skills::SkillVocabulary;

pub const DEFAULT_TOP_K: usize = 15;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z]{3,}\b").unwrap());

/// Returns up to `top_k` keywords: `skills` first (in set order), then the most
/// frequent words of three or more letters that are neither stop words nor
/// vocabulary terms. Frequency ties are broken alphabetically.
pub fn extract_keywords(
    text: &str,
    skills: &BTreeSet<String>,
    vocabulary: &SkillVocabulary,
    top_k: usize,
) -> Vec<String> {
    let lowered = text.to_lowercase();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in WORD_RE.find_iter(&lowered).map(|m| m.as_str()) {
        if STOP_WORDS.contains(word) || vocabulary.contains_term(word) {
            continue;
        }
        *counts.entry(word).or_default() += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let skill_keys: BTreeSet<String> = skills.iter().map(|s| s.to_lowercase()).collect();

    skills
        .iter()
        .cloned()
        .chain(
            ranked
                .into_iter()
                .filter(|(word, _)| !skill_keys.contains(*word))
                .map(|(word, _)| word.to_string()),
        )
        .take(top_k)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_skills_lead_then_frequency() {
        let vocab = SkillVocabulary::from_names(&["Python"]);
        let text = "Python pipelines, pipelines, dashboards. Python reporting pipelines dashboards";
        let keywords = extract_keywords(text, &set(&["Python"]), &vocab, 10);
        assert_eq!(keywords, vec!["Python", "pipelines", "dashboards", "reporting"]);
    }

    #[test]
    fn test_stop_words_and_short_words_skipped() {
        let vocab = SkillVocabulary::from_names(&[]);
        let keywords = extract_keywords("the and of an it go api api", &BTreeSet::new(), &vocab, 10);
        assert_eq!(keywords, vec!["api"]);
    }

    #[test]
    fn test_ties_break_alphabetically() {
        let vocab = SkillVocabulary::from_names(&[]);
        let keywords = extract_keywords("zebra apple mango", &BTreeSet::new(), &vocab, 10);
        assert_eq!(keywords, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn test_top_k_caps_output() {
        let vocab = SkillVocabulary::from_names(&["SQL"]);
        let keywords = extract_keywords(
            "alpha beta gamma delta epsilon",
            &set(&["SQL"]),
            &vocab,
            3,
        );
        assert_eq!(keywords, vec!["SQL", "alpha", "beta"]);
    }

    #[test]
    fn test_empty_text() {
        let vocab = SkillVocabulary::default();
        assert!(extract_keywords("", &BTreeSet::new(), &vocab, DEFAULT_TOP_K).is_empty());
    }
}
