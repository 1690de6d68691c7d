//! Skill extraction by whole-word, case-insensitive vocabulary matching.
//!
//! `SkillExtractor` is the text → skill-set capability. `VocabularyMatcher`
//! compiles one regex per canonical skill (name plus synonyms) up front so the
//! same instance can be shared across requests.

pub mod keywords;
pub mod vocabulary;

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};

pub use vocabulary::{Skill, SkillVocabulary};

/// Extractor capability: text in, set of canonical skill names out.
pub trait SkillExtractor: Send + Sync {
    fn extract_skills(&self, text: &str) -> BTreeSet<String>;
}

/// Compiled matcher over a `SkillVocabulary`.
pub struct VocabularyMatcher {
    vocabulary: SkillVocabulary,
    patterns: Vec<(String, Regex)>,
}

impl VocabularyMatcher {
    pub fn new(vocabulary: SkillVocabulary) -> Result<Self, regex::Error> {
        let patterns = vocabulary
            .skills()
            .iter()
            .map(|skill| Ok((skill.name.clone(), compile_skill_pattern(skill)?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self {
            vocabulary,
            patterns,
        })
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }
}

impl SkillExtractor for VocabularyMatcher {
    fn extract_skills(&self, text: &str) -> BTreeSet<String> {
        if text.trim().is_empty() {
            return BTreeSet::new();
        }
        self.patterns
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// `(?:^|[^letter/digit])(?:form1|form2)(?:$|[^letter/digit])`, case-insensitive.
///
/// Boundaries are explicit rather than `\b` so that forms ending in symbols
/// (`C++`, `C#`, `CI/CD`) still match. Inner whitespace in multi-word forms
/// matches any whitespace run.
fn compile_skill_pattern(skill: &Skill) -> Result<Regex, regex::Error> {
    let alternatives: Vec<String> = skill
        .surface_forms()
        .map(|form| {
            form.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .filter(|form| !form.is_empty())
        .collect();

    let pattern = format!(
        r"(?:^|[^\p{{L}}\p{{N}}])(?:{})(?:$|[^\p{{L}}\p{{N}}])",
        alternatives.join("|")
    );
    RegexBuilder::new(&pattern).case_insensitive(true).build()
}
