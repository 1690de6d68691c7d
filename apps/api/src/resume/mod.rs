//! Resume documents: extracted text plus the skills found in it.

pub mod extractor;
pub mod handlers;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::resume::extractor::clean_text;
use crate::skills::keywords::{extract_keywords, DEFAULT_TOP_K};
use crate::skills::{SkillExtractor, VocabularyMatcher};

/// Pasted resumes shorter than this (after cleaning) are rejected.
pub const MIN_PASTED_CHARS: usize = 50;
const PREVIEW_CHARS: usize = 500;

/// A resume after extraction. Immutable once built; never stored server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub raw_text: String,
    pub extracted_skills: BTreeSet<String>,
}

impl ResumeDocument {
    pub fn new(raw_text: String, skills: &dyn SkillExtractor) -> Self {
        let extracted_skills = skills.extract_skills(&raw_text);
        Self {
            raw_text,
            extracted_skills,
        }
    }

    /// Builds a document from pasted text, which must hold at least
    /// `MIN_PASTED_CHARS` characters once cleaned.
    pub fn from_pasted_text(text: &str, skills: &dyn SkillExtractor) -> Result<Self, AppError> {
        let cleaned = clean_text(text);
        if cleaned.chars().count() < MIN_PASTED_CHARS {
            return Err(AppError::Validation(format!(
                "resume text must be at least {MIN_PASTED_CHARS} characters"
            )));
        }
        Ok(Self::new(cleaned, skills))
    }

    pub fn stats(&self) -> ResumeStats {
        ResumeStats {
            word_count: self.raw_text.split_whitespace().count(),
            char_count: self.raw_text.chars().count(),
            skill_count: self.extracted_skills.len(),
        }
    }

    /// First 500 characters, with `...` appended when the text was cut.
    pub fn preview(&self) -> String {
        truncate_with_ellipsis(&self.raw_text, PREVIEW_CHARS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeStats {
    pub word_count: usize,
    pub char_count: usize,
    pub skill_count: usize,
}

/// Resume view returned by the upload and paste endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeView {
    pub resume: ResumeDocument,
    pub stats: ResumeStats,
    pub preview: String,
    pub keywords: Vec<String>,
}

impl ResumeView {
    pub fn build(resume: ResumeDocument, matcher: &VocabularyMatcher) -> Self {
        let keywords = extract_keywords(
            &resume.raw_text,
            &resume.extracted_skills,
            matcher.vocabulary(),
            DEFAULT_TOP_K,
        );
        Self {
            stats: resume.stats(),
            preview: resume.preview(),
            keywords,
            resume,
        }
    }
}

/// Cuts `text` to at most `max_chars` characters, appending `...` if anything was removed.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::SkillVocabulary;

    fn matcher() -> VocabularyMatcher {
        VocabularyMatcher::new(SkillVocabulary::from_names(&["Python", "SQL", "Docker", "Java"]))
            .unwrap()
    }

    #[test]
    fn test_document_extracts_skills() {
        let doc = ResumeDocument::new("Python, SQL, Docker experience".to_string(), &matcher());
        let expected: BTreeSet<String> =
            ["Docker", "Python", "SQL"].iter().map(|s| s.to_string()).collect();
        assert_eq!(doc.extracted_skills, expected);
    }

    #[test]
    fn test_empty_document_has_no_skills() {
        let doc = ResumeDocument::new(String::new(), &matcher());
        assert!(doc.extracted_skills.is_empty());
        assert_eq!(doc.stats().word_count, 0);
        assert_eq!(doc.preview(), "");
    }

    #[test]
    fn test_short_pasted_text_rejected() {
        let err = ResumeDocument::from_pasted_text("Python dev", &matcher()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_pasted_text_is_cleaned() {
        let text = "Senior   engineer\n\nwith ten years of Python and SQL work across data platforms";
        let doc = ResumeDocument::from_pasted_text(text, &matcher()).unwrap();
        assert!(!doc.raw_text.contains('\n'));
        assert!(doc.raw_text.starts_with("Senior engineer with"));
        assert!(doc.extracted_skills.contains("SQL"));
    }

    #[test]
    fn test_stats_counts_words_and_chars() {
        let doc = ResumeDocument::new("Rust and Go".to_string(), &matcher());
        let stats = doc.stats();
        assert_eq!(stats.word_count, 3);
        assert_eq!(stats.char_count, 11);
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("abcdef", 3), "abc...");
        assert_eq!(truncate_with_ellipsis("abc", 3), "abc");
        assert_eq!(truncate_with_ellipsis("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_view_keywords_lead_with_skills() {
        let doc = ResumeDocument::new(
            "Python pipelines and reporting pipelines".to_string(),
            &matcher(),
        );
        let view = ResumeView::build(doc, &matcher());
        assert_eq!(view.keywords[0], "Python");
        assert_eq!(view.keywords[1], "pipelines");
    }
}
