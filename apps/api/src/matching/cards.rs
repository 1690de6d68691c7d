//! Match cards: the presentation view of ranked results.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::models::SalaryRange;
use crate::matching::matcher::{MatchResult, SubScores};
use crate::resume::{truncate_with_ellipsis, ResumeDocument};

pub const DEFAULT_TOP_N: usize = 15;
const MATCHED_SKILLS_SHOWN: usize = 5;
const SUMMARY_CHARS: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchLabel {
    Excellent,
    Good,
    Fair,
}

impl MatchLabel {
    /// Excellent from 75%, Good from 50%, Fair below.
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 75.0 {
            MatchLabel::Excellent
        } else if percent >= 50.0 {
            MatchLabel::Good
        } else {
            MatchLabel::Fair
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchLabel::Excellent => "Excellent",
            MatchLabel::Good => "Good",
            MatchLabel::Fair => "Fair",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    BestMatch,
    Company,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

/// Filters applied after ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewOptions {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default)]
    pub min_score_percent: f64,
    #[serde(default)]
    pub sort_by: SortBy,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            min_score_percent: 0.0,
            sort_by: SortBy::BestMatch,
        }
    }
}

impl ViewOptions {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(0.0..=100.0).contains(&self.min_score_percent) {
            return Err(AppError::Validation(
                "min_score_percent must be between 0 and 100".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCard {
    /// 1-based position in best-match order, kept when sorting by company.
    pub rank: usize,
    pub title: String,
    pub company: String,
    pub location: String,
    pub score: f64,
    pub score_percent: f64,
    pub label: MatchLabel,
    pub sub_scores: SubScores,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub summary: String,
    pub apply_url: String,
    pub salary_range: Option<SalaryRange>,
    pub is_remote: bool,
}

/// Score as a percentage rounded to one decimal.
pub fn score_percent(score: f64) -> f64 {
    (score * 1000.0).round() / 10.0
}

impl MatchCard {
    pub fn build(rank: usize, result: &MatchResult, resume: &ResumeDocument) -> Self {
        let job = &result.job;
        let percent = score_percent(result.score);
        Self {
            rank,
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            score: result.score,
            score_percent: percent,
            label: MatchLabel::from_percent(percent),
            sub_scores: result.sub_scores,
            matched_skills: job
                .skills_required
                .intersection(&resume.extracted_skills)
                .take(MATCHED_SKILLS_SHOWN)
                .cloned()
                .collect(),
            missing_skills: job
                .skills_required
                .difference(&resume.extracted_skills)
                .cloned()
                .collect(),
            summary: truncate_with_ellipsis(&job.description, SUMMARY_CHARS),
            apply_url: job.source_url.clone(),
            salary_range: job.salary_range.clone(),
            is_remote: job.is_remote,
        }
    }
}

/// Builds cards from results already in best-match order. The `top_n` cap is
/// taken in that order first; the score floor and the sort only reshape the
/// page that survives it.
pub fn build_cards(
    results: &[MatchResult],
    resume: &ResumeDocument,
    options: &ViewOptions,
) -> Vec<MatchCard> {
    let mut cards: Vec<MatchCard> = results
        .iter()
        .take(options.top_n)
        .enumerate()
        .map(|(i, result)| MatchCard::build(i + 1, result, resume))
        .filter(|card| card.score_percent >= options.min_score_percent)
        .collect();

    if options.sort_by == SortBy::Company {
        cards.sort_by_key(|card| card.company.to_lowercase());
    }

    cards
}
