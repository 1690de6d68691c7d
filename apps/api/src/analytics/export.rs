//! CSV export of match cards.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::matching::cards::MatchCard;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    rank: usize,
    title: &'a str,
    company: &'a str,
    location: &'a str,
    score_percent: f64,
    label: &'static str,
    content_similarity: f64,
    skill_overlap: f64,
    matched_skills: String,
    missing_skills: String,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
    salary_currency: Option<&'a str>,
    remote: bool,
    apply_url: &'a str,
}

impl<'a> From<&'a MatchCard> for CsvRow<'a> {
    fn from(card: &'a MatchCard) -> Self {
        let salary = card.salary_range.as_ref();
        Self {
            rank: card.rank,
            title: &card.title,
            company: &card.company,
            location: &card.location,
            score_percent: card.score_percent,
            label: card.label.as_str(),
            content_similarity: round4(card.sub_scores.content_similarity),
            skill_overlap: round4(card.sub_scores.skill_overlap),
            matched_skills: card.matched_skills.join(", "),
            missing_skills: card.missing_skills.join(", "),
            salary_min: salary.map(|s| s.min),
            salary_max: salary.map(|s| s.max),
            salary_currency: salary.map(|s| s.currency.as_str()),
            remote: card.is_remote,
            apply_url: &card.apply_url,
        }
    }
}

/// Serializes cards to CSV with a header row, one line per card.
pub fn cards_to_csv(cards: &[MatchCard]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if cards.is_empty() {
        // serde headers are only written with the first record
        writer.write_record(HEADERS)?;
    }
    for card in cards {
        writer.serialize(CsvRow::from(card))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV: {}", e.error()))
}

const HEADERS: [&str; 15] = [
    "rank",
    "title",
    "company",
    "location",
    "score_percent",
    "label",
    "content_similarity",
    "skill_overlap",
    "matched_skills",
    "missing_skills",
    "salary_min",
    "salary_max",
    "salary_currency",
    "remote",
    "apply_url",
];

/// `job_matches_<YYYYmmdd_HHMMSS>.csv`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("job_matches_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::jobs::models::SalaryRange;
    use crate::matching::cards::MatchLabel;
    use crate::matching::matcher::SubScores;

    fn card() -> MatchCard {
        MatchCard {
            rank: 1,
            title: "Data Engineer, Platform".to_string(),
            company: "Acme".to_string(),
            location: "Austin, TX, US".to_string(),
            score: 0.8123,
            score_percent: 81.2,
            label: MatchLabel::Excellent,
            sub_scores: SubScores {
                content_similarity: 0.7,
                skill_overlap: 0.96846,
            },
            matched_skills: vec!["Python".to_string(), "SQL".to_string()],
            missing_skills: vec!["Airflow".to_string()],
            summary: "Build pipelines".to_string(),
            apply_url: "https://acme.test/apply".to_string(),
            salary_range: SalaryRange::new(90_000.0, 120_000.0, "USD"),
            is_remote: false,
        }
    }

    #[test]
    fn test_csv_has_header_and_quoted_fields() {
        let bytes = cards_to_csv(&[card()]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), HEADERS.join(","));
        let row = lines.next().unwrap();
        assert!(row.starts_with("1,\"Data Engineer, Platform\",Acme,\"Austin, TX, US\",81.2,Excellent"));
        assert!(row.contains("0.9685"));
        assert!(row.contains("\"Python, SQL\""));
        assert!(row.contains(",90000"));
        assert!(row.ends_with(",USD,false,https://acme.test/apply"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_empty_export_still_has_header() {
        let text = String::from_utf8(cards_to_csv(&[]).unwrap()).unwrap();
        assert_eq!(text.trim_end(), HEADERS.join(","));
    }

    #[test]
    fn test_file_name_format() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(export_file_name(now), "job_matches_20240309_070501.csv");
    }
}
