//! Turns raw search records into `JobPosting`s.
//!
//! Every record is decoded on its own so one bad entry never sinks the batch.
//! Records that fail to decode, or whose title or description is blank, are
//! dropped with a warning.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::jobs::models::JobPosting;
use crate::jobs::salary;
use crate::skills::SkillExtractor;

pub const MAX_DESCRIPTION_CHARS: usize = 1000;
const UNKNOWN_COMPANY: &str = "Unknown Company";
const REMOTE_LOCATION: &str = "Remote";

/// Response body: either a bare array of jobs or the `{ "data": [...] }` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum JobsPayload {
    List(Vec<Value>),
    Envelope {
        #[serde(default)]
        data: Option<Vec<Value>>,
    },
}

impl JobsPayload {
    pub fn into_records(self) -> Vec<Value> {
        match self {
            JobsPayload::List(records) => records,
            JobsPayload::Envelope { data } => data.unwrap_or_default(),
        }
    }
}

/// One job as the search service sends it. Plain field names (`title`,
/// `company`, `url`, ...) are separate fields so simple array feeds decode too,
/// and a record carrying both spellings is not a duplicate-field error. The
/// `job_*` spelling wins when both are present.
#[derive(Debug, Deserialize)]
struct RawJob {
    #[serde(default)]
    job_id: Option<String>,
    #[serde(default)]
    job_title: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    employer_name: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    job_description: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    job_apply_link: Option<String>,
    #[serde(default)]
    apply_link: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    job_city: Option<String>,
    #[serde(default)]
    job_state: Option<String>,
    #[serde(default)]
    job_country: Option<String>,
    #[serde(default)]
    job_employment_type: Option<String>,
    #[serde(default)]
    employment_type: Option<String>,
    #[serde(default)]
    job_is_remote: Option<bool>,
    #[serde(default)]
    is_remote: Option<bool>,
    #[serde(default)]
    job_posted_at_datetime_utc: Option<String>,
    #[serde(default)]
    job_salary: Option<Value>,
    #[serde(default)]
    salary: Option<Value>,
    #[serde(default)]
    job_min_salary: Option<f64>,
    #[serde(default)]
    job_max_salary: Option<f64>,
    #[serde(default)]
    job_salary_currency: Option<String>,
    #[serde(default)]
    job_highlights: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    job_required_skills: Option<Vec<String>>,
    #[serde(default)]
    skills: Option<Vec<String>>,
}

impl RawJob {
    fn title(&self) -> Option<String> {
        non_blank(self.job_title.as_deref()).or_else(|| non_blank(self.title.as_deref()))
    }

    fn description(&self) -> Option<String> {
        non_blank(self.job_description.as_deref()).or_else(|| non_blank(self.description.as_deref()))
    }

    fn company(&self) -> Option<String> {
        non_blank(self.employer_name.as_deref()).or_else(|| non_blank(self.company.as_deref()))
    }

    fn apply_url(&self) -> String {
        [&self.job_apply_link, &self.apply_link, &self.url]
            .into_iter()
            .find_map(|link| non_blank(link.as_deref()))
            .unwrap_or_default()
    }

    fn employment_type(&self) -> Option<String> {
        non_blank(self.job_employment_type.as_deref())
            .or_else(|| non_blank(self.employment_type.as_deref()))
    }

    fn salary_text(&self) -> Option<String> {
        salary_text(self.job_salary.as_ref()).or_else(|| salary_text(self.salary.as_ref()))
    }

    fn listed_skills(&self) -> impl Iterator<Item = &String> {
        self.job_required_skills.iter().chain(self.skills.iter()).flatten()
    }
}

/// Normalizes a batch, preserving input order of the records that survive.
pub fn normalize_batch(records: Vec<Value>, skills: &dyn SkillExtractor) -> Vec<JobPosting> {
    let total = records.len();
    let postings: Vec<JobPosting> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<RawJob>(record) {
            Ok(raw) => normalize_record(raw, index, skills),
            Err(e) => {
                tracing::warn!("Dropping job record #{index}: undecodable ({e})");
                None
            }
        })
        .collect();

    if postings.len() < total {
        tracing::warn!("Dropped {} of {total} job records", total - postings.len());
    }
    postings
}

fn normalize_record(raw: RawJob, index: usize, skills: &dyn SkillExtractor) -> Option<JobPosting> {
    let id = raw.job_id.clone().unwrap_or_else(|| format!("#{index}"));

    let (Some(title), Some(description)) = (raw.title(), raw.description()) else {
        tracing::warn!("Dropping job record {id}: missing title or description");
        return None;
    };

    let skills_required = required_skills(&raw, &title, &description, skills);

    let salary_range = salary::from_fields(
        raw.job_min_salary,
        raw.job_max_salary,
        raw.job_salary_currency.as_deref(),
    )
    .or_else(|| raw.salary_text().and_then(|t| salary::parse_salary_text(&t)));

    let posted_at = raw
        .job_posted_at_datetime_utc
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Some(JobPosting {
        location: location(&raw),
        company: raw.company().unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
        description: truncate_chars(&description, MAX_DESCRIPTION_CHARS),
        title,
        salary_range,
        skills_required,
        source_url: raw.apply_url(),
        employment_type: raw.employment_type(),
        is_remote: raw.job_is_remote.or(raw.is_remote).unwrap_or(false),
        posted_at,
    })
}

/// Skills found in the title, full description and highlights, plus any the
/// source listed explicitly (canonicalized through the same extractor).
fn required_skills(
    raw: &RawJob,
    title: &str,
    description: &str,
    skills: &dyn SkillExtractor,
) -> BTreeSet<String> {
    let mut text = format!("{title}\n{description}");
    if let Some(highlights) = &raw.job_highlights {
        for line in highlights.values().flatten() {
            text.push('\n');
            text.push_str(line);
        }
    }
    for listed in raw.listed_skills() {
        text.push('\n');
        text.push_str(listed);
    }
    skills.extract_skills(&text)
}

fn location(raw: &RawJob) -> String {
    if let Some(location) = non_blank(raw.location.as_deref()) {
        return location;
    }
    let parts: Vec<String> = [&raw.job_city, &raw.job_state, &raw.job_country]
        .into_iter()
        .filter_map(|part| non_blank(part.as_deref()))
        .collect();
    if parts.is_empty() {
        REMOTE_LOCATION.to_string()
    } else {
        parts.join(", ")
    }
}

fn salary_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(format!("${n}")),
        _ => None,
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
