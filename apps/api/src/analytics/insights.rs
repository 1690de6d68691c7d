//! Aggregate insights over a ranked batch: overview numbers plus the data
//! behind the skill-frequency and salary-distribution charts.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::matching::cards::score_percent;
use crate::matching::matcher::MatchResult;

const HIGH_MATCH_PERCENT: f64 = 75.0;
const MISSING_SKILLS_SHOWN: usize = 10;

/// Bucket edges on the salary midpoint; the last bucket is open-ended.
const SALARY_BUCKETS: &[(f64, Option<f64>, &str)] = &[
    (0.0, Some(50_000.0), "<50k"),
    (50_000.0, Some(75_000.0), "50k-75k"),
    (75_000.0, Some(100_000.0), "75k-100k"),
    (100_000.0, Some(125_000.0), "100k-125k"),
    (125_000.0, Some(150_000.0), "125k-150k"),
    (150_000.0, None, "150k+"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total_matches: usize,
    pub average_score_percent: f64,
    pub high_matches: usize,
    pub best_score_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryBucket {
    pub currency: String,
    pub label: String,
    pub lower: f64,
    pub upper: Option<f64>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageSalary {
    pub currency: String,
    pub average: f64,
    pub jobs_with_salary: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapAnalysis {
    /// Held skills that at least one job asks for, most demanded first.
    pub strengths: Vec<String>,
    /// Most demanded skills the resume lacks.
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub overview: Overview,
    pub skill_frequency: Vec<SkillCount>,
    pub salary_distribution: Vec<SalaryBucket>,
    pub average_salary: Vec<AverageSalary>,
    pub remote_ratio: f64,
    pub gap_analysis: GapAnalysis,
}

pub fn compute_insights(matches: &[MatchResult], resume_skills: &BTreeSet<String>) -> Insights {
    let skill_frequency = skill_frequency(matches);
    Insights {
        overview: overview(matches),
        salary_distribution: salary_distribution(matches),
        average_salary: average_salary(matches),
        remote_ratio: remote_ratio(matches),
        gap_analysis: gap_analysis(&skill_frequency, resume_skills),
        skill_frequency,
    }
}

pub fn overview(matches: &[MatchResult]) -> Overview {
    if matches.is_empty() {
        return Overview {
            total_matches: 0,
            average_score_percent: 0.0,
            high_matches: 0,
            best_score_percent: 0.0,
        };
    }

    let percents: Vec<f64> = matches.iter().map(|m| score_percent(m.score)).collect();
    let average = percents.iter().sum::<f64>() / percents.len() as f64;

    Overview {
        total_matches: matches.len(),
        average_score_percent: (average * 10.0).round() / 10.0,
        high_matches: percents.iter().filter(|p| **p >= HIGH_MATCH_PERCENT).count(),
        best_score_percent: percents.iter().cloned().fold(0.0, f64::max),
    }
}

/// Number of jobs requiring each skill, count descending then name.
pub fn skill_frequency(matches: &[MatchResult]) -> Vec<SkillCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for skill in matches.iter().flat_map(|m| m.job.skills_required.iter()) {
        *counts.entry(skill.as_str()).or_default() += 1;
    }

    let mut frequency: Vec<SkillCount> = counts
        .into_iter()
        .map(|(skill, count)| SkillCount {
            skill: skill.to_string(),
            count,
        })
        .collect();
    frequency.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.skill.cmp(&b.skill)));
    frequency
}

/// Counts jobs per midpoint bucket for every currency that appears.
/// Jobs without a salary are left out.
pub fn salary_distribution(matches: &[MatchResult]) -> Vec<SalaryBucket> {
    let mut per_currency: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for range in matches.iter().filter_map(|m| m.job.salary_range.as_ref()) {
        let counts = per_currency
            .entry(range.currency.as_str())
            .or_insert_with(|| vec![0; SALARY_BUCKETS.len()]);
        let midpoint = range.midpoint();
        let index = SALARY_BUCKETS
            .iter()
            .position(|(_, upper, _)| upper.map_or(true, |u| midpoint < u))
            .unwrap_or(SALARY_BUCKETS.len() - 1);
        counts[index] += 1;
    }

    per_currency
        .into_iter()
        .flat_map(|(currency, counts)| {
            SALARY_BUCKETS
                .iter()
                .zip(counts)
                .map(move |((lower, upper, label), count)| SalaryBucket {
                    currency: currency.to_string(),
                    label: label.to_string(),
                    lower: *lower,
                    upper: *upper,
                    count,
                })
        })
        .collect()
}

/// Mean salary midpoint per currency.
pub fn average_salary(matches: &[MatchResult]) -> Vec<AverageSalary> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for range in matches.iter().filter_map(|m| m.job.salary_range.as_ref()) {
        let entry = sums.entry(range.currency.as_str()).or_insert((0.0, 0));
        entry.0 += range.midpoint();
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(currency, (sum, n))| AverageSalary {
            currency: currency.to_string(),
            average: (sum / n as f64).round(),
            jobs_with_salary: n,
        })
        .collect()
}

/// Share of remote jobs in [0, 1]; 0 for an empty batch.
pub fn remote_ratio(matches: &[MatchResult]) -> f64 {
    if matches.is_empty() {
        return 0.0;
    }
    matches.iter().filter(|m| m.job.is_remote).count() as f64 / matches.len() as f64
}

pub fn gap_analysis(frequency: &[SkillCount], resume_skills: &BTreeSet<String>) -> GapAnalysis {
    let (held, lacking): (Vec<&SkillCount>, Vec<&SkillCount>) = frequency
        .iter()
        .partition(|entry| resume_skills.contains(&entry.skill));

    GapAnalysis {
        strengths: held.into_iter().map(|e| e.skill.clone()).collect(),
        missing: lacking
            .into_iter()
            .take(MISSING_SKILLS_SHOWN)
            .map(|e| e.skill.clone())
            .collect(),
    }
}
