//! Static skill vocabulary: ordered canonical names, each with optional synonyms.

use serde::{Deserialize, Serialize};

/// One canonical skill plus the alternate spellings that should map onto it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl Skill {
    pub fn new(name: &str, synonyms: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Canonical name followed by synonyms.
    pub fn surface_forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.synonyms.iter().map(String::as_str))
    }
}

/// (canonical name, synonyms). Order is significant: it is the vocabulary order.
const DEFAULT_SKILLS: &[(&str, &[&str])] = &[
    // Languages
    ("Python", &[]),
    ("Java", &[]),
    ("JavaScript", &["ecmascript"]),
    ("TypeScript", &[]),
    ("SQL", &[]),
    ("NoSQL", &[]),
    ("HTML", &["html5"]),
    ("CSS", &["css3"]),
    ("Golang", &[]),
    ("Rust", &[]),
    ("C++", &["cpp"]),
    ("C#", &["csharp"]),
    ("Scala", &[]),
    // Frameworks
    ("React", &["reactjs", "react.js"]),
    ("Angular", &["angularjs"]),
    ("Vue", &["vuejs", "vue.js"]),
    ("Node.js", &["nodejs"]),
    ("Django", &[]),
    ("Flask", &[]),
    ("TensorFlow", &[]),
    ("PyTorch", &[]),
    // Cloud and infrastructure
    ("AWS", &["amazon web services"]),
    ("Azure", &["microsoft azure"]),
    ("GCP", &["google cloud", "google cloud platform"]),
    ("Docker", &[]),
    ("Kubernetes", &["k8s"]),
    ("Terraform", &[]),
    ("Linux", &[]),
    // Data
    ("Snowflake", &[]),
    ("dbt", &[]),
    ("MongoDB", &["mongo"]),
    ("PostgreSQL", &["postgres"]),
    ("Machine Learning", &["ml"]),
    ("AI", &["artificial intelligence"]),
    ("Data Science", &[]),
    ("Data Engineering", &[]),
    ("ETL", &[]),
    ("ELT", &[]),
    ("Airflow", &["apache airflow"]),
    ("Spark", &["apache spark", "pyspark"]),
    ("Hadoop", &[]),
    ("Tableau", &[]),
    ("Power BI", &["powerbi"]),
    ("Excel", &["microsoft excel"]),
    // Practices and tooling
    ("Git", &[]),
    ("GitHub", &[]),
    ("Agile", &[]),
    ("Scrum", &[]),
    ("DevOps", &[]),
    ("CI/CD", &["ci cd", "continuous integration"]),
];

/// Ordered set of canonical skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillVocabulary {
    skills: Vec<Skill>,
}

impl SkillVocabulary {
    /// Builds a vocabulary, dropping blank names and case-insensitive duplicates
    /// while keeping first-seen order.
    pub fn new(skills: Vec<Skill>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let skills = skills
            .into_iter()
            .filter(|s| !s.name.trim().is_empty())
            .filter(|s| seen.insert(s.name.to_lowercase()))
            .collect();
        Self { skills }
    }

    #[cfg(test)]
    pub fn from_names(names: &[&str]) -> Self {
        Self::new(names.iter().map(|n| Skill::new(n, &[])).collect())
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// True if `word` (any case) is a canonical name or synonym.
    pub fn contains_term(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.skills
            .iter()
            .flat_map(|s| s.surface_forms())
            .any(|form| form.to_lowercase() == word)
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new(
            DEFAULT_SKILLS
                .iter()
                .map(|(name, synonyms)| Skill::new(name, synonyms))
                .collect(),
        )
    }
}
