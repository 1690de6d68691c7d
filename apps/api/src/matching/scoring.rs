use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Weights for the composite score. Defaults favour content similarity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub content: f64,
    pub skills: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            content: 0.6,
            skills: 0.4,
        }
    }
}

impl MatchWeights {
    /// `content × content_similarity + skills × skill_overlap`, clamped to [0, 1].
    /// Non-finite inputs are treated as 0.
    pub fn composite(&self, content_similarity: f64, skill_overlap: f64) -> f64 {
        let raw = self.content * finite_or_zero(content_similarity)
            + self.skills * finite_or_zero(skill_overlap);
        finite_or_zero(raw).clamp(0.0, 1.0)
    }
}

/// Jaccard similarity |A ∩ B| / |A ∪ B|; 0 when both sets are empty.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
