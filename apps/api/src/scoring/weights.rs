use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::MatchError;
use crate::models::match_result::Factor;

/// Which side of the marketplace is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchDirection {
    /// A resume looking for jobs. Location is not scored.
    ResumeToJob,
    /// A job looking for candidates.
    JobToCandidate,
}

/// Resume → job weights. Location is deliberately absent.
pub const RESUME_TO_JOB_WEIGHTS: &[(Factor, f64)] = &[
    (Factor::SkillMatch, 0.40),
    (Factor::TitleMatch, 0.25),
    (Factor::LexicalSimilarity, 0.20),
    (Factor::ExperienceMatch, 0.10),
    (Factor::KeywordMatch, 0.05),
];

/// Job → candidate weights.
pub const JOB_TO_CANDIDATE_WEIGHTS: &[(Factor, f64)] = &[
    (Factor::SkillMatch, 0.40),
    (Factor::TitleMatch, 0.25),
    (Factor::ExperienceMatch, 0.15),
    (Factor::LexicalSimilarity, 0.10),
    (Factor::LocationMatch, 0.10),
];

const SUM_TOLERANCE: f64 = 1e-6;

/// An ordered factor → weight table. A factor missing from the table is never scored.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    entries: Vec<(Factor, f64)>,
}

impl WeightTable {
    /// Validates a custom table: each factor at most once, finite non-negative weights,
    /// summing to 1.0.
    pub fn new(entries: Vec<(Factor, f64)>) -> Result<Self, MatchError> {
        if entries.is_empty() {
            return Err(MatchError::Configuration(
                "weight table has no factors".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        for (factor, weight) in &entries {
            if !seen.insert(*factor) {
                return Err(MatchError::Configuration(format!(
                    "factor '{factor}' appears twice in weight table"
                )));
            }
            if !weight.is_finite() || *weight < 0.0 {
                return Err(MatchError::Configuration(format!(
                    "weight for '{factor}' must be a non-negative number, got {weight}"
                )));
            }
        }

        let sum: f64 = entries.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(MatchError::Configuration(format!(
                "weights must sum to 1.0, got {sum}"
            )));
        }

        Ok(Self { entries })
    }

    /// The built-in table for a direction, checked by the same rules as a custom table.
    pub fn for_direction(direction: MatchDirection) -> Result<Self, MatchError> {
        let entries = match direction {
            MatchDirection::ResumeToJob => RESUME_TO_JOB_WEIGHTS,
            MatchDirection::JobToCandidate => JOB_TO_CANDIDATE_WEIGHTS,
        };
        Self::new(entries.to_vec()).map_err(|e| {
            MatchError::Configuration(format!("built-in {direction:?} weights: {e}"))
        })
    }

    pub fn weight(&self, factor: Factor) -> Option<f64> {
        self.entries
            .iter()
            .find(|(f, _)| *f == factor)
            .map(|(_, w)| *w)
    }

    /// Factors by weight descending; equal weights keep table order.
    pub fn explanation_order(&self) -> Vec<Factor> {
        let mut ordered = self.entries.clone();
        ordered.sort_by(|a, b| b.1.total_cmp(&a.1));
        ordered.into_iter().map(|(f, _)| f).collect()
    }

    /// Weights restricted to `applicable` and rescaled proportionally so they sum to 1.0.
    ///
    /// If every applicable factor has zero weight the result is all zeros, which scores
    /// the pair at 0.
    pub fn effective_weights(&self, applicable: &BTreeSet<Factor>) -> BTreeMap<Factor, f64> {
        let kept: Vec<(Factor, f64)> = self
            .entries
            .iter()
            .filter(|(f, _)| applicable.contains(f))
            .copied()
            .collect();
        let total: f64 = kept.iter().map(|(_, w)| w).sum();

        kept.into_iter()
            .map(|(f, w)| (f, if total > 0.0 { w / total } else { 0.0 }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_factors() -> BTreeSet<Factor> {
        Factor::ALL.into_iter().collect()
    }

    #[test]
    fn test_builtin_weights_sum_to_one() {
        for direction in [MatchDirection::ResumeToJob, MatchDirection::JobToCandidate] {
            let table = WeightTable::for_direction(direction).unwrap();
            let sum: f64 = table.entries.iter().map(|(_, w)| w).sum();
            assert!((sum - 1.0).abs() < 1e-6, "{direction:?}");
        }
    }

    #[test]
    fn test_resume_to_job_scores_keywords() {
        let table = WeightTable::for_direction(MatchDirection::ResumeToJob).unwrap();
        assert_eq!(table.weight(Factor::KeywordMatch), Some(0.05));
        let candidates = WeightTable::for_direction(MatchDirection::JobToCandidate).unwrap();
        assert_eq!(candidates.weight(Factor::KeywordMatch), None);
    }

    #[test]
    fn test_resume_to_job_has_no_location() {
        let table = WeightTable::for_direction(MatchDirection::ResumeToJob).unwrap();
        assert_eq!(table.weight(Factor::LocationMatch), None);
        assert_eq!(table.weight(Factor::SkillMatch), Some(0.40));
    }

    #[test]
    fn test_redistribution_without_skills() {
        let table = WeightTable::for_direction(MatchDirection::ResumeToJob).unwrap();
        let mut applicable = all_factors();
        applicable.remove(&Factor::SkillMatch);

        let weights = table.effective_weights(&applicable);
        assert!(!weights.contains_key(&Factor::SkillMatch));
        assert!((weights.values().sum::<f64>() - 1.0).abs() < 1e-9);
        // 0.25 / 0.60
        assert!((weights[&Factor::TitleMatch] - 0.25 / 0.60).abs() < 1e-9);
    }

    #[test]
    fn test_redistribution_every_subset_sums_to_one() {
        let table = WeightTable::for_direction(MatchDirection::JobToCandidate).unwrap();
        let factors = table.explanation_order();
        for mask in 1u32..(1 << factors.len()) {
            let applicable: BTreeSet<Factor> = factors
                .iter()
                .copied()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, f)| f)
                .collect();
            let sum: f64 = table.effective_weights(&applicable).values().sum();
            assert!((sum - 1.0).abs() < 1e-9, "mask {mask:b}");
        }
    }

    #[test]
    fn test_explanation_order_is_weight_descending() {
        let table = WeightTable::for_direction(MatchDirection::JobToCandidate).unwrap();
        assert_eq!(
            table.explanation_order(),
            vec![
                Factor::SkillMatch,
                Factor::TitleMatch,
                Factor::ExperienceMatch,
                Factor::LexicalSimilarity,
                Factor::LocationMatch,
            ]
        );
    }

    #[test]
    fn test_explanation_order_ties_keep_table_order() {
        let table = WeightTable::new(vec![
            (Factor::LexicalSimilarity, 0.25),
            (Factor::SkillMatch, 0.5),
            (Factor::TitleMatch, 0.25),
        ])
        .unwrap();
        assert_eq!(
            table.explanation_order(),
            vec![Factor::SkillMatch, Factor::LexicalSimilarity, Factor::TitleMatch]
        );
    }

    #[test]
    fn test_rejects_duplicate_factor() {
        let err = WeightTable::new(vec![(Factor::SkillMatch, 0.5), (Factor::SkillMatch, 0.5)])
            .unwrap_err();
        assert!(matches!(err, MatchError::Configuration(_)));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let err = WeightTable::new(vec![(Factor::SkillMatch, 1.5), (Factor::TitleMatch, -0.5)])
            .unwrap_err();
        assert!(matches!(err, MatchError::Configuration(_)));
    }

    #[test]
    fn test_rejects_bad_sum() {
        let err = WeightTable::new(vec![(Factor::SkillMatch, 0.5), (Factor::TitleMatch, 0.4)])
            .unwrap_err();
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn test_zero_weight_subset_scores_nothing() {
        let table = WeightTable::new(vec![(Factor::SkillMatch, 1.0), (Factor::TitleMatch, 0.0)])
            .unwrap();
        let applicable: BTreeSet<Factor> = [Factor::TitleMatch].into_iter().collect();
        let weights = table.effective_weights(&applicable);
        assert_eq!(weights.get(&Factor::TitleMatch), Some(&0.0));
    }
}
