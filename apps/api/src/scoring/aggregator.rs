//! Weighted Aggregator: combines factor scores into one `MatchResult`.
//!
//! `final_score = 100 × Σ wᵢ·sᵢ` over applicable factors, with the weights of
//! inapplicable factors redistributed proportionally. A factor is applicable when its
//! matcher produced a score and the direction's weight table lists it.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::match_result::{Factor, MatchResult};
use crate::scoring::matchers::FactorMatch;
use crate::scoring::weights::WeightTable;

/// Rounds to two decimals, the precision exposed to callers.
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

fn unit(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

pub fn aggregate(identity: &str, table: &WeightTable, factors: Vec<FactorMatch>) -> MatchResult {
    let factors: BTreeMap<Factor, FactorMatch> = factors
        .into_iter()
        .filter(|m| table.weight(m.factor).is_some())
        .map(|m| (m.factor, m))
        .collect();

    let sub_scores: BTreeMap<Factor, f64> = factors
        .iter()
        .map(|(factor, m)| (*factor, unit(m.score)))
        .collect();
    let applicable: BTreeSet<Factor> = sub_scores.keys().copied().collect();
    let applied_weights = table.effective_weights(&applicable);

    let weighted: f64 = applied_weights
        .iter()
        .map(|(factor, w)| w * sub_scores.get(factor).copied().unwrap_or(0.0))
        .sum();
    let final_score = round_score((weighted * 100.0).clamp(0.0, 100.0));

    let explanation = table
        .explanation_order()
        .into_iter()
        .filter_map(|factor| factors.get(&factor))
        .map(|m| format!("{}: {}", m.factor.label(), m.detail))
        .collect::<Vec<_>>()
        .join("; ");

    let matched = |factor: Factor| {
        factors
            .get(&factor)
            .map(|m| m.matched.clone())
            .unwrap_or_default()
    };

    MatchResult {
        identity: identity.to_string(),
        final_score,
        sub_scores,
        applied_weights,
        matched_skills: matched(Factor::SkillMatch),
        matched_titles: matched(Factor::TitleMatch),
        matched_keywords: matched(Factor::KeywordMatch),
        explanation,
    }
}
