//! Ranker: scores every candidate against one query and returns the best first.
//!
//! Pairs are scored in parallel with rayon; each pair only reads the shared query,
//! corpus and weight table. Sorting runs on the calling thread after all scores exist.
//!
//! Order: `final_score` descending, then matched-skill count descending, then input
//! position ascending.

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::errors::MatchError;
use crate::models::document::Document;
use crate::models::match_result::{MatchResult, RankedMatches};
use crate::scoring::aggregator::aggregate;
use crate::scoring::lexical::LexicalCorpus;
use crate::scoring::matchers::{
    match_experience, match_keywords, match_lexical, match_location, match_skills,
    match_titles,
};
use crate::scoring::weights::WeightTable;

/// A scored candidate and its position in the input slice.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub index: usize,
    pub result: MatchResult,
}

/// Scores one pair. `corpus` slot 0 is the query; slot `i + 1` is candidate `i`.
fn score_pair(
    query: &Document,
    candidate: &Document,
    candidate_slot: usize,
    corpus: &LexicalCorpus,
    table: &WeightTable,
) -> MatchResult {
    let mut factors = vec![
        match_titles(&query.title_candidates, &candidate.title_candidates),
        match_lexical(corpus.similarity(0, candidate_slot)),
        match_experience(query.experience_level, candidate.experience_level),
    ];
    factors.extend(match_skills(&query.skills, &candidate.skills));
    factors.extend(match_location(
        query.location.as_ref(),
        candidate.location.as_ref(),
    ));
    factors.extend(match_keywords(&query.keywords, &candidate.body_text));

    aggregate(&candidate.identity, table, factors)
}

fn by_rank(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    b.result
        .final_score
        .total_cmp(&a.result.final_score)
        .then_with(|| {
            b.result
                .matched_skills
                .len()
                .cmp(&a.result.matched_skills.len())
        })
        .then_with(|| a.index.cmp(&b.index))
}

/// Ranks `candidates` and keeps their input positions. The second value is the number
/// of candidates scored before truncation.
pub fn rank_indexed(
    query: &Document,
    candidates: &[Document],
    table: &WeightTable,
    max_results: i64,
) -> Result<(Vec<RankedCandidate>, usize), MatchError> {
    let limit = usize::try_from(max_results).map_err(|_| {
        MatchError::InvalidInput(format!("max_results must be >= 0, got {max_results}"))
    })?;
    if query.body_text.trim().is_empty() {
        return Err(MatchError::InvalidInput(format!(
            "query document '{}' has an empty body",
            query.identity
        )));
    }
    if candidates.is_empty() {
        debug!(query = %query.identity, "No candidates to rank");
        return Ok((Vec::new(), 0));
    }

    let bodies: Vec<&str> = std::iter::once(query.body_text.as_str())
        .chain(candidates.iter().map(|c| c.body_text.as_str()))
        .collect();
    let corpus = LexicalCorpus::build(&bodies);

    let mut ranked: Vec<RankedCandidate> = candidates
        .par_iter()
        .enumerate()
        .map(|(index, candidate)| RankedCandidate {
            index,
            result: score_pair(query, candidate, index + 1, &corpus, table),
        })
        .collect();

    ranked.sort_by(by_rank);
    let total_found = ranked.len();
    ranked.truncate(limit);

    info!(
        query = %query.identity,
        candidates = total_found,
        returned = ranked.len(),
        top_score = ranked.first().map(|r| r.result.final_score).unwrap_or(0.0),
        "Ranked candidates"
    );

    Ok((ranked, total_found))
}

pub fn rank(
    query: &Document,
    candidates: &[Document],
    table: &WeightTable,
    max_results: i64,
) -> Result<RankedMatches, MatchError> {
    let (ranked, total_found) = rank_indexed(query, candidates, table, max_results)?;
    Ok(RankedMatches {
        results: ranked.into_iter().map(|r| r.result).collect(),
        total_found,
    })
}
