//! Attribute Matchers: one pure function per factor.
//!
//! Every matcher returns a score in [0, 1] plus the evidence the explanation quotes.
//! A matcher returns `None` when its factor does not apply to the pair.

use std::collections::BTreeSet;

use crate::extraction::normalize::{normalize_body, significant_words};
use crate::models::document::{ExperienceLevel, Location};
use crate::models::match_result::Factor;

/// Neutral score for a factor one side cannot speak to.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Largest distance on the entry..lead scale.
const MAX_LEVEL_DISTANCE: f64 = 3.0;

const MAX_MATCHED_KEYWORDS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct FactorMatch {
    pub factor: Factor,
    pub score: f64,
    /// Text after the factor label in the explanation.
    pub detail: String,
    /// Matched skills, titles or keywords; empty for the other factors.
    pub matched: Vec<String>,
}

fn percent(score: f64) -> String {
    format!("{:.0}%", score * 100.0)
}

/// `|Q ∩ C| / |Q|`. Inapplicable when the query names no skills.
pub fn match_skills(query: &BTreeSet<String>, candidate: &BTreeSet<String>) -> Option<FactorMatch> {
    if query.is_empty() {
        return None;
    }
    let matched: Vec<String> = query.intersection(candidate).cloned().collect();
    let score = matched.len() as f64 / query.len() as f64;

    let mut detail = format!("{}/{} required skills", matched.len(), query.len());
    if !matched.is_empty() {
        detail.push_str(&format!(" ({})", matched.join(", ")));
    }

    Some(FactorMatch {
        factor: Factor::SkillMatch,
        score,
        detail,
        matched,
    })
}

/// Whole-word containment: "backend engineer" is inside "senior backend engineer" but
/// "engineer" is not inside "engineering manager".
fn contains_phrase(haystack: &str, needle: &str) -> bool {
    format!(" {haystack} ").contains(&format!(" {needle} "))
}

/// 1.0 when some candidate title equals or contains a query title. Otherwise the best
/// share of a query title's significant words found in one candidate title.
pub fn match_titles(query: &[String], candidate: &[String]) -> FactorMatch {
    let no_match = |detail: &str| FactorMatch {
        factor: Factor::TitleMatch,
        score: 0.0,
        detail: detail.to_string(),
        matched: Vec::new(),
    };
    if query.is_empty() || candidate.is_empty() {
        return no_match("no comparable titles");
    }

    let query_norm: Vec<String> = query.iter().map(|t| normalize_body(t)).collect();
    let candidate_norm: Vec<String> = candidate.iter().map(|t| normalize_body(t)).collect();

    let exact: Vec<String> = candidate
        .iter()
        .zip(&candidate_norm)
        .filter(|(_, c)| {
            !c.is_empty()
                && query_norm
                    .iter()
                    .any(|q| !q.is_empty() && contains_phrase(c, q))
        })
        .map(|(title, _)| title.clone())
        .collect();
    if !exact.is_empty() {
        return FactorMatch {
            factor: Factor::TitleMatch,
            score: 1.0,
            detail: format!("{} ({})", percent(1.0), exact.join(", ")),
            matched: exact,
        };
    }

    let candidate_words: Vec<BTreeSet<String>> = candidate
        .iter()
        .map(|t| significant_words(t).into_iter().collect())
        .collect();

    let mut best: Option<(f64, usize)> = None;
    for q in query {
        let q_words: BTreeSet<String> = significant_words(q).into_iter().collect();
        if q_words.is_empty() {
            continue;
        }
        for (idx, c_words) in candidate_words.iter().enumerate() {
            let shared = q_words.intersection(c_words).count();
            let ratio = shared as f64 / q_words.len() as f64;
            if ratio > 0.0 && best.map_or(true, |(score, _)| ratio > score) {
                best = Some((ratio, idx));
            }
        }
    }

    match best {
        Some((score, idx)) => FactorMatch {
            factor: Factor::TitleMatch,
            score,
            detail: format!("{} ({})", percent(score), candidate[idx]),
            matched: vec![candidate[idx].clone()],
        },
        None => no_match("0%"),
    }
}

/// Wraps a TF-IDF cosine similarity. Always applicable.
pub fn match_lexical(similarity: f64) -> FactorMatch {
    FactorMatch {
        factor: Factor::LexicalSimilarity,
        score: similarity,
        detail: percent(similarity),
        matched: Vec::new(),
    }
}

/// Share of the query's keywords that appear as whole words in the candidate body.
/// Inapplicable when the query has no keywords.
pub fn match_keywords(query: &[String], candidate_body: &str) -> Option<FactorMatch> {
    if query.is_empty() {
        return None;
    }
    let words: BTreeSet<&str> = candidate_body.split(' ').collect();
    let found: Vec<String> = query
        .iter()
        .filter(|k| words.contains(k.as_str()))
        .cloned()
        .collect();
    let score = found.len() as f64 / query.len() as f64;

    let mut detail = format!("{}/{} keywords", found.len(), query.len());
    let matched: Vec<String> = found.into_iter().take(MAX_MATCHED_KEYWORDS).collect();
    if !matched.is_empty() {
        detail.push_str(&format!(" ({})", matched.join(", ")));
    }

    Some(FactorMatch {
        factor: Factor::KeywordMatch,
        score,
        detail,
        matched,
    })
}

/// `1 − |q − c| / 3` on entry=0 … lead=3. Unspecified on either side is neutral.
pub fn match_experience(query: ExperienceLevel, candidate: ExperienceLevel) -> FactorMatch {
    let score = match (query.ordinal(), candidate.ordinal()) {
        (Some(q), Some(c)) => {
            let distance = (q as f64 - c as f64).abs();
            (1.0 - distance / MAX_LEVEL_DISTANCE).max(0.0)
        }
        _ => NEUTRAL_SCORE,
    };

    FactorMatch {
        factor: Factor::ExperienceMatch,
        score,
        detail: format!(
            "{} vs {} ({})",
            query.as_str(),
            candidate.as_str(),
            percent(score)
        ),
        matched: Vec::new(),
    }
}

/// Comma-separated parts of a normalized location: "san francisco, ca" → {"san francisco", "ca"}.
fn location_parts(location: &Location) -> BTreeSet<&str> {
    location
        .normalized
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Equal, or every part of one side is a whole part of the other, so "San Francisco, CA"
/// is inside "San Francisco, CA, United States" but "India" is not inside "Indianapolis, IN".
fn same_place(a: &Location, b: &Location) -> bool {
    if a.normalized == b.normalized {
        return true;
    }
    let (a_parts, b_parts) = (location_parts(a), location_parts(b));
    if a_parts.is_empty() || b_parts.is_empty() {
        return false;
    }
    a_parts.is_subset(&b_parts) || b_parts.is_subset(&a_parts)
}

/// Inapplicable only when neither side names a location. A query location the
/// candidate lacks scores 0; a candidate location the query does not ask for is neutral.
pub fn match_location(query: Option<&Location>, candidate: Option<&Location>) -> Option<FactorMatch> {
    let (score, query_text, candidate_text) = match (query, candidate) {
        (None, None) => return None,
        (None, Some(c)) => (NEUTRAL_SCORE, "any", c.raw.as_str()),
        (Some(q), None) => (0.0, q.raw.as_str(), "unknown"),
        (Some(q), Some(c)) => {
            let same = (q.remote && c.remote) || same_place(q, c);
            let score = if same { 1.0 } else { NEUTRAL_SCORE };
            (score, q.raw.as_str(), c.raw.as_str())
        }
    };

    Some(FactorMatch {
        factor: Factor::LocationMatch,
        score,
        detail: format!("{query_text} vs {candidate_text} ({})", percent(score)),
        matched: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_skills(skills: &[&str]) -> BTreeSet<String> {
        skills.iter().map(|s| s.to_string()).collect()
    }

    fn make_titles(titles: &[&str]) -> Vec<String> {
        titles.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_skill_overlap_ratio() {
        let query = make_skills(&["Python", "Django", "AWS"]);
        let full = match_skills(&query, &make_skills(&["AWS", "Django", "Python", "Go"])).unwrap();
        assert_eq!(full.score, 1.0);
        assert_eq!(full.detail, "3/3 required skills (AWS, Django, Python)");

        let partial = match_skills(&query, &make_skills(&["Python", "Java"])).unwrap();
        assert!((partial.score - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(partial.matched, vec!["Python".to_string()]);
    }

    #[test]
    fn test_empty_query_skills_inapplicable() {
        assert!(match_skills(&BTreeSet::new(), &make_skills(&["Rust"])).is_none());
    }

    #[test]
    fn test_no_shared_skills_scores_zero() {
        let m = match_skills(&make_skills(&["Rust"]), &BTreeSet::new()).unwrap();
        assert_eq!(m.score, 0.0);
        assert_eq!(m.detail, "0/1 required skills");
    }

    #[test]
    fn test_title_containment_is_full_match() {
        let m = match_titles(
            &make_titles(&["Backend Engineer"]),
            &make_titles(&["Senior Backend Engineer"]),
        );
        assert_eq!(m.score, 1.0);
        assert_eq!(m.matched, vec!["Senior Backend Engineer".to_string()]);
    }

    #[test]
    fn test_title_match_is_case_insensitive() {
        let m = match_titles(&make_titles(&["data scientist"]), &make_titles(&["Data Scientist"]));
        assert_eq!(m.score, 1.0);
    }

    #[test]
    fn test_title_partial_overlap() {
        let m = match_titles(
            &make_titles(&["Senior Backend Engineer"]),
            &make_titles(&["Backend Developer", "Platform Engineer"]),
        );
        assert!((m.score - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(m.matched, vec!["Backend Developer".to_string()]);
    }

    #[test]
    fn test_title_word_boundaries() {
        let m = match_titles(
            &make_titles(&["Engineer"]),
            &make_titles(&["Engineering Manager"]),
        );
        assert_eq!(m.score, 0.0);
        assert!(m.matched.is_empty());
    }

    #[test]
    fn test_missing_titles_score_zero() {
        assert_eq!(match_titles(&[], &make_titles(&["Engineer"])).score, 0.0);
        assert_eq!(match_titles(&make_titles(&["Engineer"]), &[]).score, 0.0);
    }

    #[test]
    fn test_experience_distance() {
        let one_off = 1.0 - 1.0 / 3.0;
        assert!((match_experience(ExperienceLevel::Senior, ExperienceLevel::Mid).score - one_off).abs() < 1e-9);
        assert!((match_experience(ExperienceLevel::Senior, ExperienceLevel::Lead).score - one_off).abs() < 1e-9);
        assert_eq!(match_experience(ExperienceLevel::Entry, ExperienceLevel::Lead).score, 0.0);
        assert_eq!(match_experience(ExperienceLevel::Mid, ExperienceLevel::Mid).score, 1.0);
    }

    #[test]
    fn test_unspecified_experience_is_neutral() {
        let m = match_experience(ExperienceLevel::Unspecified, ExperienceLevel::Senior);
        assert_eq!(m.score, NEUTRAL_SCORE);
        assert_eq!(m.detail, "unspecified vs senior (50%)");
    }

    #[test]
    fn test_location_rules() {
        let sf = Location::parse("San Francisco, CA").unwrap();
        let sf_city = Location::parse("san francisco").unwrap();
        let austin = Location::parse("Austin, TX").unwrap();
        let remote = Location::parse("Remote").unwrap();
        let remote_us = Location::parse("Remote, US").unwrap();

        assert_eq!(match_location(Some(&sf), Some(&sf_city)).unwrap().score, 1.0);
        assert_eq!(match_location(Some(&sf), Some(&austin)).unwrap().score, 0.5);
        assert_eq!(match_location(Some(&remote), Some(&remote_us)).unwrap().score, 1.0);
        assert_eq!(match_location(Some(&sf), None).unwrap().score, 0.0);
        assert_eq!(match_location(None, Some(&austin)).unwrap().score, NEUTRAL_SCORE);
        assert!(match_location(None, None).is_none());
    }

    #[test]
    fn test_location_containment_follows_comma_parts() {
        let sf = Location::parse("San Francisco, CA").unwrap();
        let sf_full = Location::parse("San Francisco, CA, United States").unwrap();
        assert_eq!(match_location(Some(&sf), Some(&sf_full)).unwrap().score, 1.0);
        assert_eq!(match_location(Some(&sf_full), Some(&sf)).unwrap().score, 1.0);

        let ca = Location::parse("CA").unwrap();
        let chicago = Location::parse("Chicago, IL").unwrap();
        assert_eq!(match_location(Some(&ca), Some(&chicago)).unwrap().score, NEUTRAL_SCORE);

        let india = Location::parse("India").unwrap();
        let indianapolis = Location::parse("Indianapolis, IN").unwrap();
        assert_eq!(
            match_location(Some(&india), Some(&indianapolis)).unwrap().score,
            NEUTRAL_SCORE
        );
    }

    #[test]
    fn test_keyword_overlap_ratio() {
        let query = make_titles(&["kafka", "spark", "airflow", "pipelines"]);
        let m = match_keywords(&query, "we run spark and kafka pipelines daily").unwrap();
        assert_eq!(m.score, 0.75);
        assert_eq!(m.matched, vec!["kafka", "spark", "pipelines"]);
        assert_eq!(m.detail, "3/4 keywords (kafka, spark, pipelines)");
    }

    #[test]
    fn test_keywords_match_whole_words_only() {
        let m = match_keywords(&make_titles(&["java"]), "javascript developer").unwrap();
        assert_eq!(m.score, 0.0);
        assert!(m.matched.is_empty());
    }

    #[test]
    fn test_matched_keywords_are_capped() {
        let query: Vec<String> = (0..15).map(|i| format!("word{i}")).collect();
        let body = query.join(" ");
        let m = match_keywords(&query, &body).unwrap();
        assert_eq!(m.score, 1.0);
        assert_eq!(m.matched.len(), MAX_MATCHED_KEYWORDS);
    }

    #[test]
    fn test_empty_query_keywords_inapplicable() {
        assert!(match_keywords(&[], "python").is_none());
    }
}
