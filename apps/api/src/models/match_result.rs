use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One independent similarity signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    SkillMatch,
    TitleMatch,
    LexicalSimilarity,
    ExperienceMatch,
    LocationMatch,
    KeywordMatch,
}

impl Factor {
    #[cfg(test)]
    pub const ALL: [Factor; 6] = [
        Factor::SkillMatch,
        Factor::TitleMatch,
        Factor::LexicalSimilarity,
        Factor::ExperienceMatch,
        Factor::LocationMatch,
        Factor::KeywordMatch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Factor::SkillMatch => "skill_match",
            Factor::TitleMatch => "title_match",
            Factor::LexicalSimilarity => "lexical_similarity",
            Factor::ExperienceMatch => "experience_match",
            Factor::LocationMatch => "location_match",
            Factor::KeywordMatch => "keyword_match",
        }
    }

    /// Human-readable prefix of this factor's explanation segment.
    pub fn label(self) -> &'static str {
        match self {
            Factor::SkillMatch => "Skills match",
            Factor::TitleMatch => "Title match",
            Factor::LexicalSimilarity => "Text similarity",
            Factor::ExperienceMatch => "Experience match",
            Factor::LocationMatch => "Location match",
            Factor::KeywordMatch => "Keyword match",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of scoring one candidate document against one query document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Identity of the candidate document.
    pub identity: String,
    pub final_score: f64, // 0 – 100
    /// Applicable factors only, each in [0, 1] before weighting.
    pub sub_scores: BTreeMap<Factor, f64>,
    /// Weights actually applied after redistribution; sums to 1.0.
    pub applied_weights: BTreeMap<Factor, f64>,
    pub matched_skills: Vec<String>,
    pub matched_titles: Vec<String>,
    /// Query keywords found in the candidate text, at most ten.
    pub matched_keywords: Vec<String>,
    pub explanation: String,
}

/// Ranked output of one ranking call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatches {
    pub results: Vec<MatchResult>,
    /// Number of candidates scored before `max_results` truncation.
    pub total_found: usize,
}

/// A candidate input that could not be turned into a document and was left out of ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub identity: String,
    pub reason: String,
}
