//! Feature Extractor: turns raw resume / job / profile text into a `Document`.
//!
//! Extraction never fails on malformed input. Missing sections degrade to empty
//! titles, `ExperienceLevel::Unspecified`, or no location. The one failure is a
//! body that normalizes to nothing, which the caller must treat as a parse failure.

use std::collections::BTreeSet;

use regex::Regex;
use tracing::debug;

use crate::errors::MatchError;
use crate::extraction::normalize::{normalize_body, title_case, tokenize, top_keywords};
use crate::extraction::rules::{
    expand_title_pattern, KeywordScope, PatternRule, LEVEL_KEYWORDS, LOCATION_RULES,
    TITLE_RULES, YEARS_PATTERN,
};
use crate::extraction::vocabulary::SkillVocabulary;
use crate::models::document::{
    Document, DocumentHint, ExperienceLevel, Location, YearsOfExperience,
};

const MAX_TITLE_CANDIDATES: usize = 5;
const MAX_KEYWORDS: usize = 20;

struct CompiledRule {
    label: &'static str,
    regex: Regex,
    group: usize,
}

impl CompiledRule {
    fn compile(rule: &PatternRule, source: &str) -> Result<Self, MatchError> {
        let regex = Regex::new(source).map_err(|e| {
            MatchError::Configuration(format!("pattern rule '{}' does not compile: {e}", rule.label))
        })?;
        Ok(Self {
            label: rule.label,
            regex,
            group: rule.group,
        })
    }
}

pub struct FeatureExtractor {
    vocabulary: SkillVocabulary,
    title_rules: Vec<CompiledRule>,
    location_rules: Vec<CompiledRule>,
    years: Regex,
    remote: Regex,
}

impl FeatureExtractor {
    pub fn new(vocabulary: SkillVocabulary) -> Result<Self, MatchError> {
        let title_rules = TITLE_RULES
            .iter()
            .map(|rule| CompiledRule::compile(rule, &expand_title_pattern(rule.pattern)))
            .collect::<Result<Vec<_>, _>>()?;
        let location_rules = LOCATION_RULES
            .iter()
            .map(|rule| CompiledRule::compile(rule, rule.pattern))
            .collect::<Result<Vec<_>, _>>()?;
        let years = Regex::new(YEARS_PATTERN)
            .map_err(|e| MatchError::Configuration(format!("years pattern: {e}")))?;
        let remote = Regex::new(r"(?i)\bremote\b")
            .map_err(|e| MatchError::Configuration(format!("remote pattern: {e}")))?;

        Ok(Self {
            vocabulary,
            title_rules,
            location_rules,
            years,
            remote,
        })
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    pub fn extract(
        &self,
        identity: &str,
        raw_text: &str,
        hint: &DocumentHint,
    ) -> Result<Document, MatchError> {
        let body_text = normalize_body(raw_text);
        if body_text.is_empty() {
            return Err(MatchError::Extraction {
                identity: identity.to_string(),
                reason: "body_text is empty after normalization".to_string(),
            });
        }
        let tokens: Vec<String> = body_text.split(' ').map(String::from).collect();

        let skills = self.collect_skills(&tokens, &hint.skills);
        let title_candidates = merge_titles(&hint.titles, self.extract_titles(raw_text));
        let years_of_experience = hint
            .years_of_experience
            .or_else(|| self.extract_years(raw_text));
        let experience_level = hint
            .experience_level
            .filter(|level| *level != ExperienceLevel::Unspecified)
            .unwrap_or_else(|| infer_level(&title_candidates, &tokens, years_of_experience));
        let location = hint
            .location
            .as_deref()
            .and_then(Location::parse)
            .or_else(|| self.extract_location(raw_text));
        let keywords = top_keywords(&body_text, MAX_KEYWORDS);

        debug!(
            identity,
            skills = skills.len(),
            titles = title_candidates.len(),
            level = experience_level.as_str(),
            "Extracted document features"
        );

        Ok(Document {
            identity: identity.to_string(),
            title_candidates,
            skills,
            experience_level,
            years_of_experience,
            location,
            keywords,
            body_text,
        })
    }

    /// Vocabulary hits in the body plus hint skills. Hint skills unknown to the
    /// vocabulary are kept in normalized lower-case form.
    fn collect_skills(&self, tokens: &[String], hint_skills: &[String]) -> BTreeSet<String> {
        let mut skills = self.vocabulary.detect_tokens(tokens);
        for surface in hint_skills {
            match self.vocabulary.canonicalize(surface) {
                Some(canonical) => {
                    skills.insert(canonical.to_string());
                }
                None => {
                    let normalized = normalize_body(surface);
                    if !normalized.is_empty() {
                        skills.insert(normalized);
                    }
                }
            }
        }
        skills
    }

    /// Title candidates in rule order, then text order. A candidate already contained
    /// in an accepted title is skipped.
    pub fn extract_titles(&self, raw_text: &str) -> Vec<String> {
        let lower = raw_text.to_lowercase();
        let mut titles: Vec<String> = Vec::new();

        for rule in &self.title_rules {
            for caps in rule.regex.captures_iter(&lower) {
                let Some(m) = caps.get(rule.group) else {
                    continue;
                };
                let title = normalize_body(m.as_str());
                if title.is_empty() || titles.iter().any(|t| t.contains(&title)) {
                    continue;
                }
                debug!(rule = rule.label, title = %title, "Title rule matched");
                titles.push(title);
                if titles.len() == MAX_TITLE_CANDIDATES {
                    return titles.iter().map(|t| title_case(t)).collect();
                }
            }
        }

        titles.iter().map(|t| title_case(t)).collect()
    }

    /// Largest lower bound among "N years" mentions, capped at 50.
    pub fn extract_years(&self, raw_text: &str) -> Option<YearsOfExperience> {
        self.years
            .captures_iter(raw_text)
            .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
            .max()
            .map(YearsOfExperience::exact)
    }

    pub fn extract_location(&self, raw_text: &str) -> Option<Location> {
        for rule in &self.location_rules {
            let found = rule
                .regex
                .captures(raw_text)
                .and_then(|caps| caps.get(rule.group))
                .map(|m| m.as_str().trim().trim_end_matches(['.', ',', ';']))
                .and_then(Location::parse);
            if found.is_some() {
                debug!(rule = rule.label, "Location rule matched");
                return found;
            }
        }

        if self.remote.is_match(raw_text) {
            return Location::parse("Remote");
        }
        None
    }
}

/// Hint titles first, then extracted ones not already covered by a hint title.
fn merge_titles(hint_titles: &[String], extracted: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    let hints = hint_titles.iter().map(|t| t.trim().to_string());
    for title in hints.chain(extracted) {
        let key = normalize_body(&title);
        if key.is_empty() || seen.iter().any(|s| s.contains(&key)) {
            continue;
        }
        seen.push(key);
        merged.push(title);
    }

    merged.truncate(MAX_TITLE_CANDIDATES);
    merged
}

/// Resolves the experience level. An explicit seniority keyword (titles first, then
/// body) beats a level inferred from years.
pub fn infer_level(
    titles: &[String],
    body_tokens: &[String],
    years: Option<YearsOfExperience>,
) -> ExperienceLevel {
    for title in titles {
        if let Some(level) = find_level_keyword(&tokenize(title), true) {
            return level;
        }
    }
    if let Some(level) = find_level_keyword(body_tokens, false) {
        return level;
    }
    years
        .map(YearsOfExperience::level)
        .unwrap_or(ExperienceLevel::Unspecified)
}

/// First keyword by position; at one position the earlier table entry wins.
fn find_level_keyword(tokens: &[String], in_title: bool) -> Option<ExperienceLevel> {
    (0..tokens.len()).find_map(|i| {
        LEVEL_KEYWORDS
            .iter()
            .filter(|k| in_title || k.scope == KeywordScope::Anywhere)
            .find(|k| {
                let phrase: Vec<&str> = k.phrase.split(' ').collect();
                tokens.len() - i >= phrase.len()
                    && tokens[i..i + phrase.len()]
                        .iter()
                        .zip(&phrase)
                        .all(|(t, p)| t == p)
            })
            .map(|k| k.level)
    })
}
