//! Skill Vocabulary: canonical skill names and their surface-form aliases.
//!
//! The vocabulary is data: a JSON list of `{canonical, aliases, category}` records,
//! either the built-in `data/skill_vocabulary.json` or a file named by
//! `SKILL_VOCABULARY_PATH`. Every canonical name is implicitly one of its own aliases.
//! An alias claimed by two canonical skills is rejected at load time.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::MatchError;
use crate::extraction::normalize::tokenize;

const BUILTIN_VOCABULARY: &str = include_str!("../../data/skill_vocabulary.json");

/// One vocabulary record as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEntry {
    pub canonical: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Read-only alias index built once per process.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    entries: Vec<SkillEntry>,
    /// Normalized alias (tokens joined by a single space) → index into `entries`.
    alias_index: HashMap<String, usize>,
    /// Longest alias in tokens; bounds the detection window.
    max_alias_tokens: usize,
}

impl SkillVocabulary {
    pub fn from_entries(entries: Vec<SkillEntry>) -> Result<Self, MatchError> {
        let mut alias_index: HashMap<String, usize> = HashMap::new();
        let mut canonical_seen: HashMap<String, usize> = HashMap::new();
        let mut max_alias_tokens = 1;

        for (idx, entry) in entries.iter().enumerate() {
            let canonical = entry.canonical.trim();
            if canonical.is_empty() {
                return Err(MatchError::Configuration(format!(
                    "vocabulary entry #{idx} has an empty canonical name"
                )));
            }
            if let Some(&prev) = canonical_seen.get(&canonical.to_lowercase()) {
                return Err(MatchError::Configuration(format!(
                    "canonical skill '{}' is registered twice (entries #{prev} and #{idx})",
                    canonical
                )));
            }
            canonical_seen.insert(canonical.to_lowercase(), idx);

            for surface in std::iter::once(canonical).chain(entry.aliases.iter().map(|a| a.as_str())) {
                let tokens = tokenize(surface);
                if tokens.is_empty() {
                    return Err(MatchError::Configuration(format!(
                        "alias '{surface}' of '{canonical}' normalizes to nothing"
                    )));
                }
                max_alias_tokens = max_alias_tokens.max(tokens.len());
                let key = tokens.join(" ");

                match alias_index.get(&key) {
                    Some(&owner) if owner != idx => {
                        return Err(MatchError::Configuration(format!(
                            "alias '{key}' is shared by '{}' and '{}'",
                            entries[owner].canonical.trim(),
                            canonical
                        )));
                    }
                    // Same skill listing an alias twice is harmless
                    Some(_) => {}
                    None => {
                        alias_index.insert(key, idx);
                    }
                }
            }
        }

        debug!(
            skills = entries.len(),
            aliases = alias_index.len(),
            "Skill vocabulary indexed"
        );

        Ok(Self {
            entries,
            alias_index,
            max_alias_tokens,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, MatchError> {
        let entries: Vec<SkillEntry> = serde_json::from_str(json)
            .map_err(|e| MatchError::Configuration(format!("invalid skill vocabulary JSON: {e}")))?;
        Self::from_entries(entries)
    }

    /// Loads a vocabulary file. Read and parse failures are configuration errors.
    pub fn load(path: &Path) -> Result<Self, MatchError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            MatchError::Configuration(format!(
                "cannot read skill vocabulary {}: {e}",
                path.display()
            ))
        })?;
        let vocabulary = Self::from_json(&json)?;
        info!(
            "Loaded {} skills from {}",
            vocabulary.len(),
            path.display()
        );
        Ok(vocabulary)
    }

    /// The vocabulary compiled into the binary.
    pub fn builtin() -> Result<Self, MatchError> {
        Self::from_json(BUILTIN_VOCABULARY)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Maps any surface form to its canonical name.
    pub fn canonicalize(&self, surface: &str) -> Option<&str> {
        let key = tokenize(surface).join(" ");
        self.alias_index
            .get(&key)
            .map(|&idx| self.entries[idx].canonical.trim())
    }

    /// Greedy longest-alias-first scan over already tokenized text. Matches never
    /// overlap, so "machine learning" is not also counted as "learning".
    pub fn detect_tokens(&self, tokens: &[String]) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut i = 0;

        while i < tokens.len() {
            let longest = self.max_alias_tokens.min(tokens.len() - i);
            let hit = (1..=longest).rev().find_map(|len| {
                let key = tokens[i..i + len].join(" ");
                self.alias_index.get(&key).map(|&idx| (idx, len))
            });

            match hit {
                Some((idx, len)) => {
                    found.insert(self.entries[idx].canonical.trim().to_string());
                    i += len;
                }
                None => i += 1,
            }
        }

        found
    }
}
