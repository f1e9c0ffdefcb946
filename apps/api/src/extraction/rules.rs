//! Ordered pattern tables for titles, seniority keywords, and locations.
//!
//! Each table is evaluated top to bottom; earlier rules win. Title patterns use the
//! `{seniority}`, `{qualifier}` and `{role}` placeholders, expanded when the extractor
//! compiles them.

use crate::models::document::ExperienceLevel;

pub const SENIORITY_WORDS: &str =
    r"senior|sr\.?|junior|jr\.?|lead|principal|staff|associate|entry[- ]level|chief";

pub const QUALIFIER_WORDS: &str = r"software|back[- ]?end|front[- ]?end|full[- ]?stack|data|machine learning|ml|ai|devops|cloud|platform|mobile|ios|android|web|qa|test|site reliability|infrastructure|security|systems?|product|project|program|engineering|technical|solutions?|embedded|network|database|research|ux|ui|python|java|javascript|react|node|golang|rust";

pub const ROLE_WORDS: &str =
    r"engineer|developer|programmer|manager|analyst|scientist|architect|designer|consultant|administrator|specialist";

/// A regex rule whose capture group `group` yields the extracted value.
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub label: &'static str,
    pub pattern: &'static str,
    pub group: usize,
}

/// Role-title shapes, most specific first. Applied to lower-cased raw text.
pub const TITLE_RULES: &[PatternRule] = &[
    PatternRule {
        label: "explicit_label",
        pattern: r"(?m)^[ \t]*(?:job title|position|role|title)[ \t]*:[ \t]*([a-z][a-z0-9 /&+#.-]{1,60}?)[ \t\r]*$",
        group: 1,
    },
    PatternRule {
        label: "seniority_shape",
        pattern: r"\b((?:{seniority})\s+(?:(?:{qualifier})\s+){0,2}(?:{role}))s?\b",
        group: 1,
    },
    PatternRule {
        label: "qualified_shape",
        pattern: r"\b((?:(?:{qualifier})\s+){1,2}(?:{role}))s?\b",
        group: 1,
    },
];

/// Location phrases. Applied to the raw text with its original casing so that
/// place names can be recognised by capitalisation.
pub const LOCATION_RULES: &[PatternRule] = &[
    PatternRule {
        label: "explicit_label",
        pattern: r"(?im)^[ \t]*location[ \t]*:[ \t]*([^\r\n]{2,60}?)[ \t\r]*$",
        group: 1,
    },
    PatternRule {
        label: "based_in",
        pattern: r"(?i:based in|located in|office in|remote from)\s+([A-Z][\w'-]*(?: [A-Z][\w'-]*)*(?:, ?[A-Z][\w'-]*(?: [A-Z][\w'-]*)*){0,2})",
        group: 1,
    },
];

/// Where a seniority keyword is allowed to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordScope {
    /// Titles and body text.
    Anywhere,
    /// Titles only; in prose these words are too ambiguous ("lead a team").
    TitleOnly,
}

#[derive(Debug, Clone, Copy)]
pub struct LevelKeyword {
    /// Token phrase, already normalized (lower-case, single spaces).
    pub phrase: &'static str,
    pub level: ExperienceLevel,
    pub scope: KeywordScope,
}

/// Seniority keywords. Lookup order is by position in the text; at the same position
/// the earlier table entry wins.
pub const LEVEL_KEYWORDS: &[LevelKeyword] = &[
    LevelKeyword { phrase: "tech lead", level: ExperienceLevel::Lead, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "team lead", level: ExperienceLevel::Lead, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "lead engineer", level: ExperienceLevel::Lead, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "lead developer", level: ExperienceLevel::Lead, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "principal", level: ExperienceLevel::Lead, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "staff engineer", level: ExperienceLevel::Lead, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "head of", level: ExperienceLevel::Lead, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "director", level: ExperienceLevel::Lead, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "engineering manager", level: ExperienceLevel::Lead, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "lead", level: ExperienceLevel::Lead, scope: KeywordScope::TitleOnly },
    LevelKeyword { phrase: "staff", level: ExperienceLevel::Lead, scope: KeywordScope::TitleOnly },
    LevelKeyword { phrase: "chief", level: ExperienceLevel::Lead, scope: KeywordScope::TitleOnly },
    LevelKeyword { phrase: "senior", level: ExperienceLevel::Senior, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "sr", level: ExperienceLevel::Senior, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "mid level", level: ExperienceLevel::Mid, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "intermediate", level: ExperienceLevel::Mid, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "entry level", level: ExperienceLevel::Entry, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "junior", level: ExperienceLevel::Entry, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "jr", level: ExperienceLevel::Entry, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "graduate", level: ExperienceLevel::Entry, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "new grad", level: ExperienceLevel::Entry, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "intern", level: ExperienceLevel::Entry, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "internship", level: ExperienceLevel::Entry, scope: KeywordScope::Anywhere },
    LevelKeyword { phrase: "associate", level: ExperienceLevel::Entry, scope: KeywordScope::TitleOnly },
];

/// "5+ years", "3-5 yrs", "2 to 4 years". Group 1 is the lower bound.
pub const YEARS_PATTERN: &str =
    r"(?i)\b(\d{1,2})\s*\+?\s*(?:(?:-|–|to)\s*\d{1,2}\s*\+?\s*)?(?:years?|yrs?)\b";

/// Expands the title placeholders into a compilable regex source.
pub fn expand_title_pattern(pattern: &str) -> String {
    pattern
        .replace("{seniority}", SENIORITY_WORDS)
        .replace("{qualifier}", QUALIFIER_WORDS)
        .replace("{role}", ROLE_WORDS)
}
