use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Seniority on the fixed ordinal scale used by the experience matcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Lead,
    #[default]
    Unspecified,
}

impl ExperienceLevel {
    /// entry=0, mid=1, senior=2, lead=3. `None` for `Unspecified`.
    pub fn ordinal(self) -> Option<u8> {
        match self {
            ExperienceLevel::Entry => Some(0),
            ExperienceLevel::Mid => Some(1),
            ExperienceLevel::Senior => Some(2),
            ExperienceLevel::Lead => Some(3),
            ExperienceLevel::Unspecified => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Lead => "lead",
            ExperienceLevel::Unspecified => "unspecified",
        }
    }

    /// Maps exact years onto a level: <2 entry, <5 mid, <10 senior, otherwise lead.
    pub fn from_years(years: u8) -> Self {
        match years {
            0..=1 => ExperienceLevel::Entry,
            2..=4 => ExperienceLevel::Mid,
            5..=9 => ExperienceLevel::Senior,
            _ => ExperienceLevel::Lead,
        }
    }

    /// Lenient parse of free-form seniority labels ("Mid-Senior level", "Entry level",
    /// "Director"). Unknown labels yield `Unspecified`.
    pub fn parse_label(label: &str) -> Self {
        let lower = label.trim().to_lowercase();
        if lower.is_empty() {
            return ExperienceLevel::Unspecified;
        }
        // "mid-senior" is LinkedIn's label for senior individual contributors
        if lower.contains("senior") {
            ExperienceLevel::Senior
        } else if ["lead", "principal", "staff", "director", "executive", "head"]
            .iter()
            .any(|k| lower.contains(k))
        {
            ExperienceLevel::Lead
        } else if ["entry", "junior", "intern", "graduate", "associate"]
            .iter()
            .any(|k| lower.contains(k))
        {
            ExperienceLevel::Entry
        } else if ["mid", "intermediate"].iter().any(|k| lower.contains(k)) {
            ExperienceLevel::Mid
        } else {
            ExperienceLevel::Unspecified
        }
    }
}

/// Textual experience range used when exact years are unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceBucket {
    ZeroToTwo,
    TwoToSix,
    SixToTen,
    MoreThanTen,
}

impl ExperienceBucket {
    pub fn level(self) -> ExperienceLevel {
        match self {
            ExperienceBucket::ZeroToTwo => ExperienceLevel::Entry,
            ExperienceBucket::TwoToSix => ExperienceLevel::Mid,
            ExperienceBucket::SixToTen => ExperienceLevel::Senior,
            ExperienceBucket::MoreThanTen => ExperienceLevel::Lead,
        }
    }

    /// Parses the bucket spellings produced by profile-search providers.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "less than 1 year" | "1 to 2 years" | "0 to 2 years" => Some(ExperienceBucket::ZeroToTwo),
            "2 to 6 years" | "3 to 5 years" => Some(ExperienceBucket::TwoToSix),
            "6 to 10 years" => Some(ExperienceBucket::SixToTen),
            "more than 10 years" => Some(ExperienceBucket::MoreThanTen),
            _ => None,
        }
    }
}

/// Years of experience: exact when stated, otherwise a range bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearsOfExperience {
    Exact(u8),
    Range(ExperienceBucket),
}

impl YearsOfExperience {
    pub const MAX_YEARS: u8 = 50;

    pub fn exact(years: u32) -> Self {
        YearsOfExperience::Exact(years.min(Self::MAX_YEARS as u32) as u8)
    }

    pub fn level(self) -> ExperienceLevel {
        match self {
            YearsOfExperience::Exact(years) => ExperienceLevel::from_years(years),
            YearsOfExperience::Range(bucket) => bucket.level(),
        }
    }
}

/// A location as written, plus its comma-separated parts when they parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub raw: String,
    /// Lower-cased, whitespace-collapsed form used for comparisons.
    pub normalized: String,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub remote: bool,
}

impl Location {
    /// Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let normalized = raw
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let remote = normalized.contains("remote");

        let parts: Vec<String> = raw
            .split(',')
            .map(|p| p.trim())
            .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case("remote"))
            .map(String::from)
            .collect();

        let (city, region, country) = match parts.as_slice() {
            [] => (None, None, None),
            [city] => (Some(city.clone()), None, None),
            [city, region] => (Some(city.clone()), Some(region.clone()), None),
            [city, region, rest @ ..] => (
                Some(city.clone()),
                Some(region.clone()),
                Some(rest.join(", ")),
            ),
        };

        Some(Location {
            raw: raw.to_string(),
            normalized,
            city,
            region,
            country,
            remote,
        })
    }
}

/// Normalized feature record for one side of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub identity: String,
    pub title_candidates: Vec<String>,
    pub skills: BTreeSet<String>,
    pub experience_level: ExperienceLevel,
    pub years_of_experience: Option<YearsOfExperience>,
    pub location: Option<Location>,
    /// Most frequent content words, most frequent first.
    #[serde(default)]
    pub keywords: Vec<String>,
    pub body_text: String,
}

/// Structured fields an ingestion source may already know. Hint values win over
/// anything inferred from the raw text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentHint {
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub years_of_experience: Option<YearsOfExperience>,
    #[serde(default)]
    pub location: Option<String>,
}
