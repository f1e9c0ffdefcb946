use serde::{Deserialize, Serialize};

use crate::models::document::{DocumentHint, ExperienceBucket, YearsOfExperience};

/// A candidate profile as returned by the upstream people-search provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub profile_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub current_title: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Bucket text such as "6 to 10 years".
    #[serde(default)]
    pub years_of_experience: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
}

impl CandidateProfile {
    pub fn raw_text(&self) -> String {
        let skills = self.skills.join(", ");
        let mut parts: Vec<&str> = Vec::new();
        for field in [&self.current_title, &self.headline, &self.summary] {
            if let Some(text) = field.as_deref() {
                parts.push(text);
            }
        }
        if !skills.is_empty() {
            parts.push(&skills);
        }
        parts.join("\n")
    }

    pub fn hint(&self) -> DocumentHint {
        DocumentHint {
            titles: self
                .current_title
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            skills: self.skills.clone(),
            experience_level: None,
            years_of_experience: self
                .years_of_experience
                .as_deref()
                .and_then(ExperienceBucket::parse)
                .map(YearsOfExperience::Range),
            location: self
                .location
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_profile() -> CandidateProfile {
        CandidateProfile {
            profile_id: "p-1".to_string(),
            name: Some("Alex Doe".to_string()),
            headline: Some("Backend engineer, Python and Go".to_string()),
            summary: Some("Eight years building payment systems.".to_string()),
            current_title: Some("Senior Software Engineer".to_string()),
            skills: vec!["Python".to_string(), "PostgreSQL".to_string()],
            years_of_experience: Some("6 to 10 years".to_string()),
            location: Some("Berlin, Germany".to_string()),
            profile_url: None,
        }
    }

    #[test]
    fn test_hint_parses_bucket() {
        let hint = make_profile().hint();
        assert_eq!(
            hint.years_of_experience,
            Some(YearsOfExperience::Range(ExperienceBucket::SixToTen))
        );
        assert_eq!(hint.titles, vec!["Senior Software Engineer".to_string()]);
    }

    #[test]
    fn test_raw_text_includes_skills_line() {
        let text = make_profile().raw_text();
        assert!(text.contains("Python, PostgreSQL"));
        assert!(text.starts_with("Senior Software Engineer"));
    }

    #[test]
    fn test_empty_profile_has_empty_text() {
        let profile: CandidateProfile =
            serde_json::from_str(r#"{"profile_id": "p-2"}"#).unwrap();
        assert!(profile.raw_text().is_empty());
        assert!(profile.hint().location.is_none());
    }
}
