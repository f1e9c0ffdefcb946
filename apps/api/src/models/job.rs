use serde::{Deserialize, Serialize};

use crate::models::document::{DocumentHint, ExperienceLevel};

/// A job posting as delivered by the upstream search/scraping layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    pub description: String,
    pub job_url: String,
    #[serde(default)]
    pub posted_date: Option<String>,
    /// Full-time, Part-time, Contract, etc.
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub seniority_level: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

impl JobPosting {
    /// Text fed to the extractor: the title line followed by the description.
    pub fn raw_text(&self) -> String {
        format!("{}\n{}", self.title, self.description)
    }

    pub fn hint(&self) -> DocumentHint {
        let experience_level = self
            .seniority_level
            .as_deref()
            .map(ExperienceLevel::parse_label)
            .filter(|level| *level != ExperienceLevel::Unspecified);

        DocumentHint {
            titles: non_blank(&self.title).into_iter().collect(),
            skills: self.required_skills.clone(),
            experience_level,
            years_of_experience: None,
            location: non_blank(&self.location),
        }
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
