//! MatchEngine: the immutable matching configuration built once at startup.
//!
//! Holds the skill vocabulary (inside the extractor) and one weight table per direction.
//! Every method takes `&self`, so one engine is shared across request handlers behind
//! an `Arc`.

use rayon::prelude::*;
use tracing::warn;

use crate::errors::MatchError;
use crate::extraction::extractor::FeatureExtractor;
use crate::extraction::vocabulary::SkillVocabulary;
use crate::models::candidate::CandidateProfile;
use crate::models::document::{Document, DocumentHint};
use crate::models::job::JobPosting;
use crate::models::match_result::{MatchResult, RankedMatches, SkippedDocument};
use crate::scoring::ranker;
use crate::scoring::weights::{MatchDirection, WeightTable};

/// Result of matching one query against structured inputs. `matches` pairs each
/// surviving input with its result, best first.
#[derive(Debug, Clone)]
pub struct MatchOutcome<T> {
    pub query: Document,
    pub matches: Vec<(T, MatchResult)>,
    pub total_found: usize,
    pub skipped: Vec<SkippedDocument>,
}

pub struct MatchEngine {
    extractor: FeatureExtractor,
    resume_to_job: WeightTable,
    job_to_candidate: WeightTable,
}

impl MatchEngine {
    /// Engine with the built-in weight tables.
    pub fn new(vocabulary: SkillVocabulary) -> Result<Self, MatchError> {
        Self::with_weights(
            vocabulary,
            WeightTable::for_direction(MatchDirection::ResumeToJob)?,
            WeightTable::for_direction(MatchDirection::JobToCandidate)?,
        )
    }

    pub fn with_weights(
        vocabulary: SkillVocabulary,
        resume_to_job: WeightTable,
        job_to_candidate: WeightTable,
    ) -> Result<Self, MatchError> {
        Ok(Self {
            extractor: FeatureExtractor::new(vocabulary)?,
            resume_to_job,
            job_to_candidate,
        })
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        self.extractor.vocabulary()
    }

    pub fn weights(&self, direction: MatchDirection) -> &WeightTable {
        match direction {
            MatchDirection::ResumeToJob => &self.resume_to_job,
            MatchDirection::JobToCandidate => &self.job_to_candidate,
        }
    }

    pub fn extract(
        &self,
        identity: &str,
        raw_text: &str,
        hint: &DocumentHint,
    ) -> Result<Document, MatchError> {
        self.extractor.extract(identity, raw_text, hint)
    }

    pub fn rank(
        &self,
        direction: MatchDirection,
        query: &Document,
        candidates: &[Document],
        max_results: i64,
    ) -> Result<RankedMatches, MatchError> {
        ranker::rank(query, candidates, self.weights(direction), max_results)
    }

    /// Resume → jobs. A resume that fails extraction fails the call; a job that fails
    /// extraction is skipped.
    pub fn match_resume_to_jobs(
        &self,
        resume_identity: &str,
        resume_text: &str,
        jobs: &[JobPosting],
        max_results: i64,
    ) -> Result<MatchOutcome<JobPosting>, MatchError> {
        let query = self.extract(resume_identity, resume_text, &DocumentHint::default())?;
        let extracted: Vec<_> = jobs
            .par_iter()
            .map(|job| self.extract(&job.job_url, &job.raw_text(), &job.hint()))
            .collect();
        self.rank_structured(MatchDirection::ResumeToJob, query, jobs, extracted, max_results)
    }

    /// Job → candidates. Same failure rules as `match_resume_to_jobs`.
    pub fn match_job_to_candidates(
        &self,
        job_identity: &str,
        job_text: &str,
        job_hint: &DocumentHint,
        candidates: &[CandidateProfile],
        max_results: i64,
    ) -> Result<MatchOutcome<CandidateProfile>, MatchError> {
        let query = self.extract(job_identity, job_text, job_hint)?;
        let extracted: Vec<_> = candidates
            .par_iter()
            .map(|c| self.extract(&c.profile_id, &c.raw_text(), &c.hint()))
            .collect();
        self.rank_structured(
            MatchDirection::JobToCandidate,
            query,
            candidates,
            extracted,
            max_results,
        )
    }

    fn rank_structured<T: Clone>(
        &self,
        direction: MatchDirection,
        query: Document,
        inputs: &[T],
        extracted: Vec<Result<Document, MatchError>>,
        max_results: i64,
    ) -> Result<MatchOutcome<T>, MatchError> {
        let mut documents = Vec::with_capacity(extracted.len());
        let mut origins = Vec::with_capacity(extracted.len());
        let mut skipped = Vec::new();

        for (origin, result) in extracted.into_iter().enumerate() {
            match result {
                Ok(doc) => {
                    documents.push(doc);
                    origins.push(origin);
                }
                Err(MatchError::Extraction { identity, reason }) => {
                    warn!(identity = %identity, reason = %reason, "Skipping candidate that failed extraction");
                    skipped.push(SkippedDocument { identity, reason });
                }
                Err(other) => return Err(other),
            }
        }

        let (ranked, total_found) =
            ranker::rank_indexed(&query, &documents, self.weights(direction), max_results)?;

        let matches = ranked
            .into_iter()
            .filter_map(|r| {
                let input = origins.get(r.index).and_then(|&o| inputs.get(o))?;
                Some((input.clone(), r.result))
            })
            .collect();

        Ok(MatchOutcome {
            query,
            matches,
            total_found,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::ExperienceLevel;
    use crate::models::match_result::Factor;

    fn make_engine() -> MatchEngine {
        MatchEngine::new(SkillVocabulary::builtin().unwrap()).unwrap()
    }

    fn make_job(url: &str, title: &str, description: &str, skills: &[&str]) -> JobPosting {
        JobPosting {
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: description.to_string(),
            job_url: url.to_string(),
            posted_date: None,
            employment_type: Some("Full-time".to_string()),
            seniority_level: None,
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn make_candidate(id: &str, title: &str, summary: &str, skills: &[&str]) -> CandidateProfile {
        CandidateProfile {
            profile_id: id.to_string(),
            name: Some(format!("Candidate {id}")),
            headline: Some(title.to_string()),
            summary: Some(summary.to_string()),
            current_title: Some(title.to_string()),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            years_of_experience: None,
            location: Some("Austin, TX".to_string()),
            profile_url: None,
        }
    }

    const RESUME: &str = "Senior Backend Engineer\n7 years of Python, Django and AWS.";

    #[test]
    fn test_resume_to_jobs_prefers_skill_overlap() {
        let jobs = vec![
            make_job("https://jobs/b", "Backend Engineer", "Python and Java services.", &[]),
            make_job("https://jobs/a", "Backend Engineer", "Python, Django and AWS.", &[]),
        ];
        let outcome = make_engine()
            .match_resume_to_jobs("resume.pdf", RESUME, &jobs, 10)
            .unwrap();

        assert_eq!(outcome.query.experience_level, ExperienceLevel::Senior);
        assert_eq!(outcome.total_found, 2);
        assert_eq!(outcome.matches[0].0.job_url, "https://jobs/a");
        assert!(outcome.matches[0].1.final_score > outcome.matches[1].1.final_score);
        assert!(!outcome.matches[0]
            .1
            .sub_scores
            .contains_key(&Factor::LocationMatch));
    }

    #[test]
    fn test_unextractable_job_is_skipped() {
        let jobs = vec![
            make_job("https://jobs/empty", "", "  ...  ", &[]),
            make_job("https://jobs/ok", "Backend Engineer", "Python", &[]),
        ];
        let outcome = make_engine()
            .match_resume_to_jobs("resume.pdf", RESUME, &jobs, 10)
            .unwrap();
        assert_eq!(outcome.total_found, 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].identity, "https://jobs/empty");
        assert_eq!(outcome.matches[0].0.job_url, "https://jobs/ok");
    }

    #[test]
    fn test_unextractable_resume_fails() {
        let err = make_engine()
            .match_resume_to_jobs("blank.pdf", "   ", &[], 10)
            .unwrap_err();
        assert!(matches!(err, MatchError::Extraction { .. }));
    }

    #[test]
    fn test_job_to_candidates_scores_location() {
        let candidates = vec![
            make_candidate("p-1", "Data Analyst", "Excel reporting", &["Excel"]),
            make_candidate("p-2", "Backend Engineer", "Builds Python APIs", &["Python", "Django"]),
        ];
        let hint = DocumentHint {
            location: Some("Austin, TX".to_string()),
            ..DocumentHint::default()
        };
        let outcome = make_engine()
            .match_job_to_candidates(
                "https://jobs/1",
                "Backend Engineer\nWe need Python and Django.",
                &hint,
                &candidates,
                5,
            )
            .unwrap();

        let best = &outcome.matches[0];
        assert_eq!(best.0.profile_id, "p-2");
        assert_eq!(best.1.sub_scores[&Factor::LocationMatch], 1.0);
        assert_eq!(best.1.matched_skills, vec!["Django", "Python"]);
    }

    #[test]
    fn test_rank_applies_each_direction_table() {
        let engine = make_engine();
        let resume = engine
            .extract("resume.pdf", RESUME, &DocumentHint::default())
            .unwrap();
        let job_hint = DocumentHint {
            location: Some("Austin, TX".to_string()),
            ..DocumentHint::default()
        };
        let job = engine
            .extract("https://jobs/1", "Backend Engineer\nPython and Django.", &job_hint)
            .unwrap();

        let for_resume = engine
            .rank(MatchDirection::ResumeToJob, &resume, std::slice::from_ref(&job), 10)
            .unwrap();
        let result = &for_resume.results[0];
        assert!(result.sub_scores.contains_key(&Factor::KeywordMatch));
        assert!(!result.sub_scores.contains_key(&Factor::LocationMatch));
        assert!(result.matched_keywords.contains(&"python".to_string()));

        let for_job = engine
            .rank(MatchDirection::JobToCandidate, &job, std::slice::from_ref(&resume), 10)
            .unwrap();
        let result = &for_job.results[0];
        assert_eq!(for_job.total_found, 1);
        assert_eq!(result.sub_scores[&Factor::LocationMatch], 0.0);
        assert!(!result.sub_scores.contains_key(&Factor::KeywordMatch));
    }

    #[test]
    fn test_custom_weights_are_used() {
        let only_skills = WeightTable::new(vec![(Factor::SkillMatch, 1.0)]).unwrap();
        let engine = MatchEngine::with_weights(
            SkillVocabulary::builtin().unwrap(),
            only_skills.clone(),
            only_skills,
        )
        .unwrap();
        let jobs = vec![make_job("https://jobs/x", "Chef", "Cooking", &["Python", "Django", "AWS"])];
        let outcome = engine
            .match_resume_to_jobs("resume.pdf", RESUME, &jobs, 10)
            .unwrap();
        assert_eq!(outcome.matches[0].1.final_score, 100.0);
    }
}
