use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const COMPANY_NAME_LIMIT: usize = 128;
pub const JOB_TITLE_LIMIT: usize = 128;
pub const JOB_DESCRIPTION_LIMIT: usize = 2000;
pub const RESUME_LIMIT: usize = 4000;
pub const PROMPT_LIMIT: usize = 1000;

/// Truncates `value` to at most `limit` characters without splitting a
/// multi-byte character.
pub fn clamp_chars(value: &str, limit: usize) -> String {
    match value.char_indices().nth(limit) {
        Some((byte_idx, _)) => value[..byte_idx].to_string(),
        None => value.to_string(),
    }
}

/// The job-application draft held for one page visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobApplicationDraft {
    pub id: Uuid,
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    pub resume: String,
    pub resume_prompt: String,
    /// Output of the last resume optimization. `resume` keeps the imported text.
    pub optimized_resume: String,
    pub cover_letter: String,
    pub cover_letter_prompt: String,
    pub interview_prep: String,
    pub interview_prep_prompt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update sent on keystroke. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftUpdate {
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub job_description: Option<String>,
    pub resume_prompt: Option<String>,
    pub cover_letter_prompt: Option<String>,
    pub interview_prep_prompt: Option<String>,
}

impl JobApplicationDraft {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            company_name: String::new(),
            job_title: String::new(),
            job_description: String::new(),
            resume: String::new(),
            resume_prompt: String::new(),
            optimized_resume: String::new(),
            cover_letter: String::new(),
            cover_letter_prompt: String::new(),
            interview_prep: String::new(),
            interview_prep_prompt: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: DraftUpdate) {
        let fields = [
            (&mut self.company_name, update.company_name, COMPANY_NAME_LIMIT),
            (&mut self.job_title, update.job_title, JOB_TITLE_LIMIT),
            (
                &mut self.job_description,
                update.job_description,
                JOB_DESCRIPTION_LIMIT,
            ),
            (&mut self.resume_prompt, update.resume_prompt, PROMPT_LIMIT),
            (
                &mut self.cover_letter_prompt,
                update.cover_letter_prompt,
                PROMPT_LIMIT,
            ),
            (
                &mut self.interview_prep_prompt,
                update.interview_prep_prompt,
                PROMPT_LIMIT,
            ),
        ];
        for (slot, value, limit) in fields {
            if let Some(value) = value {
                *slot = clamp_chars(&value, limit);
            }
        }
        self.touch();
    }

    pub fn set_resume(&mut self, text: &str) {
        self.resume = clamp_chars(text, RESUME_LIMIT);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for JobApplicationDraft {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_chars_short_value_unchanged() {
        assert_eq!(clamp_chars("Acme", 128), "Acme");
        assert_eq!(clamp_chars("", 10), "");
    }

    #[test]
    fn test_clamp_chars_never_splits_multibyte() {
        // each 'é' is two bytes; slicing by bytes at 3 would panic
        let clamped = clamp_chars("ééééé", 3);
        assert_eq!(clamped, "ééé");
        assert_eq!(clamped.chars().count(), 3);
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut draft = JobApplicationDraft::new();
        draft.apply(DraftUpdate {
            company_name: Some("Initech".to_string()),
            job_title: Some("Engineer".to_string()),
            ..Default::default()
        });
        draft.apply(DraftUpdate {
            job_title: Some("Staff Engineer".to_string()),
            ..Default::default()
        });

        assert_eq!(draft.company_name, "Initech");
        assert_eq!(draft.job_title, "Staff Engineer");
        assert!(draft.job_description.is_empty());
    }

    #[test]
    fn test_apply_clamps_every_field() {
        let mut draft = JobApplicationDraft::new();
        draft.apply(DraftUpdate {
            company_name: Some("c".repeat(500)),
            job_title: Some("t".repeat(500)),
            job_description: Some("d".repeat(5000)),
            resume_prompt: Some("p".repeat(5000)),
            cover_letter_prompt: Some("p".repeat(5000)),
            interview_prep_prompt: Some("p".repeat(5000)),
        });

        assert_eq!(draft.company_name.len(), COMPANY_NAME_LIMIT);
        assert_eq!(draft.job_title.len(), JOB_TITLE_LIMIT);
        assert_eq!(draft.job_description.len(), JOB_DESCRIPTION_LIMIT);
        assert_eq!(draft.resume_prompt.len(), PROMPT_LIMIT);
        assert_eq!(draft.cover_letter_prompt.len(), PROMPT_LIMIT);
        assert_eq!(draft.interview_prep_prompt.len(), PROMPT_LIMIT);
    }

    #[test]
    fn test_set_resume_clamps_to_4000() {
        let mut draft = JobApplicationDraft::new();
        draft.set_resume(&"r".repeat(10_000));
        assert_eq!(draft.resume.chars().count(), RESUME_LIMIT);
        assert!(draft.updated_at >= draft.created_at);
    }
}
