//! Mocked optimization. Every kind returns canned text built from the draft's
//! company and job title; nothing is generated.

pub mod templates;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::draft::models::JobApplicationDraft;
use crate::errors::AppError;
use templates::{
    COVER_LETTER_TEMPLATE, DEFAULT_COMPANY, DEFAULT_JOB_TITLE, EMPTY_RESUME, FOCUS_LINE,
    INTERVIEW_PREP_TEMPLATE, RESUME_TEMPLATE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizeKind {
    Resume,
    CoverLetter,
    Interview,
}

impl OptimizeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizeKind::Resume => "resume",
            OptimizeKind::CoverLetter => "cover-letter",
            OptimizeKind::Interview => "interview",
        }
    }
}

impl fmt::Display for OptimizeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptimizeKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resume" => Ok(OptimizeKind::Resume),
            "cover-letter" => Ok(OptimizeKind::CoverLetter),
            "interview" => Ok(OptimizeKind::Interview),
            other => Err(AppError::Validation(format!(
                "Unknown optimization '{other}'. Expected resume, cover-letter or interview"
            ))),
        }
    }
}

/// Builds the placeholder text for `kind`. A non-blank `prompt` is echoed as
/// the requested focus.
pub fn canned_output(kind: OptimizeKind, draft: &JobApplicationDraft, prompt: &str) -> String {
    let company = or_default(&draft.company_name, DEFAULT_COMPANY);
    let job_title = or_default(&draft.job_title, DEFAULT_JOB_TITLE);

    let template = match kind {
        OptimizeKind::Resume => RESUME_TEMPLATE,
        OptimizeKind::CoverLetter => COVER_LETTER_TEMPLATE,
        OptimizeKind::Interview => INTERVIEW_PREP_TEMPLATE,
    };
    // user text is substituted last so braces inside it stay literal
    let mut output = template
        .replace("{company}", company)
        .replace("{job_title}", job_title)
        .replace("{resume}", or_default(&draft.resume, EMPTY_RESUME));

    let prompt = prompt.trim();
    if !prompt.is_empty() {
        output.push_str(&FOCUS_LINE.replace("{prompt}", prompt));
    }
    output
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}
