use axum::response::Html;
use chrono::{Datelike, Utc};

use crate::draft::models::{
    COMPANY_NAME_LIMIT, JOB_DESCRIPTION_LIMIT, JOB_TITLE_LIMIT, PROMPT_LIMIT,
};

const JOB_DETAILS_TEMPLATE: &str = include_str!("job_details.html");

/// File types offered by the resume picker.
pub const ACCEPTED_UPLOADS: &str = ".pdf,.doc,.docx,.txt";

/// Renders the job-details page. Input `maxlength`s come from the same
/// constants the draft clamps with.
pub fn render_job_details_page() -> String {
    JOB_DETAILS_TEMPLATE
        .replace("{{accept}}", ACCEPTED_UPLOADS)
        .replace("{{company_limit}}", &COMPANY_NAME_LIMIT.to_string())
        .replace("{{job_title_limit}}", &JOB_TITLE_LIMIT.to_string())
        .replace("{{job_description_limit}}", &JOB_DESCRIPTION_LIMIT.to_string())
        .replace("{{prompt_limit}}", &PROMPT_LIMIT.to_string())
        .replace("{{year}}", &Utc::now().year().to_string())
}

/// GET / and GET /job-details
pub async fn handle_job_details_page() -> Html<String> {
    Html(render_job_details_page())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_placeholders_filled() {
        let html = render_job_details_page();
        assert!(!html.contains("{{"), "unfilled placeholder in page");
    }

    #[test]
    fn test_limits_match_draft_clamps() {
        let html = render_job_details_page();
        assert!(html.contains(r#"id="company_name" data-field="company_name" maxlength="128""#));
        assert!(html.contains(r#"id="job_title" data-field="job_title" maxlength="128""#));
        assert!(html.contains(r#"maxlength="2000""#));
        assert!(html.contains(r#"accept=".pdf,.doc,.docx,.txt""#));
    }

    #[test]
    fn test_failed_optimize_restores_previous_output() {
        let html = render_job_details_page();
        assert!(html.contains("const previous = output.textContent;"));
        assert!(html.contains("output.textContent = previous;"));
        assert!(!html.contains("output.textContent = '';"));
    }
}
