// Placeholder output for the three download tabs.
// Replace `{company}`, `{job_title}` (and `{resume}` for the resume header) before returning.

/// Header prepended to the uploaded resume text.
pub const RESUME_TEMPLATE: &str = "Targeted resume for {job_title} at {company}\n\
==============================================\n\
\n\
{resume}";

pub const COVER_LETTER_TEMPLATE: &str = r#"Dear Hiring Manager,

I am excited to apply for the {job_title} position at {company}. My background
lines up closely with what you are looking for, and I would welcome the chance
to bring that experience to your team.

In my recent roles I have delivered measurable results, worked closely with
cross-functional partners, and kept learning the tools the job demands. I am
confident I can contribute from day one.

Thank you for your time and consideration. I look forward to discussing how I
can help {company} reach its goals.

Sincerely,
[Your Name]"#;

pub const INTERVIEW_PREP_TEMPLATE: &str = r#"Interview preparation: {job_title} at {company}

1. Tell me about yourself.
   Suggested answer: Give a two-minute summary of your career, ending with why
   the {job_title} role is the natural next step.

2. Why do you want to work at {company}?
   Suggested answer: Connect the company's mission and recent work to your own
   goals and strengths.

3. Describe a challenging project and how you handled it.
   Suggested answer: Use the STAR method (Situation, Task, Action, Result) and
   quantify the outcome.

4. Where do you see yourself in five years?
   Suggested answer: Show ambition that fits the growth path of this role."#;

/// Appended when the user typed a customization prompt.
pub const FOCUS_LINE: &str = "\n\nRequested focus: {prompt}";

pub const DEFAULT_COMPANY: &str = "the company";
pub const DEFAULT_JOB_TITLE: &str = "the role";
pub const EMPTY_RESUME: &str = "(No resume imported yet. Import your resume in step 1.)";
