// Career analysis prompt template and builder.

use std::borrow::Cow;

use crate::llm_client::prompts::JSON_OUTPUT_DIRECTIVE;

/// Appended to CV text that was cut at the character cap.
pub const TRUNCATION_MARKER: &str = "[TRUNCATED]";

pub const CAREER_ANALYSIS_PROMPT: &str = r#"You are an expert career counselor and CV reviewer. Analyze this CV/resume and provide comprehensive feedback.

CV Content:
{cv_text}

User interests: {interests}

Please provide a detailed analysis with the following sections:

**SKILLS SUMMARY**
List and categorize the key skills identified (technical, soft skills, tools, languages, etc.)

**EXPERIENCE LEVEL**
Assess whether this candidate is: Junior (0-2 years), Mid-level (3-5 years), Senior (6-10 years), or Executive (10+ years)
Provide reasoning for your assessment.

**CAREER RECOMMENDATIONS**
Suggest 3 specific career paths or roles that match their profile. For each recommendation:
- Job title
- Why it's a good fit
- Typical salary range (if applicable)
- Growth potential

**CV IMPROVEMENT FEEDBACK**
Provide specific, actionable suggestions to improve their CV:
- What's working well
- What's missing or unclear
- Formatting suggestions
- Content recommendations
- Keywords to add for ATS systems

**SKILLS GAP ANALYSIS**
Identify 3-5 skills they should develop or strengthen for their target roles:
- Skill name
- Why it's important
- How to acquire it (courses, certifications, practice)

**ACTION PLAN**
Provide a clear 3-month action plan with specific steps they can take immediately.

Please be specific, encouraging, and constructive in your feedback."#;

/// Cuts `text` to `max_chars` characters and appends [`TRUNCATION_MARKER`].
/// Text within the cap is borrowed unchanged.
pub fn truncate_cv_text(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}\n\n{TRUNCATION_MARKER}", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

/// Composes the full prompt: template with CV text and interests, then the JSON directive.
///
/// The CV text is spliced in after placeholder substitution, so placeholders
/// appearing inside a CV are left alone.
pub fn build_prompt(cv_text: &str, interests: Option<&str>, max_chars: usize) -> String {
    let cv_text = truncate_cv_text(cv_text, max_chars);
    let interests = interests.map(str::trim).unwrap_or_default();

    let (head, tail) = CAREER_ANALYSIS_PROMPT
        .split_once("{cv_text}")
        .unwrap_or((CAREER_ANALYSIS_PROMPT, ""));
    let tail = tail.replace("{interests}", interests);

    format!("{head}{cv_text}{tail}\n\n{JSON_OUTPUT_DIRECTIVE}")
}
