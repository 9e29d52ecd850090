// Shared prompt fragments. Feature-specific templates live next to the feature
// (see analysis/prompts.rs).

/// Top-level keys every career analysis must contain, in prompt order.
pub const ANALYSIS_KEYS: [&str; 6] = [
    "skills_summary",
    "experience_level",
    "career_recommendations",
    "cv_improvement_feedback",
    "skills_gap_analysis",
    "action_plan",
];

/// Appended to analysis prompts so the model answers with one parseable JSON object.
pub const JSON_OUTPUT_DIRECTIVE: &str = "
IMPORTANT: Please respond with a single VALID JSON object only (no extra commentary).
The JSON object must contain exactly these top-level keys:
- skills_summary,
- experience_level,
- career_recommendations,
- cv_improvement_feedback,
- skills_gap_analysis,
- action_plan

Each key should contain structured values (lists / nested objects) so the API consumer can parse them programmatically.
Do NOT add any other top-level keys. Do NOT use markdown code fences.
Return only the JSON object and nothing else.
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_names_every_key() {
        for key in ANALYSIS_KEYS {
            assert!(JSON_OUTPUT_DIRECTIVE.contains(key), "missing {key}");
        }
    }
}
