//! Prompt assembler. Fills the analysis template with retrieved CV context and the JD.

use crate::analysis::prompts::{ANALYSIS_PROMPT_TEMPLATE, CONTEXT_SEPARATOR};
use crate::analysis::template::{TemplateError, TemplateRenderer};

/// Joins the retrieved chunks (retrieval order, blank line between) and renders
/// the analysis prompt. Both texts must already be sanitized.
pub fn assemble_prompt(
    renderer: &dyn TemplateRenderer,
    retrieved_chunks: &[String],
    jd_text: &str,
) -> Result<String, TemplateError> {
    let cv_text = retrieved_chunks.join(CONTEXT_SEPARATOR);
    renderer.render(
        ANALYSIS_PROMPT_TEMPLATE,
        &[("cv_text", cv_text.as_str()), ("jd_text", jd_text)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::prompts::RADAR_DIMENSIONS;
    use crate::analysis::sanitizer::sanitize;
    use crate::analysis::template::BraceTemplate;

    #[test]
    fn test_template_renders_with_empty_inputs() {
        // Catches any unescaped brace in the template itself.
        let prompt = assemble_prompt(&BraceTemplate, &[], "").unwrap();
        assert!(prompt.contains("\"personal_info\": {"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_chunks_joined_in_retrieval_order_with_blank_line() {
        let chunks = vec!["Rust at Acme".to_string(), "Go at Initech".to_string()];
        let prompt = assemble_prompt(&BraceTemplate, &chunks, "Rust required").unwrap();
        assert!(prompt.contains("Rust at Acme\n\nGo at Initech"));
        assert!(prompt.contains("Rust required"));
    }

    #[test]
    fn test_prompt_mentions_every_radar_dimension_and_rubric() {
        let prompt = assemble_prompt(&BraceTemplate, &[], "").unwrap();
        for dimension in RADAR_DIMENSIONS {
            assert!(prompt.contains(dimension), "missing {dimension}");
        }
        assert!(prompt.contains("1-4"));
        assert!(prompt.contains("5-7"));
        assert!(prompt.contains("8-10"));
        assert!(prompt.contains("radar_reasoning"));
    }

    #[test]
    fn test_unsanitized_jd_is_rejected() {
        let err = assemble_prompt(&BraceTemplate, &[], "Knows {templating}").unwrap_err();
        assert!(matches!(err, TemplateError::DelimiterLeak { .. }));

        let jd = sanitize("Knows {templating}");
        assert!(assemble_prompt(&BraceTemplate, &[], &jd).is_ok());
    }
}
