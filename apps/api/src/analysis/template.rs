//! Prompt template rendering.
//!
//! Rendering is behind [`TemplateRenderer`] so the placeholder syntax can change
//! without touching the pipeline. [`BraceTemplate`] implements the `{name}`
//! syntax with `{{` / `}}` as escaped literal braces.

use thiserror::Error;

use crate::analysis::sanitizer::contains_delimiter;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("value for '{variable}' still contains a raw template delimiter")]
    DelimiterLeak { variable: String },

    #[error("template references unknown variable '{0}'")]
    MissingVariable(String),

    #[error("unbalanced brace at byte {0}")]
    Unbalanced(usize),
}

pub trait TemplateRenderer: Send + Sync {
    /// Renders `template`, substituting each placeholder with its value from `vars`.
    fn render(&self, template: &str, vars: &[(&str, &str)]) -> Result<String, TemplateError>;
}

/// `{name}` placeholders, `{{` and `}}` for literal braces.
///
/// Values are inserted verbatim and never re-scanned. A value that still holds a
/// raw `{` or `}` means sanitization was skipped and is rejected outright.
#[derive(Debug, Default, Clone, Copy)]
pub struct BraceTemplate;

impl TemplateRenderer for BraceTemplate {
    fn render(&self, template: &str, vars: &[(&str, &str)]) -> Result<String, TemplateError> {
        if let Some((name, _)) = vars.iter().find(|(_, value)| contains_delimiter(value)) {
            return Err(TemplateError::DelimiterLeak {
                variable: name.to_string(),
            });
        }

        let rendered_len = template.len() + vars.iter().map(|(_, v)| v.len()).sum::<usize>();
        let mut out = String::with_capacity(rendered_len);
        let mut chars = template.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' => {
                    if chars.next_if(|&(_, next)| next == '{').is_some() {
                        out.push('{');
                        continue;
                    }

                    let start = pos + 1;
                    let end = loop {
                        match chars.next() {
                            Some((i, '}')) => break i,
                            Some((i, '{')) => return Err(TemplateError::Unbalanced(i)),
                            Some(_) => {}
                            None => return Err(TemplateError::Unbalanced(pos)),
                        }
                    };

                    let name = &template[start..end];
                    let value = vars
                        .iter()
                        .find(|(key, _)| *key == name)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| TemplateError::MissingVariable(name.to_string()))?;
                    out.push_str(value);
                }
                '}' => {
                    if chars.next_if(|&(_, next)| next == '}').is_none() {
                        return Err(TemplateError::Unbalanced(pos));
                    }
                    out.push('}');
                }
                other => out.push(other),
            }
        }

        Ok(out)
    }
}
