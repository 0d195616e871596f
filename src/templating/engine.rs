use minijinja::syntax::SyntaxConfig;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use std::collections::BTreeMap;

use super::Template;
use super::error::TemplateError;
use crate::models::ValidatedValues;

/// Renders `{{NAME}}` templates. Values are inserted verbatim.
///
/// Only the variable delimiters are live. Block and comment syntax is moved to
/// control-character markers so `{%` and `{#` in the surrounding source pass
/// through untouched.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();

        // Fail on undefined placeholders instead of rendering them empty
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        env.set_syntax(
            SyntaxConfig::builder()
                .block_delimiters("\u{1}%", "%\u{1}")
                .comment_delimiters("\u{1}#", "#\u{1}")
                .build()
                .expect("placeholder-only syntax is valid"),
        );

        Self { env }
    }

    pub fn render(
        &self,
        template: &Template,
        values: &ValidatedValues,
    ) -> Result<String, TemplateError> {
        let context: BTreeMap<&str, &str> = values.iter().collect();

        self.env
            .render_str(&template.text, &context)
            .map_err(|error| {
                TemplateError::from_minijinja_error(
                    error,
                    template.text.clone(),
                    &template.source_path,
                )
            })
    }
}
