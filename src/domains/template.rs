//! Template values in block definitions
//!
//! Numeric block fields may be written as a template over the document's
//! frontmatter, e.g. `health: "{{ frontmatter.level * 8 }}"`. Templates use
//! Tera syntax with the frontmatter available as `frontmatter`.

use std::collections::HashMap;
use tera::{Context, Tera, Value};

use super::frontmatter::Frontmatter;
use crate::error::{ErrorCode, Result, ToolkitError};

const TEMPLATE_NAME: &str = "block-value";

/// True if `text` contains template expressions
pub fn has_template_variables(text: &str) -> bool {
    text.contains("{{") && text.contains("}}")
}

/// Ability score modifier, `{{ 14 | modifier }}` renders `2`
fn modifier_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let score = value
        .as_f64()
        .ok_or_else(|| tera::Error::msg(format!("modifier expects a number, got {value}")))?;
    Ok(Value::from(((score - 10.0) / 2.0).floor() as i64))
}

/// Render `text` against `frontmatter`. Text without template expressions
/// is returned unchanged.
pub fn render_template(text: &str, frontmatter: &Frontmatter) -> Result<String> {
    if !has_template_variables(text) {
        return Ok(text.to_string());
    }

    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.register_filter("modifier", modifier_filter);
    tera.add_raw_template(TEMPLATE_NAME, text)
        .map_err(|e| template_error(text, e))?;

    let mut context = Context::new();
    context.insert("frontmatter", frontmatter);
    tera.render(TEMPLATE_NAME, &context)
        .map_err(|e| template_error(text, e))
}

fn template_error(text: &str, err: tera::Error) -> ToolkitError {
    ToolkitError::config_with_code(
        ErrorCode::CONFIG_INVALID_VALUE,
        format!("Template '{text}' could not be rendered"),
    )
    .with_source(err)
}

/// Leading integer of rendered text: `"40"` and `"40.5"` give 40
pub(crate) fn parse_integer(rendered: &str) -> Option<i64> {
    let rendered = rendered.trim();
    rendered
        .parse::<i64>()
        .ok()
        .or_else(|| rendered.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
}
