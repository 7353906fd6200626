//! Error message templates.
//!
//! Templates may reference `{action}`, `{field}`, `{values}` and `{type}`,
//! or the same names in the `%(name)s` form. Unknown placeholders are left
//! as written.

use latch_core::Value;
use regex_lite::{Captures, Regex};
use std::sync::OnceLock;

/// Message used when a rule has no template of its own.
pub const DEFAULT_TEMPLATE: &str = "Cannot {action} {type}: {field} is not one of {values}";

fn placeholder() -> Option<&'static Regex> {
    static PLACEHOLDER: OnceLock<Option<Regex>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| {
            Regex::new(r"\{(action|field|values|type)\}|%\((action|field|values|type)\)s").ok()
        })
        .as_ref()
}

/// Values substituted into a template.
#[derive(Debug, Clone, Copy)]
pub struct MessageContext<'a> {
    pub action: &'a str,
    pub field: &'a str,
    pub values: &'a [Value],
    pub type_name: &'a str,
}

/// Render a template.
pub fn render(template: &str, ctx: &MessageContext<'_>) -> String {
    let Some(re) = placeholder() else {
        return template.to_string();
    };
    re.replace_all(template, |caps: &Captures<'_>| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());
        match name {
            "action" => ctx.action.to_string(),
            "field" => ctx.field.to_string(),
            "values" => format_values(ctx.values),
            "type" => ctx.type_name.to_string(),
            _ => caps[0].to_string(),
        }
    })
    .into_owned()
}

/// `[a, b]` with strings unquoted.
pub fn format_values(values: &[Value]) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    format!("[{}]", items.join(", "))
}
