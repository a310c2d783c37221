//! Screen rendering for the profile tab

use crate::core::{Group, Result, Severity, UserMessage};
use crate::fields::{FieldDefinition, FieldKind};
use crate::submission::{FIELD_IDS_KEY, field_key};
use chrono::{Datelike, NaiveDateTime};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// Read-only profile shown to visitors
    Display,
    /// Form shown to admins and during creation
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedField {
    pub definition: FieldDefinition,
    pub value: Option<String>,
}

/// Everything a template needs. The group travels with the context; nothing
/// is read back from shared state.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub group: &'a Group,
    pub title: &'a str,
    pub fields: Vec<RenderedField>,
    pub form_action: Option<String>,
    pub messages: &'a [UserMessage],
}

pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: Template, context: &RenderContext<'_>) -> Result<String>;
}

/// Plain HTML fragments, no template files
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl TemplateRenderer for HtmlRenderer {
    fn render(&self, template: Template, context: &RenderContext<'_>) -> Result<String> {
        let mut out = String::new();
        render_messages(&mut out, context.messages);
        match template {
            Template::Display => render_display(&mut out, context),
            Template::Edit => render_edit(&mut out, context),
        }
        Ok(out)
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Error notice shown in place of a screen
pub fn error_notice(text: &str) -> String {
    format!(
        "<div id=\"message\" class=\"error\"><p>{}</p></div>",
        escape_html(text)
    )
}

fn render_messages(out: &mut String, messages: &[UserMessage]) {
    for message in messages {
        let class = match message.severity {
            Severity::Success => "updated",
            Severity::Error => "error",
        };
        let _ = write!(
            out,
            "<div id=\"message\" class=\"{}\"><p>{}</p></div>",
            class,
            escape_html(&message.text)
        );
    }
}

fn render_display(out: &mut String, context: &RenderContext<'_>) {
    let _ = write!(
        out,
        "<div class=\"group-profile\" data-group=\"{}\"><h2>{}</h2>",
        context.group.id,
        escape_html(context.title)
    );

    let filled: Vec<&RenderedField> = context
        .fields
        .iter()
        .filter(|field| field.value.as_deref().is_some_and(|v| !v.is_empty()))
        .collect();

    if filled.is_empty() {
        out.push_str("<p>This group has not filled in its profile yet.</p>");
    } else {
        out.push_str("<dl>");
        for field in filled {
            let _ = write!(
                out,
                "<dt>{}</dt><dd>{}</dd>",
                escape_html(&field.definition.name),
                escape_html(field.value.as_deref().unwrap_or_default())
            );
        }
        out.push_str("</dl>");
    }
    out.push_str("</div>");
}

fn render_edit(out: &mut String, context: &RenderContext<'_>) {
    let ids: Vec<String> = context
        .fields
        .iter()
        .map(|field| field.definition.id.to_string())
        .collect();

    let _ = write!(
        out,
        "<form method=\"post\" action=\"{}\" class=\"group-profile-edit\" data-group=\"{}\">",
        escape_html(context.form_action.as_deref().unwrap_or_default()),
        context.group.id
    );

    for field in &context.fields {
        render_input(out, field);
    }

    let _ = write!(
        out,
        "<input type=\"hidden\" name=\"{}\" value=\"{}\"/><button type=\"submit\">Save</button></form>",
        FIELD_IDS_KEY,
        ids.join(",")
    );
}

fn render_input(out: &mut String, field: &RenderedField) {
    let definition = &field.definition;
    let name = field_key(definition.id);
    let value = escape_html(field.value.as_deref().unwrap_or_default());
    let required = if definition.required { " required" } else { "" };

    let _ = write!(
        out,
        "<div class=\"field\"><label for=\"{}\">{}{}</label>",
        name,
        escape_html(&definition.name),
        if definition.required { " (required)" } else { "" }
    );

    match &definition.kind {
        FieldKind::TextBox | FieldKind::Url | FieldKind::Number => {
            let input_type = match definition.kind {
                FieldKind::Url => "url",
                FieldKind::Number => "number",
                _ => "text",
            };
            let _ = write!(
                out,
                "<input type=\"{}\" id=\"{}\" name=\"{}\" value=\"{}\"{}/>",
                input_type, name, name, value, required
            );
        }
        FieldKind::TextArea => {
            let _ = write!(
                out,
                "<textarea id=\"{}\" name=\"{}\"{}>{}</textarea>",
                name, name, required, value
            );
        }
        FieldKind::DateBox => {
            let date = field
                .value
                .as_deref()
                .and_then(|v| NaiveDateTime::parse_from_str(v, crate::fields::DATE_FORMAT).ok());
            let parts = [
                ("day", date.map(|d| d.day().to_string())),
                ("month", date.map(|d| d.month().to_string())),
                ("year", date.map(|d| d.year().to_string())),
            ];
            for (part, current) in parts {
                let _ = write!(
                    out,
                    "<input type=\"text\" name=\"{}_{}\" value=\"{}\" placeholder=\"{}\"{}/>",
                    name,
                    part,
                    current.unwrap_or_default(),
                    part,
                    required
                );
            }
        }
        FieldKind::SelectBox(options) => {
            let _ = write!(out, "<select id=\"{}\" name=\"{}\"{}>", name, name, required);
            out.push_str("<option value=\"\"></option>");
            for option in options {
                let selected = if field.value.as_deref() == Some(option.as_str()) {
                    " selected"
                } else {
                    ""
                };
                let _ = write!(
                    out,
                    "<option value=\"{0}\"{1}>{0}</option>",
                    escape_html(option),
                    selected
                );
            }
            out.push_str("</select>");
        }
    }

    if !definition.description.is_empty() {
        let _ = write!(
            out,
            "<p class=\"description\">{}</p>",
            escape_html(&definition.description)
        );
    }
    out.push_str("</div>");
}
