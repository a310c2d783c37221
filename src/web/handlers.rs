use std::collections::HashMap;

use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::{Result, USER_HEADER, WebError, state::AppState};
use crate::access::RequestAccess;
use crate::core::{Group, UserId, UserMessage};
use crate::orchestrator::SaveResult;
use crate::submission::SubmittedFields;

#[derive(Debug, Deserialize)]
pub struct CreateStepQuery {
    pub group: String,
    #[serde(default)]
    pub next: Option<String>,
}

impl CreateStepQuery {
    /// Both values are pasted back into URLs, so only slug characters pass.
    fn validate(&self) -> Result<()> {
        let slugs = std::iter::once(("group", self.group.as_str()))
            .chain(self.next.as_deref().map(|next| ("next", next)));
        for (name, value) in slugs {
            if !is_slug(value) {
                return Err(WebError::Input(format!("'{}' is not a valid {} slug", value, name)));
            }
        }
        Ok(())
    }
}

fn is_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn display_screen(
    State(state): State<AppState>,
    Path((group_slug, ext_slug)): Path<(String, String)>,
) -> Result<Html<String>> {
    ensure_slug(&state, &ext_slug)?;
    let group = state.groups.require(&group_slug)?;

    Ok(Html(state.extension.on_display(&group)?))
}

pub async fn edit_screen(
    State(state): State<AppState>,
    Path((group_slug, ext_slug)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    ensure_slug(&state, &ext_slug)?;
    let group = state.groups.require(&group_slug)?;
    let user = require_admin(&headers, &group)?;

    let messages = state.flash.take(user)?;
    let action = state.config.group_admin_url(&group);
    Ok(Html(state.extension.on_edit(&group, &action, &messages)?))
}

pub async fn save_edit(
    State(state): State<AppState>,
    Path((group_slug, ext_slug)): Path<(String, String)>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response> {
    ensure_slug(&state, &ext_slug)?;
    let group = state.groups.require(&group_slug)?;
    let user = current_user(&headers)?;
    let access = RequestAccess::edit(user.is_some_and(|user| group.is_admin(user)));

    let submission = SubmittedFields::from_form(&form);
    let mut messages = Vec::new();
    let result = state
        .extension
        .on_save(&group, &submission, &access, &mut messages);
    debug!(group = %group.slug, ?result, "edit screen saved");

    let action = state.config.group_admin_url(&group);
    match result {
        SaveResult::Rerender => Ok(Html(state.extension.on_edit(&group, &action, &messages)?)
            .into_response()),
        SaveResult::Continue | SaveResult::Unchanged => Ok(Redirect::to(&action).into_response()),
        SaveResult::Redirect(target) => redirect_with_messages(&state, user, messages, &target),
    }
}

pub async fn create_screen(
    State(state): State<AppState>,
    Path(step): Path<String>,
    Query(query): Query<CreateStepQuery>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    ensure_slug(&state, &step)?;
    query.validate()?;
    let group = state.groups.require(&query.group)?;
    let user = require_admin(&headers, &group)?;

    let messages = state.flash.take(user)?;
    let action = create_action(&state, &step, &query);
    Ok(Html(state.extension.on_create(&group, &action, &messages)?))
}

pub async fn save_create(
    State(state): State<AppState>,
    Path(step): Path<String>,
    Query(query): Query<CreateStepQuery>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response> {
    ensure_slug(&state, &step)?;
    query.validate()?;
    let group = state.groups.require(&query.group)?;
    let user = current_user(&headers)?;

    // The creator is the first admin of the group being created.
    let access = if user.is_some_and(|user| group.is_admin(user)) {
        RequestAccess::creation(step.clone())
    } else {
        RequestAccess::anonymous()
    };

    let submission = SubmittedFields::from_form(&form);
    let mut messages = Vec::new();
    let result = state
        .extension
        .on_create_save(&group, &submission, &access, &mut messages);
    debug!(group = %group.slug, ?result, "creation step saved");

    match result {
        SaveResult::Continue => {
            let next = match query.next.as_deref() {
                Some(next) => state.config.create_step_url(next),
                None => state.config.group_permalink(&group),
            };
            Ok(Redirect::to(&next).into_response())
        }
        SaveResult::Unchanged => {
            Ok(Redirect::to(&create_action(&state, &step, &query)).into_response())
        }
        SaveResult::Rerender => {
            let action = create_action(&state, &step, &query);
            Ok(Html(state.extension.on_create(&group, &action, &messages)?).into_response())
        }
        SaveResult::Redirect(target) => {
            // Back to this step: the screen needs the wizard's query again.
            let target = if target == state.config.create_step_url(&step) {
                create_action(&state, &step, &query)
            } else {
                target
            };
            redirect_with_messages(&state, user, messages, &target)
        }
    }
}

fn redirect_with_messages(
    state: &AppState,
    user: Option<UserId>,
    messages: Vec<UserMessage>,
    target: &str,
) -> Result<Response> {
    if let Some(user) = user {
        state.flash.push(user, messages)?;
    }
    Ok(Redirect::to(target).into_response())
}

fn create_action(state: &AppState, step: &str, query: &CreateStepQuery) -> String {
    let mut action = format!("{}?group={}", state.config.create_step_url(step), query.group);
    if let Some(next) = query.next.as_deref() {
        action.push_str("&next=");
        action.push_str(next);
    }
    action
}

fn ensure_slug(state: &AppState, slug: &str) -> Result<()> {
    if slug != state.config.slug {
        return Err(WebError::NotFound(format!("no group screen named '{}'", slug)));
    }
    Ok(())
}

fn current_user(headers: &HeaderMap) -> Result<Option<UserId>> {
    let Some(raw) = headers.get(USER_HEADER) else {
        return Ok(None);
    };

    raw.to_str()
        .ok()
        .and_then(|raw| raw.parse::<UserId>().ok())
        .map(Some)
        .ok_or_else(|| WebError::Input(format!("{} must be a numeric user id", USER_HEADER)))
}

fn require_admin(headers: &HeaderMap, group: &Group) -> Result<UserId> {
    match current_user(headers)? {
        Some(user) if group.is_admin(user) => Ok(user),
        _ => Err(WebError::Forbidden(format!(
            "only administrators of '{}' may edit its profile",
            group.slug
        ))),
    }
}
