//! Conversation handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use domain_conversation::{FieldErrors, NewConversationForm, NewSentenceForm};
use tracing::{debug, info};

use super::parse_conversation_id;
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::{views, AppState};

/// Lists the caller's conversations, newest first
pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>, ApiError> {
    let conversations = state.port.list_conversations(user.id).await?;
    Ok(Html(views::conversation_list(&conversations)))
}

/// Renders an empty new-conversation form
pub async fn new_conversation() -> Html<String> {
    Html(views::new_conversation_form(
        &NewConversationForm::default(),
        &FieldErrors::new(),
    ))
}

/// Creates a conversation and redirects to it
///
/// Invalid input re-renders the form with 400 and the messages per field.
pub async fn create_conversation(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<NewConversationForm>,
) -> Result<Response, ApiError> {
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            debug!(fields = errors.len(), "Rejected new conversation");
            let page = views::new_conversation_form(&form, &errors);
            return Ok((StatusCode::BAD_REQUEST, Html(page)).into_response());
        }
    };

    let conversation = state.port.create_conversation(user.id, request).await?;
    info!(conversation_id = %conversation.id, user_id = %user.id, "Conversation created");

    Ok(Redirect::to(&views::conversation_path(conversation.id)).into_response())
}

/// Shows a conversation with its sentences
pub async fn show_conversation(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let id = parse_conversation_id(&id)?;
    let conversation = state.port.get_conversation(id, user.id).await?;

    Ok(Html(views::conversation_detail(
        &conversation,
        &NewSentenceForm::default(),
        &FieldErrors::new(),
    )))
}

/// Deletes a conversation owned by the caller
pub async fn delete_conversation(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Redirect, ApiError> {
    let id = parse_conversation_id(&id)?;
    state.port.delete_conversation(id, user.id).await?;
    info!(conversation_id = %id, user_id = %user.id, "Conversation deleted");

    Ok(Redirect::to("/conversations"))
}
