//! Sentence handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use domain_conversation::NewSentenceForm;
use tracing::debug;

use super::parse_conversation_id;
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::{views, AppState};

/// Appends a sentence and redirects back to the conversation
///
/// On validation errors the detail page is rendered again (400) with the
/// submitted values and the messages next to the inputs.
pub async fn add_sentence(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Form(form): Form<NewSentenceForm>,
) -> Result<Response, ApiError> {
    let id = parse_conversation_id(&id)?;

    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            // Ownership still decides between 404 and 400
            let conversation = state.port.get_conversation(id, user.id).await?;
            debug!(conversation_id = %id, fields = errors.len(), "Rejected sentence");
            let page = views::conversation_detail(&conversation, &form, &errors);
            return Ok((StatusCode::BAD_REQUEST, Html(page)).into_response());
        }
    };

    let sentence = state.port.add_sentence(id, user.id, request).await?;
    debug!(conversation_id = %id, position = sentence.position, "Sentence added");

    Ok(Redirect::to(&views::conversation_path(id)).into_response())
}
