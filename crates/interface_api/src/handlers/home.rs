//! Landing page

use axum::{extract::State, http::HeaderMap, response::Html};

use crate::{auth, views, AppState};

/// Public page; links to the list only for callers with a valid session
pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let signed_in = auth::authenticate_request(&headers, &state.config.jwt_secret).is_ok();

    Html(views::home(signed_in))
}
