use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use super::ApiSuccess;
use super::MessageData;
use crate::inbound::http::router::AppState;

/// Clear the session cookie. Always succeeds; the token itself stays valid
/// until it expires.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, ApiSuccess<MessageData>) {
    (
        jar.add(state.session.removal_cookie()),
        ApiSuccess::new(
            StatusCode::OK,
            MessageData {
                message: "Logged out".to_string(),
            },
        ),
    )
}
