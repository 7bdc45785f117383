use std::sync::Arc;

use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;

use super::handlers::ApiError;
use super::session::extract_token;
use crate::domain::user::models::Role;
use crate::domain::user::ports::AuthServicePort;

/// Any verified account, whatever its role.
pub const ANY_ROLE: &[Role] = &[];
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Per-route guard state: the auth service and the route's role allow-list.
#[derive(Clone)]
pub struct RouteGuard {
    auth_service: Arc<dyn AuthServicePort>,
    allowed: &'static [Role],
}

impl RouteGuard {
    pub fn new(auth_service: Arc<dyn AuthServicePort>, allowed: &'static [Role]) -> Self {
        Self {
            auth_service,
            allowed,
        }
    }
}

/// Middleware that resolves the session token to a live, verified user whose
/// role is on the route's allow-list, and hands the identity to the handler
/// as an `Extension<AuthenticatedUser>`.
pub async fn authorize(
    State(guard): State<RouteGuard>,
    jar: CookieJar,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&jar, bearer.as_ref());

    let user = guard
        .auth_service
        .authorize(token.as_deref(), guard.allowed)
        .await?;

    tracing::debug!(user_id = %user.id, role = %user.role, "Request authorized");

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
