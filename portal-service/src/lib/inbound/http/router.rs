use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::me;
use super::handlers::register::register;
use super::handlers::update_user::update_user;
use super::handlers::verify_user::verify_user;
use super::middleware::authorize;
use super::middleware::RouteGuard;
use super::middleware::ADMIN_ONLY;
use super::middleware::ANY_ROLE;
use super::session::SessionSettings;
use crate::domain::user::models::PasswordPolicy;
use crate::domain::user::models::Role;
use crate::domain::user::ports::AuthServicePort;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub user_service: Arc<dyn UserServicePort>,
    pub session: SessionSettings,
    pub password_policy: PasswordPolicy,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    user_service: Arc<dyn UserServicePort>,
    session: SessionSettings,
    password_policy: PasswordPolicy,
) -> Router {
    let state = AppState {
        auth_service,
        user_service,
        session,
        password_policy,
    };

    let guard = |allowed: &'static [Role]| {
        middleware::from_fn_with_state(
            RouteGuard::new(state.auth_service.clone(), allowed),
            authorize,
        )
    };

    let public_routes = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout));

    let session_routes = Router::new()
        .route("/auth/me", get(me))
        .route_layer(guard(ANY_ROLE));

    let admin_routes = Router::new()
        .route("/admin/users", get(list_users).post(create_user))
        .route("/admin/users/:user_id", patch(update_user).delete(delete_user))
        .route("/admin/users/:user_id/verify", patch(verify_user))
        .route_layer(guard(ADMIN_ONLY));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
