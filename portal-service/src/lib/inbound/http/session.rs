//! Session transport: the `token` cookie, with an `Authorization: Bearer`
//! header as fallback for non-browser clients.

use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::cookie::SameSite;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;

pub const SESSION_COOKIE: &str = "token";

#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Set the `Secure` attribute. Enabled in production.
    pub secure: bool,
}

impl SessionSettings {
    /// Cookie carrying a freshly issued token, expiring with it.
    pub fn session_cookie(&self, token: String, lifetime: chrono::Duration) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(cookie::time::Duration::seconds(lifetime.num_seconds()))
            .build()
    }

    /// Expired cookie that makes the client drop its session token.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build((SESSION_COOKIE, ""))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .build();
        cookie.make_removal();
        cookie
    }
}

/// Token presented with the request: cookie first, then bearer header.
pub fn extract_token(
    jar: &CookieJar,
    bearer: Option<&TypedHeader<Authorization<Bearer>>>,
) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| bearer.map(|header| header.0.token().to_string()))
}
