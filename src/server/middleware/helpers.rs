//! Helper functions for middleware

use crate::auth::RequestCredentials;
use actix_web::http::header::HeaderMap;

/// Header carrying static API keys
pub const API_KEY_HEADER: &str = "X-Terrareg-ApiKey";

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// Extract authentication credentials from request headers.
///
/// Pulls the API-key header, the raw Authorization header and the session
/// cookie; strategies decide what each one means.
pub fn extract_credentials(headers: &HeaderMap) -> RequestCredentials {
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let session_id = headers
        .get("cookie")
        .and_then(|value| value.to_str().ok())
        .and_then(session_id_from_cookies);

    RequestCredentials {
        api_key,
        authorization,
        session_id,
    }
}

/// Pull the session identifier out of a Cookie header value
fn session_id_from_cookies(cookies: &str) -> Option<String> {
    cookies.split(';').find_map(|cookie| {
        cookie
            .trim()
            .strip_prefix(SESSION_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}
