//! Bearer token authentication (RFC 6750).
//!
//! Used both for the `bearer` scheme and for `oauth2`, which carries a
//! pre-obtained access token the same way.

/// Formats a token into a Bearer authentication header value.
///
/// # Examples
///
/// ```
/// use rest_engine::auth::bearer::bearer_token;
///
/// let auth_header = bearer_token("abc123xyz");
/// assert_eq!(auth_header, "Bearer abc123xyz");
/// ```
pub fn bearer_token(token: &str) -> String {
    format!("Bearer {}", token)
}
