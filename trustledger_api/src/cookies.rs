//! Cookie lookups against the client's cookie store.

use reqwest::cookie::CookieStore;
use url::Url;

/// Name of the cookie the backend stores its CSRF token in.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header the CSRF token is echoed back in.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Reads the value of cookie `name` that the store would send to `url`.
///
/// The value is percent-decoded; a value that does not decode to UTF-8 is
/// returned as stored.
pub fn get_cookie(store: &dyn CookieStore, url: &Url, name: &str) -> Option<String> {
    let header = store.cookies(url)?;
    let header = header.to_str().ok()?;
    find_cookie(header, name)
}

/// Finds `name` in a `Cookie` header value of the form `a=1; b=2`.
pub(crate) fn find_cookie(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key.trim() != name {
            return None;
        }
        let value = value.trim();
        Some(match urlencoding::decode(value) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => value.to_string(),
        })
    })
}
