//! Per-call request descriptor.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::Error;

/// Options for a single call to [`Client::request`](crate::Client::request).
///
/// Built fresh for every call and consumed by it.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Value serialized as the JSON request body.
    pub body: Option<Value>,
    /// Header overrides, merged over the client defaults.
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: None,
            headers: Vec::new(),
        }
    }

    /// Sets the body from any serializable value.
    pub fn with_body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, Error> {
        self.body = Some(serde_json::to_value(body).map_err(Error::Serialize)?);
        Ok(self)
    }

    /// Adds a header override. A later override of the same name wins.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Whether this call should carry the CSRF header.
    pub(crate) fn is_mutating(&self) -> bool {
        self.method != Method::GET
    }

    /// Whether the body, if any, is sent for this verb.
    pub(crate) fn sends_body(&self) -> bool {
        matches!(self.method, Method::POST | Method::PUT | Method::PATCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_is_get_without_body() {
        let opts = RequestOptions::default();
        assert_eq!(opts.method, Method::GET);
        assert!(opts.body.is_none());
        assert!(opts.headers.is_empty());
        assert!(!opts.is_mutating());
    }

    #[test]
    fn body_serialized_to_value() {
        #[derive(Serialize)]
        struct Void<'a> {
            reason: &'a str,
        }
        let opts = RequestOptions::new(Method::POST)
            .with_body(&Void { reason: "Lost in mail" })
            .unwrap();
        assert_eq!(opts.body, Some(json!({"reason": "Lost in mail"})));
    }

    #[test]
    fn verbs_classified() {
        assert!(RequestOptions::new(Method::DELETE).is_mutating());
        assert!(!RequestOptions::new(Method::DELETE).sends_body());
        assert!(RequestOptions::new(Method::PATCH).sends_body());
        assert!(!RequestOptions::new(Method::GET).sends_body());
    }
}
