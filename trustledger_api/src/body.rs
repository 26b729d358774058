use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Error;

/// A successfully decoded response body, tagged by the declared content type.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The response declared `application/json`; the decoded value, unchanged.
    Json(Value),
    /// Any other content type; the raw response text.
    Text(String),
}

impl ResponseBody {
    /// Picks the variant from a `Content-Type` header value.
    pub(crate) fn is_json_content_type(content_type: &str) -> bool {
        content_type.to_ascii_lowercase().contains("application/json")
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Text(s) => Some(s),
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    /// Deserializes the body into `T`.
    ///
    /// A text body is parsed as JSON as well, since some endpoints answer
    /// with a JSON document under a generic content type.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, Error> {
        match self {
            Self::Json(v) => serde_json::from_value(v).map_err(Error::Decode),
            Self::Text(s) => serde_json::from_str(&s).map_err(Error::Decode),
        }
    }
}
