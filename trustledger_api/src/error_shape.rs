//! Recognized shapes of backend error bodies and the ordered matcher over them.

use std::borrow::Cow;

use serde_json::Value;

/// A backend error body, classified by the first shape it matches.
///
/// Precedence is `message`, then `detail`, then `error`, then the first
/// field-keyed validation entry in document order. Empty strings never
/// match, so a matched shape always yields a non-empty message.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorShape<'a> {
    /// `{"message": "..."}`
    Message(&'a str),
    /// `{"detail": "..."}`
    Detail(&'a str),
    /// `{"error": "..."}`
    Error(&'a str),
    /// `{"field": "..."}`
    FieldString { field: &'a str, message: &'a str },
    /// `{"field": ["...", ...]}`, holding the first element.
    FieldList { field: &'a str, first: Cow<'a, str> },
    /// Nothing recognizable.
    Unknown,
}

impl<'a> ErrorShape<'a> {
    /// Classifies a decoded error body.
    pub fn classify(body: &'a Value) -> Self {
        let Some(map) = body.as_object() else {
            return Self::Unknown;
        };

        if let Some(s) = non_empty_str(map.get("message")) {
            return Self::Message(s);
        }
        if let Some(s) = non_empty_str(map.get("detail")) {
            return Self::Detail(s);
        }
        if let Some(s) = non_empty_str(map.get("error")) {
            return Self::Error(s);
        }

        for (field, value) in map {
            match value {
                Value::Array(items) => {
                    if let Some(first) = items.first().and_then(first_element) {
                        return Self::FieldList {
                            field: field.as_str(),
                            first,
                        };
                    }
                }
                Value::String(s) if !s.is_empty() => {
                    return Self::FieldString {
                        field: field.as_str(),
                        message: s.as_str(),
                    };
                }
                _ => {}
            }
        }

        Self::Unknown
    }

    /// The message this shape carries, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message(s) | Self::Detail(s) | Self::Error(s) => Some(*s),
            Self::FieldString { message, .. } => Some(*message),
            Self::FieldList { first, .. } => Some(first.as_ref()),
            Self::Unknown => None,
        }
    }

    /// The field name for validation-error shapes.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::FieldString { field, .. } | Self::FieldList { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// Resolves to the user-facing message, falling back to the status code.
    pub fn into_message(self, status: u16) -> String {
        match self.message() {
            Some(m) => m.to_string(),
            None => generic_message(status),
        }
    }
}

/// Message used when the body carries nothing usable.
pub(crate) fn generic_message(status: u16) -> String {
    format!("HTTP error! status: {}", status)
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn first_element(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Null => None,
        other => Some(Cow::Owned(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_wins_over_everything() {
        let body = json!({"email": ["bad"], "error": "e", "detail": "d", "message": "m"});
        assert_eq!(ErrorShape::classify(&body), ErrorShape::Message("m"));
    }

    #[test]
    fn detail_before_error() {
        let body = json!({"error": "e", "detail": "Not found."});
        assert_eq!(ErrorShape::classify(&body), ErrorShape::Detail("Not found."));
    }

    #[test]
    fn error_field() {
        let body = json!({"error": "Check already voided"});
        assert_eq!(
            ErrorShape::classify(&body).into_message(409),
            "Check already voided"
        );
    }

    #[test]
    fn field_list_takes_first_element() {
        let body = json!({"email": ["This field is required.", "Second."]});
        let shape = ErrorShape::classify(&body);
        assert_eq!(shape.field(), Some("email"));
        assert_eq!(shape.into_message(400), "This field is required.");
    }

    #[test]
    fn field_string_taken_directly() {
        let body = json!({"non_field_errors": "Invalid state transition"});
        assert_eq!(
            ErrorShape::classify(&body),
            ErrorShape::FieldString {
                field: "non_field_errors",
                message: "Invalid state transition"
            }
        );
    }

    #[test]
    fn scan_follows_document_order() {
        let body: Value =
            serde_json::from_str(r#"{"zeta": ["z first"], "alpha": ["a second"]}"#).unwrap();
        assert_eq!(ErrorShape::classify(&body).into_message(400), "z first");
    }

    #[test]
    fn scan_skips_unusable_fields() {
        let body: Value = serde_json::from_str(
            r#"{"count": 3, "items": [], "nested": {"x": "y"}, "amount": ["Must be positive."]}"#,
        )
        .unwrap();
        assert_eq!(
            ErrorShape::classify(&body).into_message(400),
            "Must be positive."
        );
    }

    #[test]
    fn non_string_message_falls_through() {
        let body = json!({"message": 42, "detail": "Denied"});
        assert_eq!(ErrorShape::classify(&body), ErrorShape::Detail("Denied"));
    }

    #[test]
    fn empty_object_falls_back_to_status() {
        let body = json!({});
        let shape = ErrorShape::classify(&body);
        assert_eq!(shape, ErrorShape::Unknown);
        assert!(shape.into_message(500).contains("500"));
    }

    #[test]
    fn non_object_body_is_unknown() {
        assert_eq!(ErrorShape::classify(&json!("oops")), ErrorShape::Unknown);
        assert_eq!(ErrorShape::classify(&json!(null)), ErrorShape::Unknown);
    }

    #[test]
    fn empty_strings_never_match() {
        let body = json!({"message": "", "account": ""});
        assert_eq!(ErrorShape::classify(&body), ErrorShape::Unknown);
    }

    #[test]
    fn non_string_list_element_rendered_as_json() {
        let body = json!({"lines": [{"amount": ["Required."]}]});
        assert_eq!(
            ErrorShape::classify(&body).into_message(400),
            r#"{"amount":["Required."]}"#
        );
    }
}
