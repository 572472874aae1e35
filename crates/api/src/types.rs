use crate::error::{ApiError, ApiResult};
use crate::tone::ToneSelection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub email_content: String,
    pub tone: String,
}

impl GenerationRequest {
    pub fn new(email_content: impl Into<String>, tone: ToneSelection) -> ApiResult<Self> {
        let email_content = email_content.into();
        if email_content.trim().is_empty() {
            return Err(ApiError::Validation("email content is empty".to_string()));
        }
        Ok(Self {
            email_content,
            tone: tone.wire_value().to_string(),
        })
    }
}

/// Body of a successful generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReply {
    pub body: String,
    pub content_type: Option<String>,
}

impl GeneratedReply {
    pub fn new(body: impl Into<String>, content_type: Option<String>) -> Self {
        Self {
            body: body.into(),
            content_type,
        }
    }

    /// The literal response body.
    pub fn text(&self) -> &str {
        &self.body
    }

    /// The body as shown on a results panel: a JSON string payload is
    /// unwrapped, any other JSON payload is stringified. Bodies are decoded
    /// whatever their content type says; anything that is not JSON is shown
    /// as is.
    pub fn display_text(&self) -> String {
        match serde_json::from_str::<Value>(&self.body) {
            Ok(Value::String(s)) => s,
            Ok(other) => other.to_string(),
            Err(_) => self.body.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GeneratedReply, GenerationRequest};
    use crate::tone::{Tone, ToneSelection};

    #[test]
    fn request_serializes_with_camel_case_fields() {
        let request =
            GenerationRequest::new("Hi there", ToneSelection::Fixed(Tone::Concise)).unwrap();
        let payload = serde_json::to_value(&request).unwrap();
        assert_eq!(payload["emailContent"], "Hi there");
        assert_eq!(payload["tone"], "concise");
    }

    #[test]
    fn blank_content_is_rejected() {
        assert!(GenerationRequest::new("   \n\t", ToneSelection::Auto).is_err());
        assert!(GenerationRequest::new("", ToneSelection::Auto).is_err());
    }

    #[test]
    fn plain_text_is_displayed_verbatim() {
        let reply = GeneratedReply::new("Hello, thanks!", Some("text/plain".to_string()));
        assert_eq!(reply.display_text(), "Hello, thanks!");
        assert_eq!(reply.text(), "Hello, thanks!");
    }

    #[test]
    fn json_payloads_are_unwrapped_or_stringified() {
        let quoted = GeneratedReply::new("\"Sure thing\"", Some("application/json".to_string()));
        assert_eq!(quoted.display_text(), "Sure thing");
        assert_eq!(quoted.text(), "\"Sure thing\"");

        let object = GeneratedReply::new(
            "{\"reply\": \"ok\"}",
            Some("application/json; charset=utf-8".to_string()),
        );
        assert_eq!(object.display_text(), "{\"reply\":\"ok\"}");
    }

    #[test]
    fn json_is_decoded_even_when_labelled_as_text() {
        let quoted = GeneratedReply::new("\"Sure\"", Some("text/plain".to_string()));
        assert_eq!(quoted.display_text(), "Sure");

        let unlabelled = GeneratedReply::new("[1, 2]", None);
        assert_eq!(unlabelled.display_text(), "[1,2]");

        let prose = GeneratedReply::new("Sure, \"Friday\" works.", Some("text/plain".to_string()));
        assert_eq!(prose.display_text(), "Sure, \"Friday\" works.");
    }
}
