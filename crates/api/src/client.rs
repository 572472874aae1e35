use crate::error::{ApiError, ApiResult};
use crate::types::{GeneratedReply, GenerationRequest};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080";
const GENERATE_PATH: &str = "/api/email/generate";

/// Anything that can turn a request into a reply. The HTTP client is the
/// production implementation; tests script their own.
#[allow(async_fn_in_trait)]
pub trait ReplyGenerator {
    async fn generate(&self, request: &GenerationRequest) -> ApiResult<GeneratedReply>;
}

#[derive(Clone, Debug)]
pub struct GenerationClient {
    http: Client,
    base_url: String,
}

impl GenerationClient {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Self::build(base_url, None)
    }

    /// Like [`GenerationClient::new`] but bounds the whole request.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_timeout(base_url: &str, timeout: std::time::Duration) -> ApiResult<Self> {
        Self::build(base_url, Some(timeout))
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn build(base_url: &str, timeout: Option<std::time::Duration>) -> ApiResult<Self> {
        let base_url = normalize_base(base_url)?;
        let mut builder = Client::builder()
            .user_agent("draftai/0.2")
            .connect_timeout(std::time::Duration::from_secs(5));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self { http, base_url })
    }

    #[cfg(target_arch = "wasm32")]
    fn build(base_url: &str, _timeout: Option<()>) -> ApiResult<Self> {
        Ok(Self {
            http: Client::new(),
            base_url: normalize_base(base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, GENERATE_PATH)
    }

    pub async fn generate(&self, request: &GenerationRequest) -> ApiResult<GeneratedReply> {
        debug!(tone = %request.tone, "Requesting reply generation");

        let response = self.http.post(self.endpoint()).json(request).send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Generation request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(GeneratedReply::new(body, content_type))
    }
}

impl ReplyGenerator for GenerationClient {
    async fn generate(&self, request: &GenerationRequest) -> ApiResult<GeneratedReply> {
        GenerationClient::generate(self, request).await
    }
}

fn normalize_base(base_url: &str) -> ApiResult<String> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|e| ApiError::InvalidBaseUrl(format!("{trimmed}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::InvalidBaseUrl(format!(
            "{trimmed}: unsupported scheme {}",
            parsed.scheme()
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::{Tone, ToneSelection};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(content: &str, tone: ToneSelection) -> GenerationRequest {
        GenerationRequest::new(content, tone).unwrap()
    }

    #[test]
    fn endpoint_joins_base_without_double_slash() {
        let client = GenerationClient::new("https://draft.example.com/").unwrap();
        assert_eq!(
            client.endpoint(),
            "https://draft.example.com/api/email/generate"
        );
    }

    #[test]
    fn rejects_malformed_base_urls() {
        assert!(matches!(
            GenerationClient::new("not a url"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            GenerationClient::new("ftp://example.com"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn returns_literal_body_on_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/email/generate"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "emailContent": "Can we meet Tuesday?",
                "tone": "concise",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("Hello, thanks!"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GenerationClient::new(&mock_server.uri()).unwrap();
        let reply = client
            .generate(&request(
                "Can we meet Tuesday?",
                ToneSelection::Fixed(Tone::Concise),
            ))
            .await
            .unwrap();

        assert_eq!(reply.text(), "Hello, thanks!");
    }

    #[tokio::test]
    async fn server_errors_surface_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/email/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&mock_server)
            .await;

        let client = GenerationClient::new(&mock_server.uri()).unwrap();
        let err = client
            .generate(&request("Hello", ToneSelection::Auto))
            .await
            .unwrap_err();

        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn auto_tone_is_sent_as_empty_string() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/email/generate"))
            .and(body_json(serde_json::json!({
                "emailContent": "Ping",
                "tone": "",
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("{\"reply\":\"Pong\"}", "application/json"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GenerationClient::new(&mock_server.uri()).unwrap();
        let reply = client
            .generate(&request("Ping", ToneSelection::Auto))
            .await
            .unwrap();

        assert_eq!(reply.display_text(), "{\"reply\":\"Pong\"}");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = GenerationClient::new(&format!("http://{addr}")).unwrap();
        let err = client
            .generate(&request("Hello", ToneSelection::Auto))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn configured_timeout_is_applied() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(std::time::Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let client = GenerationClient::with_timeout(
            &mock_server.uri(),
            std::time::Duration::from_millis(50),
        )
        .unwrap();
        let err = client
            .generate(&request("Hello", ToneSelection::Auto))
            .await
            .unwrap_err();

        match err {
            ApiError::Network(e) => assert!(e.is_timeout()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
