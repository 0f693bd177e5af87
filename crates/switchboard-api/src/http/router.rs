//! Axum router configuration with middleware.
//!
//! Account routes live under `/auth`; conversation and thread routes sit at
//! the root. Middleware: CORS, tracing, body limits, and (when
//! `auth.protect_conversations` is set) a bearer-token check in front of the
//! conversation routes.

use axum::Router;
use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::http::error::AppError;
use crate::http::extractors::auth::extract_bearer;
use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_upload_bytes;

    let auth_routes = Router::new()
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me));

    let mut conversation_routes = Router::new()
        .route("/chat", post(handlers::conversation::chat))
        .route("/vision", post(handlers::conversation::vision))
        .route("/pdf", post(handlers::conversation::pdf))
        .route("/generate-image", post(handlers::conversation::generate_image))
        .route(
            "/threads/{id}/messages",
            get(handlers::threads::get_messages),
        )
        .route(
            "/threads/{id}",
            delete(handlers::threads::delete_thread),
        );

    if state.config.auth.protect_conversations {
        conversation_routes = conversation_routes.route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));
    }

    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .nest("/auth", auth_routes)
        .merge(conversation_routes)
        .route("/health", get(handlers::health::health_check))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Reject requests without a valid bearer token.
async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();
    let token = extract_bearer(&parts)?;
    let claims = state.auth.authenticate(&token)?;
    tracing::debug!(user = %claims.sub, "request authenticated");
    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// CORS for the configured origins.
///
/// A `*` entry allows any origin but turns credentials off, since browsers
/// refuse credentialed responses with a wildcard origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use switchboard_core::auth::AuthService;
    use switchboard_core::image::{BoxImageGenerator, ImageGenerator, ImageOptions};
    use switchboard_core::llm::box_provider::BoxLlmProvider;
    use switchboard_core::llm::provider::LlmProvider;
    use switchboard_core::pdf::{PageText, PdfTextExtractor};
    use switchboard_core::tool::ToolBox;
    use switchboard_infra::crypto::password::Argon2PasswordHasher;
    use switchboard_infra::sqlite::pool::{DatabasePool, default_database_url};
    use switchboard_infra::sqlite::user::SqliteUserRepository;
    use switchboard_infra::token::jwt::JwtTokenIssuer;
    use switchboard_types::config::AppConfig;
    use switchboard_types::error::{ImageGenError, PdfError};
    use switchboard_types::llm::{
        CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, Usage,
    };

    use super::*;
    use crate::state::Collaborators;

    /// Routes like a well-behaved classifier and echoes everything else.
    struct EchoProvider {
        capabilities: ProviderCapabilities,
    }

    impl EchoProvider {
        fn boxed() -> BoxLlmProvider {
            BoxLlmProvider::new(Self {
                capabilities: ProviderCapabilities {
                    tool_calling: false,
                    vision: true,
                    structured_output: true,
                    max_context_tokens: 128_000,
                    max_output_tokens: 8_192,
                },
            })
        }
    }

    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        fn model(&self) -> &str {
            "echo-model"
        }

        fn capabilities(&self) -> &ProviderCapabilities {
            &self.capabilities
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            let last = request
                .messages
                .last()
                .map(|m| m.content.text())
                .unwrap_or_default();
            let is_routing = request
                .system
                .as_deref()
                .is_some_and(|s| s.contains("routing assistant"));

            let content = if is_routing {
                let route = if last.to_lowercase().contains("generate image") {
                    "image_generation"
                } else {
                    "chat"
                };
                json!({"route": route, "reasoning": "test"}).to_string()
            } else {
                format!("echo[{}]: {last}", request.messages.len())
            };

            Ok(CompletionResponse {
                id: "resp-test".to_string(),
                content,
                model: "echo-model".to_string(),
                stop_reason: StopReason::EndTurn,
                usage: Usage {
                    input_tokens: 1,
                    output_tokens: 1,
                },
                tool_calls: Vec::new(),
            })
        }
    }

    /// Fails for prompts containing "fail"; otherwise returns a fake URL.
    struct StubImages;

    impl ImageGenerator for StubImages {
        async fn generate(
            &self,
            prompt: &str,
            options: &ImageOptions,
        ) -> Result<String, ImageGenError> {
            if prompt.contains("fail") {
                return Err(ImageGenError::Timeout(10));
            }
            Ok(format!(
                "https://images.test/{}?width={}",
                prompt.replace(' ', "%20"),
                options.width
            ))
        }
    }

    struct StubPdf;

    impl PdfTextExtractor for StubPdf {
        fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageText>, PdfError> {
            if bytes.is_empty() {
                return Err(PdfError::Empty);
            }
            Ok(vec![PageText {
                number: 1,
                text: Ok("Quarterly revenue grew 12%.".to_string()),
            }])
        }
    }

    async fn test_app(protect: bool) -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::new(&default_database_url(dir.path()))
            .await
            .unwrap();
        let auth = AuthService::new(
            SqliteUserRepository::new(pool),
            Argon2PasswordHasher::new(),
            JwtTokenIssuer::new(&SecretString::from("test-secret"), 30),
        );

        let mut config = AppConfig::default();
        config.auth.protect_conversations = protect;
        config.tools.enabled = false;

        let collaborators = Collaborators {
            text_model: EchoProvider::boxed(),
            vision_model: EchoProvider::boxed(),
            image_generator: BoxImageGenerator::new(StubImages),
            pdf_extractor: Arc::new(StubPdf),
            tools: ToolBox::default(),
        };

        let state = AppState::assemble(config, collaborators, auth);
        (build_router(state), dir)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_pdf(uri: &str, query: Option<&str>, include_file: bool) -> Request<Body> {
        let boundary = "switchboard-test-boundary";
        let mut body = String::new();
        if include_file {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"report.pdf\"\r\nContent-Type: application/pdf\r\n\r\n%PDF-1.4 fake\r\n"
            ));
        }
        if let Some(query) = query {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"query\"\r\n\r\n{query}\r\n"
            ));
        }
        body.push_str(&format!("--{boundary}--\r\n"));

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn signup_and_login(app: &Router, email: &str) -> String {
        let (status, _) = send(
            app,
            post_json(
                "/auth/signup",
                json!({
                    "username": "alice",
                    "email": email,
                    "password": "hunter22",
                    "confirm_password": "hunter22"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            app,
            post_json("/auth/login", json!({"email": email, "password": "hunter22"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _dir) = test_app(false).await;
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_signup_login_and_me() {
        let (app, _dir) = test_app(false).await;
        let token = signup_and_login(&app, "alice@example.com").await;

        let request = Request::builder()
            .uri("/auth/me")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "alice@example.com");
        assert_eq!(body["username"], "alice");
    }

    #[tokio::test]
    async fn test_auth_failures_map_to_status_codes() {
        let (app, _dir) = test_app(false).await;
        signup_and_login(&app, "bob@example.com").await;

        let (status, body) = send(
            &app,
            post_json(
                "/auth/signup",
                json!({
                    "username": "bob2",
                    "email": "bob@example.com",
                    "password": "pw",
                    "confirm_password": "pw"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());

        let (status, _) = send(
            &app,
            post_json(
                "/auth/login",
                json!({"email": "bob@example.com", "password": "wrong"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            post_json(
                "/auth/login",
                json!({"email": "nobody@example.com", "password": "x"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let request = Request::builder().uri("/auth/me").body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Not authenticated");
    }

    #[tokio::test]
    async fn test_chat_creates_threads_and_keeps_history() {
        let (app, _dir) = test_app(false).await;

        let (status, first) = send(&app, post_json("/chat", json!({"message": "hello"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["response"], "echo[1]: hello");
        let (_, other) = send(&app, post_json("/chat", json!({"message": "hi"}))).await;
        assert_ne!(first["thread_id"], other["thread_id"]);

        let thread_id = first["thread_id"].as_str().unwrap();
        let (status, second) = send(
            &app,
            post_json("/chat", json!({"message": "again", "thread_id": thread_id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["thread_id"], thread_id);
        // user, assistant, user
        assert_eq!(second["response"], "echo[3]: again");
    }

    #[tokio::test]
    async fn test_vision_routes_to_image_analysis() {
        let (app, _dir) = test_app(false).await;
        let (status, body) = send(
            &app,
            post_json(
                "/vision",
                json!({"question": "What is this?", "image_url": "https://img.test/cat.png"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let thread_id = body["thread_id"].as_str().unwrap().to_string();
        assert!(body["response"].as_str().unwrap().starts_with("echo"));

        let request = Request::builder()
            .uri(format!("/threads/{thread_id}/messages"))
            .body(Body::empty())
            .unwrap();
        let (status, thread) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(thread["image_url"], "https://img.test/cat.png");
        assert_eq!(thread["messages"][1]["route"], "vision");
    }

    #[tokio::test]
    async fn test_pdf_upload() {
        let (app, _dir) = test_app(false).await;
        let (status, body) =
            send(&app, multipart_pdf("/pdf", Some("What grew?"), true)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["response"].as_str().unwrap().starts_with("echo"));

        let thread_id = body["thread_id"].as_str().unwrap();
        let request = Request::builder()
            .uri(format!("/threads/{thread_id}/messages"))
            .body(Body::empty())
            .unwrap();
        let (_, thread) = send(&app, request).await;
        assert_eq!(thread["messages"][0]["content"][0]["type"], "pdf");
        assert_eq!(thread["messages"][0]["content"][0]["filename"], "report.pdf");
        assert_eq!(thread["messages"][1]["route"], "pdf");
    }

    #[tokio::test]
    async fn test_pdf_without_file_is_rejected() {
        let (app, _dir) = test_app(false).await;
        let (status, body) = send(&app, multipart_pdf("/pdf", Some("hi"), false)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "No file uploaded");
    }

    #[tokio::test]
    async fn test_generate_image_success_and_failure() {
        let (app, _dir) = test_app(false).await;
        let (status, body) = send(
            &app,
            post_json("/generate-image", json!({"prompt": "a red fox", "width": 256})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["generated_image_url"],
            "https://images.test/a%20red%20fox?width=256"
        );

        let (status, body) = send(
            &app,
            post_json("/generate-image", json!({"prompt": "fail please"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["generated_image_url"].is_null());
        assert!(body["response"].as_str().unwrap().contains("failed"));
    }

    #[tokio::test]
    async fn test_thread_get_delete_and_missing() {
        let (app, _dir) = test_app(false).await;
        let (_, body) = send(&app, post_json("/chat", json!({"message": "hello"}))).await;
        let thread_id = body["thread_id"].as_str().unwrap().to_string();

        let request = Request::builder()
            .uri(format!("/threads/{thread_id}/messages"))
            .body(Body::empty())
            .unwrap();
        let (status, thread) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(thread["messages"].as_array().unwrap().len(), 2);

        let delete = || {
            Request::builder()
                .method("DELETE")
                .uri(format!("/threads/{thread_id}"))
                .body(Body::empty())
                .unwrap()
        };
        let (status, body) = send(&app, delete()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], true);

        let (status, _) = send(&app, delete()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_bodies_get_json_detail() {
        let (app, _dir) = test_app(false).await;

        let response = app
            .clone()
            .oneshot(post_json("/chat", json!({"thread_id": "x"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["detail"].as_str().unwrap().contains("message"));

        let request = Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());

        let request = Request::builder()
            .method("POST")
            .uri("/pdf")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert!(status.is_client_error());
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_protected_conversations_require_token() {
        let (app, _dir) = test_app(true).await;

        let (status, _) = send(&app, post_json("/chat", json!({"message": "hello"}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let token = signup_and_login(&app, "carol@example.com").await;
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(json!({"message": "hello"}).to_string()))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "echo[1]: hello");

        // Health stays public.
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[test]
    fn test_wildcard_cors_does_not_panic() {
        let _ = cors_layer(&["*".to_string()]);
        let _ = cors_layer(&["http://localhost:3000".to_string(), "bad\norigin".to_string()]);
    }
}
