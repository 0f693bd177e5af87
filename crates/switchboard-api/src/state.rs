//! Application state wiring all services together.
//!
//! Services are generic over their ports, but AppState pins them to the
//! concrete infra implementations. Model handles, tools, the extractor and
//! the image generator are built once here and shared read-only afterwards.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use switchboard_core::auth::AuthService;
use switchboard_core::conversation::InMemoryConversationStore;
use switchboard_core::engine::TurnEngine;
use switchboard_core::handler::{ChatHandler, Handlers, ImageHandler, PdfHandler, VisionHandler};
use switchboard_core::image::{BoxImageGenerator, ImageOptions};
use switchboard_core::llm::box_provider::BoxLlmProvider;
use switchboard_core::pdf::PdfTextExtractor;
use switchboard_core::router::Router;
use switchboard_core::router::classifier::LlmRouteClassifier;
use switchboard_core::tool::ToolBox;
use switchboard_infra::config::secret_from_env;
use switchboard_infra::crypto::password::Argon2PasswordHasher;
use switchboard_infra::image_gen::PollinationsGenerator;
use switchboard_infra::llm::create_provider;
use switchboard_infra::pdf::LopdfExtractor;
use switchboard_infra::sqlite::pool::{DatabasePool, default_database_url};
use switchboard_infra::sqlite::user::SqliteUserRepository;
use switchboard_infra::token::jwt::JwtTokenIssuer;
use switchboard_infra::tools::build_toolbox;
use switchboard_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteEngine = TurnEngine<LlmRouteClassifier, InMemoryConversationStore>;

pub type ConcreteAuthService =
    AuthService<SqliteUserRepository, Argon2PasswordHasher, JwtTokenIssuer>;

/// External collaborators the engine needs, built from config or injected by tests.
pub struct Collaborators {
    pub text_model: BoxLlmProvider,
    pub vision_model: BoxLlmProvider,
    pub image_generator: BoxImageGenerator,
    pub pdf_extractor: Arc<dyn PdfTextExtractor>,
    pub tools: ToolBox,
}

/// Shared application state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ConcreteEngine>,
    pub auth: Arc<ConcreteAuthService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Initialize the application state: read secrets, connect to the DB,
    /// build providers and wire services.
    pub async fn init(config: AppConfig, data_dir: &Path) -> anyhow::Result<Self> {
        let jwt_secret = secret_from_env(&config.auth.jwt_secret_env)
            .context("a JWT signing secret is required to start the server")?;

        tokio::fs::create_dir_all(data_dir)
            .await
            .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;
        let db_url = config
            .database
            .url
            .clone()
            .unwrap_or_else(|| default_database_url(data_dir));
        let db_pool = DatabasePool::new(&db_url)
            .await
            .context("failed to open the user database")?;

        let collaborators = Collaborators {
            text_model: create_provider(&config.text_model).context("text model")?,
            vision_model: create_provider(&config.vision_model).context("vision model")?,
            image_generator: BoxImageGenerator::new(
                PollinationsGenerator::from_config(&config.image_generation)
                    .context("image generator")?,
            ),
            pdf_extractor: Arc::new(LopdfExtractor::new()),
            tools: build_toolbox(&config.tools).context("chat tools")?,
        };

        let auth = AuthService::new(
            SqliteUserRepository::new(db_pool),
            Argon2PasswordHasher::new(),
            JwtTokenIssuer::new(&jwt_secret, config.auth.token_ttl_minutes),
        );

        tracing::info!(
            text_model = %config.text_model.model,
            vision_model = %config.vision_model.model,
            tools_enabled = config.tools.enabled,
            "services initialized"
        );

        Ok(Self::assemble(config, collaborators, auth))
    }

    /// Wire the turn engine around already-built collaborators.
    pub fn assemble(
        config: AppConfig,
        collaborators: Collaborators,
        auth: ConcreteAuthService,
    ) -> Self {
        let text_model = Arc::new(collaborators.text_model);
        let vision_model = Arc::new(collaborators.vision_model);

        let handlers = Handlers {
            chat: ChatHandler::new(
                Arc::clone(&text_model),
                collaborators.tools,
                config.text_model.max_tokens,
            )
            .with_max_tool_rounds(config.tools.max_rounds),
            vision: VisionHandler::new(vision_model, config.vision_model.max_tokens),
            pdf: PdfHandler::new(
                Arc::clone(&text_model),
                collaborators.pdf_extractor,
                config.pdf.max_chars,
                config.text_model.max_tokens,
            ),
            image: ImageHandler::new(
                collaborators.image_generator,
                ImageOptions {
                    width: config.image_generation.width,
                    height: config.image_generation.height,
                    seed: config.image_generation.seed,
                    model: config.image_generation.model.clone(),
                },
            ),
        };

        let router = Router::new(LlmRouteClassifier::new(text_model));
        let store = InMemoryConversationStore::from_config(&config.conversations);

        Self {
            engine: Arc::new(TurnEngine::new(router, handlers, store)),
            auth: Arc::new(auth),
            config: Arc::new(config),
        }
    }
}
