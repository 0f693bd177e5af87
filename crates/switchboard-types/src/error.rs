use thiserror::Error;

/// Errors related to signup, login, and bearer-token verification.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("password hashing error: {0}")]
    Hashing(String),

    #[error("token error: {0}")]
    Token(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors from repository operations (used by trait definitions in switchboard-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the outbound image-generation service.
#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors from PDF text extraction (whole-document failures only).
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("empty PDF payload")]
    Empty,

    #[error("{0}")]
    Parse(String),

    #[error("extraction task failed: {0}")]
    Task(String),
}

/// Errors from chat tools (web search, encyclopedia lookup).
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error("invalid arguments for '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("tool '{tool}' failed: {message}")]
    Execution { tool: String, message: String },
}

/// Errors that fail a whole conversation turn.
///
/// Handler-level failures never reach this type; they become degraded
/// replies inside the conversation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("conversation store error: {0}")]
    Store(#[from] RepositoryError),

    #[error("thread '{0}' not found")]
    ThreadNotFound(String),
}
