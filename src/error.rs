use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing required fields: {}", .missing_fields.join(", "))]
    Validation { missing_fields: Vec<&'static str> },

    #[error("Not signed in")]
    Unauthorized,

    #[error("Article not found")]
    NotFound,

    #[error("Invalid file: {reason}")]
    InvalidFile { reason: String },

    #[error("Upload failed: {cause}")]
    UploadFailed { cause: String },

    #[error("Article store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn store(err: impl std::fmt::Display) -> Self {
        AppError::StoreUnavailable(err.to_string())
    }

    pub fn upload(err: impl std::fmt::Display) -> Self {
        AppError::UploadFailed {
            cause: err.to_string(),
        }
    }

    /// Short message suitable for the notice line.
    pub fn notice(&self) -> String {
        match self {
            AppError::Validation { missing_fields } => {
                format!("Please fill in: {}", missing_fields.join(", "))
            }
            AppError::Unauthorized => "Sign in to do that".to_string(),
            AppError::NotFound => "Article not found".to_string(),
            AppError::InvalidFile { reason } => reason.clone(),
            AppError::UploadFailed { .. } => "Image upload failed, try again".to_string(),
            AppError::StoreUnavailable(_) | AppError::Http(_) => {
                "Could not reach the news server".to_string()
            }
            AppError::Auth(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
