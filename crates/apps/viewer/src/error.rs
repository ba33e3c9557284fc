use catalog::CatalogError;

use crate::config::ConfigError;

#[derive(Debug)]
pub enum ViewerError {
    Config(ConfigError),
    Catalog(CatalogError),
    InvalidArgument(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for ViewerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewerError::Config(e) => write!(f, "configuration error: {e}"),
            ViewerError::Catalog(e) => write!(f, "{e}"),
            ViewerError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            ViewerError::Io(e) => write!(f, "i/o error: {e}"),
            ViewerError::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::Config(e) => Some(e),
            ViewerError::Catalog(e) => Some(e),
            ViewerError::InvalidArgument(_) => None,
            ViewerError::Io(e) => Some(e),
            ViewerError::Json(e) => Some(e),
        }
    }
}

impl From<ConfigError> for ViewerError {
    fn from(e: ConfigError) -> Self {
        ViewerError::Config(e)
    }
}

impl From<CatalogError> for ViewerError {
    fn from(e: CatalogError) -> Self {
        ViewerError::Catalog(e)
    }
}

impl From<std::io::Error> for ViewerError {
    fn from(e: std::io::Error) -> Self {
        ViewerError::Io(e)
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(e: serde_json::Error) -> Self {
        ViewerError::Json(e)
    }
}
