/// Broad failure category, used by callers that only need to branch on it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// The request never produced a response.
    Transport,
    /// The service answered with a non-success status.
    Status,
    /// The body could not be decoded.
    Decode,
    /// The body decoded but does not have the expected shape.
    Malformed,
}

/// Error type for feed transport and response handling.
#[derive(Debug)]
pub struct SourceError {
    pub kind: SourceErrorKind,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl SourceError {
    pub fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        kind: SourceErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Malformed, message)
    }
}

#[cfg(test)]
mod tests {
    use super::{SourceError, SourceErrorKind};
    use std::error::Error as _;

    #[test]
    fn source_chain_is_exposed() {
        let io = std::io::Error::other("reset");
        let err = SourceError::with_source(SourceErrorKind::Transport, "request failed", io);
        assert_eq!(err.to_string(), "request failed");
        assert_eq!(err.source().map(|e| e.to_string()).as_deref(), Some("reset"));
        assert!(SourceError::malformed("x").source().is_none());
    }
}
