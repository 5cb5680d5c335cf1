pub type CoreResult<T> = Result<T, CoreError>;

type SourceError = Box<dyn std::error::Error + Send + Sync>;

#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("could not fingerprint upload")]
    Fingerprint {
        #[source]
        source: std::io::Error,
    },
    #[error("extraction failed: {context}")]
    Extraction {
        context: String,
        #[source]
        source: Option<SourceError>,
    },
    #[error("generation failed: {context}")]
    Generation {
        context: String,
        #[source]
        source: Option<SourceError>,
    },
    #[error("no element with id {id}")]
    ElementNotFound { id: usize },
    #[error("invalid page configuration: {0}")]
    Configuration(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<std::io::Error> for CoreError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            context: "I/O operation failed".to_string(),
        }
    }
}

impl CoreError {
    pub fn io_with_context(source: std::io::Error, context: impl Into<String>) -> Self {
        Self::Io {
            source,
            context: context.into(),
        }
    }

    pub fn fingerprint(source: std::io::Error) -> Self {
        Self::Fingerprint { source }
    }

    pub fn extraction(context: impl Into<String>) -> Self {
        Self::Extraction {
            context: context.into(),
            source: None,
        }
    }

    pub fn extraction_with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Extraction {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn generation(context: impl Into<String>) -> Self {
        Self::Generation {
            context: context.into(),
            source: None,
        }
    }

    pub fn generation_with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generation {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn element_not_found(id: usize) -> Self {
        Self::ElementNotFound { id }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::CoreError;

    #[test]
    fn element_not_found_reports_offending_id() {
        let err = CoreError::element_not_found(42);
        assert!(matches!(err, CoreError::ElementNotFound { id: 42 }));
        assert_eq!(err.to_string(), "no element with id 42");
    }

    #[test]
    fn extraction_error_wraps_collaborator_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "quota exceeded");
        let err = CoreError::extraction_with_source("service rejected job", io);
        assert_eq!(err.to_string(), "extraction failed: service rejected job");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn generation_error_without_source_still_carries_context() {
        let err = CoreError::generation("empty completion");
        assert_eq!(err.to_string(), "generation failed: empty completion");
        assert!(std::error::Error::source(&err).is_none());
    }
}
