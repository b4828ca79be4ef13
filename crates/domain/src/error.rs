/// Shared error type used across all makebridge crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    /// The automation platform answered, but not with what we asked for.
    /// The message is already human-readable and safe to hand to clients.
    #[error("{0}")]
    Platform(String),

    #[error("auth: {0}")]
    Auth(String),

    #[error("config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_error_displays_message_verbatim() {
        let err = Error::Platform("failed to fetch scenarios: 404 Not Found".into());
        assert_eq!(err.to_string(), "failed to fetch scenarios: 404 Not Found");
    }

    #[test]
    fn json_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse.into();
        assert!(err.to_string().starts_with("JSON: "));
    }
}
