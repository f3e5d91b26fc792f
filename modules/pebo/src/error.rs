use thiserror::Error;

#[derive(Error, Debug)]
pub enum PeboError {
    #[error("Listener panicked: {0}")]
    ListenerPanicked(String),

    #[error("Listener task was cancelled before it settled")]
    ListenerAborted,

    #[error("Unknown fire strategy: {0}")]
    InvalidStrategy(String),
}

impl From<tokio::task::JoinError> for PeboError {
    fn from(err: tokio::task::JoinError) -> Self {
        if !err.is_panic() {
            return PeboError::ListenerAborted;
        }
        let payload = err.into_panic();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        PeboError::ListenerPanicked(message)
    }
}
