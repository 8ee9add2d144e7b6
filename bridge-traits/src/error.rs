use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// The host refused the operation (e.g. autoplay policy, CSP).
    #[error("Host rejected operation: {0}")]
    Rejected(String),

    /// The underlying host resource has already been closed or released.
    #[error("Host resource closed: {0}")]
    Closed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Returns `true` if the host explicitly refused the operation.
    pub fn is_rejection(&self) -> bool {
        matches!(self, BridgeError::Rejected(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
