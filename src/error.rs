//! Error types for vyukov-queues.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueueError>;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("capability not satisfied: {message}")]
    CapabilityMismatch { message: String },

    #[error("test task panicked: {message}")]
    TaskPanic { message: String },
}

impl QueueError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }

    pub fn capability(message: impl Into<String>) -> Self {
        Self::CapabilityMismatch { message: message.into() }
    }

    pub fn task_panic(message: impl Into<String>) -> Self {
        Self::TaskPanic { message: message.into() }
    }
}
