use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Syntax error at {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Variable capacity exceeded: requested {requested}, limit is {limit}")]
    CapacityExceeded { requested: usize, limit: usize },
}

impl Error {
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    pub fn invalid<E: std::fmt::Display>(e: E) -> Self {
        Self::InvalidArgument(e.to_string())
    }
}
