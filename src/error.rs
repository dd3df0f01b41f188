use thiserror::Error;

use crate::engine::InvertError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("input {input} contains no values")]
    EmptyInput { input: String },

    #[error("{input}:{line}: malformed record {content:?}")]
    MalformedRecord {
        input: String,
        line: usize,
        content: String,
    },

    #[error("I/O error on {input}: {source}")]
    Io {
        input: String,
        #[source]
        source: std::io::Error,
    },

    #[error("numeric failure: {0}")]
    Numeric(#[from] InvertError),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub fn io(input: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            input: input.into(),
            source,
        }
    }

    /// Process exit status for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Config(_) => 2,
            Error::EmptyInput { .. } => 3,
            Error::MalformedRecord { .. } => 4,
            Error::Io { .. } => 5,
            Error::Numeric(_) => 6,
        }
    }
}
