use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unknown instruction: {0:?}")]
    UnknownInstruction(String),

    #[error("invalid {field}: {input:?} is not a number")]
    InvalidNumber { field: &'static str, input: String },

    #[error("line {line}: {source}")]
    Script {
        line: usize,
        #[source]
        source: Box<Error>,
    },
}
