use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Field rule has an empty label: {0}")]
    EmptyLabel(crate::record::Field),

    #[error("Pattern compilation failed: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
