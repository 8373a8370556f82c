use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Entry is missing a field. Path: {0}")]
    MissingField(String),
    #[error("Entry field has an unexpected shape. Path: {0}")]
    UnexpectedShape(String),

    #[error("Storefront row {0} needs a name and a locale code.")]
    StorefrontRow(usize),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Csv Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
