use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no 'pid' column type found in event data table")]
    MissingPatientIdColumn,
}

pub type Result<T> = std::result::Result<T, ModelError>;
