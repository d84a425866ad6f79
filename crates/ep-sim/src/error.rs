use ep_community::CommunityError;
use ep_core::EpiError;
use ep_disease::DiseaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] EpiError),

    #[error("community error: {0}")]
    Community(#[from] CommunityError),

    #[error("disease error: {0}")]
    Disease(#[from] DiseaseError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

pub type SimResult<T> = Result<T, SimError>;
