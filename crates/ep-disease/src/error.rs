use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiseaseError {
    #[error("disease parameter `{0}` was never set")]
    MissingParameter(&'static str),

    #[error("disease parameter `{name}` has min {min} greater than max {max}")]
    InvalidRange {
        name: &'static str,
        min:  f64,
        max:  f64,
    },

    #[error("disease parameter `{name}` = {value} is not a probability in [0, 1]")]
    InvalidProbability {
        name:  &'static str,
        value: f64,
    },
}

pub type DiseaseResult<T> = Result<T, DiseaseError>;
