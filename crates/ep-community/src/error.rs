use ep_core::{PersonId, PlaceId, PlaceKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommunityError {
    #[error("community has no {0} place")]
    MissingPlaces(PlaceKind),

    #[error("place {0} does not exist")]
    UnknownPlace(PlaceId),

    #[error("person {0} does not exist")]
    UnknownPerson(PersonId),

    #[error("place {place} cannot serve as {role}")]
    WrongPlaceKind {
        place: PlaceId,
        role:  PlaceKind,
    },

    #[error("community has no persons")]
    EmptyPopulation,

    #[error("population profile error: {0}")]
    Profile(String),
}

pub type CommunityResult<T> = Result<T, CommunityError>;
