use thiserror::Error;

use super::locations::Location;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Illegal character: '{character}' in {location}")]
    IllegalCharacter { character: char, location: Location },
    #[error("Invalid integer literal '{literal}' in {location}")]
    InvalidIntegerLiteral { literal: String, location: Location },
}

impl LexError {
    pub fn location(&self) -> Location {
        match self {
            Self::IllegalCharacter { location, .. } => *location,
            Self::InvalidIntegerLiteral { location, .. } => *location,
        }
    }
}
