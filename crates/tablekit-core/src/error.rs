use std::fmt;

use crate::section_id::SectionId;

/// Integration errors raised by [`SectionedAdapter`](crate::SectionedAdapter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// A section with this id is already registered.
    DuplicateSectionId {
        id: SectionId,
        existing: &'static str,
    },
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterError::DuplicateSectionId { id, existing } => {
                write!(f, "id {id} already exists for section {existing}")
            }
        }
    }
}

impl std::error::Error for AdapterError {}
