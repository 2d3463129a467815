//! Stable section identity.

use std::fmt;
use std::sync::Arc;

/// Opaque identity of a section.
///
/// Must be unique among all sections registered with one adapter. Names and
/// numbers live in separate variants so `SectionId::from("1")` never equals
/// `SectionId::from(1u64)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionId {
    Name(Arc<str>),
    Number(u64),
}

impl SectionId {
    pub fn name(name: impl Into<Arc<str>>) -> Self {
        SectionId::Name(name.into())
    }

    pub fn number(number: u64) -> Self {
        SectionId::Number(number)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionId::Name(name) => write!(f, "{name:?}"),
            SectionId::Number(number) => write!(f, "#{number}"),
        }
    }
}

impl From<&str> for SectionId {
    fn from(name: &str) -> Self {
        SectionId::Name(Arc::from(name))
    }
}

impl From<String> for SectionId {
    fn from(name: String) -> Self {
        SectionId::Name(Arc::from(name))
    }
}

impl From<u64> for SectionId {
    fn from(number: u64) -> Self {
        SectionId::Number(number)
    }
}
