//! Testing utilities for tablekit
//!
//! [`RecordingSurface`] behaves like a strict host grid: it caches section and
//! row counts, validates every structural command against the data source at
//! commit time and panics on the first inconsistency, just as a real grid
//! would abort. [`ListSection`] is a ready-made string list section.

pub mod assertions;
pub mod list_section;
pub mod surface;

pub use list_section::*;
pub use surface::*;

pub mod prelude {
    pub use crate::assertions;
    pub use crate::list_section::{list_section, ListContent, ListSection};
    pub use crate::surface::{RecordedView, RecordingSurface, SurfaceCall};
}
