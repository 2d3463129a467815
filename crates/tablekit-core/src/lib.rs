//! Section reconciliation for index-based grid render surfaces.
//!
//! Client code describes its screen as an ordered list of [`Section`]s and
//! hides or shows whole sections by identity. [`SectionedAdapter`] keeps the
//! attached subset in sync with a [`RenderSurface`] that only understands
//! integer section and row indexes, and answers the surface's queries
//! through [`SurfaceDataSource`].

mod adapter;
mod config;
mod data_section;
mod data_source;
mod delegate;
mod error;
mod registration;
mod row_size_cache;
mod section;
mod section_id;
mod spacing;
mod surface;
mod view;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

pub use adapter::*;
pub use config::*;
pub use data_section::*;
pub use delegate::*;
pub use error::*;
pub use registration::*;
pub use row_size_cache::*;
pub use section::*;
pub use section_id::*;
pub use spacing::*;
pub use surface::{
    BatchAnimation, BatchUpdates, IndexPath, RenderSurface, RowAnimation, RowPaths,
    SectionIndexes, SurfaceDataSource, SurfaceUpdate,
};
pub use view::*;

pub mod prelude {
    pub use crate::adapter::{AdapterRef, SectionedAdapter};
    pub use crate::config::AdapterConfig;
    pub use crate::data_section::{DataSection, HeaderFooterStyle, SectionContent};
    pub use crate::registration::{Registration, ViewTemplate};
    pub use crate::section::Section;
    pub use crate::section_id::SectionId;
    pub use crate::spacing::SectionSpacing;
    pub use crate::surface::{IndexPath, RenderSurface, SurfaceDataSource};
    pub use crate::view::{ViewDequeue, ViewHandle};
}
