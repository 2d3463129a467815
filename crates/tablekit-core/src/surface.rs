//! Render-surface contract.
//!
//! The render surface is the host grid: it virtualizes rows, animates
//! structural changes and asks its data source for counts, sizes and views
//! whenever it likes. The engine only talks to it through [`RenderSurface`],
//! and it only talks back through [`SurfaceDataSource`].

use std::fmt;
use std::rc::Weak;

use smallvec::SmallVec;

use crate::delegate::ScrollEvent;
use crate::registration::ViewTemplateRegistry;
use crate::view::{RowAction, ViewDequeue, ViewHandle};

/// Position of a row: section index within the attached sections, then row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.row)
    }
}

/// Sorted, duplicate-free section indexes.
pub type SectionIndexes = SmallVec<[usize; 4]>;

/// Sorted, duplicate-free row positions.
pub type RowPaths = SmallVec<[IndexPath; 8]>;

pub(crate) fn sorted_indexes(indexes: impl IntoIterator<Item = usize>) -> SectionIndexes {
    let mut sorted: SectionIndexes = indexes.into_iter().collect();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
}

pub(crate) fn row_paths(section: usize, rows: impl IntoIterator<Item = usize>) -> RowPaths {
    sorted_indexes(rows)
        .into_iter()
        .map(|row| IndexPath::new(section, row))
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RowAnimation {
    #[default]
    None,
    Automatic,
    Fade,
}

impl RowAnimation {
    /// `animated` selects `when_animated`, otherwise no animation.
    pub fn when(animated: bool, when_animated: RowAnimation) -> Self {
        if animated {
            when_animated
        } else {
            RowAnimation::None
        }
    }
}

/// Whether transitions inside a batch may animate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BatchAnimation {
    #[default]
    Enabled,
    /// Used for layout-only passes.
    Suppressed,
}

/// One index-based structural command.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceUpdate {
    InsertSections {
        sections: SectionIndexes,
        animation: RowAnimation,
    },
    DeleteSections {
        sections: SectionIndexes,
        animation: RowAnimation,
    },
    ReloadSections {
        sections: SectionIndexes,
        animation: RowAnimation,
    },
    InsertRows {
        rows: RowPaths,
        animation: RowAnimation,
    },
    ReloadRows {
        rows: RowPaths,
        animation: RowAnimation,
    },
}

/// Commands collected inside one [`RenderSurface::perform_batch`] call.
///
/// Delete indexes refer to the ordering the surface held when the batch
/// began; insert indexes refer to the ordering after the batch.
#[derive(Debug, Default)]
pub struct BatchUpdates {
    updates: Vec<SurfaceUpdate>,
}

impl BatchUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_sections(&mut self, sections: SectionIndexes, animation: RowAnimation) {
        if !sections.is_empty() {
            self.updates.push(SurfaceUpdate::InsertSections {
                sections,
                animation,
            });
        }
    }

    pub fn delete_sections(&mut self, sections: SectionIndexes, animation: RowAnimation) {
        if !sections.is_empty() {
            self.updates.push(SurfaceUpdate::DeleteSections {
                sections,
                animation,
            });
        }
    }

    pub fn reload_sections(&mut self, sections: SectionIndexes, animation: RowAnimation) {
        if !sections.is_empty() {
            self.updates.push(SurfaceUpdate::ReloadSections {
                sections,
                animation,
            });
        }
    }

    pub fn insert_rows(&mut self, rows: RowPaths, animation: RowAnimation) {
        if !rows.is_empty() {
            self.updates
                .push(SurfaceUpdate::InsertRows { rows, animation });
        }
    }

    pub fn reload_rows(&mut self, rows: RowPaths, animation: RowAnimation) {
        if !rows.is_empty() {
            self.updates
                .push(SurfaceUpdate::ReloadRows { rows, animation });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn updates(&self) -> &[SurfaceUpdate] {
        &self.updates
    }

    pub fn into_updates(self) -> Vec<SurfaceUpdate> {
        self.updates
    }
}

/// The host grid the adapter drives.
///
/// Every method is called on the surface's owning thread. Implementations
/// must invoke the `build` closure of [`perform_batch`](Self::perform_batch)
/// exactly once, synchronously, and only consult the data source again after
/// the closure returns.
pub trait RenderSurface: ViewTemplateRegistry + ViewDequeue {
    /// Installs the data source the surface queries for counts, sizes and views.
    fn bind_data_source(&self, source: Weak<dyn SurfaceDataSource>);

    /// Whether the surface is part of a visible hierarchy yet. A surface that
    /// is not live populates itself from the data source once it becomes live.
    fn is_live(&self) -> bool;

    /// Discards cached counts and re-queries everything.
    fn reload_all(&self);

    /// Applies one structural command immediately.
    fn apply(&self, update: SurfaceUpdate);

    /// Groups structural commands into one atomically observed commit.
    fn perform_batch(&self, animation: BatchAnimation, build: &mut dyn FnMut(&mut BatchUpdates));

    /// Clears the visual selection of a row.
    fn deselect_row(&self, path: IndexPath, animated: bool);
}

/// Queries the render surface issues against the adapter.
pub trait SurfaceDataSource {
    fn section_count(&self) -> usize;

    fn row_count(&self, section: usize) -> usize;

    fn row_size(&self, path: IndexPath) -> f32;

    fn estimated_row_size(&self, path: IndexPath) -> f32;

    fn view_for_row(&self, path: IndexPath, views: &dyn ViewDequeue) -> Option<ViewHandle>;

    fn header_view(&self, section: usize, views: &dyn ViewDequeue) -> Option<ViewHandle>;

    fn header_size(&self, section: usize) -> f32;

    fn footer_view(&self, section: usize, views: &dyn ViewDequeue) -> Option<ViewHandle>;

    fn footer_size(&self, section: usize) -> f32;

    fn trailing_actions(&self, path: IndexPath) -> Vec<RowAction>;

    fn can_move_row(&self, path: IndexPath) -> bool;

    fn move_row(&self, from: IndexPath, to: IndexPath);

    fn did_select_row(&self, path: IndexPath);

    /// A row became visible with its final rendered main-axis size.
    fn will_display_row(&self, view: &ViewHandle, path: IndexPath, rendered_size: f32);

    fn scroll_event(&self, event: &mut ScrollEvent);
}
