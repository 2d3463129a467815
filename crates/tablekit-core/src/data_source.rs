//! Render-surface shim.
//!
//! Every query resolves its section index against the attached list as it
//! is *now*; nothing is captured across calls. A secondary delegate, when
//! installed, is asked first for sizes and views and receives every other
//! callback unchanged.

use std::rc::Rc;

use crate::adapter::AdapterShared;
use crate::delegate::{ScrollEvent, SurfaceDelegate};
use crate::section::Section;
use crate::spacing::{SectionSpacing, AUTOMATIC_DIMENSION};
use crate::surface::{IndexPath, SurfaceDataSource};
use crate::view::{RowAction, ViewDequeue, ViewHandle};

impl AdapterShared {
    /// Section at `index`, cloned out so no borrow is held while it runs.
    fn section_at(&self, index: usize) -> Option<Rc<dyn Section>> {
        self.state.borrow().attached_section(index).cloned()
    }

    fn delegate(&self) -> Option<Rc<dyn SurfaceDelegate>> {
        self.forwarded.borrow().as_ref()?.upgrade()
    }
}

impl SurfaceDataSource for AdapterShared {
    fn section_count(&self) -> usize {
        self.state.borrow().attached.len()
    }

    fn row_count(&self, section: usize) -> usize {
        self.section_at(section)
            .map_or(0, |section| section.item_count())
    }

    fn row_size(&self, path: IndexPath) -> f32 {
        if let Some(size) = self.delegate().and_then(|d| d.row_size(path)) {
            return size;
        }
        self.section_at(path.section)
            .map_or(AUTOMATIC_DIMENSION, |section| {
                section.row_size(path.row).value()
            })
    }

    fn estimated_row_size(&self, path: IndexPath) -> f32 {
        if let Some(size) = self.delegate().and_then(|d| d.estimated_row_size(path)) {
            return size;
        }
        let state = self.state.borrow();
        state
            .row_sizes
            .estimate(path, state.config.estimated_row_size)
    }

    fn view_for_row(&self, path: IndexPath, views: &dyn ViewDequeue) -> Option<ViewHandle> {
        self.section_at(path.section)?.view_for_row(path, views)
    }

    fn header_view(&self, section: usize, views: &dyn ViewDequeue) -> Option<ViewHandle> {
        if let Some(view) = self.delegate().and_then(|d| d.header_view(section, views)) {
            return Some(view);
        }
        self.section_at(section)?.header_view(views)
    }

    fn header_size(&self, section: usize) -> f32 {
        if let Some(size) = self.delegate().and_then(|d| d.header_size(section)) {
            return size;
        }
        self.section_at(section)
            .map_or(SectionSpacing::INVISIBLE, |section| section.header_spacing())
            .value()
    }

    fn footer_view(&self, section: usize, views: &dyn ViewDequeue) -> Option<ViewHandle> {
        if let Some(view) = self.delegate().and_then(|d| d.footer_view(section, views)) {
            return Some(view);
        }
        self.section_at(section)?.footer_view(views)
    }

    fn footer_size(&self, section: usize) -> f32 {
        if let Some(size) = self.delegate().and_then(|d| d.footer_size(section)) {
            return size;
        }
        self.section_at(section)
            .map_or(SectionSpacing::INVISIBLE, |section| section.footer_spacing())
            .value()
    }

    fn trailing_actions(&self, path: IndexPath) -> Vec<RowAction> {
        self.section_at(path.section)
            .map_or_else(Vec::new, |section| section.row_actions(path))
    }

    fn can_move_row(&self, path: IndexPath) -> bool {
        self.section_at(path.section)
            .is_some_and(|section| section.can_move_row(path.row))
    }

    fn move_row(&self, from: IndexPath, to: IndexPath) {
        if from.section != to.section {
            log::warn!("dropping cross-section move {from} -> {to}");
            return;
        }
        if let Some(section) = self.section_at(from.section) {
            section.move_row(from.row, to.row);
        }
    }

    fn did_select_row(&self, path: IndexPath) {
        if self.delegate().is_some_and(|d| d.did_select_row(path)) {
            return;
        }
        self.surface.deselect_row(path, true);
        if let Some(section) = self.section_at(path.section) {
            section.did_select_row(path);
        }
    }

    fn will_display_row(&self, view: &ViewHandle, path: IndexPath, rendered_size: f32) {
        self.state
            .borrow_mut()
            .row_sizes
            .record(path, rendered_size);
        if let Some(delegate) = self.delegate() {
            delegate.will_display_row(view, path);
        }
    }

    fn scroll_event(&self, event: &mut ScrollEvent) {
        if let Some(delegate) = self.delegate() {
            delegate.scroll_event(event);
        }
    }
}

#[cfg(test)]
#[path = "tests/data_source_tests.rs"]
mod tests;
