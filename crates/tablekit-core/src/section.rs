//! Section contract consumed by the adapter.

use std::any::type_name;
use std::cell::{Cell, RefCell};

use crate::adapter::{AdapterRef, SectionedAdapter};
use crate::registration::Registration;
use crate::section_id::SectionId;
use crate::spacing::SectionSpacing;
use crate::surface::IndexPath;
use crate::view::{RowAction, ViewDequeue, ViewHandle};

/// A logical, independently attachable group of rows with optional header
/// and footer.
///
/// Sections are shared as `Rc<dyn Section>` and use interior mutability; all
/// calls happen on the render surface's thread. Implementations hold the
/// adapter only through the non-owning [`AdapterRef`] handed to
/// [`set_adapter`](Section::set_adapter).
pub trait Section {
    fn id(&self) -> SectionId;

    /// Current number of rows. Read on demand, never cached by the adapter.
    fn item_count(&self) -> usize;

    /// Templates to register once when the section is added.
    fn registrations(&self) -> Vec<Registration>;

    /// View for a row, or `None` if the row does not exist.
    fn view_for_row(&self, path: IndexPath, views: &dyn ViewDequeue) -> Option<ViewHandle>;

    fn row_size(&self, _row: usize) -> SectionSpacing {
        SectionSpacing::AUTO
    }

    fn row_actions(&self, _path: IndexPath) -> Vec<RowAction> {
        Vec::new()
    }

    fn can_move_row(&self, _row: usize) -> bool {
        false
    }

    /// Moves a row within this section.
    fn move_row(&self, _from: usize, _to: usize) {}

    fn header_view(&self, _views: &dyn ViewDequeue) -> Option<ViewHandle> {
        None
    }

    fn header_spacing(&self) -> SectionSpacing {
        SectionSpacing::INVISIBLE
    }

    fn footer_view(&self, _views: &dyn ViewDequeue) -> Option<ViewHandle> {
        None
    }

    fn footer_spacing(&self) -> SectionSpacing {
        SectionSpacing::INVISIBLE
    }

    fn did_select_row(&self, _path: IndexPath) {}

    fn is_attached(&self) -> bool;

    /// Flips the attachment flag. With `notify`, a changed flag is reported
    /// to the adapter exactly once; without it the caller owns reconciliation.
    fn update_attached(&self, attached: bool, notify: bool);

    fn set_attached(&self, attached: bool) {
        self.update_attached(attached, true);
    }

    fn set_adapter(&self, adapter: AdapterRef);

    fn adapter(&self) -> Option<SectionedAdapter>;

    /// Type name used in diagnostics.
    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// Attachment flag plus adapter back-reference, shared by section
/// implementations.
#[derive(Debug)]
pub struct SectionLink {
    attached: Cell<bool>,
    adapter: RefCell<AdapterRef>,
}

impl Default for SectionLink {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SectionLink {
    pub fn new(attached: bool) -> Self {
        Self {
            attached: Cell::new(attached),
            adapter: RefCell::new(AdapterRef::default()),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    /// Stores the flag and, when it changed and `notify` is set, asks the
    /// adapter to attach or detach `id`.
    pub fn update_attached(&self, id: impl FnOnce() -> SectionId, attached: bool, notify: bool) {
        if self.attached.replace(attached) == attached {
            return;
        }
        if !notify {
            return;
        }
        let Some(adapter) = self.adapter() else {
            return;
        };
        let id = id();
        if attached {
            adapter.notify_attach(&id);
        } else {
            adapter.notify_detach(&id);
        }
    }

    pub fn set_adapter(&self, adapter: AdapterRef) {
        *self.adapter.borrow_mut() = adapter;
    }

    pub fn adapter(&self) -> Option<SectionedAdapter> {
        self.adapter.borrow().upgrade()
    }
}
