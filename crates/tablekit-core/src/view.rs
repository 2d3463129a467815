//! Opaque view handles exchanged with the render surface.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::surface::IndexPath;

/// A reusable view produced by the render surface.
///
/// The engine never looks inside a view; sections downcast the payload to
/// the concrete type their surface hands out and bind row content to it.
#[derive(Clone)]
pub struct ViewHandle {
    reuse_id: Rc<str>,
    payload: Rc<dyn Any>,
}

impl ViewHandle {
    pub fn new(reuse_id: impl Into<Rc<str>>, payload: Rc<dyn Any>) -> Self {
        Self {
            reuse_id: reuse_id.into(),
            payload,
        }
    }

    pub fn reuse_id(&self) -> &str {
        &self.reuse_id
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Whether both handles refer to the same underlying view.
    pub fn same_view(&self, other: &ViewHandle) -> bool {
        Rc::ptr_eq(&self.payload, &other.payload)
    }
}

impl fmt::Debug for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewHandle")
            .field("reuse_id", &self.reuse_id)
            .finish_non_exhaustive()
    }
}

/// Reuse-pool access the render surface offers while producing views.
pub trait ViewDequeue {
    fn dequeue_row(&self, reuse_id: &str, path: IndexPath) -> ViewHandle;

    fn dequeue_header_footer(&self, reuse_id: &str) -> ViewHandle;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowActionStyle {
    Normal,
    Destructive,
}

/// Contextual swipe action offered for a row.
#[derive(Clone)]
pub struct RowAction {
    pub title: Rc<str>,
    pub style: RowActionStyle,
    pub handler: Rc<dyn Fn(IndexPath)>,
}

impl RowAction {
    pub fn new(
        title: impl Into<Rc<str>>,
        style: RowActionStyle,
        handler: impl Fn(IndexPath) + 'static,
    ) -> Self {
        Self {
            title: title.into(),
            style,
            handler: Rc::new(handler),
        }
    }

    pub fn perform(&self, path: IndexPath) {
        (self.handler)(path);
    }
}

impl fmt::Debug for RowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("title", &self.title)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}
