//! Secondary delegate the client can layer on top of the adapter.

use crate::surface::IndexPath;
use crate::view::{ViewDequeue, ViewHandle};

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScrollPoint {
    pub x: f32,
    pub y: f32,
}

impl ScrollPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Scroll and drag notifications, forwarded untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollEvent {
    DidScroll {
        offset: ScrollPoint,
    },
    WillBeginDragging,
    /// `target_offset` may be adjusted by the delegate.
    WillEndDragging {
        velocity: ScrollPoint,
        target_offset: ScrollPoint,
    },
    DidEndDragging {
        will_decelerate: bool,
    },
    WillBeginDecelerating,
    DidEndDecelerating,
}

/// Optional client hooks consulted before the adapter's own answers.
///
/// Size and view queries returning `Some` take precedence over what the
/// attached section would answer.
pub trait SurfaceDelegate {
    fn row_size(&self, _path: IndexPath) -> Option<f32> {
        None
    }

    fn estimated_row_size(&self, _path: IndexPath) -> Option<f32> {
        None
    }

    fn header_size(&self, _section: usize) -> Option<f32> {
        None
    }

    fn footer_size(&self, _section: usize) -> Option<f32> {
        None
    }

    fn header_view(&self, _section: usize, _views: &dyn ViewDequeue) -> Option<ViewHandle> {
        None
    }

    fn footer_view(&self, _section: usize, _views: &dyn ViewDequeue) -> Option<ViewHandle> {
        None
    }

    /// Return `true` to take over selection handling for this row.
    fn did_select_row(&self, _path: IndexPath) -> bool {
        false
    }

    fn will_display_row(&self, _view: &ViewHandle, _path: IndexPath) {}

    fn scroll_event(&self, _event: &mut ScrollEvent) {}
}
