use super::*;
use std::cell::{Cell, RefCell};

use crate::adapter::SectionedAdapter;
use crate::config::AdapterConfig;
use crate::delegate::ScrollPoint;
use crate::section_id::SectionId;
use crate::test_support::{adapter_for, Call, FakeSection, FakeSurface};

#[derive(Default)]
struct RecordingDelegate {
    claim_selection: Cell<bool>,
    header_override: Cell<Option<f32>>,
    displayed: RefCell<Vec<IndexPath>>,
    selected: RefCell<Vec<IndexPath>>,
    scrolls: Cell<usize>,
}

impl SurfaceDelegate for RecordingDelegate {
    fn header_size(&self, _section: usize) -> Option<f32> {
        self.header_override.get()
    }

    fn did_select_row(&self, path: IndexPath) -> bool {
        self.selected.borrow_mut().push(path);
        self.claim_selection.get()
    }

    fn will_display_row(&self, _view: &ViewHandle, path: IndexPath) {
        self.displayed.borrow_mut().push(path);
    }

    fn scroll_event(&self, event: &mut ScrollEvent) {
        self.scrolls.set(self.scrolls.get() + 1);
        if let ScrollEvent::WillEndDragging { target_offset, .. } = event {
            target_offset.y = 0.0;
        }
    }
}

fn two_sections() -> (Rc<FakeSurface>, SectionedAdapter, Rc<FakeSection>, Rc<FakeSection>) {
    let surface = FakeSurface::live();
    let adapter = adapter_for(&surface);
    let a = FakeSection::new("a", 2);
    let b = FakeSection::new("b", 5);
    adapter.add_section(a.clone());
    adapter.add_section(b.clone());
    surface.clear();
    (surface, adapter, a, b)
}

#[test]
fn queries_resolve_against_current_attachment() {
    let (surface, _adapter, a, _b) = two_sections();
    let source = surface.source();
    assert_eq!(source.section_count(), 2);
    assert_eq!(source.row_count(0), 2);
    assert_eq!(source.row_count(1), 5);

    a.set_attached(false);

    assert_eq!(source.section_count(), 1);
    assert_eq!(source.row_count(0), 5);
    let view = source
        .view_for_row(IndexPath::new(0, 4), &*surface)
        .expect("row view");
    assert_eq!(view.reuse_id(), "FakeCell");
    assert_eq!(view.downcast_ref::<IndexPath>(), Some(&IndexPath::new(0, 4)));
}

#[test]
fn out_of_range_queries_answer_neutrally() {
    let (surface, _adapter, _a, _b) = two_sections();
    let source = surface.source();
    let missing = IndexPath::new(7, 0);

    assert_eq!(source.row_count(7), 0);
    assert_eq!(source.row_size(missing), AUTOMATIC_DIMENSION);
    assert_eq!(source.header_size(7), SectionSpacing::INVISIBLE.value());
    assert_eq!(source.footer_size(7), SectionSpacing::INVISIBLE.value());
    assert!(source.view_for_row(missing, &*surface).is_none());
    assert!(source.header_view(7, &*surface).is_none());
    assert!(source.trailing_actions(missing).is_empty());
    assert!(!source.can_move_row(missing));
    assert!(source
        .view_for_row(IndexPath::new(0, 2), &*surface)
        .is_none());
}

#[test]
fn sizes_come_from_the_section() {
    let (surface, _adapter, _a, b) = two_sections();
    b.set_header(SectionSpacing::HEADER);
    let source = surface.source();

    assert_eq!(source.row_size(IndexPath::new(1, 0)), 44.0);
    assert_eq!(source.header_size(0), f32::MIN_POSITIVE);
    assert_eq!(source.header_size(1), 16.0);
}

#[test]
fn estimates_fall_back_until_a_row_is_displayed() {
    let surface = FakeSurface::live();
    let adapter = SectionedAdapter::with_config(
        surface.clone(),
        AdapterConfig::new().with_estimated_row_size(80.0),
    );
    adapter.add_section(FakeSection::new("a", 3));
    let source = surface.source();
    let path = IndexPath::new(0, 1);

    assert_eq!(source.estimated_row_size(path), 80.0);

    let view = surface.dequeue_row("FakeCell", path);
    source.will_display_row(&view, path, 61.5);
    assert_eq!(source.estimated_row_size(path), 61.5);
    assert_eq!(source.estimated_row_size(IndexPath::new(0, 2)), 80.0);

    source.will_display_row(&view, path, -3.0);
    assert_eq!(adapter.cached_row_size(path), Some(61.5));

    adapter.set_estimated_row_size(120.0);
    assert_eq!(source.estimated_row_size(IndexPath::new(0, 2)), 120.0);
}

#[test]
fn cached_sizes_survive_reloads_and_reordering() {
    let (surface, adapter, a, _b) = two_sections();
    let source = surface.source();
    let path = IndexPath::new(1, 0);
    let view = surface.dequeue_row("FakeCell", path);
    source.will_display_row(&view, path, 52.0);

    adapter.reload_section(&SectionId::from("b"), false);
    a.set_attached(false);

    assert_eq!(adapter.cached_row_size(path), Some(52.0));
}

#[test]
fn selection_deselects_then_reaches_the_section() {
    let (surface, _adapter, _a, b) = two_sections();
    let path = IndexPath::new(1, 3);

    surface.source().did_select_row(path);

    assert_eq!(surface.commands(), vec![Call::Deselect(path)]);
    assert_eq!(*b.selected.borrow(), vec![path]);
}

#[test]
fn delegate_may_claim_selection() {
    let (surface, adapter, _a, b) = two_sections();
    let recording = Rc::new(RecordingDelegate::default());
    let delegate: Rc<dyn SurfaceDelegate> = recording.clone();
    adapter.set_forwarded_delegate(&delegate);
    let path = IndexPath::new(1, 0);

    surface.source().did_select_row(path);
    assert_eq!(surface.commands(), vec![Call::Deselect(path)]);
    assert_eq!(b.selected.borrow().len(), 1);

    surface.clear();
    recording.claim_selection.set(true);
    surface.source().did_select_row(path);
    assert!(surface.commands().is_empty());
    assert_eq!(b.selected.borrow().len(), 1);
    assert_eq!(recording.selected.borrow().len(), 2);
}

#[test]
fn delegate_sees_display_and_scroll_callbacks() {
    let (surface, adapter, _a, _b) = two_sections();
    let recording = Rc::new(RecordingDelegate::default());
    recording.header_override.set(Some(30.0));
    let delegate: Rc<dyn SurfaceDelegate> = recording.clone();
    adapter.set_forwarded_delegate(&delegate);
    let source = surface.source();

    let path = IndexPath::new(0, 0);
    let view = surface.dequeue_row("FakeCell", path);
    source.will_display_row(&view, path, 40.0);
    assert_eq!(*recording.displayed.borrow(), vec![path]);
    assert_eq!(adapter.cached_row_size(path), Some(40.0));
    assert_eq!(source.header_size(0), 30.0);

    let mut event = ScrollEvent::WillEndDragging {
        velocity: ScrollPoint::new(0.0, 2.0),
        target_offset: ScrollPoint::new(0.0, 900.0),
    };
    source.scroll_event(&mut event);
    assert_eq!(
        event,
        ScrollEvent::WillEndDragging {
            velocity: ScrollPoint::new(0.0, 2.0),
            target_offset: ScrollPoint::new(0.0, 0.0),
        }
    );

    adapter.clear_forwarded_delegate();
    source.scroll_event(&mut ScrollEvent::DidEndDecelerating);
    assert_eq!(recording.scrolls.get(), 1);
    assert_eq!(source.header_size(0), SectionSpacing::INVISIBLE.value());
}

#[test]
fn delegate_is_held_weakly() {
    let (surface, adapter, _a, _b) = two_sections();
    let delegate: Rc<dyn SurfaceDelegate> = Rc::new(RecordingDelegate::default());
    adapter.set_forwarded_delegate(&delegate);
    drop(delegate);

    surface.source().did_select_row(IndexPath::new(0, 0));
    assert_eq!(
        surface.commands(),
        vec![Call::Deselect(IndexPath::new(0, 0))]
    );
}

#[test]
fn moves_stay_within_one_section() {
    let (surface, _adapter, a, b) = two_sections();
    a.set_movable(true);
    let source = surface.source();

    assert!(source.can_move_row(IndexPath::new(0, 1)));
    assert!(!source.can_move_row(IndexPath::new(1, 1)));

    source.move_row(IndexPath::new(0, 1), IndexPath::new(0, 0));
    source.move_row(IndexPath::new(0, 0), IndexPath::new(1, 2));

    assert_eq!(*a.moves.borrow(), vec![(1, 0)]);
    assert!(b.moves.borrow().is_empty());
}
