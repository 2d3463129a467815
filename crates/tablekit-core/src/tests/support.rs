//! In-crate fakes for unit tests: a surface that checks section counts the
//! way a host grid does, and a bare [`Section`] with a fixed row count.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::adapter::{AdapterRef, SectionedAdapter};
use crate::registration::{Registration, ResolvedSource, TemplateKind, ViewTemplateRegistry};
use crate::section::{Section, SectionLink};
use crate::section_id::SectionId;
use crate::spacing::SectionSpacing;
use crate::surface::{
    BatchAnimation, BatchUpdates, IndexPath, RenderSurface, SurfaceDataSource, SurfaceUpdate,
};
use crate::view::{ViewDequeue, ViewHandle};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Register(TemplateKind, String, ResolvedSource),
    ReloadAll,
    Apply(SurfaceUpdate),
    Batch(BatchAnimation, Vec<SurfaceUpdate>),
    Deselect(IndexPath),
}

pub(crate) struct FakeSurface {
    live: Cell<bool>,
    source: RefCell<Option<Weak<dyn SurfaceDataSource>>>,
    shown_sections: Cell<usize>,
    calls: RefCell<Vec<Call>>,
}

impl FakeSurface {
    pub(crate) fn live() -> Rc<Self> {
        Rc::new(Self {
            live: Cell::new(true),
            source: RefCell::new(None),
            shown_sections: Cell::new(0),
            calls: RefCell::new(Vec::new()),
        })
    }

    pub(crate) fn offscreen() -> Rc<Self> {
        let surface = Self::live();
        surface.live.set(false);
        surface
    }

    /// Joins the visible hierarchy and populates from the data source.
    pub(crate) fn go_live(&self) {
        self.live.set(true);
        self.shown_sections.set(self.source().section_count());
    }

    pub(crate) fn source(&self) -> Rc<dyn SurfaceDataSource> {
        self.source
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
            .expect("data source bound")
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Calls other than template registration.
    pub(crate) fn commands(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| !matches!(call, Call::Register(..)))
            .cloned()
            .collect()
    }

    pub(crate) fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub(crate) fn shown_sections(&self) -> usize {
        self.shown_sections.get()
    }

    fn commit(&self, updates: &[SurfaceUpdate]) {
        if !self.live.get() {
            return;
        }
        let mut count = self.shown_sections.get();
        for update in updates {
            match update {
                SurfaceUpdate::DeleteSections { sections, .. } => {
                    for &index in sections {
                        assert!(
                            index < self.shown_sections.get(),
                            "delete of unknown section {index}"
                        );
                    }
                    count -= sections.len();
                }
                SurfaceUpdate::InsertSections { sections, .. } => count += sections.len(),
                _ => {}
            }
        }
        let reported = self.source().section_count();
        assert_eq!(
            count, reported,
            "invalid update: expected {count} sections after commit, data source reports {reported}"
        );
        self.shown_sections.set(count);
    }
}

impl ViewTemplateRegistry for FakeSurface {
    fn register(&self, kind: TemplateKind, reuse_id: &str, source: &ResolvedSource) {
        self.calls
            .borrow_mut()
            .push(Call::Register(kind, reuse_id.to_owned(), source.clone()));
    }
}

impl ViewDequeue for FakeSurface {
    fn dequeue_row(&self, reuse_id: &str, path: IndexPath) -> ViewHandle {
        ViewHandle::new(reuse_id, Rc::new(path))
    }

    fn dequeue_header_footer(&self, reuse_id: &str) -> ViewHandle {
        ViewHandle::new(reuse_id, Rc::new(()))
    }
}

impl RenderSurface for FakeSurface {
    fn bind_data_source(&self, source: Weak<dyn SurfaceDataSource>) {
        *self.source.borrow_mut() = Some(source);
    }

    fn is_live(&self) -> bool {
        self.live.get()
    }

    fn reload_all(&self) {
        self.calls.borrow_mut().push(Call::ReloadAll);
        if self.live.get() {
            self.shown_sections.set(self.source().section_count());
        }
    }

    fn apply(&self, update: SurfaceUpdate) {
        self.commit(std::slice::from_ref(&update));
        self.calls.borrow_mut().push(Call::Apply(update));
    }

    fn perform_batch(&self, animation: BatchAnimation, build: &mut dyn FnMut(&mut BatchUpdates)) {
        let mut batch = BatchUpdates::new();
        build(&mut batch);
        let updates = batch.into_updates();
        self.commit(&updates);
        self.calls
            .borrow_mut()
            .push(Call::Batch(animation, updates));
    }

    fn deselect_row(&self, path: IndexPath, _animated: bool) {
        self.calls.borrow_mut().push(Call::Deselect(path));
    }
}

pub(crate) fn adapter_for(surface: &Rc<FakeSurface>) -> SectionedAdapter {
    SectionedAdapter::new(surface.clone())
}

/// Section with a fixed row count that records what the surface asked of it.
pub(crate) struct FakeSection {
    id: SectionId,
    rows: usize,
    link: SectionLink,
    registrations: Vec<Registration>,
    header: Cell<SectionSpacing>,
    movable: Cell<bool>,
    pub(crate) selected: RefCell<Vec<IndexPath>>,
    pub(crate) moves: RefCell<Vec<(usize, usize)>>,
}

impl FakeSection {
    pub(crate) fn new(id: &str, rows: usize) -> Rc<Self> {
        Self::build(id, rows, true, Vec::new())
    }

    pub(crate) fn detached(id: &str, rows: usize) -> Rc<Self> {
        Self::build(id, rows, false, Vec::new())
    }

    pub(crate) fn with_registrations(id: &str, registrations: Vec<Registration>) -> Rc<Self> {
        Self::build(id, 1, true, registrations)
    }

    fn build(id: &str, rows: usize, attached: bool, registrations: Vec<Registration>) -> Rc<Self> {
        Rc::new(Self {
            id: SectionId::from(id),
            rows,
            link: SectionLink::new(attached),
            registrations,
            header: Cell::new(SectionSpacing::INVISIBLE),
            movable: Cell::new(false),
            selected: RefCell::new(Vec::new()),
            moves: RefCell::new(Vec::new()),
        })
    }

    pub(crate) fn set_header(&self, spacing: SectionSpacing) {
        self.header.set(spacing);
    }

    pub(crate) fn set_movable(&self, movable: bool) {
        self.movable.set(movable);
    }
}

impl Section for FakeSection {
    fn id(&self) -> SectionId {
        self.id.clone()
    }

    fn item_count(&self) -> usize {
        self.rows
    }

    fn registrations(&self) -> Vec<Registration> {
        self.registrations.clone()
    }

    fn view_for_row(&self, path: IndexPath, views: &dyn ViewDequeue) -> Option<ViewHandle> {
        (path.row < self.rows).then(|| views.dequeue_row("FakeCell", path))
    }

    fn row_size(&self, _row: usize) -> SectionSpacing {
        SectionSpacing::custom(44.0)
    }

    fn can_move_row(&self, _row: usize) -> bool {
        self.movable.get()
    }

    fn move_row(&self, from: usize, to: usize) {
        self.moves.borrow_mut().push((from, to));
    }

    fn header_spacing(&self) -> SectionSpacing {
        self.header.get()
    }

    fn did_select_row(&self, path: IndexPath) {
        self.selected.borrow_mut().push(path);
    }

    fn is_attached(&self) -> bool {
        self.link.is_attached()
    }

    fn update_attached(&self, attached: bool, notify: bool) {
        self.link.update_attached(|| self.id.clone(), attached, notify);
    }

    fn set_adapter(&self, adapter: AdapterRef) {
        self.link.set_adapter(adapter);
    }

    fn adapter(&self) -> Option<SectionedAdapter> {
        self.link.adapter()
    }
}
