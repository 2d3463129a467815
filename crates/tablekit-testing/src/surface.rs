//! Recording render surface.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tablekit_core::{
    BatchAnimation, BatchUpdates, IndexPath, RenderSurface, ResolvedSource, ScrollEvent,
    SurfaceDataSource, SurfaceUpdate, TemplateKind, ViewDequeue, ViewHandle,
    ViewTemplateRegistry,
};

/// Everything the adapter asked the surface to do, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    Register {
        kind: TemplateKind,
        reuse_id: String,
        source: ResolvedSource,
    },
    ReloadAll,
    Apply(SurfaceUpdate),
    Batch {
        animation: BatchAnimation,
        updates: Vec<SurfaceUpdate>,
    },
    Deselect {
        path: IndexPath,
        animated: bool,
    },
}

/// View payload handed out by [`RecordingSurface`]. Sections bind text to it.
#[derive(Debug)]
pub struct RecordedView {
    pub reuse_id: String,
    pub path: Option<IndexPath>,
    text: RefCell<String>,
}

impl RecordedView {
    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = text.into();
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }
}

/// Host-grid double that validates every commit.
pub struct RecordingSurface {
    live: Cell<bool>,
    source: RefCell<Option<Weak<dyn SurfaceDataSource>>>,
    /// Row counts per section as last observed.
    shown: RefCell<Vec<usize>>,
    registered: RefCell<Vec<(TemplateKind, String)>>,
    calls: RefCell<Vec<SurfaceCall>>,
}

impl RecordingSurface {
    /// A surface that is already part of a visible hierarchy.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            live: Cell::new(true),
            source: RefCell::new(None),
            shown: RefCell::new(Vec::new()),
            registered: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
        })
    }

    /// A surface that is not on screen yet; commands are recorded but not
    /// validated until [`set_live`](Self::set_live).
    pub fn offscreen() -> Rc<Self> {
        let surface = Self::new();
        surface.live.set(false);
        surface
    }

    /// Going live populates the surface from the data source.
    pub fn set_live(&self, live: bool) {
        self.live.set(live);
        if live {
            self.sync();
        }
    }

    /// The bound data source.
    ///
    /// # Panics
    ///
    /// Panics if no adapter bound itself or the adapter was dropped.
    pub fn source(&self) -> Rc<dyn SurfaceDataSource> {
        self.source
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
            .expect("no data source bound to the surface")
    }

    /// Row counts per section, as the surface currently shows them.
    pub fn shown(&self) -> Vec<usize> {
        self.shown.borrow().clone()
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.borrow().clone()
    }

    /// Calls other than template registrations.
    pub fn commands(&self) -> Vec<SurfaceCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| !matches!(call, SurfaceCall::Register { .. }))
            .cloned()
            .collect()
    }

    pub fn batch_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, SurfaceCall::Batch { .. }))
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn is_registered(&self, kind: TemplateKind, reuse_id: &str) -> bool {
        self.registered
            .borrow()
            .iter()
            .any(|(registered_kind, id)| *registered_kind == kind && id == reuse_id)
    }

    /// Asks for a row view and reports it displayed at `rendered_size`.
    pub fn display_row(&self, path: IndexPath, rendered_size: f32) -> Option<ViewHandle> {
        let source = self.source();
        let view = source.view_for_row(path, self)?;
        source.will_display_row(&view, path, rendered_size);
        Some(view)
    }

    /// Text bound to the row view at `path`.
    pub fn row_text(&self, path: IndexPath) -> Option<String> {
        let view = self.source().view_for_row(path, self)?;
        view.downcast_ref::<RecordedView>().map(RecordedView::text)
    }

    pub fn select_row(&self, path: IndexPath) {
        self.source().did_select_row(path);
    }

    pub fn scroll(&self, mut event: ScrollEvent) -> ScrollEvent {
        self.source().scroll_event(&mut event);
        event
    }

    fn snapshot(&self) -> Vec<usize> {
        let source = self.source();
        (0..source.section_count())
            .map(|section| source.row_count(section))
            .collect()
    }

    fn sync(&self) {
        let snapshot = self.snapshot();
        *self.shown.borrow_mut() = snapshot;
    }

    fn record(&self, call: SurfaceCall) {
        self.calls.borrow_mut().push(call);
    }

    /// Replays `updates` on the cached counts and checks the result against
    /// the data source, like a host grid does at the end of an update.
    fn commit(&self, updates: &[SurfaceUpdate]) {
        if !self.live.get() {
            return;
        }
        let before = self.shown();
        // `None` marks a section whose count is re-read from the data source.
        let mut slots: Vec<Option<usize>> = before.iter().copied().map(Some).collect();

        for update in updates {
            match update {
                SurfaceUpdate::ReloadSections { sections, .. } => {
                    for &section in sections {
                        assert!(
                            section < before.len(),
                            "attempt to reload section {section}, but there are only {} sections before the update",
                            before.len()
                        );
                        slots[section] = None;
                    }
                }
                SurfaceUpdate::ReloadRows { rows, .. } => {
                    for path in rows {
                        let count = before.get(path.section).copied().unwrap_or(0);
                        assert!(
                            path.row < count,
                            "attempt to reload row {path}, which does not exist before the update"
                        );
                    }
                }
                _ => {}
            }
        }

        let mut deleted: Vec<usize> = updates
            .iter()
            .filter_map(|update| match update {
                SurfaceUpdate::DeleteSections { sections, .. } => Some(sections.iter().copied()),
                _ => None,
            })
            .flatten()
            .collect();
        deleted.sort_unstable();
        for &section in deleted.iter().rev() {
            assert!(
                section < slots.len(),
                "attempt to delete section {section}, but there are only {} sections before the update",
                before.len()
            );
            slots.remove(section);
        }

        let mut inserted: Vec<usize> = updates
            .iter()
            .filter_map(|update| match update {
                SurfaceUpdate::InsertSections { sections, .. } => Some(sections.iter().copied()),
                _ => None,
            })
            .flatten()
            .collect();
        inserted.sort_unstable();
        for section in inserted {
            assert!(
                section <= slots.len(),
                "attempt to insert section {section}, but there are only {} sections after the update",
                slots.len()
            );
            slots.insert(section, None);
        }

        for update in updates {
            if let SurfaceUpdate::InsertRows { rows, .. } = update {
                for path in rows {
                    let slot = slots.get_mut(path.section).unwrap_or_else(|| {
                        panic!("attempt to insert row {path} into a section that does not exist")
                    });
                    if let Some(count) = slot {
                        *count += 1;
                    }
                }
            }
        }

        let after = self.snapshot();
        assert_eq!(
            slots.len(),
            after.len(),
            "invalid update: the number of sections after the update ({}) must equal the number before ({}) plus or minus inserted and deleted sections",
            after.len(),
            before.len()
        );
        for (section, (expected, actual)) in slots.iter().zip(&after).enumerate() {
            if let Some(expected) = expected {
                assert_eq!(
                    expected, actual,
                    "invalid update: invalid number of rows in section {section}"
                );
            }
        }
        log::trace!("surface committed {} updates: {before:?} -> {after:?}", updates.len());
        *self.shown.borrow_mut() = after;
    }
}

impl ViewTemplateRegistry for RecordingSurface {
    fn register(&self, kind: TemplateKind, reuse_id: &str, source: &ResolvedSource) {
        self.registered
            .borrow_mut()
            .push((kind, reuse_id.to_owned()));
        self.record(SurfaceCall::Register {
            kind,
            reuse_id: reuse_id.to_owned(),
            source: source.clone(),
        });
    }
}

impl ViewDequeue for RecordingSurface {
    fn dequeue_row(&self, reuse_id: &str, path: IndexPath) -> ViewHandle {
        assert!(
            self.is_registered(TemplateKind::Cell, reuse_id),
            "unable to dequeue a cell with identifier {reuse_id}: no template registered"
        );
        ViewHandle::new(
            reuse_id,
            Rc::new(RecordedView {
                reuse_id: reuse_id.to_owned(),
                path: Some(path),
                text: RefCell::default(),
            }),
        )
    }

    fn dequeue_header_footer(&self, reuse_id: &str) -> ViewHandle {
        assert!(
            self.is_registered(TemplateKind::HeaderFooter, reuse_id),
            "unable to dequeue a header/footer with identifier {reuse_id}: no template registered"
        );
        ViewHandle::new(
            reuse_id,
            Rc::new(RecordedView {
                reuse_id: reuse_id.to_owned(),
                path: None,
                text: RefCell::default(),
            }),
        )
    }
}

impl RenderSurface for RecordingSurface {
    fn bind_data_source(&self, source: Weak<dyn SurfaceDataSource>) {
        *self.source.borrow_mut() = Some(source);
    }

    fn is_live(&self) -> bool {
        self.live.get()
    }

    fn reload_all(&self) {
        self.record(SurfaceCall::ReloadAll);
        if self.live.get() {
            self.sync();
        }
    }

    fn apply(&self, update: SurfaceUpdate) {
        self.commit(std::slice::from_ref(&update));
        self.record(SurfaceCall::Apply(update));
    }

    fn perform_batch(&self, animation: BatchAnimation, build: &mut dyn FnMut(&mut BatchUpdates)) {
        let mut batch = BatchUpdates::new();
        build(&mut batch);
        let updates = batch.into_updates();
        self.commit(&updates);
        self.record(SurfaceCall::Batch { animation, updates });
    }

    fn deselect_row(&self, path: IndexPath, animated: bool) {
        self.record(SurfaceCall::Deselect { path, animated });
    }
}

#[cfg(test)]
#[path = "tests/surface_tests.rs"]
mod tests;
