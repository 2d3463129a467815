//! Section reconciliation engine.
//!
//! [`SectionedAdapter`] owns every registered section in add order and the
//! derived list of attached sections the render surface currently shows. It
//! turns identity-based changes ("section X is hidden now") into index-based
//! commands, and it never lets the surface observe a state where its own
//! section count disagrees with the adapter's.
//!
//! Sections are never removed; hiding a section is modelled as detaching it.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use smallvec::smallvec;

use crate::config::AdapterConfig;
use crate::delegate::SurfaceDelegate;
use crate::error::AdapterError;
use crate::registration::TemplateKind;
use crate::row_size_cache::RowSizeCache;
use crate::section::Section;
use crate::section_id::SectionId;
use crate::surface::{
    row_paths, sorted_indexes, BatchAnimation, BatchUpdates, IndexPath, RenderSurface, RowAnimation,
    SectionIndexes, SurfaceDataSource, SurfaceUpdate,
};

/// Handle to the reconciliation engine. Cloning shares the same engine.
#[derive(Clone)]
pub struct SectionedAdapter {
    shared: Rc<AdapterShared>,
}

/// Non-owning back-reference from a section to its adapter.
#[derive(Clone, Debug, Default)]
pub struct AdapterRef {
    shared: Weak<AdapterShared>,
}

impl AdapterRef {
    pub fn upgrade(&self) -> Option<SectionedAdapter> {
        self.shared
            .upgrade()
            .map(|shared| SectionedAdapter { shared })
    }

    pub fn is_alive(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

pub(crate) struct AdapterShared {
    pub(crate) surface: Rc<dyn RenderSurface>,
    pub(crate) state: RefCell<AdapterState>,
    pub(crate) forwarded: RefCell<Option<Weak<dyn SurfaceDelegate>>>,
}

impl fmt::Debug for AdapterShared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterShared")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

pub(crate) struct AdapterState {
    pub(crate) config: AdapterConfig,
    /// Every section ever added, in add order.
    pub(crate) sections: IndexMap<SectionId, Rc<dyn Section>, FxBuildHasher>,
    /// Positions in `sections` of the attached sections, as the surface sees them.
    pub(crate) attached: Vec<usize>,
    pub(crate) row_sizes: RowSizeCache,
    registered: FxHashSet<(TemplateKind, String)>,
}

impl fmt::Debug for AdapterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterState")
            .field("sections", &self.sections.keys().collect::<Vec<_>>())
            .field("attached", &self.attached)
            .field("cached_row_sizes", &self.row_sizes.len())
            .finish_non_exhaustive()
    }
}

impl AdapterState {
    /// `sections` filtered by the attachment flag, preserving add order.
    fn derive_attached(&self) -> Vec<usize> {
        self.sections
            .values()
            .enumerate()
            .filter(|(_, section)| section.is_attached())
            .map(|(slot, _)| slot)
            .collect()
    }

    fn attached_index_of(&self, id: &SectionId) -> Option<usize> {
        let slot = self.sections.get_index_of(id)?;
        self.attached.iter().position(|&attached| attached == slot)
    }

    pub(crate) fn attached_section(&self, index: usize) -> Option<&Rc<dyn Section>> {
        let slot = *self.attached.get(index)?;
        self.sections.get_index(slot).map(|(_, section)| section)
    }

    fn attached_ids(&self) -> Vec<SectionId> {
        self.attached
            .iter()
            .filter_map(|&slot| self.sections.get_index(slot))
            .map(|(id, _)| id.clone())
            .collect()
    }
}

/// Index commands for one attach/detach pass, resolved before the batch.
struct Transition {
    next: Vec<usize>,
    removed: SectionIndexes,
    inserted: SectionIndexes,
    consistent: bool,
}

impl SectionedAdapter {
    pub fn new(surface: Rc<dyn RenderSurface>) -> Self {
        Self::with_config(surface, AdapterConfig::default())
    }

    pub fn with_config(surface: Rc<dyn RenderSurface>, config: AdapterConfig) -> Self {
        let shared = Rc::new(AdapterShared {
            surface,
            state: RefCell::new(AdapterState {
                config,
                sections: IndexMap::default(),
                attached: Vec::new(),
                row_sizes: RowSizeCache::new(),
                registered: FxHashSet::default(),
            }),
            forwarded: RefCell::new(None),
        });
        let weak = Rc::downgrade(&shared);
        let source: Weak<dyn SurfaceDataSource> = weak;
        shared.surface.bind_data_source(source);
        Self { shared }
    }

    pub fn downgrade(&self) -> AdapterRef {
        AdapterRef {
            shared: Rc::downgrade(&self.shared),
        }
    }

    pub fn surface(&self) -> Rc<dyn RenderSurface> {
        Rc::clone(&self.shared.surface)
    }

    pub fn config(&self) -> AdapterConfig {
        self.shared.state.borrow().config.clone()
    }

    /// Overrides the fallback used for rows that were never rendered.
    pub fn set_estimated_row_size(&self, size: f32) {
        self.shared.state.borrow_mut().config.estimated_row_size = size;
    }

    /// Installs a secondary delegate, held weakly.
    pub fn set_forwarded_delegate(&self, delegate: &Rc<dyn SurfaceDelegate>) {
        *self.shared.forwarded.borrow_mut() = Some(Rc::downgrade(delegate));
    }

    pub fn clear_forwarded_delegate(&self) {
        self.shared.forwarded.borrow_mut().take();
    }

    /// Registers a section.
    ///
    /// # Panics
    ///
    /// Panics if a section with the same id was already added. Duplicate ids
    /// are an integration bug, not a runtime condition; use
    /// [`try_add_section`](Self::try_add_section) to inspect the error instead.
    pub fn add_section(&self, section: Rc<dyn Section>) {
        if let Err(err) = self.try_add_section(section) {
            panic!("{err}");
        }
    }

    /// Adds `section` unless its id is already registered. Returns whether it
    /// was added.
    pub fn add_section_if_absent(&self, section: Rc<dyn Section>) -> bool {
        if self.contains(&section.id()) {
            return false;
        }
        self.try_add_section(section).is_ok()
    }

    /// Registers a section, failing without side effects on a duplicate id.
    pub fn try_add_section(&self, section: Rc<dyn Section>) -> Result<(), AdapterError> {
        let id = section.id();
        if let Some(existing) = self.shared.state.borrow().sections.get(&id) {
            return Err(AdapterError::DuplicateSectionId {
                id,
                existing: existing.type_name(),
            });
        }

        section.set_adapter(self.downgrade());
        self.register_templates(section.as_ref());

        let (attached_count, consistent) = {
            let mut state = self.shared.state.borrow_mut();
            let (slot, _) = state.sections.insert_full(id.clone(), Rc::clone(&section));
            let mut expected = state.attached.clone();
            if section.is_attached() {
                expected.push(slot);
            }
            state.attached = state.derive_attached();
            (state.attached.len(), expected == state.attached)
        };
        log::debug!("added section {id} (attached: {})", section.is_attached());

        let surface = &self.shared.surface;
        // A surface outside the visible hierarchy populates itself once it goes live.
        if !surface.is_live() {
            log::debug!("surface not live; deferring population for section {id}");
            return Ok(());
        }
        if !consistent {
            log::warn!(
                "attached sections changed without notification before adding {id}; \
                 reloading the whole surface"
            );
            surface.reload_all();
            return Ok(());
        }
        if !section.is_attached() {
            return Ok(());
        }
        if attached_count <= 1 {
            log::trace!("reload_all for first attached section {id}");
            surface.reload_all();
        } else {
            let index = attached_count - 1;
            log::trace!("insert section {id} at {index}");
            surface.apply(SurfaceUpdate::InsertSections {
                sections: smallvec![index],
                animation: RowAnimation::None,
            });
        }
        Ok(())
    }

    pub fn contains(&self, id: &SectionId) -> bool {
        self.shared.state.borrow().sections.contains_key(id)
    }

    pub fn section(&self, id: &SectionId) -> Option<Rc<dyn Section>> {
        self.shared.state.borrow().sections.get(id).cloned()
    }

    /// Number of sections ever added.
    pub fn section_count(&self) -> usize {
        self.shared.state.borrow().sections.len()
    }

    pub fn attached_count(&self) -> usize {
        self.shared.state.borrow().attached.len()
    }

    /// Ids of every section, in add order.
    pub fn all_section_ids(&self) -> Vec<SectionId> {
        self.shared.state.borrow().sections.keys().cloned().collect()
    }

    /// Ids of the attached sections, in the order the surface shows them.
    pub fn attached_section_ids(&self) -> Vec<SectionId> {
        self.shared.state.borrow().attached_ids()
    }

    /// Current section index of `id` on the render surface.
    pub fn index_of(&self, id: &SectionId) -> Option<usize> {
        self.shared.state.borrow().attached_index_of(id)
    }

    /// Last rendered size recorded for `path`.
    pub fn cached_row_size(&self, path: IndexPath) -> Option<f32> {
        self.shared.state.borrow().row_sizes.get(path)
    }

    /// Reloads every row of `id`. No-op unless the section is attached.
    pub fn reload_section(&self, id: &SectionId, animated: bool) {
        let Some(index) = self.index_of(id) else {
            log::debug!("reload_section: section {id} is not attached");
            return;
        };
        let animation = self.reload_animation(animated);
        log::trace!("reload section {id} at {index}");
        self.shared.surface.apply(SurfaceUpdate::ReloadSections {
            sections: smallvec![index],
            animation,
        });
    }

    /// Reloads `rows` of `id`. No-op unless the section is attached.
    pub fn reload_rows(
        &self,
        rows: impl IntoIterator<Item = usize>,
        id: &SectionId,
        animated: bool,
    ) {
        let Some(index) = self.index_of(id) else {
            log::debug!("reload_rows: section {id} is not attached");
            return;
        };
        let rows = row_paths(index, rows);
        if rows.is_empty() {
            return;
        }
        let animation = self.reload_animation(animated);
        log::trace!("reload {} rows of section {id} at {index}", rows.len());
        self.shared
            .surface
            .apply(SurfaceUpdate::ReloadRows { rows, animation });
    }

    /// Inserts `rows` into `id`. No-op unless the section is attached.
    pub fn insert_rows(
        &self,
        rows: impl IntoIterator<Item = usize>,
        id: &SectionId,
        animated: bool,
    ) {
        let Some(index) = self.index_of(id) else {
            log::debug!("insert_rows: section {id} is not attached");
            return;
        };
        let rows = row_paths(index, rows);
        if rows.is_empty() {
            return;
        }
        let animation = self.reload_animation(animated);
        log::trace!("insert {} rows into section {id} at {index}", rows.len());
        self.shared
            .surface
            .apply(SurfaceUpdate::InsertRows { rows, animation });
    }

    /// Shows a section whose flag was just set. Always commits as a batch.
    pub fn notify_attach(&self, id: &SectionId) {
        self.notify_attaches_and_detaches([id.clone()], std::iter::empty());
    }

    /// Hides a section whose flag was just cleared. Always commits as a batch.
    pub fn notify_detach(&self, id: &SectionId) {
        self.notify_attaches_and_detaches(std::iter::empty(), [id.clone()]);
    }

    /// Makes exactly `ids` the attached sections, reconciling in one batch.
    ///
    /// Unknown ids are ignored. Flags are flipped without per-section
    /// notifications.
    pub fn update_attached_sections(&self, ids: impl IntoIterator<Item = SectionId>) {
        let targets: FxHashSet<SectionId> = ids.into_iter().collect();
        let (to_attach, to_detach) = {
            let state = self.shared.state.borrow();
            let current: FxHashSet<usize> = state.attached.iter().copied().collect();
            let mut to_attach = Vec::new();
            let mut to_detach = Vec::new();
            for (slot, (id, section)) in state.sections.iter().enumerate() {
                let wanted = targets.contains(id);
                let shown = current.contains(&slot);
                if wanted && !shown {
                    to_attach.push((id.clone(), Rc::clone(section)));
                } else if !wanted && shown {
                    to_detach.push((id.clone(), Rc::clone(section)));
                }
            }
            (to_attach, to_detach)
        };

        for (_, section) in &to_attach {
            section.update_attached(true, false);
        }
        for (_, section) in &to_detach {
            section.update_attached(false, false);
        }

        self.notify_attaches_and_detaches(
            to_attach.into_iter().map(|(id, _)| id),
            to_detach.into_iter().map(|(id, _)| id),
        );
    }

    /// Reconciles flags that were flipped for `attaches` and `detaches` in a
    /// single batch.
    ///
    /// Deletions are resolved against the attached ordering the surface still
    /// holds and issued first; insertions are resolved against the re-derived
    /// ordering. Ids whose membership did not actually change are skipped.
    pub fn notify_attaches_and_detaches(
        &self,
        attaches: impl IntoIterator<Item = SectionId>,
        detaches: impl IntoIterator<Item = SectionId>,
    ) {
        let attaches: FxHashSet<SectionId> = attaches.into_iter().collect();
        let detaches: FxHashSet<SectionId> = detaches.into_iter().collect();
        if attaches.is_empty() && detaches.is_empty() {
            return;
        }

        let transition = self.shared.state.borrow().transition(&attaches, &detaches);
        let Transition {
            next,
            removed,
            inserted,
            consistent,
        } = transition;

        if !consistent {
            log::warn!(
                "attached sections changed outside the reconciled ids \
                 (attaches: {}, detaches: {}); reloading the whole surface",
                attaches.len(),
                detaches.len()
            );
            self.shared.state.borrow_mut().attached = next;
            self.shared.surface.reload_all();
            return;
        }
        if removed.is_empty() && inserted.is_empty() {
            log::debug!("no attachment change to reconcile");
            return;
        }

        log::trace!("batch: delete sections {removed:?}, insert sections {inserted:?}");
        let animation = self.shared.state.borrow().config.attach_animation;
        let mut pending = Some((next, removed, inserted));
        let surface = Rc::clone(&self.shared.surface);
        surface.perform_batch(BatchAnimation::Enabled, &mut |batch: &mut BatchUpdates| {
            let Some((next, removed, inserted)) = pending.take() else {
                return;
            };
            self.shared.state.borrow_mut().attached = next;
            batch.delete_sections(removed, animation);
            batch.insert_sections(inserted, animation);
        });
    }

    /// Forces a layout pass without structural change or animation. No-op
    /// unless `id` is attached.
    pub fn notify_height_changed(&self, id: &SectionId) {
        if self.index_of(id).is_none() {
            log::debug!("notify_height_changed: section {id} is not attached");
            return;
        }
        self.shared
            .surface
            .perform_batch(BatchAnimation::Suppressed, &mut |_: &mut BatchUpdates| {});
    }

    fn reload_animation(&self, animated: bool) -> RowAnimation {
        let preferred = self.shared.state.borrow().config.animated_reload;
        RowAnimation::when(animated, preferred)
    }

    fn register_templates(&self, section: &dyn Section) {
        let pending: Vec<_> = {
            let mut state = self.shared.state.borrow_mut();
            let bundle = state.config.resources_bundle.clone();
            section
                .registrations()
                .into_iter()
                .filter(|registration| {
                    let fresh = state
                        .registered
                        .insert((registration.kind, registration.reuse_id().to_owned()));
                    if !fresh {
                        log::debug!("template {} already registered", registration.reuse_id());
                    }
                    fresh
                })
                .map(|registration| {
                    let source = registration.resolved(&bundle);
                    (registration, source)
                })
                .collect()
        };
        for (registration, source) in pending {
            self.shared
                .surface
                .register(registration.kind, registration.reuse_id(), &source);
        }
    }
}

impl AdapterState {
    fn transition(
        &self,
        attaches: &FxHashSet<SectionId>,
        detaches: &FxHashSet<SectionId>,
    ) -> Transition {
        let previous: FxHashSet<usize> = self.attached.iter().copied().collect();
        let next = self.derive_attached();
        let upcoming: FxHashSet<usize> = next.iter().copied().collect();

        let id_at = |slot: usize| self.sections.get_index(slot).map(|(id, _)| id);

        let removed = sorted_indexes(self.attached.iter().enumerate().filter_map(
            |(index, &slot)| {
                let id = id_at(slot)?;
                (detaches.contains(id) && !upcoming.contains(&slot)).then_some(index)
            },
        ));
        let inserted = sorted_indexes(next.iter().enumerate().filter_map(|(index, &slot)| {
            let id = id_at(slot)?;
            (attaches.contains(id) && !previous.contains(&slot)).then_some(index)
        }));

        // Survivors must line up, otherwise the surface would end up with
        // counts that disagree with ours.
        let kept_before = self
            .attached
            .iter()
            .enumerate()
            .filter(|(index, _)| removed.binary_search(index).is_err())
            .map(|(_, slot)| *slot);
        let kept_after = next
            .iter()
            .enumerate()
            .filter(|(index, _)| inserted.binary_search(index).is_err())
            .map(|(_, slot)| *slot);
        let consistent = kept_before.eq(kept_after);

        Transition {
            next,
            removed,
            inserted,
            consistent,
        }
    }
}

impl fmt::Debug for SectionedAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionedAdapter")
            .field("state", &self.shared.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "tests/adapter_tests.rs"]
mod tests;
