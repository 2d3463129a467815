//! Generic data-holding section.
//!
//! [`DataSection`] implements [`Section`] for any [`SectionContent`]: the
//! content describes identity, rows and rendering in terms of its data, the
//! section owns the data and turns data mutations into reconciliation
//! requests on the adapter.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::adapter::{AdapterRef, SectionedAdapter};
use crate::registration::{Registration, SPACING_HEADER_FOOTER};
use crate::section::{Section, SectionLink};
use crate::section_id::SectionId;
use crate::spacing::SectionSpacing;
use crate::surface::IndexPath;
use crate::view::{RowAction, ViewDequeue, ViewHandle};

/// Quick header/footer setup for [`SectionContent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HeaderFooterStyle {
    /// Built-in spacing view of [`SectionSpacing::HEADER`] height.
    Spacing,
    #[default]
    None,
}

impl HeaderFooterStyle {
    pub fn view(self, views: &dyn ViewDequeue) -> Option<ViewHandle> {
        match self {
            HeaderFooterStyle::Spacing => {
                Some(views.dequeue_header_footer(SPACING_HEADER_FOOTER.reuse_id()))
            }
            HeaderFooterStyle::None => None,
        }
    }

    pub fn spacing(self) -> SectionSpacing {
        match self {
            HeaderFooterStyle::Spacing => SectionSpacing::HEADER,
            HeaderFooterStyle::None => SectionSpacing::INVISIBLE,
        }
    }
}

/// Row content shape of a [`DataSection`].
///
/// Only identity, counting, registrations and row views are required; the
/// rest defaults to auto-sized rows without header or footer.
pub trait SectionContent: 'static {
    type Data: 'static;

    fn id(&self) -> SectionId;

    fn item_count(&self, data: &Self::Data) -> usize;

    /// Cell and custom header/footer templates. The spacing template is
    /// always registered in addition.
    fn registrations(&self) -> Vec<Registration>;

    fn view_for_row(
        &self,
        data: &Self::Data,
        path: IndexPath,
        views: &dyn ViewDequeue,
    ) -> Option<ViewHandle>;

    fn row_size(&self, _data: &Self::Data, _row: usize) -> SectionSpacing {
        SectionSpacing::AUTO
    }

    fn row_actions(&self, _data: &Self::Data, _path: IndexPath) -> Vec<RowAction> {
        Vec::new()
    }

    fn header_style(&self) -> HeaderFooterStyle {
        HeaderFooterStyle::None
    }

    fn footer_style(&self) -> HeaderFooterStyle {
        HeaderFooterStyle::None
    }

    /// Override for a custom header; the default follows [`header_style`](Self::header_style).
    fn header_view(&self, views: &dyn ViewDequeue) -> Option<ViewHandle> {
        self.header_style().view(views)
    }

    fn header_spacing(&self) -> SectionSpacing {
        self.header_style().spacing()
    }

    fn footer_view(&self, views: &dyn ViewDequeue) -> Option<ViewHandle> {
        self.footer_style().view(views)
    }

    fn footer_spacing(&self) -> SectionSpacing {
        self.footer_style().spacing()
    }
}

/// Section that owns its data and reports data changes to the adapter.
///
/// Mutation helpers always update the held data; they only reach the
/// render surface while the section is attached.
pub struct DataSection<C: SectionContent> {
    content: C,
    data: RefCell<Option<C::Data>>,
    link: SectionLink,
    item_selected: RefCell<Option<Rc<dyn Fn(usize)>>>,
}

impl<C: SectionContent> fmt::Debug for DataSection<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSection")
            .field("id", &self.content.id())
            .field("has_data", &self.data.borrow().is_some())
            .field("attached", &self.link.is_attached())
            .finish_non_exhaustive()
    }
}

impl<C: SectionContent> DataSection<C> {
    /// Creates an attached section that holds no data yet.
    pub fn new(content: C) -> Self {
        Self {
            content,
            data: RefCell::new(None),
            link: SectionLink::default(),
            item_selected: RefCell::new(None),
        }
    }

    pub fn with_data(content: C, data: C::Data) -> Self {
        let section = Self::new(content);
        *section.data.borrow_mut() = Some(data);
        section
    }

    /// Sets the initial attachment flag without notifying anyone.
    pub fn attached(self, attached: bool) -> Self {
        self.link.update_attached(|| self.content.id(), attached, false);
        self
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn has_data(&self) -> bool {
        self.data.borrow().is_some()
    }

    /// Runs `f` against the held data.
    pub fn with_data_ref<R>(&self, f: impl FnOnce(Option<&C::Data>) -> R) -> R {
        f(self.data.borrow().as_ref())
    }

    /// Called with the row index whenever a row of this section is selected.
    pub fn on_item_selected(&self, callback: impl Fn(usize) + 'static) {
        *self.item_selected.borrow_mut() = Some(Rc::new(callback));
    }

    /// Replaces the data and reloads the whole section.
    pub fn set_data(&self, data: C::Data, animated: bool) {
        *self.data.borrow_mut() = Some(data);
        if let Some(adapter) = self.attached_adapter() {
            adapter.reload_section(&self.content.id(), animated);
        }
    }

    /// Replaces the data and reloads only `rows`. The row count must not change.
    pub fn set_data_rows(
        &self,
        data: C::Data,
        rows: impl IntoIterator<Item = usize>,
        animated: bool,
    ) {
        *self.data.borrow_mut() = Some(data);
        if let Some(adapter) = self.attached_adapter() {
            adapter.reload_rows(rows, &self.content.id(), animated);
        }
    }

    /// Rewrites the held data with `update` and reloads `rows`.
    ///
    /// Does nothing while no data has been set.
    pub fn apply_update(
        &self,
        update: impl FnOnce(C::Data) -> C::Data,
        rows: impl IntoIterator<Item = usize>,
        animated: bool,
    ) {
        if !self.replace_with(update) {
            log::debug!(
                "section {} holds no data; update dropped",
                self.content.id()
            );
            return;
        }
        if let Some(adapter) = self.attached_adapter() {
            adapter.reload_rows(rows, &self.content.id(), animated);
        }
    }

    /// Grows the held data with `insert` and inserts the rows
    /// `[old_count, new_count)`.
    ///
    /// Does nothing while no data has been set.
    pub fn insert_with(&self, insert: impl FnOnce(C::Data) -> C::Data, animated: bool) {
        let before = self.item_count();
        if !self.replace_with(insert) {
            log::debug!(
                "section {} holds no data; insert dropped",
                self.content.id()
            );
            return;
        }
        let after = self.item_count();
        if after <= before {
            log::debug!(
                "section {} did not grow ({before} -> {after}); nothing to insert",
                self.content.id()
            );
            return;
        }
        if let Some(adapter) = self.attached_adapter() {
            adapter.insert_rows(before..after, &self.content.id(), animated);
        }
    }

    /// Asks the adapter to re-run layout after a row changed height.
    pub fn notify_height_changed(&self) {
        if let Some(adapter) = self.link.adapter() {
            adapter.notify_height_changed(&self.content.id());
        }
    }

    fn replace_with(&self, f: impl FnOnce(C::Data) -> C::Data) -> bool {
        let Some(current) = self.data.borrow_mut().take() else {
            return false;
        };
        let next = f(current);
        *self.data.borrow_mut() = Some(next);
        true
    }

    fn attached_adapter(&self) -> Option<SectionedAdapter> {
        if !self.link.is_attached() {
            return None;
        }
        self.link.adapter()
    }
}

impl<C, E> DataSection<C>
where
    C: SectionContent<Data = Vec<E>>,
    E: 'static,
{
    /// Appends `items` and inserts exactly the appended rows.
    pub fn append_items(&self, items: impl IntoIterator<Item = E>, animated: bool) {
        self.insert_with(
            |mut data| {
                data.extend(items);
                data
            },
            animated,
        );
    }

    /// Replaces the item at `index` and reloads that row.
    pub fn replace_item(&self, index: usize, item: E, animated: bool) {
        let in_range = self.with_data_ref(|data| data.is_some_and(|items| index < items.len()));
        if !in_range {
            log::debug!(
                "section {}: no item at {index} to replace",
                self.content.id()
            );
            return;
        }
        self.apply_update(
            |mut data| {
                data[index] = item;
                data
            },
            [index],
            animated,
        );
    }
}

impl<C: SectionContent> Section for DataSection<C> {
    fn id(&self) -> SectionId {
        self.content.id()
    }

    fn item_count(&self) -> usize {
        self.data
            .borrow()
            .as_ref()
            .map_or(0, |data| self.content.item_count(data))
    }

    fn registrations(&self) -> Vec<Registration> {
        let mut registrations = self.content.registrations();
        registrations.push(Registration::header_footer_class(SPACING_HEADER_FOOTER));
        registrations
    }

    fn view_for_row(&self, path: IndexPath, views: &dyn ViewDequeue) -> Option<ViewHandle> {
        let data = self.data.borrow();
        self.content.view_for_row(data.as_ref()?, path, views)
    }

    fn row_size(&self, row: usize) -> SectionSpacing {
        self.data
            .borrow()
            .as_ref()
            .map_or(SectionSpacing::AUTO, |data| self.content.row_size(data, row))
    }

    fn row_actions(&self, path: IndexPath) -> Vec<RowAction> {
        self.data
            .borrow()
            .as_ref()
            .map_or_else(Vec::new, |data| self.content.row_actions(data, path))
    }

    fn header_view(&self, views: &dyn ViewDequeue) -> Option<ViewHandle> {
        self.content.header_view(views)
    }

    fn header_spacing(&self) -> SectionSpacing {
        self.content.header_spacing()
    }

    fn footer_view(&self, views: &dyn ViewDequeue) -> Option<ViewHandle> {
        self.content.footer_view(views)
    }

    fn footer_spacing(&self) -> SectionSpacing {
        self.content.footer_spacing()
    }

    fn did_select_row(&self, path: IndexPath) {
        // Cloned out so the callback may touch this section again.
        let callback = self.item_selected.borrow().clone();
        if let Some(callback) = callback {
            callback(path.row);
        }
    }

    fn is_attached(&self) -> bool {
        self.link.is_attached()
    }

    fn update_attached(&self, attached: bool, notify: bool) {
        self.link
            .update_attached(|| self.content.id(), attached, notify);
    }

    fn set_adapter(&self, adapter: AdapterRef) {
        self.link.set_adapter(adapter);
    }

    fn adapter(&self) -> Option<SectionedAdapter> {
        self.link.adapter()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<C>()
    }
}

#[cfg(test)]
#[path = "tests/data_section_tests.rs"]
mod tests;
