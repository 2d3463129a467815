//! String list section used by tests and demos.

use std::rc::Rc;

use tablekit_core::{
    DataSection, HeaderFooterStyle, IndexPath, Registration, RowAction, RowActionStyle,
    SectionContent, SectionId, SectionSpacing, ViewDequeue, ViewHandle, ViewTemplate,
};

use crate::surface::RecordedView;

/// Cell template every [`ListContent`] registers.
pub const LIST_CELL: ViewTemplate = ViewTemplate::named("ListCell");

pub type ListSection = DataSection<ListContent>;

/// One cell per string, bound as the cell's text.
#[derive(Clone, Debug)]
pub struct ListContent {
    id: SectionId,
    header: HeaderFooterStyle,
    footer: HeaderFooterStyle,
    row_size: SectionSpacing,
    deletable: bool,
}

impl ListContent {
    pub fn new(id: impl Into<SectionId>) -> Self {
        Self {
            id: id.into(),
            header: HeaderFooterStyle::None,
            footer: HeaderFooterStyle::None,
            row_size: SectionSpacing::AUTO,
            deletable: false,
        }
    }

    pub fn with_header(mut self, style: HeaderFooterStyle) -> Self {
        self.header = style;
        self
    }

    pub fn with_footer(mut self, style: HeaderFooterStyle) -> Self {
        self.footer = style;
        self
    }

    pub fn with_row_size(mut self, size: f32) -> Self {
        self.row_size = SectionSpacing::custom(size);
        self
    }

    /// Offers a destructive "Delete" swipe action on every row.
    pub fn deletable(mut self) -> Self {
        self.deletable = true;
        self
    }
}

impl SectionContent for ListContent {
    type Data = Vec<String>;

    fn id(&self) -> SectionId {
        self.id.clone()
    }

    fn item_count(&self, data: &Vec<String>) -> usize {
        data.len()
    }

    fn registrations(&self) -> Vec<Registration> {
        vec![Registration::cell_class(LIST_CELL)]
    }

    fn view_for_row(
        &self,
        data: &Vec<String>,
        path: IndexPath,
        views: &dyn ViewDequeue,
    ) -> Option<ViewHandle> {
        let text = data.get(path.row)?;
        let view = views.dequeue_row(LIST_CELL.reuse_id(), path);
        if let Some(cell) = view.downcast_ref::<RecordedView>() {
            cell.set_text(text.as_str());
        }
        Some(view)
    }

    fn row_size(&self, _data: &Vec<String>, _row: usize) -> SectionSpacing {
        self.row_size
    }

    fn row_actions(&self, data: &Vec<String>, path: IndexPath) -> Vec<RowAction> {
        if !self.deletable || path.row >= data.len() {
            return Vec::new();
        }
        let id = self.id.clone();
        vec![RowAction::new("Delete", RowActionStyle::Destructive, move |path| {
            log::debug!("delete requested for row {path} of section {id}");
        })]
    }

    fn header_style(&self) -> HeaderFooterStyle {
        self.header
    }

    fn footer_style(&self) -> HeaderFooterStyle {
        self.footer
    }
}

/// Attached list section holding `items`.
pub fn list_section<S: Into<String>>(
    content: ListContent,
    items: impl IntoIterator<Item = S>,
) -> Rc<ListSection> {
    Rc::new(DataSection::with_data(
        content,
        items.into_iter().map(Into::into).collect(),
    ))
}
