//! View-template registrations performed once when a section is added.

use std::any::type_name;
use std::borrow::Cow;
use std::fmt;

/// Named resource bundle that nib-based templates are loaded from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bundle(Cow<'static, str>);

impl Bundle {
    /// The application's main bundle.
    pub const fn main() -> Self {
        Bundle(Cow::Borrowed("main"))
    }

    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Bundle(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for Bundle {
    fn default() -> Self {
        Self::main()
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A row or header/footer view template. The reuse id is the template name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ViewTemplate {
    name: Cow<'static, str>,
}

impl ViewTemplate {
    pub const fn named(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
        }
    }

    /// Template named after `T`, without its module path or generic arguments.
    pub fn of<T: ?Sized>() -> Self {
        let full = type_name::<T>();
        let without_generics = full.split('<').next().unwrap_or(full);
        let short = without_generics
            .rsplit("::")
            .next()
            .unwrap_or(without_generics);
        Self {
            name: Cow::Owned(short.to_owned()),
        }
    }

    pub fn reuse_id(&self) -> &str {
        &self.name
    }
}

/// Built-in template backing [`HeaderFooterStyle::Spacing`](crate::HeaderFooterStyle::Spacing).
pub const SPACING_HEADER_FOOTER: ViewTemplate = ViewTemplate::named("SpacingHeaderFooter");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Cell,
    HeaderFooter,
}

/// Where the render surface instantiates a template from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TemplateSource {
    /// Built from code.
    Class,
    /// Loaded from a nib; `None` uses the adapter's configured resources bundle.
    Nib(Option<Bundle>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Registration {
    pub kind: TemplateKind,
    pub template: ViewTemplate,
    pub source: TemplateSource,
}

impl Registration {
    /// Cell loaded from a nib in the default resources bundle.
    pub fn cell(template: ViewTemplate) -> Self {
        Self::new(TemplateKind::Cell, template, TemplateSource::Nib(None))
    }

    pub fn cell_in_bundle(template: ViewTemplate, bundle: Bundle) -> Self {
        Self::new(
            TemplateKind::Cell,
            template,
            TemplateSource::Nib(Some(bundle)),
        )
    }

    pub fn cell_class(template: ViewTemplate) -> Self {
        Self::new(TemplateKind::Cell, template, TemplateSource::Class)
    }

    /// Header/footer loaded from a nib in the default resources bundle.
    pub fn header_footer(template: ViewTemplate) -> Self {
        Self::new(
            TemplateKind::HeaderFooter,
            template,
            TemplateSource::Nib(None),
        )
    }

    pub fn header_footer_in_bundle(template: ViewTemplate, bundle: Bundle) -> Self {
        Self::new(
            TemplateKind::HeaderFooter,
            template,
            TemplateSource::Nib(Some(bundle)),
        )
    }

    pub fn header_footer_class(template: ViewTemplate) -> Self {
        Self::new(TemplateKind::HeaderFooter, template, TemplateSource::Class)
    }

    fn new(kind: TemplateKind, template: ViewTemplate, source: TemplateSource) -> Self {
        Self {
            kind,
            template,
            source,
        }
    }

    pub fn reuse_id(&self) -> &str {
        self.template.reuse_id()
    }

    /// Replaces an unspecified nib bundle with `default_bundle`.
    pub(crate) fn resolved(&self, default_bundle: &Bundle) -> ResolvedSource {
        match &self.source {
            TemplateSource::Class => ResolvedSource::Class,
            TemplateSource::Nib(Some(bundle)) => ResolvedSource::Nib(bundle.clone()),
            TemplateSource::Nib(None) => ResolvedSource::Nib(default_bundle.clone()),
        }
    }
}

/// Template source after the default bundle has been applied.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResolvedSource {
    Class,
    Nib(Bundle),
}

/// One-time template registration on the render surface.
///
/// Registering the same reuse id twice must be harmless.
pub trait ViewTemplateRegistry {
    fn register(&self, kind: TemplateKind, reuse_id: &str, source: &ResolvedSource);
}
