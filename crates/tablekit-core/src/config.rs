//! Adapter configuration.

use crate::registration::Bundle;
use crate::surface::RowAnimation;

/// Row-size estimate used until a row has been rendered once.
pub const DEFAULT_ESTIMATED_ROW_SIZE: f32 = 100.0;

#[derive(Clone, Debug, PartialEq)]
pub struct AdapterConfig {
    /// Fallback for estimated row sizes when the row-size cache has no entry.
    pub estimated_row_size: f32,

    /// Bundle for nib registrations that do not name one.
    pub resources_bundle: Bundle,

    /// Animation for sections entering or leaving the attached set.
    pub attach_animation: RowAnimation,

    /// Animation for reloads and row inserts requested with `animated = true`.
    pub animated_reload: RowAnimation,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            estimated_row_size: DEFAULT_ESTIMATED_ROW_SIZE,
            resources_bundle: Bundle::main(),
            attach_animation: RowAnimation::Fade,
            animated_reload: RowAnimation::Automatic,
        }
    }
}

impl AdapterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_estimated_row_size(mut self, size: f32) -> Self {
        self.estimated_row_size = size;
        self
    }

    pub fn with_resources_bundle(mut self, bundle: Bundle) -> Self {
        self.resources_bundle = bundle;
        self
    }

    pub fn with_attach_animation(mut self, animation: RowAnimation) -> Self {
        self.attach_animation = animation;
        self
    }

    pub fn with_animated_reload(mut self, animation: RowAnimation) -> Self {
        self.animated_reload = animation;
        self
    }
}
