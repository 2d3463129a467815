//! Spacing values for rows, headers and footers.

/// Marker value the render surface interprets as "size this element itself".
pub const AUTOMATIC_DIMENSION: f32 = -1.0;

/// Default height of the built-in spacing header/footer.
pub const DEFAULT_HEADER_FOOTER_SPACING: f32 = 16.0;

/// A named or custom size used for header/footer sizing and row auto-sizing.
///
/// Hidden headers are not expressed as `0.0`: the render surface collapses an
/// exact zero to its own default size, so [`SectionSpacing::INVISIBLE`] is the
/// smallest positive normal `f32` instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionSpacing {
    value: f32,
}

impl SectionSpacing {
    /// Default spacing for section headers.
    pub const HEADER: Self = Self::custom(DEFAULT_HEADER_FOOTER_SPACING);

    /// Default spacing for section footers.
    pub const FOOTER: Self = Self::custom(DEFAULT_HEADER_FOOTER_SPACING);

    /// Hides a header or footer.
    pub const INVISIBLE: Self = Self::custom(f32::MIN_POSITIVE);

    /// Lets the render surface compute the size.
    pub const AUTO: Self = Self::custom(AUTOMATIC_DIMENSION);

    pub const fn custom(value: f32) -> Self {
        Self { value }
    }

    /// Raw value handed to the render surface.
    #[inline]
    pub fn value(self) -> f32 {
        self.value
    }

    #[inline]
    pub fn is_auto(self) -> bool {
        self.value == AUTOMATIC_DIMENSION
    }

    #[inline]
    pub fn is_invisible(self) -> bool {
        self.value == f32::MIN_POSITIVE
    }
}

impl Default for SectionSpacing {
    fn default() -> Self {
        Self::AUTO
    }
}

impl From<f32> for SectionSpacing {
    fn from(value: f32) -> Self {
        Self::custom(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invisible_is_distinct_from_zero() {
        let invisible = SectionSpacing::INVISIBLE;
        assert!(invisible.value() > 0.0);
        assert!(invisible.is_invisible());
        assert!(!SectionSpacing::custom(0.0).is_invisible());
    }

    #[test]
    fn auto_is_a_sentinel() {
        assert!(SectionSpacing::AUTO.is_auto());
        assert!(!SectionSpacing::HEADER.is_auto());
        assert_eq!(SectionSpacing::default(), SectionSpacing::AUTO);
    }

    #[test]
    fn header_and_footer_defaults() {
        assert_eq!(SectionSpacing::HEADER.value(), 16.0);
        assert_eq!(SectionSpacing::FOOTER.value(), 16.0);
        assert_eq!(SectionSpacing::from(44.0).value(), 44.0);
    }
}
