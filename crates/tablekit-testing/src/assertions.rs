//! Assertion helpers for reconciliation tests.

use tablekit_core::{SectionId, SectionedAdapter};

use crate::surface::{RecordingSurface, SurfaceCall};

/// Assert the surface shows exactly these row counts per section.
pub fn assert_shown(surface: &RecordingSurface, expected: &[usize], msg: &str) {
    let shown = surface.shown();
    assert_eq!(
        shown, expected,
        "{}: expected sections with rows {:?}, surface shows {:?}",
        msg, expected, shown
    );
}

/// Assert the adapter's attached sections, in surface order.
pub fn assert_attached(adapter: &SectionedAdapter, expected: &[&str], msg: &str) {
    let attached = adapter.attached_section_ids();
    let expected: Vec<SectionId> = expected.iter().map(|id| SectionId::from(*id)).collect();
    assert_eq!(
        attached, expected,
        "{}: expected attached sections {:?}, got {:?}",
        msg, expected, attached
    );
}

/// Assert the surface received no structural command at all.
pub fn assert_untouched(surface: &RecordingSurface, msg: &str) {
    let commands = surface.commands();
    assert!(
        commands.is_empty(),
        "{}: expected no surface commands, got {:?}",
        msg,
        commands
    );
}

/// Assert exactly `expected` batches were committed since the last clear.
pub fn assert_batches(surface: &RecordingSurface, expected: usize, msg: &str) {
    let batches: Vec<SurfaceCall> = surface
        .commands()
        .into_iter()
        .filter(|call| matches!(call, SurfaceCall::Batch { .. }))
        .collect();
    assert_eq!(
        batches.len(),
        expected,
        "{}: expected {} batches, got {:?}",
        msg,
        expected,
        batches
    );
}
