//! Stripping markup and escape sequences, with removal reports.

use fmtcodes::{Removal, StripMode, Stripper, markup_width, render, strip_escaped, strip_markup, visible_width};

fn report(mode: StripMode) -> Stripper {
    Stripper::new(mode).report_removals(true)
}

// ============================================================================
// Markup Mode
// ============================================================================

#[test]
fn group_removal_records() {
    let stripped = report(StripMode::Markup).strip("[b](hi) there");
    assert_eq!(stripped.text, "hi there");
    assert_eq!(
        stripped.removals.unwrap(),
        vec![Removal::new(0, "[b]"), Removal::new(3, "("), Removal::new(6, ")")]
    );
}

#[test]
fn nested_groups_in_order() {
    let stripped = report(StripMode::Markup).strip("[red](A[b](B)C)");
    assert_eq!(stripped.text, "ABC");
    assert_eq!(
        stripped.removals.unwrap(),
        vec![
            Removal::new(0, "[red]"),
            Removal::new(5, "("),
            Removal::new(7, "[b]"),
            Removal::new(10, "("),
            Removal::new(12, ")"),
            Removal::new(14, ")"),
        ]
    );
}

#[test]
fn escaped_group_keeps_parentheses() {
    let stripped = report(StripMode::Markup).strip("[/b](x)");
    assert_eq!(stripped.text, "[b](x)");
    assert_eq!(stripped.removals.unwrap(), vec![Removal::new(1, "/")]);
}

#[test]
fn unknown_and_unmatched_stay() {
    assert_eq!(strip_markup("[nope] [b").text, "[nope] [b");
    assert_eq!(strip_markup("a ] b ( c").text, "a ] b ( c");
}

#[test]
fn markup_positions_without_line_breaks() {
    let stripped = report(StripMode::Markup).ignore_line_breaks(true).strip("x\n[b](y)");
    assert_eq!(stripped.text, "x\ny");
    assert_eq!(
        stripped.removals.unwrap(),
        vec![Removal::new(1, "[b]"), Removal::new(4, "("), Removal::new(6, ")")]
    );
}

#[test]
fn positions_are_byte_offsets() {
    let stripped = report(StripMode::Markup).strip("é[b](x)");
    assert_eq!(stripped.text, "éx");
    assert_eq!(
        stripped.removals.unwrap(),
        vec![Removal::new(2, "[b]"), Removal::new(5, "("), Removal::new(7, ")")]
    );
}

// ============================================================================
// Escaped Mode
// ============================================================================

#[test]
fn strip_rendered_output() {
    let rendered = render("[red](A[b](B)C)");
    let stripped = report(StripMode::Escaped).strip(&rendered);
    assert_eq!(stripped.text, "ABC");
    let removals = stripped.removals.unwrap();
    assert_eq!(removals.len(), 4);
    assert_eq!(removals[0], Removal::new(0, "\x1b[31m"));
    assert_eq!(removals[1].position, 6);
    assert!(removals.windows(2).all(|w| w[0].position < w[1].position));
}

#[test]
fn non_sgr_sequences_removed() {
    assert_eq!(strip_escaped("\x1b[2Jclear\x1b[H").text, "clear");
    assert_eq!(strip_escaped("no codes").text, "no codes");
}

#[test]
fn line_breaks_between_codes_kept() {
    let stripped = report(StripMode::Escaped)
        .ignore_line_breaks(true)
        .strip("\x1b[1m\n\x1b[0m");
    assert_eq!(stripped.text, "\n");
    assert_eq!(
        stripped.removals.unwrap(),
        vec![Removal::new(0, "\x1b[1m"), Removal::new(4, "\x1b[0m")]
    );
}

// ============================================================================
// Width
// ============================================================================

#[test]
fn widths_ignore_styling() {
    assert_eq!(visible_width(&render("[b](wide 日本)")), 9);
    assert_eq!(markup_width("[b](wide 日本)"), 9);
}
