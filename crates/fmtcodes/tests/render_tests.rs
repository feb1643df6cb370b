//! Rendering markup to escape sequences.

use std::time::{Duration, Instant};

use fmtcodes::parser::MAX_GROUP_DEPTH;
use fmtcodes::{EscapeMarker, FormatError, Renderer, Rgba, escape_ansi, escape_markup, render, strip_escaped, strip_markup};

/// Makes escape sequences readable in snapshots.
fn visible(text: String) -> String {
    text.replace('\x1b', "^[")
}

fn show(markup: &str) -> String {
    visible(render(markup))
}

// ============================================================================
// Tags and Groups
// ============================================================================

#[test]
fn nested_group_restores_outer_color() {
    insta::assert_snapshot!(show("[red](A[b](B)C)"), @"^[[31mA^[[1mB^[[22mC^[[0m");
}

#[test]
fn group_with_several_keys() {
    insta::assert_snapshot!(show("[b|u](both) none"), @"^[[1;4mboth^[[0m none");
}

#[test]
fn sibling_groups() {
    insta::assert_snapshot!(show("[b](x) [d](y)"), @"^[[1mx^[[0m ^[[2my^[[0m");
}

#[test]
fn group_spans_lines() {
    assert_eq!(show("[u](a\nb)"), "^[[4ma\nb^[[0m");
}

#[test]
fn standalone_tags_accumulate() {
    insta::assert_snapshot!(show("[i]a[_i|b]b"), @"^[[3ma^[[23;1mb");
}

#[test]
fn background_and_reset() {
    insta::assert_snapshot!(show("[bg:blue]x[_bg]y"), @"^[[44mx^[[0my");
}

#[test]
fn bright_palette_color() {
    insta::assert_snapshot!(show("[bright:green]x"), @"^[[92mx");
}

// ============================================================================
// Color Literals
// ============================================================================

#[test]
fn hex_color() {
    insta::assert_snapshot!(show("[#ff8800](orange)"), @"^[[38;2;255;136;0morange^[[0m");
}

#[test]
fn hsl_color() {
    insta::assert_snapshot!(show("[hsl(0, 100%, 50%)]x"), @"^[[38;2;255;0;0mx");
}

#[test]
fn out_of_range_rgb_is_literal() {
    assert_eq!(render("[rgb(300,0,0)]x"), "[rgb(300,0,0)]x");
}

#[test]
fn skip_validation_clamps_channels() {
    let out = Renderer::new().skip_validation(true).render("[rgb(300,0,0)]x").unwrap();
    insta::assert_snapshot!(visible(out), @"^[[38;2;255;0;0mx");
}

// ============================================================================
// Degrading to Literal Text
// ============================================================================

#[test]
fn escaped_tag_is_literal() {
    assert_eq!(render("[/red]text"), "[red]text");
    assert_eq!(render(r"[\red]text"), "[red]text");
    assert_eq!(render("[//red]text"), "[/red]text");
}

#[test]
fn unmatched_tag_is_unchanged() {
    assert_eq!(render("[red text without close"), "[red text without close");
}

#[test]
fn unknown_keys_keep_whole_tag() {
    assert_eq!(render("[b|nope]x"), "[b|nope]x");
    assert_eq!(render("[bold red]x"), "[bold red]x");
}

#[test]
fn quoted_parenthesis_does_not_close_group() {
    insta::assert_snapshot!(show(r#"[red](say "a)b" here)"#), @r#"^[[31msay "a)b" here^[[0m"#);
}

#[test]
fn lone_apostrophe() {
    insta::assert_snapshot!(show("[b](it's) fine"), @"^[[1mit's^[[0m fine");
}

#[test]
fn apostrophes_pair_across_sibling_groups() {
    // The first group closes at the last `)`, so `)` and `(` stay in the text.
    insta::assert_snapshot!(show("[b](it's) and [i](it's)"), @"^[[1mit's) and ^[[3m(it's^[[0m");
}

// ============================================================================
// Minimal Emission
// ============================================================================

#[test]
fn repeated_tags_collapse() {
    insta::assert_snapshot!(show("[b][b]x[b]y"), @"^[[1mxy");
}

#[test]
fn cancelled_tags_emit_nothing() {
    assert_eq!(render("[b][_]x"), "x");
    assert_eq!(render("[red](  )"), "\x1b[31m  \x1b[0m");
    assert_eq!(render("[red]()"), "");
}

// ============================================================================
// Default Color
// ============================================================================

#[test]
fn default_color_keys() {
    let out = Renderer::new()
        .with_default_color(Rgba::rgb(200, 200, 200))
        .render("[default](a)[bg:default]b")
        .unwrap();
    insta::assert_snapshot!(visible(out), @"^[[38;2;200;200;200ma^[[48;2;200;200;200mb");
}

#[test]
fn default_key_without_default_color_is_literal() {
    assert_eq!(render("[default]x"), "[default]x");
}

#[test]
fn invalid_default_color_names_value() {
    let err = Renderer::new()
        .with_default_color(Rgba::rgba(1, 2, 3, 1.5))
        .render("x")
        .unwrap_err();
    assert!(matches!(err, FormatError::InvalidDefaultColor { .. }));
    let message = err.to_string();
    assert!(message.contains("rgba(1, 2, 3, 1.5)"), "{message}");
    assert!(message.contains("0.0-1.0"), "{message}");
}

// ============================================================================
// Escaping
// ============================================================================

#[test]
fn escape_then_render_is_identity() {
    for text in [
        "[red](A[b](B)C)",
        "[/red]text",
        "[nope](x[b]y)",
        "[u]/(x)",
        "plain [ text ] (here)",
    ] {
        assert_eq!(render(&fmtcodes::escape_markup(text)), text);
    }
}

#[test]
fn escape_with_either_marker() {
    let source = "[red](x) [/b]";
    for marker in [EscapeMarker::Slash, EscapeMarker::Backslash] {
        let escaped = Renderer::new().escape_marker(marker).escape(source);
        assert!(escaped.starts_with(&format!("[{}red]", marker.as_char())));
        assert_eq!(render(&escaped), source);
    }
}

#[test]
fn escape_ansi_shows_sequences() {
    insta::assert_snapshot!(escape_ansi(&render("[b](x)")), @r"\x1b[1mx\x1b[0m");
}

// ============================================================================
// Deep Nesting and Large Inputs
// ============================================================================

fn nested(depth: usize) -> String {
    format!("{}x{}", "[b](".repeat(depth), ")".repeat(depth))
}

#[test]
fn deep_nesting_degrades_to_text() {
    let depth = 10_000;
    let source = nested(depth);
    let flat = depth - MAX_GROUP_DEPTH;
    let expected = format!("{}x{}", "(".repeat(flat), ")".repeat(flat));
    assert_eq!(strip_markup(&source).text, expected);
    assert_eq!(strip_escaped(&render(&source)).text, expected);
}

#[test]
fn deep_nesting_escapes_back() {
    let source = nested(10_000);
    assert_eq!(render(&escape_markup(&source)), source);
}

#[test]
fn nesting_within_limit_is_all_groups() {
    let source = nested(MAX_GROUP_DEPTH);
    assert_eq!(render(&source), "\x1b[1mx\x1b[0m");
}

#[test]
fn bracket_floods_render_in_linear_time() {
    let inputs = [
        "[".repeat(200_000),
        "[b](".repeat(50_000),
        "[b]'(".repeat(40_000),
        "[x".repeat(100_000),
    ];
    for input in &inputs {
        let started = Instant::now();
        let out = render(input);
        assert!(strip_escaped(&out).text.len() <= input.len());
        assert!(
            started.elapsed() < Duration::from_secs(5),
            "{} bytes took {:?}",
            input.len(),
            started.elapsed()
        );
    }
}
