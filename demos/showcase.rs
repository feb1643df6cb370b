//! Renders a few markup strings and shows what stripping removes.
//!
//! Run with `cargo run --example showcase`. Set `FMTCODES_LOG` to a file
//! path to capture trace output.

use fmtcodes_rs::log_init::init_logger;
use fmtcodes_rs::{EscapeMarker, Renderer, Rgba, StripMode, Stripper, escape_ansi, escape_markup, render, visible_width};
use log::LevelFilter;

const SAMPLES: &[&str] = &[
    "[b](Bold) and [i](italic) and [u|bright:cyan](underlined cyan)",
    "[red](Red, [b](bold red), red again)",
    "[bg:#224|white]( status ) [dim](idle)",
    "[hsl(30, 100%, 50%)](orange via hsl) [rgb(120, 200, 80)](green via rgb)",
    r#"[yellow](quote "with a ) inside" survives)"#,
    "[/b](escaped) and [nope](unknown) stay literal",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Ok(path) = std::env::var("FMTCODES_LOG") {
        init_logger(&path, LevelFilter::Trace)?;
    }

    for sample in SAMPLES {
        let rendered = render(sample);
        println!("{rendered}");
        println!("  width {}, source {:?}", visible_width(&rendered), escape_markup(sample));
    }

    let sample = "[b](bold) [red]red";
    println!("{}", escape_ansi(&render(sample)));
    println!("{}", Renderer::new().escape_marker(EscapeMarker::Backslash).escape(sample));

    let themed = Renderer::new().with_default_color(Rgba::rgb(180, 180, 200));
    println!("{}", themed.render("default [red]red[*] default again [b](bold)")?);

    let stripped = Stripper::new(StripMode::Markup)
        .report_removals(true)
        .strip("[b](hi) there");
    println!("{:?}", stripped.text);
    for removal in stripped.removals.unwrap_or_default() {
        println!("  removed {:?} at {}", removal.text, removal.position);
    }
    Ok(())
}
