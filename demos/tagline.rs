//! Hero tagline demo - the landing page typewriter in a terminal.
//!
//! Run with: cargo run --example tagline
//! Quit with Esc, q or Ctrl+C. Set RUST_LOG=spark_typewriter=debug for
//! lifecycle logs on stderr.

use spark_typewriter::pipeline::{mount, run};
use spark_typewriter::presets::{self, HERO_HEADLINE};
use spark_typewriter::{CursorStyle, DrawnCursorConfig};

fn main() -> spark_typewriter::Result<()> {
    env_logger::init();

    let cursor = match std::env::args().nth(1).as_deref() {
        Some("block") => DrawnCursorConfig::with_style(CursorStyle::Block),
        Some("underline") => DrawnCursorConfig::with_style(CursorStyle::Underline),
        _ => DrawnCursorConfig::default(),
    };

    println!("{}", HERO_HEADLINE);
    println!();

    let handle = mount(presets::hero_tagline(), std::io::stdout(), cursor)?;
    run(&handle)?;
    handle.unmount();

    Ok(())
}
