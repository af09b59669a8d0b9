//! Pixelift CLI Tool
//!
//! Command-line interface for enhancing, compositing, and cleaning up image
//! cutouts using the pixelift library.

#[cfg(feature = "cli")]
use pixelift::cli;

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    cli::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
