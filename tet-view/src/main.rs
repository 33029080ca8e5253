//! Application entry point for the tetrahedron tree viewer.
//!
//! This binary sets up logging and eframe/egui, and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod camera;
mod viewer;

use tracing_subscriber::EnvFilter;
use viewer::Viewer;

/// Starts the native eframe application.
///
/// Log output is controlled through `RUST_LOG` and defaults to `info`.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Tetrahedron Tree",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new()))),
    )
}
