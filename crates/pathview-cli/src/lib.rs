//! CLI logic for the Pathview exporter.
//!
//! Reads a JSON bundle holding a laid-out diagram together with its
//! decorations and analysis results, renders it through
//! [`pathview::DiagramRenderer`] and writes SVG.

mod args;
mod bundle;
mod config;

pub use args::Args;
pub use bundle::InputBundle;
pub use config::ConfigError;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;

use pathview::{DiagramRenderer, PathviewError};

/// Run the Pathview CLI application
///
/// This function loads the input bundle, renders it and writes the
/// resulting SVG to the output file, or one file per column with `--frames`.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `PathviewError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Input decoding errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), PathviewError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let app_config = config::apply_overrides(app_config, args.profile.as_deref(), args.scale)?;

    let bundle = InputBundle::from_path(&args.input)?;
    let renderer = DiagramRenderer::new(app_config)?;

    if args.frames {
        let frames = renderer.frames_svg(&bundle.diagram, &bundle.decoration, &bundle.analysis)?;
        for (column, svg) in frames.iter().enumerate() {
            let path = frame_path(&args.output, column);
            fs::write(&path, svg)?;
            info!(column, output_file = path.display().to_string(); "Frame exported");
        }
        info!(frames = frames.len(); "Animation exported successfully");
        return Ok(());
    }

    let svg = renderer.render_svg(&bundle.diagram, &bundle.decoration, &bundle.analysis)?;
    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}

/// Output path of one animation frame: the column number appended to the stem.
///
/// ```
/// use std::path::PathBuf;
///
/// assert_eq!(pathview_cli::frame_path("out/diagram.svg", 2), PathBuf::from("out/diagram-2.svg"));
/// assert_eq!(pathview_cli::frame_path("diagram", 0), PathBuf::from("diagram-0.svg"));
/// ```
pub fn frame_path(output: impl AsRef<Path>, column: usize) -> PathBuf {
    let output = output.as_ref();
    let stem = output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{stem}-{column}.svg"))
}
