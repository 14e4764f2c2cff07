//! Output backends.
//!
//! The rendering pipeline only knows the [`Surface`](pathview_core::draw::Surface)
//! trait. This module holds the concrete surfaces shipped with the crate.

pub mod svg;

use thiserror::Error;

pub use self::svg::SvgSurface;

/// Failure of an output backend.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
