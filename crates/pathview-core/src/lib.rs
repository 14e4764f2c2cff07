//! Pathview Core Types and Definitions
//!
//! This crate provides the foundational pieces of the Pathview pathway
//! diagram renderer. Nothing here knows about decoration or analysis
//! policy; it is the toolbox the pipeline in the `pathview` crate is built
//! from:
//!
//! - **Colors**: CSS color handling and sRGB interpolation ([`color::Color`])
//! - **Geometry**: Points, sizes, bounds and insets ([`geometry`] module)
//! - **Gradients**: Multi-stop color gradients ([`gradient::Gradient`])
//! - **Draw**: Paths, the shape library, strokes, text fitting and the
//!   layered canvas ([`draw`] module)
//! - **Semantic**: The pathway diagram input model ([`semantic`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod gradient;
pub mod semantic;
