//! Pathway diagram input model.
//!
//! These types describe an already laid-out diagram as produced upstream:
//! absolute coordinates, shape descriptors and renderable-class tags. They
//! are deserialized from the diagram JSON (or built with the `with_*`
//! methods) and never mutated while rendering.
//!
//! - [`Diagram`] with its [`Node`]s, [`Edge`]s and [`Compartment`]s
//! - [`DecorationSet`]: per-request selection, flags and highlights
//! - [`AnalysisDataset`]: expression series or enrichment statistics

mod analysis;
mod decoration;
mod diagram;
mod element;

pub use analysis::{AnalysisBinding, AnalysisDataset, AnalysisType};
pub use decoration::DecorationSet;
pub use diagram::Diagram;
pub use element::{
    Attachment, Compartment, Connector, ConnectorRole, Edge, ElementId, Node, ReactionPart,
    ReactomeId, RenderableClass, Segment, ShapeDescriptor, ShapeKind, ShapeKindError,
    Stoichiometry,
};
