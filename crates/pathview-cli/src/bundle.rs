//! The JSON input bundle.

use std::{fs, io, path::Path};

use log::debug;
use serde::Deserialize;

use pathview::semantic::{AnalysisDataset, DecorationSet, Diagram};

/// Everything one render request needs.
///
/// `decoration` and `analysis` may be omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct InputBundle {
    pub diagram: Diagram,
    #[serde(default)]
    pub decoration: DecorationSet,
    #[serde(default)]
    pub analysis: AnalysisDataset,
}

impl InputBundle {
    /// Decodes a bundle from JSON text.
    pub fn from_json(source: &str) -> io::Result<Self> {
        let bundle: Self = serde_json::from_str(source)?;
        debug!(
            diagram = bundle.diagram.stable_id(),
            nodes = bundle.diagram.nodes().len(),
            edges = bundle.diagram.edges().len(),
            analysis = bundle.analysis.analysis_type().name();
            "Input bundle decoded"
        );
        Ok(bundle)
    }

    /// Reads and decodes a bundle file.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
