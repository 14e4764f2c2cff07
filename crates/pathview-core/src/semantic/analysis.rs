use indexmap::IndexMap;
use serde::Deserialize;

use crate::semantic::ReactomeId;

/// Kind of analysis overlaid on a diagram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisType {
    #[default]
    None,
    #[serde(alias = "OVERREPRESENTATION")]
    Enrichment,
    SpeciesComparison,
    Expression,
}

impl AnalysisType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Enrichment => "enrichment",
            Self::SpeciesComparison => "species comparison",
            Self::Expression => "expression",
        }
    }

    /// Enrichment and species comparison share statistics and rendering.
    pub fn is_enrichment_like(&self) -> bool {
        matches!(self, Self::Enrichment | Self::SpeciesComparison)
    }
}

/// Analysis result for one entity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AnalysisBinding {
    /// A complex or set: its own series plus one series per bound component
    Components {
        values: Vec<f64>,
        components: Vec<Vec<f64>>,
    },
    /// One value per expression column
    Expression { values: Vec<f64> },
    /// Over-representation statistics
    Enrichment {
        found: u32,
        total: u32,
        #[serde(rename = "pValue")]
        p_value: f64,
    },
}

impl AnalysisBinding {
    /// The expression value at `column`, if this is an expression binding.
    pub fn expression_at(&self, column: usize) -> Option<f64> {
        match self {
            Self::Expression { values } | Self::Components { values, .. } => values.get(column).copied(),
            Self::Enrichment { .. } => None,
        }
    }

    /// Every expression value the entity exposes at `column`.
    ///
    /// A complex contributes one value per component bound at the column,
    /// a single entity at most its own value.
    pub fn series_at(&self, column: usize) -> Vec<f64> {
        match self {
            Self::Components { components, .. } => components
                .iter()
                .filter_map(|series| series.get(column).copied())
                .collect(),
            Self::Expression { values } => values.get(column).copied().into_iter().collect(),
            Self::Enrichment { .. } => Vec::new(),
        }
    }

    /// Fraction of the entity's components found, in `[0, 1]`.
    pub fn found_ratio(&self) -> Option<f32> {
        match *self {
            Self::Enrichment { found, total, .. } if total > 0 => {
                Some((found as f32 / total as f32).clamp(0.0, 1.0))
            }
            _ => None,
        }
    }

    pub fn p_value(&self) -> Option<f64> {
        match *self {
            Self::Enrichment { p_value, .. } => Some(p_value),
            Self::Expression { .. } | Self::Components { .. } => None,
        }
    }
}

/// A fully resolved analysis result, passed in before rendering.
///
/// # Examples
///
/// ```
/// use pathview_core::semantic::{AnalysisBinding, AnalysisDataset, AnalysisType, ReactomeId};
///
/// let analysis = AnalysisDataset::new(AnalysisType::Expression)
///     .with_columns(["t0", "t1"])
///     .with_binding(ReactomeId::new(7), AnalysisBinding::Expression { values: vec![1.0, 3.0] });
///
/// assert_eq!(analysis.column_count(), 2);
/// assert_eq!(analysis.expression_range(), Some((1.0, 3.0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDataset {
    #[serde(rename = "type", default)]
    analysis_type: AnalysisType,
    #[serde(default)]
    bindings: IndexMap<ReactomeId, AnalysisBinding>,
    #[serde(default)]
    column_names: Vec<String>,
    min: Option<f64>,
    max: Option<f64>,
}

impl AnalysisDataset {
    pub fn new(analysis_type: AnalysisType) -> Self {
        Self {
            analysis_type,
            ..Self::default()
        }
    }

    /// A dataset carrying no analysis.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_binding(mut self, id: ReactomeId, binding: AnalysisBinding) -> Self {
        self.bindings.insert(id, binding);
        self
    }

    pub fn with_columns<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.column_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Declares the global expression range instead of deriving it from the values.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn analysis_type(&self) -> AnalysisType {
        self.analysis_type
    }

    pub fn binding(&self, id: ReactomeId) -> Option<&AnalysisBinding> {
        self.bindings.get(&id)
    }

    pub fn bindings(&self) -> &IndexMap<ReactomeId, AnalysisBinding> {
        &self.bindings
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Number of expression columns: the named columns, or the longest series.
    pub fn column_count(&self) -> usize {
        let longest = self
            .bindings
            .values()
            .map(|binding| match binding {
                AnalysisBinding::Expression { values } | AnalysisBinding::Components { values, .. } => {
                    values.len()
                }
                AnalysisBinding::Enrichment { .. } => 0,
            })
            .max()
            .unwrap_or(0);
        self.column_names.len().max(longest)
    }

    /// The (min, max) expression range, declared or derived from every value.
    pub fn expression_range(&self) -> Option<(f64, f64)> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            return Some((min, max));
        }
        self.bindings
            .values()
            .flat_map(|binding| match binding {
                AnalysisBinding::Expression { values } => values.clone(),
                AnalysisBinding::Components { values, components } => {
                    values.iter().chain(components.iter().flatten()).copied().collect()
                }
                AnalysisBinding::Enrichment { .. } => Vec::new(),
            })
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            })
    }
}
