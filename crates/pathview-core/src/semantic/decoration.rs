use indexmap::IndexSet;
use serde::Deserialize;

use crate::semantic::ReactomeId;

/// Per-request decoration of a diagram.
///
/// All three sets hold database ids; one id decorates every glyph that
/// depicts the entity. `analysis_highlighted` entities are emphasised in the
/// legend (their values add ticks) without being selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecorationSet {
    flagged: IndexSet<ReactomeId>,
    selected: IndexSet<ReactomeId>,
    analysis_highlighted: IndexSet<ReactomeId>,
}

impl DecorationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selected(mut self, ids: impl IntoIterator<Item = ReactomeId>) -> Self {
        self.selected.extend(ids);
        self
    }

    pub fn with_flagged(mut self, ids: impl IntoIterator<Item = ReactomeId>) -> Self {
        self.flagged.extend(ids);
        self
    }

    pub fn with_analysis_highlighted(mut self, ids: impl IntoIterator<Item = ReactomeId>) -> Self {
        self.analysis_highlighted.extend(ids);
        self
    }

    pub fn flagged(&self) -> &IndexSet<ReactomeId> {
        &self.flagged
    }

    pub fn selected(&self) -> &IndexSet<ReactomeId> {
        &self.selected
    }

    pub fn analysis_highlighted(&self) -> &IndexSet<ReactomeId> {
        &self.analysis_highlighted
    }

    pub fn is_selected(&self, id: ReactomeId) -> bool {
        self.selected.contains(&id)
    }

    pub fn is_flagged(&self, id: ReactomeId) -> bool {
        self.flagged.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.flagged.is_empty() && self.selected.is_empty() && self.analysis_highlighted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoration_from_partial_json() {
        let decoration: DecorationSet = serde_json::from_str(r#"{"selected": [3, 1]}"#).unwrap();
        assert!(decoration.is_selected(ReactomeId::new(1)));
        assert!(!decoration.is_flagged(ReactomeId::new(1)));
        assert!(decoration.analysis_highlighted().is_empty());
        let order: Vec<_> = decoration.selected().iter().map(|id| id.value()).collect();
        assert_eq!(order, [3, 1]);
    }

    #[test]
    fn test_decoration_builders() {
        let decoration = DecorationSet::new()
            .with_flagged([ReactomeId::new(5)])
            .with_selected([ReactomeId::new(6), ReactomeId::new(6)]);
        assert!(decoration.is_flagged(ReactomeId::new(5)));
        assert_eq!(decoration.selected().len(), 1);
        assert!(!decoration.is_empty());
        assert!(DecorationSet::new().is_empty());
    }
}
