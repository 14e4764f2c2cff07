//! The Diagram Index.
//!
//! Built once per request, before anything is drawn. It classifies every
//! element into a [`RenderState`] and records selection, flag, halo and
//! analysis-hit membership. Renderers only read it.
//!
//! # Render state
//!
//! Assigned by a fixed priority:
//!
//! 1. `FadeOut` when the element is faded out
//! 2. with an active analysis, `Hit`/`HitDisease` when the entity has an
//!    analysis binding, otherwise `NotHit`/`NotHitDisease`
//! 3. `Disease` for disease elements
//! 4. `Normal`
//!
//! Selection is membership, not a state: whether an element is selected is
//! asked separately, and the style resolver lets it win over every state.
//!
//! # Halo propagation
//!
//! Reactions and their participants form a bipartite participation graph.
//! Selecting a node halos the node, every reaction it takes part in and
//! every connector of those reactions. Selecting a reaction halos the
//! reaction, all of its participant nodes and all of its connectors.
//! Propagation is a single hop, so a second build over the same input
//! yields identical sets, and adding a selection never removes a halo member.

use indexmap::{IndexMap, IndexSet};
use log::{debug, info, trace, warn};
use petgraph::graphmap::UnGraphMap;

use pathview_core::semantic::{
    AnalysisDataset, AnalysisType, Compartment, ConnectorRole, DecorationSet, Diagram, Edge,
    ElementId, Node, ReactomeId,
};

/// Drawing state of an element, derived once by the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RenderState {
    #[default]
    Normal,
    Disease,
    FadeOut,
    /// Analysis hit
    Hit,
    /// Analysis hit on a disease element
    HitDisease,
    /// Not hit by the active analysis
    NotHit,
    NotHitDisease,
}

impl RenderState {
    fn classify(fade_out: bool, disease: bool, analysis: AnalysisType, hit: bool) -> Self {
        match (fade_out, analysis, hit, disease) {
            (true, ..) => Self::FadeOut,
            (false, AnalysisType::None, _, true) => Self::Disease,
            (false, AnalysisType::None, _, false) => Self::Normal,
            (false, _, true, true) => Self::HitDisease,
            (false, _, true, false) => Self::Hit,
            (false, _, false, true) => Self::NotHitDisease,
            (false, _, false, false) => Self::NotHit,
        }
    }

    pub fn is_disease(self) -> bool {
        matches!(self, Self::Disease | Self::HitDisease | Self::NotHitDisease)
    }

    pub fn is_hit(self) -> bool {
        matches!(self, Self::Hit | Self::HitDisease)
    }

    pub fn is_not_hit(self) -> bool {
        matches!(self, Self::NotHit | Self::NotHitDisease)
    }
}

/// Roles a node plays in one reaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleSet(u8);

impl RoleSet {
    fn bit(role: ConnectorRole) -> u8 {
        match role {
            ConnectorRole::Input => 1,
            ConnectorRole::Output => 1 << 1,
            ConnectorRole::Catalyst => 1 << 2,
            ConnectorRole::Activator => 1 << 3,
            ConnectorRole::Inhibitor => 1 << 4,
        }
    }

    pub fn of(role: ConnectorRole) -> Self {
        Self(Self::bit(role))
    }

    pub fn insert(&mut self, role: ConnectorRole) {
        self.0 |= Self::bit(role);
    }

    pub fn contains(self, role: ConnectorRole) -> bool {
        self.0 & Self::bit(role) != 0
    }
}

/// Everything a renderer needs to know about one element's decoration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementState {
    pub render: RenderState,
    pub selected: bool,
    pub haloed: bool,
    pub flagged: bool,
}

/// Per-request classification of a diagram.
#[derive(Debug, Clone)]
pub struct DiagramIndex<'a> {
    diagram: &'a Diagram,
    analysis_type: AnalysisType,
    nodes: IndexMap<ElementId, &'a Node>,
    edges: IndexMap<ElementId, &'a Edge>,
    by_reactome: IndexMap<ReactomeId, Vec<ElementId>>,
    participation: UnGraphMap<ElementId, RoleSet>,
    states: IndexMap<ElementId, RenderState>,
    selected: IndexSet<ElementId>,
    flagged: IndexSet<ElementId>,
    halo: IndexSet<ElementId>,
    /// (node, reaction) pairs
    halo_connectors: IndexSet<(ElementId, ElementId)>,
    hits: IndexSet<ElementId>,
}

impl<'a> DiagramIndex<'a> {
    /// Builds the index in one pass over nodes, then edges.
    ///
    /// Participant ids that match no node are logged and skipped.
    pub fn build(
        diagram: &'a Diagram,
        decoration: &DecorationSet,
        analysis: &AnalysisDataset,
    ) -> Self {
        let mut index = Self {
            diagram,
            analysis_type: analysis.analysis_type(),
            nodes: IndexMap::with_capacity(diagram.nodes().len()),
            edges: IndexMap::with_capacity(diagram.edges().len()),
            by_reactome: IndexMap::new(),
            participation: UnGraphMap::new(),
            states: IndexMap::new(),
            selected: IndexSet::new(),
            flagged: IndexSet::new(),
            halo: IndexSet::new(),
            halo_connectors: IndexSet::new(),
            hits: IndexSet::new(),
        };
        index.register(diagram);

        for node in diagram.nodes() {
            index.classify_node(node, decoration, analysis);
        }
        for edge in diagram.edges() {
            index.classify_edge(edge, decoration, analysis);
        }
        for compartment in diagram.compartments() {
            index.classify_compartment(compartment);
        }
        index.report_unmatched(decoration);

        info!(
            diagram = diagram.stable_id(),
            nodes = index.nodes.len(),
            edges = index.edges.len(),
            selected = index.selected.len(),
            haloed = index.halo.len(),
            hits = index.hits.len();
            "Diagram index built"
        );
        index
    }

    fn register(&mut self, diagram: &'a Diagram) {
        for node in diagram.nodes() {
            self.nodes.insert(node.id(), node);
            self.participation.add_node(node.id());
            self.by_reactome.entry(node.reactome_id()).or_default().push(node.id());
        }
        for edge in diagram.edges() {
            self.edges.insert(edge.id(), edge);
            self.participation.add_node(edge.id());
            self.by_reactome.entry(edge.reactome_id()).or_default().push(edge.id());
        }

        for edge in diagram.edges() {
            for (role, node_id) in edge.participants() {
                if !self.nodes.contains_key(&node_id) {
                    warn!(reaction = edge.id().value(), participant = node_id.value(); "Dangling participant id, skipping");
                    continue;
                }
                self.link(edge.id(), node_id, role);
            }
        }
        for node in diagram.nodes() {
            for connector in node.connectors() {
                if !self.edges.contains_key(&connector.edge_id()) {
                    warn!(node = node.id().value(), reaction = connector.edge_id().value(); "Connector references unknown reaction, skipping");
                    continue;
                }
                self.link(connector.edge_id(), node.id(), connector.role());
            }
        }
        debug!(links = self.participation.edge_count(); "Participation graph built");
    }

    fn link(&mut self, reaction: ElementId, node: ElementId, role: ConnectorRole) {
        match self.participation.edge_weight_mut(reaction, node) {
            Some(roles) => roles.insert(role),
            None => {
                self.participation.add_edge(reaction, node, RoleSet::of(role));
            }
        }
    }

    fn has_binding(&self, id: ReactomeId, analysis: &AnalysisDataset) -> bool {
        self.analysis_type != AnalysisType::None && analysis.binding(id).is_some()
    }

    fn classify_node(&mut self, node: &Node, decoration: &DecorationSet, analysis: &AnalysisDataset) {
        let hit = self.has_binding(node.reactome_id(), analysis);
        if hit {
            self.hits.insert(node.id());
        }
        let state = RenderState::classify(node.is_fade_out(), node.is_disease(), self.analysis_type, hit);
        self.states.insert(node.id(), state);

        if decoration.is_flagged(node.reactome_id()) {
            self.flagged.insert(node.id());
        }
        if decoration.is_selected(node.reactome_id()) {
            self.selected.insert(node.id());
            self.halo.insert(node.id());
            let reactions: Vec<ElementId> = self
                .participation
                .neighbors(node.id())
                .filter(|id| self.edges.contains_key(id))
                .collect();
            for reaction in reactions {
                trace!(node = node.id().value(), reaction = reaction.value(); "Halo propagated to reaction");
                self.halo_reaction_with_connectors(reaction);
            }
        }
    }

    fn classify_edge(&mut self, edge: &Edge, decoration: &DecorationSet, analysis: &AnalysisDataset) {
        let hit = self.has_binding(edge.reactome_id(), analysis);
        if hit {
            self.hits.insert(edge.id());
        }
        let state = RenderState::classify(edge.is_fade_out(), edge.is_disease(), self.analysis_type, hit);
        self.states.insert(edge.id(), state);

        if decoration.is_flagged(edge.reactome_id()) {
            self.flagged.insert(edge.id());
        }
        if decoration.is_selected(edge.reactome_id()) {
            self.selected.insert(edge.id());
            let participants: Vec<ElementId> = self.participation.neighbors(edge.id()).collect();
            self.halo.extend(participants);
            self.halo_reaction_with_connectors(edge.id());
        }
    }

    fn classify_compartment(&mut self, compartment: &Compartment) {
        let state = RenderState::classify(
            compartment.is_fade_out(),
            false,
            self.analysis_type,
            false,
        );
        self.states.insert(compartment.id(), state);
    }

    fn halo_reaction_with_connectors(&mut self, reaction: ElementId) {
        self.halo.insert(reaction);
        let connectors: Vec<(ElementId, ElementId)> = self
            .participation
            .neighbors(reaction)
            .map(|node| (node, reaction))
            .collect();
        self.halo_connectors.extend(connectors);
    }

    fn report_unmatched(&self, decoration: &DecorationSet) {
        let ids = decoration
            .selected()
            .iter()
            .chain(decoration.flagged())
            .chain(decoration.analysis_highlighted());
        for id in ids {
            if !self.by_reactome.contains_key(id) {
                debug!(id = id.value(); "Decoration id matches no element");
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn diagram(&self) -> &'a Diagram {
        self.diagram
    }

    pub fn analysis_type(&self) -> AnalysisType {
        self.analysis_type
    }

    pub fn node(&self, id: ElementId) -> Option<&'a Node> {
        self.nodes.get(&id).copied()
    }

    pub fn edge(&self, id: ElementId) -> Option<&'a Edge> {
        self.edges.get(&id).copied()
    }

    /// Render state of an element; unknown ids are `Normal`.
    pub fn state(&self, id: ElementId) -> RenderState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    pub fn states(&self) -> &IndexMap<ElementId, RenderState> {
        &self.states
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected.contains(&id)
    }

    pub fn is_flagged(&self, id: ElementId) -> bool {
        self.flagged.contains(&id)
    }

    pub fn is_haloed(&self, id: ElementId) -> bool {
        self.halo.contains(&id)
    }

    pub fn is_hit(&self, id: ElementId) -> bool {
        self.hits.contains(&id)
    }

    /// True if the connector from `node` to `reaction` is haloed.
    ///
    /// Haloed connectors are also drawn with the selection stroke.
    pub fn is_connector_haloed(&self, node: ElementId, reaction: ElementId) -> bool {
        self.halo_connectors.contains(&(node, reaction))
    }

    pub fn halo(&self) -> &IndexSet<ElementId> {
        &self.halo
    }

    pub fn halo_connectors(&self) -> &IndexSet<(ElementId, ElementId)> {
        &self.halo_connectors
    }

    pub fn selected(&self) -> &IndexSet<ElementId> {
        &self.selected
    }

    /// Decoration summary of an element.
    pub fn element_state(&self, id: ElementId) -> ElementState {
        ElementState {
            render: self.state(id),
            selected: self.is_selected(id),
            haloed: self.is_haloed(id),
            flagged: self.is_flagged(id),
        }
    }

    /// Decoration summary of a connector: colors follow the owning reaction.
    pub fn connector_state(&self, node: ElementId, reaction: ElementId) -> ElementState {
        let haloed = self.is_connector_haloed(node, reaction);
        let node_faded = self.state(node) == RenderState::FadeOut;
        let render = match self.state(reaction) {
            _ if node_faded => RenderState::FadeOut,
            state => state,
        };
        ElementState {
            render,
            selected: haloed,
            haloed,
            flagged: false,
        }
    }

    /// Roles `node` plays in `reaction`, if it participates.
    pub fn roles(&self, reaction: ElementId, node: ElementId) -> Option<RoleSet> {
        self.participation.edge_weight(reaction, node).copied()
    }

    /// Reactions a node participates in.
    pub fn reactions_of(&self, node: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.participation
            .neighbors(node)
            .filter(|id| self.edges.contains_key(id))
    }

    /// Element ids depicting the given entity.
    pub fn elements_for(&self, id: ReactomeId) -> &[ElementId] {
        self.by_reactome.get(&id).map(Vec::as_slice).unwrap_or_default()
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use pathview_core::{
        geometry::{Bounds, Point},
        semantic::RenderableClass,
    };

    use super::*;

    /// Two reactions sharing node 3: 1,2 -> r20 -> 3 and 3 -> r21 -> 4,5; node 6 is alone.
    fn shared_node_diagram() -> Diagram {
        let node = |id: u64| {
            Node::new(
                ElementId::new(id),
                ReactomeId::new(100 + id),
                "n",
                RenderableClass::Chemical,
                Bounds::new(0.0, 0.0, 10.0, 10.0),
            )
        };
        let reaction = |id: u64, inputs: &[u64], outputs: &[u64]| {
            let mut edge = Edge::new(ElementId::new(id), ReactomeId::new(100 + id), "r", Point::new(0.0, 0.0));
            for input in inputs {
                edge = edge.with_participant(ConnectorRole::Input, ElementId::new(*input));
            }
            for output in outputs {
                edge = edge.with_participant(ConnectorRole::Output, ElementId::new(*output));
            }
            edge
        };
        (1..=6)
            .fold(Diagram::new("R-HSA-2", "shared"), |d, id| d.with_node(node(id)))
            .with_edge(reaction(20, &[1, 2], &[3]))
            .with_edge(reaction(21, &[3], &[4, 5]))
    }

    fn selection_strategy() -> impl Strategy<Value = Vec<u64>> {
        prop::collection::vec(prop::sample::select(vec![101u64, 102, 103, 104, 105, 106, 120, 121, 999]), 0..6)
    }

    /// Adding one id to the selection never removes a halo member.
    fn check_halo_is_monotonic(selection: Vec<u64>, extra: u64) -> Result<(), TestCaseError> {
        let diagram = shared_node_diagram();
        let ids = |values: &[u64]| values.iter().map(|v| ReactomeId::new(*v)).collect::<Vec<_>>();
        let smaller = DecorationSet::new().with_selected(ids(&selection));
        let mut grown = selection.clone();
        grown.push(extra);
        let larger = DecorationSet::new().with_selected(ids(&grown));

        let before = DiagramIndex::build(&diagram, &smaller, &AnalysisDataset::none());
        let after = DiagramIndex::build(&diagram, &larger, &AnalysisDataset::none());

        prop_assert!(before.halo().is_subset(after.halo()));
        prop_assert!(before.halo_connectors().is_subset(after.halo_connectors()));
        for selected in before.selected() {
            prop_assert!(before.halo().contains(selected));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn halo_is_monotonic(
            selection in selection_strategy(),
            extra in prop::sample::select(vec![101u64, 103, 106, 120, 121]),
        ) {
            check_halo_is_monotonic(selection, extra)?;
        }
    }
}
