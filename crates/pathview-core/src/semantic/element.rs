//! Diagram elements: nodes, reactions, connectors and compartments.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::{Bounds, Point};

/// Diagram-local element id, unique across nodes, edges and compartments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ElementId(u64);

impl ElementId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database id of the entity an element depicts.
///
/// Several glyphs of one diagram may share a `ReactomeId`; decorations and
/// analysis results are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ReactomeId(u64);

impl ReactomeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReactomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

/// Tag selecting the renderer and palette entry of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub enum RenderableClass {
    Compartment,
    Protein,
    ProteinDrug,
    Complex,
    ComplexDrug,
    Chemical,
    ChemicalDrug,
    EntitySet,
    EntitySetDrug,
    Gene,
    #[serde(rename = "RNA")]
    Rna,
    #[serde(rename = "RNADrug")]
    RnaDrug,
    Entity,
    ProcessNode,
    EncapsulatedNode,
    Reaction,
}

impl RenderableClass {
    pub const ALL: [RenderableClass; 16] = [
        Self::Compartment,
        Self::Protein,
        Self::ProteinDrug,
        Self::Complex,
        Self::ComplexDrug,
        Self::Chemical,
        Self::ChemicalDrug,
        Self::EntitySet,
        Self::EntitySetDrug,
        Self::Gene,
        Self::Rna,
        Self::RnaDrug,
        Self::Entity,
        Self::ProcessNode,
        Self::EncapsulatedNode,
        Self::Reaction,
    ];

    /// The class name as it appears in diagram files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Compartment => "Compartment",
            Self::Protein => "Protein",
            Self::ProteinDrug => "ProteinDrug",
            Self::Complex => "Complex",
            Self::ComplexDrug => "ComplexDrug",
            Self::Chemical => "Chemical",
            Self::ChemicalDrug => "ChemicalDrug",
            Self::EntitySet => "EntitySet",
            Self::EntitySetDrug => "EntitySetDrug",
            Self::Gene => "Gene",
            Self::Rna => "RNA",
            Self::RnaDrug => "RNADrug",
            Self::Entity => "Entity",
            Self::ProcessNode => "ProcessNode",
            Self::EncapsulatedNode => "EncapsulatedNode",
            Self::Reaction => "Reaction",
        }
    }
}

impl fmt::Display for RenderableClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A straight piece of a connector or reaction backbone.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Segment {
    from: Point,
    to: Point,
}

impl Segment {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    pub fn from(&self) -> Point {
        self.from
    }

    pub fn to(&self) -> Point {
        self.to
    }
}

/// Resolved type of a [`ShapeDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Arrow,
    Box,
    Circle,
    DoubleCircle,
    Stop,
}

/// A shape descriptor whose type is not known to this renderer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown shape type `{0}`")]
pub struct ShapeKindError(pub String);

/// Control points of a reaction shape, connector end or attachment box.
///
/// The shape `type` is kept as written in the diagram file and resolved at
/// render time with [`ShapeDescriptor::kind`], so a diagram using a newer
/// shape vocabulary still loads and fails only for the affected element.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ShapeDescriptor {
    #[serde(rename = "type")]
    kind: String,
    a: Option<Point>,
    b: Option<Point>,
    c: Option<Point>,
    r: Option<f32>,
    r1: Option<f32>,
    #[serde(default)]
    empty: bool,
    s: Option<String>,
}

impl ShapeDescriptor {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Triangle `a`, `b`, `c`
    pub fn arrow(a: Point, b: Point, c: Point) -> Self {
        Self {
            a: Some(a),
            b: Some(b),
            c: Some(c),
            ..Self::new("ARROW")
        }
    }

    /// Rectangle with corners `a` and `b`
    pub fn rectangle(a: Point, b: Point) -> Self {
        Self {
            a: Some(a),
            b: Some(b),
            ..Self::new("BOX")
        }
    }

    pub fn circle(center: Point, r: f32) -> Self {
        Self {
            c: Some(center),
            r: Some(r),
            ..Self::new("CIRCLE")
        }
    }

    pub fn double_circle(center: Point, r: f32, r1: f32) -> Self {
        Self {
            c: Some(center),
            r: Some(r),
            r1: Some(r1),
            ..Self::new("DOUBLE_CIRCLE")
        }
    }

    /// Bar from `a` to `b`
    pub fn stop(a: Point, b: Point) -> Self {
        Self {
            a: Some(a),
            b: Some(b),
            ..Self::new("STOP")
        }
    }

    pub fn with_empty(mut self, empty: bool) -> Self {
        self.empty = empty;
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.s = Some(symbol.into());
        self
    }

    /// The raw type string
    pub fn kind_name(&self) -> &str {
        &self.kind
    }

    /// Resolves the shape type.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeKindError`] for a type this renderer does not know.
    pub fn kind(&self) -> Result<ShapeKind, ShapeKindError> {
        match self.kind.as_str() {
            "ARROW" => Ok(ShapeKind::Arrow),
            "BOX" => Ok(ShapeKind::Box),
            "CIRCLE" => Ok(ShapeKind::Circle),
            "DOUBLE_CIRCLE" => Ok(ShapeKind::DoubleCircle),
            "STOP" => Ok(ShapeKind::Stop),
            other => Err(ShapeKindError(other.to_string())),
        }
    }

    pub fn a(&self) -> Option<Point> {
        self.a
    }

    pub fn b(&self) -> Option<Point> {
        self.b
    }

    pub fn c(&self) -> Option<Point> {
        self.c
    }

    pub fn r(&self) -> Option<f32> {
        self.r
    }

    pub fn r1(&self) -> Option<f32> {
        self.r1
    }

    /// Hollow shapes are filled with the background color
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Symbol drawn inside the shape, such as `?` or `\\`
    pub fn symbol(&self) -> Option<&str> {
        self.s.as_deref()
    }

    /// Every control point present in the descriptor.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        [self.a, self.b, self.c].into_iter().flatten()
    }
}

/// Role of a node in a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectorRole {
    Input,
    Output,
    Catalyst,
    Activator,
    Inhibitor,
}

/// Stoichiometry label of a connector.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Stoichiometry {
    value: i32,
    shape: Option<ShapeDescriptor>,
}

impl Stoichiometry {
    pub fn new(value: i32, shape: ShapeDescriptor) -> Self {
        Self {
            value,
            shape: Some(shape),
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn shape(&self) -> Option<&ShapeDescriptor> {
        self.shape.as_ref()
    }
}

/// The drawn link between a node and one reaction it takes part in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    edge_id: ElementId,
    #[serde(rename = "type")]
    role: ConnectorRole,
    #[serde(default)]
    segments: Vec<Segment>,
    end_shape: Option<ShapeDescriptor>,
    stoichiometry: Option<Stoichiometry>,
}

impl Connector {
    pub fn new(edge_id: ElementId, role: ConnectorRole) -> Self {
        Self {
            edge_id,
            role,
            segments: Vec::new(),
            end_shape: None,
            stoichiometry: None,
        }
    }

    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn with_end_shape(mut self, shape: ShapeDescriptor) -> Self {
        self.end_shape = Some(shape);
        self
    }

    pub fn with_stoichiometry(mut self, stoichiometry: Stoichiometry) -> Self {
        self.stoichiometry = Some(stoichiometry);
        self
    }

    /// The reaction this connector belongs to
    pub fn edge_id(&self) -> ElementId {
        self.edge_id
    }

    pub fn role(&self) -> ConnectorRole {
        self.role
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn end_shape(&self) -> Option<&ShapeDescriptor> {
        self.end_shape.as_ref()
    }

    pub fn stoichiometry(&self) -> Option<&Stoichiometry> {
        self.stoichiometry.as_ref()
    }
}

/// A post-translational modification box attached to a node border.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Attachment {
    label: Option<String>,
    shape: ShapeDescriptor,
}

impl Attachment {
    pub fn new(label: Option<String>, shape: ShapeDescriptor) -> Self {
        Self { label, shape }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn shape(&self) -> &ShapeDescriptor {
        &self.shape
    }
}

/// A physical entity glyph: protein, complex, chemical, gene and so on.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    id: ElementId,
    reactome_id: ReactomeId,
    display_name: String,
    renderable_class: RenderableClass,
    prop: Bounds,
    #[serde(default)]
    connectors: Vec<Connector>,
    #[serde(default)]
    node_attachments: Vec<Attachment>,
    #[serde(default)]
    is_disease: bool,
    #[serde(default)]
    is_fade_out: bool,
    #[serde(default)]
    need_dashed_border: bool,
    #[serde(default)]
    is_crossed: bool,
}

impl Node {
    pub fn new(
        id: ElementId,
        reactome_id: ReactomeId,
        display_name: impl Into<String>,
        renderable_class: RenderableClass,
        prop: Bounds,
    ) -> Self {
        Self {
            id,
            reactome_id,
            display_name: display_name.into(),
            renderable_class,
            prop,
            connectors: Vec::new(),
            node_attachments: Vec::new(),
            is_disease: false,
            is_fade_out: false,
            need_dashed_border: false,
            is_crossed: false,
        }
    }

    pub fn with_connector(mut self, connector: Connector) -> Self {
        self.connectors.push(connector);
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.node_attachments.push(attachment);
        self
    }

    pub fn with_disease(mut self, is_disease: bool) -> Self {
        self.is_disease = is_disease;
        self
    }

    pub fn with_fade_out(mut self, is_fade_out: bool) -> Self {
        self.is_fade_out = is_fade_out;
        self
    }

    pub fn with_dashed_border(mut self, need_dashed_border: bool) -> Self {
        self.need_dashed_border = need_dashed_border;
        self
    }

    pub fn with_crossed(mut self, is_crossed: bool) -> Self {
        self.is_crossed = is_crossed;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn reactome_id(&self) -> ReactomeId {
        self.reactome_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn renderable_class(&self) -> RenderableClass {
        self.renderable_class
    }

    /// The node rectangle
    pub fn prop(&self) -> Bounds {
        self.prop
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.node_attachments
    }

    pub fn is_disease(&self) -> bool {
        self.is_disease
    }

    pub fn is_fade_out(&self) -> bool {
        self.is_fade_out
    }

    pub fn need_dashed_border(&self) -> bool {
        self.need_dashed_border
    }

    pub fn is_crossed(&self) -> bool {
        self.is_crossed
    }
}

/// A participant reference in a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ReactionPart {
    id: ElementId,
    stoichiometry: Option<i32>,
}

impl ReactionPart {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            stoichiometry: None,
        }
    }

    /// The participating node
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn stoichiometry(&self) -> Option<i32> {
        self.stoichiometry
    }
}

/// A reaction glyph and its participants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    id: ElementId,
    reactome_id: ReactomeId,
    display_name: String,
    renderable_class: RenderableClass,
    position: Point,
    #[serde(default)]
    segments: Vec<Segment>,
    reaction_shape: Option<ShapeDescriptor>,
    end_shape: Option<ShapeDescriptor>,
    #[serde(default)]
    inputs: Vec<ReactionPart>,
    #[serde(default)]
    outputs: Vec<ReactionPart>,
    #[serde(default)]
    catalysts: Vec<ReactionPart>,
    #[serde(default)]
    activators: Vec<ReactionPart>,
    #[serde(default)]
    inhibitors: Vec<ReactionPart>,
    #[serde(default)]
    is_disease: bool,
    #[serde(default)]
    is_fade_out: bool,
}

impl Edge {
    pub fn new(
        id: ElementId,
        reactome_id: ReactomeId,
        display_name: impl Into<String>,
        position: Point,
    ) -> Self {
        Self {
            id,
            reactome_id,
            display_name: display_name.into(),
            renderable_class: RenderableClass::Reaction,
            position,
            segments: Vec::new(),
            reaction_shape: None,
            end_shape: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            catalysts: Vec::new(),
            activators: Vec::new(),
            inhibitors: Vec::new(),
            is_disease: false,
            is_fade_out: false,
        }
    }

    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn with_reaction_shape(mut self, shape: ShapeDescriptor) -> Self {
        self.reaction_shape = Some(shape);
        self
    }

    pub fn with_end_shape(mut self, shape: ShapeDescriptor) -> Self {
        self.end_shape = Some(shape);
        self
    }

    /// Adds a participant with the given role.
    pub fn with_participant(mut self, role: ConnectorRole, node: ElementId) -> Self {
        let part = ReactionPart::new(node);
        match role {
            ConnectorRole::Input => self.inputs.push(part),
            ConnectorRole::Output => self.outputs.push(part),
            ConnectorRole::Catalyst => self.catalysts.push(part),
            ConnectorRole::Activator => self.activators.push(part),
            ConnectorRole::Inhibitor => self.inhibitors.push(part),
        }
        self
    }

    pub fn with_disease(mut self, is_disease: bool) -> Self {
        self.is_disease = is_disease;
        self
    }

    pub fn with_fade_out(mut self, is_fade_out: bool) -> Self {
        self.is_fade_out = is_fade_out;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn reactome_id(&self) -> ReactomeId {
        self.reactome_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn renderable_class(&self) -> RenderableClass {
        self.renderable_class
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn reaction_shape(&self) -> Option<&ShapeDescriptor> {
        self.reaction_shape.as_ref()
    }

    pub fn end_shape(&self) -> Option<&ShapeDescriptor> {
        self.end_shape.as_ref()
    }

    pub fn inputs(&self) -> &[ReactionPart] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[ReactionPart] {
        &self.outputs
    }

    pub fn catalysts(&self) -> &[ReactionPart] {
        &self.catalysts
    }

    pub fn activators(&self) -> &[ReactionPart] {
        &self.activators
    }

    pub fn inhibitors(&self) -> &[ReactionPart] {
        &self.inhibitors
    }

    /// Every participant with its role, inputs first.
    pub fn participants(&self) -> impl Iterator<Item = (ConnectorRole, ElementId)> + '_ {
        let roles = [
            (ConnectorRole::Input, &self.inputs),
            (ConnectorRole::Output, &self.outputs),
            (ConnectorRole::Catalyst, &self.catalysts),
            (ConnectorRole::Activator, &self.activators),
            (ConnectorRole::Inhibitor, &self.inhibitors),
        ];
        roles
            .into_iter()
            .flat_map(|(role, parts)| parts.iter().map(move |part| (role, part.id())))
    }

    pub fn is_disease(&self) -> bool {
        self.is_disease
    }

    pub fn is_fade_out(&self) -> bool {
        self.is_fade_out
    }
}

/// A cellular compartment drawn behind the nodes it contains.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compartment {
    id: ElementId,
    reactome_id: ReactomeId,
    display_name: String,
    prop: Bounds,
    /// Inner rectangle of a double border
    insets: Option<Bounds>,
    text_position: Option<Point>,
    #[serde(default)]
    is_fade_out: bool,
}

impl Compartment {
    pub fn new(
        id: ElementId,
        reactome_id: ReactomeId,
        display_name: impl Into<String>,
        prop: Bounds,
    ) -> Self {
        Self {
            id,
            reactome_id,
            display_name: display_name.into(),
            prop,
            insets: None,
            text_position: None,
            is_fade_out: false,
        }
    }

    pub fn with_inner(mut self, inner: Bounds) -> Self {
        self.insets = Some(inner);
        self
    }

    pub fn with_text_position(mut self, position: Point) -> Self {
        self.text_position = Some(position);
        self
    }

    pub fn with_fade_out(mut self, is_fade_out: bool) -> Self {
        self.is_fade_out = is_fade_out;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn reactome_id(&self) -> ReactomeId {
        self.reactome_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn prop(&self) -> Bounds {
        self.prop
    }

    pub fn inner(&self) -> Option<Bounds> {
        self.insets
    }

    /// Top-left of the name label; defaults to just inside the top-left corner.
    pub fn text_position(&self) -> Point {
        self.text_position
            .unwrap_or_else(|| self.prop.min_point().add_point(Point::new(5.0, 5.0)))
    }

    pub fn is_fade_out(&self) -> bool {
        self.is_fade_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderable_class_names_roundtrip_json() {
        for class in RenderableClass::ALL {
            let json = format!("\"{}\"", class.name());
            let parsed: RenderableClass = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, class);
        }
        assert!(serde_json::from_str::<RenderableClass>("\"Widget\"").is_err());
    }

    #[test]
    fn test_shape_descriptor_kind() {
        assert_eq!(ShapeDescriptor::new("ARROW").kind(), Ok(ShapeKind::Arrow));
        assert_eq!(ShapeDescriptor::new("DOUBLE_CIRCLE").kind(), Ok(ShapeKind::DoubleCircle));
        assert_eq!(
            ShapeDescriptor::new("HEART").kind(),
            Err(ShapeKindError("HEART".to_string()))
        );
    }

    #[test]
    fn test_node_from_json() {
        let json = r#"{
            "id": 12,
            "reactomeId": 5678,
            "displayName": "AKT1",
            "renderableClass": "Protein",
            "prop": {"x": 10, "y": 20, "width": 80, "height": 30},
            "isDisease": true,
            "connectors": [{
                "edgeId": 40,
                "type": "INPUT",
                "segments": [{"from": {"x": 90, "y": 35}, "to": {"x": 120, "y": 35}}],
                "stoichiometry": {"value": 2, "shape": {"type": "BOX", "a": {"x": 100, "y": 30}, "b": {"x": 110, "y": 40}, "s": "2"}}
            }]
        }"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.id(), ElementId::new(12));
        assert_eq!(node.reactome_id(), ReactomeId::new(5678));
        assert_eq!(node.renderable_class(), RenderableClass::Protein);
        assert!(node.is_disease());
        assert!(!node.is_fade_out());
        assert_eq!(node.connectors().len(), 1);
        let connector = &node.connectors()[0];
        assert_eq!(connector.role(), ConnectorRole::Input);
        assert_eq!(connector.stoichiometry().map(Stoichiometry::value), Some(2));
    }

    #[test]
    fn test_edge_participants_in_role_order() {
        let edge = Edge::new(ElementId::new(1), ReactomeId::new(100), "binding", Point::new(0.0, 0.0))
            .with_participant(ConnectorRole::Catalyst, ElementId::new(4))
            .with_participant(ConnectorRole::Input, ElementId::new(2))
            .with_participant(ConnectorRole::Output, ElementId::new(3));
        let participants: Vec<_> = edge.participants().collect();
        assert_eq!(
            participants,
            [
                (ConnectorRole::Input, ElementId::new(2)),
                (ConnectorRole::Output, ElementId::new(3)),
                (ConnectorRole::Catalyst, ElementId::new(4)),
            ]
        );
    }

    #[test]
    fn test_compartment_default_text_position() {
        let compartment = Compartment::new(
            ElementId::new(1),
            ReactomeId::new(2),
            "cytosol",
            Bounds::new(100.0, 50.0, 500.0, 400.0),
        );
        assert_eq!(compartment.text_position(), Point::new(105.0, 55.0));
    }
}
