use serde::Deserialize;

use crate::{
    geometry::Bounds,
    semantic::{Compartment, Edge, Node},
};

/// A laid-out pathway diagram.
///
/// # Examples
///
/// ```
/// use pathview_core::{
///     geometry::{Bounds, Point, Size},
///     semantic::{Diagram, ElementId, Node, ReactomeId, RenderableClass},
/// };
///
/// let diagram = Diagram::new("R-HSA-109581", "Apoptosis").with_node(Node::new(
///     ElementId::new(1),
///     ReactomeId::new(10),
///     "CASP3",
///     RenderableClass::Protein,
///     Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(60.0, 20.0)),
/// ));
/// assert_eq!(diagram.bounds(), Bounds::new(10.0, 10.0, 70.0, 30.0));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    stable_id: String,
    display_name: String,
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
    #[serde(default)]
    compartments: Vec<Compartment>,
    min_x: Option<f32>,
    min_y: Option<f32>,
    max_x: Option<f32>,
    max_y: Option<f32>,
}

impl Diagram {
    pub fn new(stable_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            stable_id: stable_id.into(),
            display_name: display_name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            compartments: Vec::new(),
            min_x: None,
            min_y: None,
            max_x: None,
            max_y: None,
        }
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn with_compartment(mut self, compartment: Compartment) -> Self {
        self.compartments.push(compartment);
        self
    }

    /// Declares the bounding box instead of computing it from the geometry.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.min_x = Some(bounds.min_x());
        self.min_y = Some(bounds.min_y());
        self.max_x = Some(bounds.max_x());
        self.max_y = Some(bounds.max_y());
        self
    }

    pub fn stable_id(&self) -> &str {
        &self.stable_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn compartments(&self) -> &[Compartment] {
        &self.compartments
    }

    /// The declared bounding box, or the extent of all element geometry.
    ///
    /// An empty diagram without declared bounds has zero-sized bounds at the origin.
    pub fn bounds(&self) -> Bounds {
        if let (Some(min_x), Some(min_y), Some(max_x), Some(max_y)) =
            (self.min_x, self.min_y, self.max_x, self.max_y)
        {
            return Bounds::new(min_x, min_y, max_x, max_y);
        }
        self.geometry_bounds().unwrap_or_default()
    }

    fn geometry_bounds(&self) -> Option<Bounds> {
        let node_points = self.nodes.iter().flat_map(|node| {
            let prop = node.prop();
            let connector_points = node
                .connectors()
                .iter()
                .flat_map(|c| c.segments().iter().flat_map(|s| [s.from(), s.to()]));
            [prop.min_point(), prop.max_point()]
                .into_iter()
                .chain(connector_points)
        });
        let edge_points = self.edges.iter().flat_map(|edge| {
            std::iter::once(edge.position()).chain(
                edge.segments()
                    .iter()
                    .flat_map(|s| [s.from(), s.to()]),
            )
        });
        let compartment_points = self
            .compartments
            .iter()
            .flat_map(|c| [c.prop().min_point(), c.prop().max_point()]);

        Bounds::from_points(node_points.chain(edge_points).chain(compartment_points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geometry::Point,
        semantic::{ElementId, ReactomeId, Segment},
    };

    #[test]
    fn test_bounds_computed_from_geometry() {
        let diagram = Diagram::new("R-HSA-1", "test")
            .with_edge(
                Edge::new(ElementId::new(2), ReactomeId::new(20), "r", Point::new(300.0, 40.0))
                    .with_segment(Segment::new(Point::new(250.0, 40.0), Point::new(320.0, 90.0))),
            )
            .with_compartment(Compartment::new(
                ElementId::new(3),
                ReactomeId::new(30),
                "cytosol",
                Bounds::new(-10.0, 0.0, 100.0, 100.0),
            ));
        assert_eq!(diagram.bounds(), Bounds::new(-10.0, 0.0, 320.0, 100.0));
    }

    #[test]
    fn test_declared_bounds_win() {
        let diagram = Diagram::new("R-HSA-1", "test").with_bounds(Bounds::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(diagram.bounds(), Bounds::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_empty_diagram_bounds() {
        assert_eq!(Diagram::new("x", "empty").bounds(), Bounds::default());
    }

    #[test]
    fn test_diagram_from_json() {
        let json = r#"{
            "stableId": "R-HSA-70171",
            "displayName": "Glycolysis",
            "minX": 0, "minY": 0, "maxX": 800, "maxY": 600,
            "nodes": [],
            "edges": [{
                "id": 5,
                "reactomeId": 70,
                "displayName": "phosphorylation",
                "renderableClass": "Reaction",
                "position": {"x": 100, "y": 100},
                "inputs": [{"id": 1}],
                "outputs": [{"id": 2, "stoichiometry": 2}],
                "reactionShape": {"type": "BOX", "a": {"x": 95, "y": 95}, "b": {"x": 105, "y": 105}}
            }]
        }"#;
        let diagram: Diagram = serde_json::from_str(json).unwrap();
        assert_eq!(diagram.stable_id(), "R-HSA-70171");
        assert_eq!(diagram.edges().len(), 1);
        assert_eq!(diagram.edges()[0].outputs()[0].stoichiometry(), Some(2));
        assert_eq!(diagram.bounds().width(), 800.0);
    }
}
