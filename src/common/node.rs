use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum NodeType {
    Move,
    Line,
    OffCurve,
    Curve,
    QCurve,
}

impl NodeType {
    pub fn is_on_curve(&self) -> bool {
        !matches!(self, NodeType::OffCurve)
    }
}

/// A point in a contour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub nodetype: NodeType,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub smooth: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl Node {
    pub fn new(x: f64, y: f64, nodetype: NodeType) -> Self {
        Node {
            x,
            y,
            nodetype,
            smooth: false,
            name: None,
            identifier: None,
        }
    }

    pub fn new_offcurve(x: f64, y: f64) -> Self {
        Node::new(x, y, NodeType::OffCurve)
    }

    pub fn new_curve(x: f64, y: f64) -> Self {
        Node::new(x, y, NodeType::Curve)
    }

    pub fn new_line(x: f64, y: f64) -> Self {
        Node::new(x, y, NodeType::Line)
    }

    pub fn to_kurbo(&self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }

    /// A copy of this node moved to a new position
    pub fn with_position(&self, pt: kurbo::Point) -> Self {
        Node {
            x: pt.x,
            y: pt.y,
            ..self.clone()
        }
    }
}
