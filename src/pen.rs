//! Point pens: the interface through which outlines enter and leave a snapshot.
use crate::{
    common::{Node, NodeType, Transformation},
    shape::{Component, Contour},
};

// Modelled on the UFO point pen protocol.
/// Interface for accepting a sequence of contour points and components.
pub trait PointPen {
    /// Start a new contour.
    fn begin_path(&mut self, identifier: Option<&str>);

    /// Add a point to the current contour.
    fn add_point(&mut self, node: &Node);

    /// Finish the current contour.
    fn end_path(&mut self);

    /// Add a reference to another glyph.
    fn add_component(
        &mut self,
        base_glyph: &str,
        transformation: Transformation,
        identifier: Option<&str>,
    );
}

/// A pen which collects contours in the normalized form used for math.
///
/// Every contour is rewritten so that it starts with an on-curve point and
/// contains no line segments: each line becomes a curve whose two off-curve
/// points sit on top of the segment's start and end points. Two compatible
/// outlines which mix lines and curves differently then still have the same
/// point structure.
#[derive(Debug, Clone, Default)]
pub struct NormalizingPen {
    contours: Vec<Contour>,
    components: Vec<Component>,
    current_identifier: Option<String>,
    points: Vec<Node>,
}

impl NormalizingPen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the collected contours and components
    pub fn build(self) -> (Vec<Contour>, Vec<Component>) {
        (self.contours, self.components)
    }

    fn flush_contour(&mut self) {
        let mut points = std::mem::take(&mut self.points);
        // Move leading off-curves to the end
        if let Some(first_on_curve) = points.iter().position(|p| p.nodetype.is_on_curve()) {
            points.rotate_left(first_on_curve);
        }
        let mut normalized = Vec::with_capacity(points.len() * 2);
        let mut held_off_curves = vec![];
        for (ix, node) in points.iter().enumerate() {
            if node.nodetype != NodeType::Line {
                normalized.push(node.clone());
                continue;
            }
            let previous = if ix == 0 {
                points.last()
            } else {
                points.get(ix - 1)
            }
            .map(|p| p.to_kurbo())
            .unwrap_or(node.to_kurbo());
            let off_curves = [
                Node::new_offcurve(previous.x, previous.y),
                Node::new_offcurve(node.x, node.y),
            ];
            // The first segment closes the contour, so its off-curves go last
            if ix == 0 {
                held_off_curves.extend(off_curves);
            } else {
                normalized.extend(off_curves);
            }
            normalized.push(Node {
                nodetype: NodeType::Curve,
                ..node.clone()
            });
        }
        normalized.extend(held_off_curves);
        self.contours.push(Contour {
            identifier: self.current_identifier.take(),
            points: normalized,
        });
    }
}

impl PointPen for NormalizingPen {
    fn begin_path(&mut self, identifier: Option<&str>) {
        self.current_identifier = identifier.map(|s| s.to_string());
        self.points.clear();
    }

    fn add_point(&mut self, node: &Node) {
        self.points.push(node.clone());
    }

    fn end_path(&mut self) {
        self.flush_contour();
    }

    fn add_component(
        &mut self,
        base_glyph: &str,
        transformation: Transformation,
        identifier: Option<&str>,
    ) {
        self.components.push(Component {
            base_glyph: base_glyph.into(),
            transformation,
            identifier: identifier.map(|s| s.to_string()),
        });
    }
}

/// A pen which turns curves with redundant control points back into lines
/// before passing the contour on to another pen.
///
/// A curve segment is redundant when its first off-curve point sits on the
/// previous on-curve point and its second sits on the curve's own on-curve
/// point. Contours are cyclic, so the segment ending at the first point is
/// tested using the off-curves at the end of the contour.
pub struct FilterRedundantPointPen<'a, P: PointPen + ?Sized> {
    pen: &'a mut P,
    points: Vec<Node>,
}

impl<'a, P: PointPen + ?Sized> FilterRedundantPointPen<'a, P> {
    pub fn new(pen: &'a mut P) -> Self {
        FilterRedundantPointPen {
            pen,
            points: vec![],
        }
    }

    fn flush_contour(&mut self) {
        let mut points = std::mem::take(&mut self.points);
        if points.is_empty() {
            return;
        }
        let mut prev_on_curve: Option<kurbo::Point> = None;
        let mut off_curves: Vec<Node> = vec![];
        let mut to_draw: Vec<Node> = Vec::with_capacity(points.len());

        let mut first = points[0].clone();
        if !first.nodetype.is_on_curve() {
            off_curves.push(first);
        } else {
            if first.nodetype == NodeType::Curve {
                let trailing: Vec<kurbo::Point> = points
                    .iter()
                    .rev()
                    .take_while(|p| !p.nodetype.is_on_curve())
                    .map(|p| p.to_kurbo())
                    .collect();
                let last_on_curve = points
                    .iter()
                    .rev()
                    .find(|p| p.nodetype.is_on_curve())
                    .map(|p| p.to_kurbo());
                if let ([closing, opening], Some(last_on_curve)) =
                    (trailing.as_slice(), last_on_curve)
                {
                    if *opening == last_on_curve && *closing == first.to_kurbo() {
                        first.nodetype = NodeType::Line;
                        points.truncate(points.len() - 2);
                    }
                }
            }
            prev_on_curve = Some(first.to_kurbo());
            to_draw.push(first);
        }

        for node in points.into_iter().skip(1) {
            if !node.nodetype.is_on_curve() {
                off_curves.push(node);
                continue;
            }
            let mut node = node;
            if node.nodetype == NodeType::Curve {
                if let [a, b] = off_curves.as_slice() {
                    if Some(a.to_kurbo()) == prev_on_curve && b.to_kurbo() == node.to_kurbo() {
                        off_curves.clear();
                        node.nodetype = NodeType::Line;
                    }
                }
            }
            to_draw.append(&mut off_curves);
            prev_on_curve = Some(node.to_kurbo());
            to_draw.push(node);
        }
        to_draw.append(&mut off_curves);

        for node in &to_draw {
            self.pen.add_point(node);
        }
    }
}

impl<P: PointPen + ?Sized> PointPen for FilterRedundantPointPen<'_, P> {
    fn begin_path(&mut self, identifier: Option<&str>) {
        self.points.clear();
        self.pen.begin_path(identifier);
    }

    fn add_point(&mut self, node: &Node) {
        self.points.push(node.clone());
    }

    fn end_path(&mut self) {
        self.flush_contour();
        self.pen.end_path();
    }

    fn add_component(
        &mut self,
        base_glyph: &str,
        transformation: Transformation,
        identifier: Option<&str>,
    ) {
        self.pen
            .add_component(base_glyph, transformation, identifier);
    }
}

/// One call made to a [`RecordingPen`]
#[derive(Debug, Clone, PartialEq)]
pub enum PenEvent {
    BeginPath(Option<String>),
    AddPoint(Node),
    EndPath,
    AddComponent {
        base_glyph: String,
        transformation: Transformation,
        identifier: Option<String>,
    },
}

/// A pen which remembers everything drawn into it
#[derive(Debug, Clone, Default)]
pub struct RecordingPen {
    pub events: Vec<PenEvent>,
}

impl RecordingPen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay the recorded calls into another pen
    pub fn replay<P: PointPen + ?Sized>(&self, pen: &mut P) {
        for event in &self.events {
            match event {
                PenEvent::BeginPath(identifier) => pen.begin_path(identifier.as_deref()),
                PenEvent::AddPoint(node) => pen.add_point(node),
                PenEvent::EndPath => pen.end_path(),
                PenEvent::AddComponent {
                    base_glyph,
                    transformation,
                    identifier,
                } => pen.add_component(base_glyph, *transformation, identifier.as_deref()),
            }
        }
    }

    /// The recorded points, ignoring contour boundaries
    pub fn points(&self) -> impl Iterator<Item = &Node> {
        self.events.iter().filter_map(|e| match e {
            PenEvent::AddPoint(node) => Some(node),
            _ => None,
        })
    }
}

impl PointPen for RecordingPen {
    fn begin_path(&mut self, identifier: Option<&str>) {
        self.events
            .push(PenEvent::BeginPath(identifier.map(|s| s.to_string())));
    }

    fn add_point(&mut self, node: &Node) {
        self.events.push(PenEvent::AddPoint(node.clone()));
    }

    fn end_path(&mut self) {
        self.events.push(PenEvent::EndPath);
    }

    fn add_component(
        &mut self,
        base_glyph: &str,
        transformation: Transformation,
        identifier: Option<&str>,
    ) {
        self.events.push(PenEvent::AddComponent {
            base_glyph: base_glyph.to_string(),
            transformation,
            identifier: identifier.map(|s| s.to_string()),
        });
    }
}
