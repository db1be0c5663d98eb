use serde_json::{Map, Value};

mod node;
mod transform;
pub use node::{Node, NodeType};
pub use transform::Transformation;

/// Arbitrary library data attached to a glyph.
///
/// This is copied along with the glyph but never takes part in any math.
pub type Lib = Map<String, Value>;
