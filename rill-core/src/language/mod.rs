mod node;
mod tree;

pub use node::*;
pub use tree::{Node, NodeId, Traversal, Tree};
