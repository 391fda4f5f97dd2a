pub mod grid;
pub mod graph;

pub use grid::TileGrid;
pub use graph::{Graph, Node, Edge, NodeId};
