use super::grid::TileGrid;
use crate::types::Position;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub position: Position,
}

impl Node {
    pub fn distance_to(&self, other: &Node) -> f64 {
        euclidean(self.position, other.position)
    }
}

/// Undirected connection; `parent`/`child` only record insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub parent: NodeId,
    pub child: NodeId,
}

impl Edge {
    fn joins(&self, a: NodeId, b: NodeId) -> bool {
        (self.parent == a && self.child == b) || (self.parent == b && self.child == a)
    }

    fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.parent == node {
            Some(self.child)
        } else if self.child == node {
            Some(self.parent)
        } else {
            None
        }
    }
}

fn euclidean(a: Position, b: Position) -> f64 {
    let dx = a.x as f64 - b.x as f64;
    let dy = a.y as f64 - b.y as f64;
    (dx * dx + dy * dy).sqrt()
}

/// Sparse node/edge graph over grid positions, searched with A*
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    by_position: HashMap<Position, NodeId>,
    edges: Vec<Edge>,
}

#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    estimate: f64,
    node: NodeId,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    // Reversed so BinaryHeap pops the lowest estimate first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .partial_cmp(&self.estimate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// One node per traversable tile, edges between 4-connected neighbours
    pub fn from_grid(grid: &TileGrid) -> Self {
        let mut graph = Self::new();
        for (pos, tile) in grid.positions() {
            if tile.is_traversable() {
                graph.add_node(pos);
            }
        }
        for (pos, tile) in grid.positions() {
            if !tile.is_traversable() {
                continue;
            }
            // Only look right and down so each edge is added once
            for next in [Position::new(pos.x + 1, pos.y), Position::new(pos.x, pos.y + 1)] {
                if grid.get(next).is_some_and(|t| t.is_traversable()) {
                    graph.add_edge_between(pos, next, false);
                }
            }
        }
        graph
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_at(&self, position: Position) -> Option<NodeId> {
        self.by_position.get(&position).copied()
    }

    /// Returns the existing id if a node already sits at `position`
    pub fn add_node(&mut self, position: Position) -> NodeId {
        if let Some(id) = self.node_at(position) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(Node { position });
        self.by_position.insert(position, id);
        id
    }

    pub fn add_edge(&mut self, parent: NodeId, child: NodeId, unique: bool) -> bool {
        if parent >= self.nodes.len() || child >= self.nodes.len() {
            return false;
        }
        if unique && self.edges.iter().any(|e| e.joins(parent, child)) {
            return true;
        }
        self.edges.push(Edge { parent, child });
        true
    }

    /// Connect two positions; false if either has no node
    pub fn add_edge_between(&mut self, parent: Position, child: Position, unique: bool) -> bool {
        match (self.node_at(parent), self.node_at(child)) {
            (Some(p), Some(c)) => self.add_edge(p, c, unique),
            _ => false,
        }
    }

    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) {
        self.edges.retain(|e| !e.joins(a, b));
    }

    pub fn edges_of(&self, node: NodeId) -> Vec<Edge> {
        self.edges
            .iter()
            .filter(|e| e.other(node).is_some())
            .copied()
            .collect()
    }

    pub fn neighbours(&self, node: NodeId) -> Vec<NodeId> {
        self.edges.iter().filter_map(|e| e.other(node)).collect()
    }

    pub fn heuristic(&self, from: NodeId, goal: NodeId) -> f64 {
        match (self.nodes.get(from), self.nodes.get(goal)) {
            (Some(a), Some(b)) => a.distance_to(b),
            _ => f64::INFINITY,
        }
    }

    /// A* search; the returned path includes both endpoints
    pub fn find_path(&self, start: NodeId, goal: NodeId) -> Option<Vec<NodeId>> {
        if start >= self.nodes.len() || goal >= self.nodes.len() {
            return None;
        }

        let adjacency = self.adjacency();
        let mut best_cost = vec![f64::INFINITY; self.nodes.len()];
        let mut came_from: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        let mut open = BinaryHeap::new();

        best_cost[start] = 0.0;
        open.push(OpenEntry {
            estimate: self.heuristic(start, goal),
            node: start,
        });

        while let Some(OpenEntry { estimate, node }) = open.pop() {
            if node == goal {
                let mut path = vec![goal];
                let mut current = goal;
                while let Some(previous) = came_from[current] {
                    path.push(previous);
                    current = previous;
                }
                path.reverse();
                return Some(path);
            }
            // Stale heap entry
            if estimate > best_cost[node] + self.heuristic(node, goal) + 1e-9 {
                continue;
            }

            for &next in &adjacency[node] {
                let cost = best_cost[node] + self.nodes[node].distance_to(&self.nodes[next]);
                if cost < best_cost[next] {
                    best_cost[next] = cost;
                    came_from[next] = Some(node);
                    open.push(OpenEntry {
                        estimate: cost + self.heuristic(next, goal),
                        node: next,
                    });
                }
            }
        }

        None
    }

    /// Number of edges on the shortest path between two positions
    pub fn distance(&self, from: Position, to: Position) -> Option<usize> {
        let start = self.node_at(from)?;
        let goal = self.node_at(to)?;
        self.find_path(start, goal).map(|path| path.len() - 1)
    }

    pub fn closest_node(&self, point: Position) -> Option<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                euclidean(a.position, point)
                    .partial_cmp(&euclidean(b.position, point))
                    .unwrap_or(Ordering::Equal)
            })
            .map(|(id, _)| id)
    }

    fn adjacency(&self) -> Vec<Vec<NodeId>> {
        let mut adjacency = vec![Vec::new(); self.nodes.len()];
        for edge in &self.edges {
            adjacency[edge.parent].push(edge.child);
            adjacency[edge.child].push(edge.parent);
        }
        adjacency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TileType;

    #[test]
    fn test_path_around_wall() {
        // . . .
        // # # .
        // . . .
        let mut grid = TileGrid::filled(3, 3, TileType::Passable);
        grid.set(Position::new(0, 1), TileType::Impassable);
        grid.set(Position::new(1, 1), TileType::Impassable);

        let graph = Graph::from_grid(&grid);
        assert_eq!(graph.len(), 7);
        assert_eq!(graph.distance(Position::new(0, 0), Position::new(0, 2)), Some(6));
    }

    #[test]
    fn test_disconnected_nodes_have_no_path() {
        let mut graph = Graph::new();
        let a = graph.add_node(Position::new(0, 0));
        let b = graph.add_node(Position::new(5, 5));
        assert_eq!(graph.find_path(a, b), None);

        graph.add_edge(a, b, true);
        assert_eq!(graph.find_path(a, b), Some(vec![a, b]));

        graph.remove_edge(b, a);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_unique_edges() {
        let mut graph = Graph::new();
        let a = graph.add_node(Position::new(0, 0));
        let b = graph.add_node(Position::new(0, 1));
        assert!(graph.add_edge(a, b, true));
        assert!(graph.add_edge(b, a, true));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbours(a), vec![b]);
        assert!(!graph.add_edge(a, 99, false));
    }

    #[test]
    fn test_closest_node() {
        let mut graph = Graph::new();
        graph.add_node(Position::new(0, 0));
        let far = graph.add_node(Position::new(10, 10));
        assert_eq!(graph.closest_node(Position::new(8, 9)), Some(far));
        assert_eq!(Graph::new().closest_node(Position::new(0, 0)), None);
    }
}
