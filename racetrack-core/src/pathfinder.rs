//! Shortest route from a start cell to the nearest finish cell.
//!
//! The grid is turned into a compressed sparse row graph once per search:
//! nodes are drivable cells in row-major order, edges join 8-neighbours with
//! unit weight. The cell just past each finish cell in its legal direction is
//! left out, since a car coming from there would cross the line backwards.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::constants::GRAPH_EDGE_WEIGHT;
use crate::error::PathError;
use crate::geometry::{GridVector, Position};
use crate::track::{CellType, Grid};

const NEIGHBOR_OFFSETS: [GridVector; 8] = [
    GridVector::new(-1, -1),
    GridVector::new(0, -1),
    GridVector::new(1, -1),
    GridVector::new(-1, 0),
    GridVector::new(1, 0),
    GridVector::new(-1, 1),
    GridVector::new(0, 1),
    GridVector::new(1, 1),
];

/// Navigable cells of a grid as seen from one start cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackGraph {
    /// Node cells sorted by (y, x).
    pub nodes: Vec<Position>,
    /// `node_offsets[i]..node_offsets[i + 1]` is the slice of `edges` for node i.
    pub node_offsets: Vec<u32>,
    /// Neighbour node indices, ascending per node.
    pub edges: Vec<u32>,
    pub weights: Vec<u32>,
}

impl TrackGraph {
    /// Builds the graph for a search starting at `source`.
    ///
    /// `source` is kept even if it would otherwise be excluded, and its edges
    /// into finish cells only exist when that single step crosses legally.
    pub fn build(grid: &Grid, source: Position) -> Self {
        let blocked: Vec<Position> = grid
            .cells()
            .filter_map(|(pos, cell)| cell.legal_direction().map(|dir| pos + dir))
            .collect();

        let nodes: Vec<Position> = grid
            .cells()
            .filter(|(pos, cell)| {
                *pos == source || (is_drivable(*cell) && !blocked.contains(pos))
            })
            .map(|(pos, _)| pos)
            .collect();

        let mut graph = Self {
            node_offsets: Vec::with_capacity(nodes.len() + 1),
            edges: Vec::new(),
            weights: Vec::new(),
            nodes,
        };

        for i in 0..graph.nodes.len() {
            graph.node_offsets.push(graph.edges.len() as u32);
            let here = graph.nodes[i];
            for offset in NEIGHBOR_OFFSETS {
                let there = here + offset;
                let Some(j) = graph.find_node_index(there) else {
                    continue;
                };
                let illegal_entry =
                    grid.cell(there).is_legal_crossing(here, there) == Some(false);
                if here == source && illegal_entry {
                    continue;
                }
                graph.edges.push(j);
                graph.weights.push(GRAPH_EDGE_WEIGHT);
            }
        }
        graph.node_offsets.push(graph.edges.len() as u32);
        graph
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn neighbors(&self, node_idx: u32) -> &[u32] {
        let start = self.node_offsets[node_idx as usize] as usize;
        let end = self.node_offsets[node_idx as usize + 1] as usize;
        &self.edges[start..end]
    }

    pub fn neighbor_weights(&self, node_idx: u32) -> impl Iterator<Item = (u32, u32)> + '_ {
        let start = self.node_offsets[node_idx as usize] as usize;
        let end = self.node_offsets[node_idx as usize + 1] as usize;
        self.edges[start..end]
            .iter()
            .zip(self.weights[start..end].iter())
            .map(|(&e, &w)| (e, w))
    }

    pub fn find_node_index(&self, pos: Position) -> Option<u32> {
        self.nodes
            .binary_search_by(|n| (n.y, n.x).cmp(&(pos.y, pos.x)))
            .ok()
            .map(|i| i as u32)
    }

    /// Single-source Dijkstra. Unreached nodes keep `u32::MAX` and no predecessor.
    pub fn shortest_paths(&self, source: u32) -> ShortestPathTree {
        let n = self.nodes.len();
        let mut dist = vec![u32::MAX; n];
        let mut prev: Vec<Option<u32>> = vec![None; n];
        let mut settled = vec![false; n];
        let mut heap = BinaryHeap::new();

        dist[source as usize] = 0;
        heap.push(Reverse((0u32, source)));

        while let Some(Reverse((d, node))) = heap.pop() {
            if settled[node as usize] {
                continue;
            }
            settled[node as usize] = true;
            for (next, weight) in self.neighbor_weights(node) {
                let candidate = d.saturating_add(weight);
                if candidate < dist[next as usize] {
                    dist[next as usize] = candidate;
                    prev[next as usize] = Some(node);
                    heap.push(Reverse((candidate, next)));
                }
            }
        }

        ShortestPathTree { dist, prev }
    }
}

/// Distances and predecessors from one source node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortestPathTree {
    pub dist: Vec<u32>,
    pub prev: Vec<Option<u32>>,
}

impl ShortestPathTree {
    pub fn is_reachable(&self, node: u32) -> bool {
        self.dist[node as usize] != u32::MAX
    }

    /// Node indices from the source to `target`, both included.
    pub fn path_to(&self, target: u32) -> Vec<u32> {
        if !self.is_reachable(target) {
            return Vec::new();
        }
        let mut path = vec![target];
        let mut node = target;
        while let Some(p) = self.prev[node as usize] {
            path.push(p);
            node = p;
        }
        path.reverse();
        path
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPath {
    /// Start cell first, chosen finish cell last.
    pub waypoints: Vec<Position>,
    /// Number of single-cell steps.
    pub distance: u32,
    pub finish: Position,
}

pub fn shortest_path_to_finish(grid: &Grid, start: Position) -> Result<ShortestPath, PathError> {
    if !is_drivable(grid.cell(start)) {
        return Err(PathError::StartOffTrack { start });
    }
    let graph = TrackGraph::build(grid, start);
    let source = graph
        .find_node_index(start)
        .ok_or(PathError::StartOffTrack { start })?;
    let tree = graph.shortest_paths(source);

    // first finish in scan order wins ties
    let mut best: Option<u32> = None;
    for (idx, pos) in graph.nodes.iter().enumerate() {
        let idx = idx as u32;
        if idx == source || !grid.cell(*pos).is_finish() || !tree.is_reachable(idx) {
            continue;
        }
        if best.map_or(true, |b| tree.dist[idx as usize] < tree.dist[b as usize]) {
            best = Some(idx);
        }
    }
    let finish = best.ok_or(PathError::UnreachableFinish { start })?;

    let waypoints: Vec<Position> = tree
        .path_to(finish)
        .into_iter()
        .map(|i| graph.nodes[i as usize])
        .collect();
    Ok(ShortestPath {
        distance: tree.dist[finish as usize],
        finish: graph.nodes[finish as usize],
        waypoints,
    })
}

fn is_drivable(cell: CellType) -> bool {
    cell == CellType::Track || cell.is_finish()
}
