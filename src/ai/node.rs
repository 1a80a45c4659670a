//! Per-query search bookkeeping: node arena, frontier and closed set
//!
//! Nodes live in a `Vec` and refer to their parent by index, so walking the
//! parent chain is O(1) per step and nothing has to be freed by hand. One
//! pool is built per search and dropped when the search returns.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;

/// Index of a node inside a [`NodePool`]
pub(crate) type NodeId = usize;

/// One grid cell visited during a search
#[derive(Debug, Clone)]
pub(crate) struct SearchNode {
    pub x: i32,
    pub y: i32,
    /// Cost from start
    pub g: f32,
    /// Heuristic estimate to goal
    pub h: f32,
    /// g + h
    pub f: f32,
    /// Node this one was reached from (None for the start)
    pub parent: Option<NodeId>,
    /// Fully expanded; never touched again
    pub closed: bool,
}

/// Arena of search nodes with a cell lookup
#[derive(Debug, Default)]
pub(crate) struct NodePool {
    nodes: Vec<SearchNode>,
    lookup: FxHashMap<(i32, i32), NodeId>,
}

impl NodePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly discovered cell
    pub fn insert(&mut self, x: i32, y: i32, g: f32, h: f32, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(SearchNode {
            x,
            y,
            g,
            h,
            f: g + h,
            parent,
            closed: false,
        });
        self.lookup.insert((x, y), id);
        id
    }

    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id]
    }

    /// Node already known for a cell
    pub fn find(&self, x: i32, y: i32) -> Option<NodeId> {
        self.lookup.get(&(x, y)).copied()
    }

    /// Whether a cell has been fully expanded
    pub fn is_closed(&self, x: i32, y: i32) -> bool {
        self.find(x, y).is_some_and(|id| self.nodes[id].closed)
    }

    pub fn close(&mut self, id: NodeId) {
        self.nodes[id].closed = true;
    }

    /// Lower a known node's cost and re-parent it. Closed nodes are left as is.
    pub fn relax(&mut self, id: NodeId, g: f32, parent: NodeId) {
        let node = &mut self.nodes[id];
        if node.closed {
            return;
        }
        node.g = g;
        node.f = g + node.h;
        node.parent = Some(parent);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Cells from the root of `id`'s parent chain to `id`
    pub fn trace(&self, id: NodeId) -> Vec<(i32, i32)> {
        let mut cells = Vec::new();
        let mut current = Some(id);

        while let Some(i) = current {
            let node = &self.nodes[i];
            cells.push((node.x, node.y));
            current = node.parent;
        }

        cells.reverse();
        cells
    }
}

/// Frontier entry. The `f` and `h` are snapshots taken at push time.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    f: f32,
    h: f32,
    seq: u64,
    node: NodeId,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap on f, then h; newest entry wins remaining ties
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Open set ordered by ascending `f`
///
/// There is no decrease-key: an improved node is pushed again and the older
/// entry stays in the heap. The search drops such stale entries on pop,
/// since by then the cell has been closed through the cheaper entry.
#[derive(Debug, Default)]
pub(crate) struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    next_seq: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: NodeId, node: &SearchNode) {
        self.heap.push(FrontierEntry {
            f: node.f,
            h: node.h,
            seq: self.next_seq,
            node: id,
        });
        self.next_seq += 1;
    }

    /// Pop the entry with the lowest `f`
    pub fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|entry| entry.node)
    }

    /// Total number of pushes so far
    pub fn pushes(&self) -> u64 {
        self.next_seq
    }
}
