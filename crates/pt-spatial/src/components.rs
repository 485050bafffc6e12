//! Connectivity repair.
//!
//! OSM extracts contain one-way dead ends, parking-lot islands, and clipped
//! border fragments.  Snapping a request onto such a fragment makes most
//! shortest-path queries fail.  [`keep_largest_component`] trims the network
//! to one well-connected piece:
//!
//! - the largest strongly connected component, if it holds at least
//!   `max(1000, 5% of nodes)` nodes;
//! - otherwise the largest weakly connected component.
//!
//! Both labellings are iterative, so city-scale graphs cannot overflow the
//! call stack.

use tracing::info;

use crate::network::RoadNetwork;

/// Smallest strongly connected component kept regardless of graph size.
pub const MIN_SCC_NODES: usize = 1_000;

/// Which component kind [`keep_largest_component`] kept.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComponentKind {
    Strong,
    Weak,
}

/// A component label per node plus each component's size.
#[derive(Clone, Debug)]
pub struct Components {
    pub label: Vec<u32>,
    pub sizes: Vec<usize>,
}

impl Components {
    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    /// Label of the largest component; the lowest label wins ties.
    pub fn largest(&self) -> Option<u32> {
        let mut best: Option<(u32, usize)> = None;
        for (c, &size) in self.sizes.iter().enumerate() {
            if best.is_none_or(|(_, s)| size > s) {
                best = Some((c as u32, size));
            }
        }
        best.map(|(c, _)| c)
    }

    /// Membership mask for one component.
    pub fn mask(&self, component: u32) -> Vec<bool> {
        self.label.iter().map(|&l| l == component).collect()
    }
}

// ── Strongly connected components ────────────────────────────────────────────

/// Tarjan's algorithm with an explicit call stack.
pub fn strongly_connected_components(net: &RoadNetwork) -> Components {
    const UNVISITED: u32 = u32::MAX;

    let n = net.node_count();
    let mut index    = vec![UNVISITED; n];
    let mut low      = vec![0u32; n];
    let mut on_stack = vec![false; n];
    let mut label    = vec![u32::MAX; n];
    let mut sizes    = Vec::new();
    let mut stack: Vec<u32> = Vec::new();
    // (node, next outgoing edge position)
    let mut call: Vec<(u32, u32)> = Vec::new();
    let mut next_index = 0u32;

    for root in 0..n {
        if index[root] != UNVISITED {
            continue;
        }
        index[root] = next_index;
        low[root] = next_index;
        next_index += 1;
        stack.push(root as u32);
        on_stack[root] = true;
        call.push((root as u32, net.node_out_start[root]));

        while let Some(frame) = call.last_mut() {
            let v = frame.0 as usize;
            if frame.1 < net.node_out_start[v + 1] {
                let e = frame.1 as usize;
                frame.1 += 1;
                let w = net.edge_to[e].index();
                if index[w] == UNVISITED {
                    index[w] = next_index;
                    low[w] = next_index;
                    next_index += 1;
                    stack.push(w as u32);
                    on_stack[w] = true;
                    call.push((w as u32, net.node_out_start[w]));
                } else if on_stack[w] {
                    low[v] = low[v].min(index[w]);
                }
                continue;
            }

            call.pop();
            if low[v] == index[v] {
                let c = sizes.len() as u32;
                let mut size = 0;
                while let Some(w) = stack.pop() {
                    let w = w as usize;
                    on_stack[w] = false;
                    label[w] = c;
                    size += 1;
                    if w == v {
                        break;
                    }
                }
                sizes.push(size);
            }
            if let Some(&(parent, _)) = call.last() {
                let p = parent as usize;
                low[p] = low[p].min(low[v]);
            }
        }
    }

    Components { label, sizes }
}

// ── Weakly connected components ──────────────────────────────────────────────

fn find(parent: &mut [u32], mut x: u32) -> u32 {
    while parent[x as usize] != x {
        let gp = parent[parent[x as usize] as usize];
        parent[x as usize] = gp;
        x = gp;
    }
    x
}

/// Union-find over edges with direction ignored.
pub fn weakly_connected_components(net: &RoadNetwork) -> Components {
    let n = net.node_count();
    let mut parent: Vec<u32> = (0..n as u32).collect();
    let mut rank = vec![0u8; n];

    for e in 0..net.edge_count() {
        let a = find(&mut parent, net.edge_from[e].0);
        let b = find(&mut parent, net.edge_to[e].0);
        if a == b {
            continue;
        }
        let (a, b) = (a as usize, b as usize);
        match rank[a].cmp(&rank[b]) {
            std::cmp::Ordering::Less    => parent[a] = b as u32,
            std::cmp::Ordering::Greater => parent[b] = a as u32,
            std::cmp::Ordering::Equal   => {
                parent[b] = a as u32;
                rank[a] += 1;
            }
        }
    }

    // Dense labels in order of first appearance.
    let mut root_label = vec![u32::MAX; n];
    let mut label = vec![0u32; n];
    let mut sizes = Vec::new();
    for v in 0..n {
        let r = find(&mut parent, v as u32) as usize;
        if root_label[r] == u32::MAX {
            root_label[r] = sizes.len() as u32;
            sizes.push(0);
        }
        label[v] = root_label[r];
        sizes[root_label[r] as usize] += 1;
    }
    Components { label, sizes }
}

// ── Repair ────────────────────────────────────────────────────────────────────

/// Size a strongly connected component must reach to be kept.
pub fn scc_threshold(node_count: usize) -> usize {
    MIN_SCC_NODES.max(node_count / 20)
}

/// Return a new network restricted to its largest well-connected component.
pub fn keep_largest_component(net: &RoadNetwork) -> (RoadNetwork, ComponentKind) {
    keep_largest_component_with(net, scc_threshold(net.node_count()))
}

/// [`keep_largest_component`] with an explicit strong-component threshold.
pub fn keep_largest_component_with(
    net: &RoadNetwork,
    min_scc_nodes: usize,
) -> (RoadNetwork, ComponentKind) {
    if net.is_empty() {
        return (net.clone(), ComponentKind::Weak);
    }

    let scc = strongly_connected_components(net);
    if let Some(c) = scc.largest() {
        let size = scc.sizes[c as usize];
        if size >= min_scc_nodes {
            info!(kept = size, of = net.node_count(), components = scc.count(), "kept largest strongly connected component");
            return (net.induced_subgraph(&scc.mask(c)), ComponentKind::Strong);
        }
    }

    let wcc = weakly_connected_components(net);
    match wcc.largest() {
        Some(c) => {
            info!(
                kept = wcc.sizes[c as usize],
                of = net.node_count(),
                components = wcc.count(),
                "kept largest weakly connected component"
            );
            (net.induced_subgraph(&wcc.mask(c)), ComponentKind::Weak)
        }
        None => (net.clone(), ComponentKind::Weak),
    }
}
