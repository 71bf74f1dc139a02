//! Circular dependency detection over the file graph.

use std::collections::BTreeSet;

use petgraph::graph::NodeIndex;

use super::dependency_graph::DependencyGraph;
use crate::config::Cycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Find the cycles closed by back edges of a depth-first search.
///
/// Roots and successors are visited in path order, so the result is
/// deterministic. Every back edge into a node still on the DFS stack yields
/// the cycle running from that node to the current one. Cycles are rotated
/// to start at their smallest path, deduplicated and returned sorted.
///
/// Runs in O(V + E) plus the cost of copying each reported cycle. The
/// search is iterative, so deep import chains cannot overflow the stack.
pub fn find_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    let order = graph.ordered_nodes();
    let node_count = graph.inner_graph().node_count();
    let mut color = vec![Color::White; node_count];
    let mut found: BTreeSet<Cycle> = BTreeSet::new();

    // Current DFS path and, per entry, the successors left to visit.
    let mut path: Vec<NodeIndex> = Vec::new();
    let mut frames: Vec<std::vec::IntoIter<NodeIndex>> = Vec::new();

    for root in order {
        if color[root.index()] != Color::White {
            continue;
        }
        color[root.index()] = Color::Gray;
        path.push(root);
        frames.push(graph.ordered_successors(root).into_iter());

        while let Some(frame) = frames.last_mut() {
            match frame.next() {
                Some(next) => match color[next.index()] {
                    Color::White => {
                        color[next.index()] = Color::Gray;
                        path.push(next);
                        frames.push(graph.ordered_successors(next).into_iter());
                    }
                    Color::Gray => {
                        if let Some(start) = path.iter().rposition(|&n| n == next) {
                            let files = path[start..]
                                .iter()
                                .map(|&n| graph.path(n).to_string())
                                .collect();
                            found.insert(Cycle::normalized(files));
                        }
                    }
                    Color::Black => {}
                },
                None => {
                    frames.pop();
                    if let Some(done) = path.pop() {
                        color[done.index()] = Color::Black;
                    }
                }
            }
        }
    }

    found.into_iter().collect()
}
