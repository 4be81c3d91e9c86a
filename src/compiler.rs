//! Turns a freshly-built trie (sparse children, no failure links) into a
//! compiled automaton: failure links, per-node output summaries, length
//! hints, and dense repacking where it pays off.
//!
//! The failure-link construction follows the textbook breadth-first
//! algorithm, generalized here from the word-token tries in the retrieval
//! pack to raw bytes. It relies on one structural fact about how
//! [`crate::builder`] allocates nodes: a child's index is always greater
//! than its parent's, since nodes are pushed onto the arena in the order
//! they're first reached while inserting keywords. That lets both the
//! length-hint pass and the failure-link pass run as simple index sweeps
//! instead of an explicit queue — though the failure-link pass still uses
//! one, to guarantee the required parent-before-child visiting order.

use std::collections::VecDeque;

use crate::node::Node;
use crate::state_id::{NodeId, NO_CHILD, ROOT};

/// Runs the full compile pipeline over `nodes` in place.
pub(crate) fn compile(nodes: &mut [Node]) {
    compute_length_hints(nodes);
    compute_failure_links_and_outputs(nodes);
    for node in nodes.iter_mut() {
        node.maybe_densify();
    }
}

/// `length_hint(n)` = the longest keyword reachable from `n` by pure
/// goto-descent (0 if `n` is a leaf).
///
/// Because every child has a strictly larger index than its parent, walking
/// the arena back-to-front guarantees every child of `n` is finalized
/// before `n` itself is visited, i.e. this is a post-order traversal
/// without recursion.
fn compute_length_hints(nodes: &mut [Node]) {
    for i in (0..nodes.len()).rev() {
        let mut longest_child_subtree = 0u32;
        let children: Vec<(u8, NodeId)> = nodes[i].children.iter().collect();
        for (_, child) in children {
            let child = child as usize;
            let child_span = nodes[child].length_hint + 1;
            if child_span > longest_child_subtree {
                longest_child_subtree = child_span;
            }
        }
        nodes[i].length_hint = longest_child_subtree;
    }
}

/// Breadth-first failure-link computation, combined with the output-state
/// summaries so each node is only visited once.
///
/// For a node `n` reached via edge `byte` from parent `p`:
/// - if `failure(p)` has a goto edge on `byte`, that's `failure(n)`;
/// - otherwise follow `failure(p)`'s own failure chain until one does, or
///   the root is reached (the root's implicit failure is itself).
///
/// `output_state(n)` (longest-match lookup) prefers `n` itself if terminal,
/// else inherits `output_state(failure(n))` — the nearest ancestor in
/// output terms, hence the *deepest*, hence *longest* keyword.
/// `shortest_output_state(n)` instead walks all the way to the end of the
/// chain: it's `n` if terminal and `failure(n)` has no shorter output,
/// otherwise it's `shortest_output_state(failure(n))` when that exists,
/// falling back to `n` itself.
fn compute_failure_links_and_outputs(nodes: &mut [Node]) {
    nodes[ROOT as usize].failure = ROOT;
    nodes[ROOT as usize].output_state = if nodes[ROOT as usize].terminal {
        ROOT
    } else {
        NO_CHILD
    };
    nodes[ROOT as usize].shortest_output_state = nodes[ROOT as usize].output_state;

    let mut queue: VecDeque<NodeId> = VecDeque::new();
    let root_children: Vec<(u8, NodeId)> = nodes[ROOT as usize].children.iter().collect();
    for (_, child) in &root_children {
        nodes[*child as usize].failure = ROOT;
        queue.push_back(*child);
    }

    while let Some(id) = queue.pop_front() {
        let children: Vec<(u8, NodeId)> = nodes[id as usize].children.iter().collect();
        for (byte, child) in children {
            let mut f = nodes[id as usize].failure;
            loop {
                if let Some(next) = nodes[f as usize].children.get(byte) {
                    nodes[child as usize].failure = next;
                    break;
                }
                if f == ROOT {
                    nodes[child as usize].failure = ROOT;
                    break;
                }
                f = nodes[f as usize].failure;
            }
            queue.push_back(child);
        }

        let fail = nodes[id as usize].failure;
        let is_terminal = nodes[id as usize].terminal;

        nodes[id as usize].output_state = if is_terminal {
            id
        } else {
            nodes[fail as usize].output_state
        };

        // Shortest match prefers the shallowest terminal in the chain, i.e.
        // the one closest to the root — so a terminal found further along
        // `fail`'s own chain always wins over `id` itself.
        let fail_shortest = nodes[fail as usize].shortest_output_state;
        nodes[id as usize].shortest_output_state = if fail_shortest != NO_CHILD {
            fail_shortest
        } else if is_terminal {
            id
        } else {
            NO_CHILD
        };
    }
}
