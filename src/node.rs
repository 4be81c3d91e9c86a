use crate::payload::Payload;
use crate::state_id::{NodeId, NO_CHILD};

/// Above this many live children, a node is repacked into a dense 256-slot
/// table at compile time. Below it, the sorted sparse vector is cheaper to
/// scan and to keep in cache.
///
/// Chosen the same way the byte-trie and offset-automaton examples in the
/// retrieval pack do: a handful of children is linear-scan-cheap, a couple
/// dozen starts to be worth the table.
pub(crate) const DENSE_THRESHOLD: usize = 32;

/// The child-edge representation of a node.
///
/// `Sparse` is used for every node during the build phase; `compile()`
/// repacks a node into `Dense` if its fan-out crosses [`DENSE_THRESHOLD`].
/// This is a local optimization: callers never see which representation a
/// given node uses.
#[derive(Clone, Debug)]
pub(crate) enum Children {
    Sparse(Vec<(u8, NodeId)>),
    Dense(Box<[NodeId; 256]>),
}

impl Children {
    fn empty() -> Self {
        Children::Sparse(Vec::new())
    }

    pub(crate) fn get(&self, byte: u8) -> Option<NodeId> {
        match self {
            Children::Sparse(v) => v
                .binary_search_by_key(&byte, |&(b, _)| b)
                .ok()
                .map(|i| v[i].1),
            Children::Dense(table) => {
                let id = table[byte as usize];
                if id == NO_CHILD {
                    None
                } else {
                    Some(id)
                }
            }
        }
    }

    /// Only valid pre-compile: sparse insertion, keeping the vector sorted
    /// by byte so lookups can binary search.
    fn set(&mut self, byte: u8, id: NodeId) {
        match self {
            Children::Sparse(v) => match v.binary_search_by_key(&byte, |&(b, _)| b) {
                Ok(i) => v[i].1 = id,
                Err(i) => v.insert(i, (byte, id)),
            },
            Children::Dense(_) => unreachable!("set() called on a compiled dense node"),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Children::Sparse(v) => v.len(),
            Children::Dense(table) => table.iter().filter(|&&id| id != NO_CHILD).count(),
        }
    }

    pub(crate) fn iter(&self) -> Box<dyn Iterator<Item = (u8, NodeId)> + '_> {
        match self {
            Children::Sparse(v) => Box::new(v.iter().copied()),
            Children::Dense(table) => Box::new(
                table
                    .iter()
                    .enumerate()
                    .filter(|&(_, &id)| id != NO_CHILD)
                    .map(|(b, &id)| (b as u8, id)),
            ),
        }
    }

    fn to_dense(&self) -> Children {
        let mut table = Box::new([NO_CHILD; 256]);
        if let Children::Sparse(v) = self {
            for &(b, id) in v {
                table[b as usize] = id;
            }
        }
        Children::Dense(table)
    }
}

/// A single state of the automaton.
///
/// Before `compile()`, only `children` and `terminal`/`payload` are
/// meaningful; `failure`, `length_hint`, `output_state` and
/// `shortest_output_state` are filled in by [`crate::compiler::compile`].
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) children: Children,
    /// Distance from the root, i.e. the length of the keyword that ends
    /// here if this node is terminal. Set once at insertion time and never
    /// changed.
    pub(crate) depth: u32,
    /// Failure link. Root's failure is itself. Undefined (left at `ROOT`)
    /// until `compile()` runs.
    pub(crate) failure: NodeId,
    /// True iff this exact state is a keyword terminal (structural —
    /// independent of whether `payload` is semantically "no value").
    pub(crate) terminal: bool,
    pub(crate) payload: Payload,
    /// Longest keyword reachable from this state via pure goto-descent
    /// (no failure-following). Used only to bound the longest-match
    /// extension scan.
    pub(crate) length_hint: u32,
    /// The nearest state (possibly self) in `self, failure(self),
    /// failure(failure(self)), ...` that is terminal, or `NO_CHILD`. Its
    /// own (length, payload) is the *longest* match reportable here,
    /// because depth strictly decreases along the failure chain.
    pub(crate) output_state: NodeId,
    /// The *farthest* (shallowest, i.e. shortest matched keyword) terminal
    /// state in the same chain, or `NO_CHILD`. Its own (length, payload) is
    /// the *shortest* match reportable here.
    pub(crate) shortest_output_state: NodeId,
}

impl Node {
    pub(crate) fn new() -> Self {
        Node {
            children: Children::empty(),
            depth: 0,
            failure: NodeId::default(),
            terminal: false,
            payload: Payload::None,
            length_hint: 0,
            output_state: NO_CHILD,
            shortest_output_state: NO_CHILD,
        }
    }

    pub(crate) fn set_child(&mut self, byte: u8, id: NodeId) {
        self.children.set(byte, id);
    }

    pub(crate) fn maybe_densify(&mut self) {
        if matches!(&self.children, Children::Sparse(v) if v.len() > DENSE_THRESHOLD) {
            self.children = self.children.to_dense();
        }
    }
}
