//! The shared `step` primitive and the three match policies (shortest,
//! longest, anchored) described by the parent crate.
//!
//! Both the in-memory automaton ([`crate::AhoCorasick`]) and the
//! memory-mapped view ([`crate::mapped::Mapped`]) implement [`Automaton`],
//! so the policy logic below — the only place the actual matching
//! algorithms live — runs identically over either backing store.

use crate::payload::Payload;
use crate::state_id::{NodeId, ROOT};
use crate::Match;

/// A read-only view over a compiled Aho-Corasick node store, in memory or
/// memory-mapped.
pub(crate) trait Automaton {
    /// Total number of states, including the root.
    fn node_count(&self) -> usize;

    /// Direct goto edge only — no failure-following. `None` if `state` has
    /// no child for `byte`.
    fn child(&self, state: NodeId, byte: u8) -> Option<NodeId>;

    /// The failure link of `state`. Meaningless before compilation.
    fn failure(&self, state: NodeId) -> NodeId;

    /// Longest keyword reachable from `state` by pure goto-descent.
    fn length_hint(&self, state: NodeId) -> u32;

    /// `Some((len, payload))` iff `state` itself is a keyword terminal.
    fn local_terminal(&self, state: NodeId) -> Option<(u32, Payload)>;

    /// The longest match reportable at `state`: `state`'s own terminal, or
    /// (if absent) the nearest terminal along its failure chain.
    fn output_long(&self, state: NodeId) -> Option<(u32, Payload)>;

    /// The shortest match reportable at `state`: the shallowest (closest to
    /// root) terminal along `state, failure(state), failure(failure(state)),
    /// ...`.
    fn output_short(&self, state: NodeId) -> Option<(u32, Payload)>;

    /// Follow `byte` from `state`, chasing failure links until a goto edge
    /// is found (or the root is reached, which has an implicit self-loop
    /// for every byte it doesn't have a real child for).
    #[inline]
    fn step(&self, state: NodeId, byte: u8) -> NodeId {
        let mut cur = state;
        loop {
            if let Some(next) = self.child(cur, byte) {
                return next;
            }
            if cur == ROOT {
                return ROOT;
            }
            cur = self.failure(cur);
        }
    }

    /// Shortest-match search starting at `start`. See the module-level
    /// search policy description.
    fn find_short_at(&self, text: &[u8], start: usize) -> Option<Match> {
        let mut state = ROOT;
        for pos in start..text.len() {
            state = self.step(state, text[pos]);
            if let Some((len, payload)) = self.output_short(state) {
                let end = pos + 1;
                return Some(Match::new(end - len as usize, end, payload));
            }
        }
        None
    }

    /// Longest-match search starting at `start`.
    ///
    /// Advances until *any* reportable terminal is hit (the trigger), then
    /// extends via `step` — following failure links, not just goto edges —
    /// looking for a longer terminal further along. A trigger state's own
    /// goto children don't always lead to the real continuation: a match
    /// completing further in the text can be reachable only by crossing the
    /// trigger's failure link into an unrelated trie branch (e.g. keys
    /// `an`/`canal`/`e can oilfield` against `"one canal"`, where the
    /// extension must fail from `"e can"` into the `canal` branch to find
    /// it). The extension stops as soon as it resets to the root (no active
    /// suffix survives, so nothing further can extend *this* match) or
    /// `length_hint` says no goto-reachable keyword remains. Ties on length
    /// keep the earliest-found (i.e. earliest-starting) candidate.
    fn find_long_at(&self, text: &[u8], start: usize) -> Option<Match> {
        let mut pos = start;
        let mut state = ROOT;
        while pos < text.len() {
            state = self.step(state, text[pos]);
            pos += 1;
            if let Some((len, payload)) = self.output_long(state) {
                let mut best_end = pos;
                let mut best_len = len;
                let mut best_payload = payload;

                let mut probe_state = state;
                let mut probe_pos = pos;
                while probe_state != ROOT
                    && self.length_hint(probe_state) > 0
                    && probe_pos < text.len()
                {
                    probe_state = self.step(probe_state, text[probe_pos]);
                    probe_pos += 1;
                    if let Some((l2, p2)) = self.output_long(probe_state) {
                        if l2 > best_len {
                            best_len = l2;
                            best_end = probe_pos;
                            best_payload = p2;
                        }
                    }
                }

                return Some(Match::new(best_end - best_len as usize, best_end, best_payload));
            }
        }
        None
    }
}
