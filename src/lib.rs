//! Multi-keyword Aho-Corasick search over byte sequences.
//!
//! Build an [`AhoCorasick`], add keywords (each with an optional
//! [`Payload`]), [`AhoCorasick::compile`] it, then search with one of three
//! policies: shortest match, longest match, or anchored (whole-token,
//! delimited by [`ANCHOR_BYTE`]) match. A compiled automaton can be
//! [`AhoCorasick::write`]ten to disk and reopened via [`mapped::Mapped`]
//! for zero-copy, memory-mapped querying.

mod builder;
mod compiler;
mod error;
mod mapped;
mod node;
mod payload;
mod search;
mod serialize;
mod state_id;

pub use error::{AutomatonError, Result};
pub use mapped::Mapped;
pub use payload::Payload;

use node::Node;
use search::Automaton;
use state_id::NodeId;

/// The byte (ASCII unit separator) callers use to delimit tokens for
/// [`AhoCorasick::findall_anchored`]. The automaton itself treats it as an
/// ordinary byte; only `findall_anchored` gives it meaning.
pub const ANCHOR_BYTE: u8 = 0x1F;

/// A single reported occurrence: `start..end` (exclusive) into the searched
/// byte slice, plus the payload stored for the matched keyword.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    start: usize,
    end: usize,
    payload: Payload,
}

impl Match {
    pub(crate) fn new(start: usize, end: usize, payload: Payload) -> Self {
        Match {
            start,
            end,
            payload,
        }
    }

    /// The start of the match, inclusive.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// The end of the match, exclusive.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// The payload stored for the matched keyword.
    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// An in-memory, mutable-then-compiled Aho-Corasick automaton.
///
/// Follows the original `NoAho` object's lifecycle (see
/// `examples/original_source/test-noaho.py`): one value that keywords are
/// [`AhoCorasick::add`]ed to, then [`AhoCorasick::compile`]d once, then only
/// searched. Pre-compile methods live in [`crate::builder`]; search methods
/// are implemented here via the shared [`search::Automaton`] trait.
pub struct AhoCorasick {
    nodes: Vec<Node>,
    compiled: bool,
    keyword_count: usize,
}

impl Automaton for AhoCorasick {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn child(&self, state: NodeId, byte: u8) -> Option<NodeId> {
        self.nodes[state as usize].children.get(byte)
    }

    fn failure(&self, state: NodeId) -> NodeId {
        self.nodes[state as usize].failure
    }

    fn length_hint(&self, state: NodeId) -> u32 {
        self.nodes[state as usize].length_hint
    }

    fn local_terminal(&self, state: NodeId) -> Option<(u32, Payload)> {
        let node = &self.nodes[state as usize];
        if node.terminal {
            Some((node.depth, node.payload.clone()))
        } else {
            None
        }
    }

    fn output_long(&self, state: NodeId) -> Option<(u32, Payload)> {
        let out = self.nodes[state as usize].output_state;
        if out == state_id::NO_CHILD {
            None
        } else {
            let node = &self.nodes[out as usize];
            Some((node.depth, node.payload.clone()))
        }
    }

    fn output_short(&self, state: NodeId) -> Option<(u32, Payload)> {
        let out = self.nodes[state as usize].shortest_output_state;
        if out == state_id::NO_CHILD {
            None
        } else {
            let node = &self.nodes[out as usize];
            Some((node.depth, node.payload.clone()))
        }
    }
}

impl AhoCorasick {
    /// Shortest-match search starting at `start`. See [`Self::findall_short`]
    /// for repeated, non-overlapping search over a whole input.
    pub fn find_short(&self, text: &[u8], start: usize) -> Result<Option<Match>> {
        self.require_compiled()?;
        Ok(self.find_short_at(text, start))
    }

    /// Longest-match search starting at `start`.
    pub fn find_long(&self, text: &[u8], start: usize) -> Result<Option<Match>> {
        self.require_compiled()?;
        Ok(self.find_long_at(text, start))
    }

    /// Non-overlapping shortest-match occurrences, left to right.
    pub fn findall_short<'a>(&'a self, text: &'a [u8]) -> Result<FindAllShort<'a>> {
        self.require_compiled()?;
        Ok(FindAllShort {
            automaton: self,
            text,
            pos: 0,
        })
    }

    /// Non-overlapping longest-match occurrences, left to right.
    pub fn findall_long<'a>(&'a self, text: &'a [u8]) -> Result<FindAllLong<'a>> {
        self.require_compiled()?;
        Ok(FindAllLong {
            automaton: self,
            text,
            pos: 0,
        })
    }

    /// Non-overlapping whole-token matches, delimited by [`ANCHOR_BYTE`].
    pub fn findall_anchored<'a>(&'a self, text: &'a [u8]) -> Result<FindAllAnchored<'a>> {
        self.require_compiled()?;
        Ok(FindAllAnchored {
            automaton: self,
            text,
            pos: 0,
        })
    }

    /// Serializes the compiled automaton to `path` (see [`crate::serialize`]).
    pub fn write(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.require_compiled()?;
        serialize::write(&self.nodes, path.as_ref())
    }

    fn require_compiled(&self) -> Result<()> {
        if self.compiled {
            Ok(())
        } else {
            Err(error::AutomatonError::NotCompiled)
        }
    }
}

/// Checks the anchored-match boundary condition: the byte before `start`
/// (if any) and the last byte of the match (at `end - 1`) must both be
/// [`ANCHOR_BYTE`].
pub(crate) fn is_anchored_boundary(text: &[u8], start: usize, end: usize) -> bool {
    let start_ok = start == 0 || text[start - 1] == ANCHOR_BYTE;
    let end_ok = end > 0 && text[end - 1] == ANCHOR_BYTE;
    start_ok && end_ok
}

/// Iterator returned by [`AhoCorasick::findall_short`].
pub struct FindAllShort<'a> {
    automaton: &'a AhoCorasick,
    text: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for FindAllShort<'a> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let m = self.automaton.find_short_at(self.text, self.pos)?;
        self.pos = m.end.max(self.pos + 1);
        Some(m)
    }
}

/// Iterator returned by [`AhoCorasick::findall_long`].
pub struct FindAllLong<'a> {
    automaton: &'a AhoCorasick,
    text: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for FindAllLong<'a> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let m = self.automaton.find_long_at(self.text, self.pos)?;
        self.pos = m.end.max(self.pos + 1);
        Some(m)
    }
}

/// Iterator returned by [`AhoCorasick::findall_anchored`].
pub struct FindAllAnchored<'a> {
    automaton: &'a AhoCorasick,
    text: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for FindAllAnchored<'a> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        loop {
            if self.pos >= self.text.len() {
                return None;
            }
            let m = self.automaton.find_long_at(self.text, self.pos)?;
            if is_anchored_boundary(self.text, m.start, m.end) {
                self.pos = m.end.max(self.pos + 1);
                return Some(m);
            }
            self.pos = m.start + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_insensitivity() {
        let mut aho = AhoCorasick::new();
        aho.add(b"foo", ()).unwrap();
        aho.add(b"foobar", ()).unwrap();
        aho.compile();

        let m = aho.find_short(b"xxxfooyyy", 0).unwrap().unwrap();
        assert_eq!((m.start(), m.end()), (3, 6));

        let m = aho.find_long(b"xxxfooyyy", 0).unwrap().unwrap();
        assert_eq!((m.start(), m.end()), (3, 6));
    }

    #[test]
    fn whole_input_match() {
        let mut aho = AhoCorasick::new();
        aho.add(b"hello", ()).unwrap();
        aho.compile();

        assert_eq!(
            aho.find_short(b"hello", 0).unwrap().map(|m| (m.start(), m.end())),
            Some((0, 5))
        );
        assert_eq!(
            aho.find_long(b"hello", 0).unwrap().map(|m| (m.start(), m.end())),
            Some((0, 5))
        );
    }

    #[test]
    fn non_match() {
        let mut aho = AhoCorasick::new();
        aho.add(b"zzz", ()).unwrap();
        aho.compile();

        assert!(aho.find_short(b"abc", 0).unwrap().is_none());
        assert!(aho.find_long(b"abc", 0).unwrap().is_none());
        assert!(aho.findall_short(b"abc").unwrap().next().is_none());
    }

    #[test]
    fn not_compiled_before_compile() {
        let aho = AhoCorasick::new();
        assert!(matches!(
            aho.find_short(b"abc", 0),
            Err(AutomatonError::NotCompiled)
        ));
    }

    #[test]
    fn add_after_compile_fails() {
        let mut aho = AhoCorasick::new();
        aho.add(b"abc", ()).unwrap();
        aho.compile();
        assert!(matches!(
            aho.add(b"def", ()),
            Err(AutomatonError::AlreadyCompiled)
        ));
    }

    #[test]
    fn empty_key_rejected() {
        let mut aho = AhoCorasick::new();
        assert!(matches!(aho.add(b"", ()), Err(AutomatonError::InvalidKey)));
    }

    #[test]
    fn empty_automaton() {
        let mut aho = AhoCorasick::new();
        aho.compile();
        assert_eq!(aho.nodes_count(), 1);
        assert!(aho.findall_short(b"anything").unwrap().next().is_none());
    }

    #[test]
    fn payload_identity() {
        let mut aho = AhoCorasick::new();
        aho.set(b"k", 42i64).unwrap();
        assert_eq!(aho.get(b"k").unwrap(), &Payload::Int(42));
        assert!(aho.contains(b"k"));
    }

    #[test]
    fn embedded_nulls() {
        let mut aho = AhoCorasick::new();
        aho.add(b"a\x00b", ()).unwrap();
        aho.compile();
        let m = aho.find_short(b"xxa\x00byy", 0).unwrap().unwrap();
        assert_eq!((m.start(), m.end()), (2, 5));
    }

    #[test]
    fn idempotent_compile() {
        let mut aho = AhoCorasick::new();
        aho.add(b"a", ()).unwrap();
        aho.compile();
        aho.compile();
        assert!(aho.find_short(b"a", 0).unwrap().is_some());
    }
}
