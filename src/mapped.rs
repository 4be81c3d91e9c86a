//! Read-only, memory-mapped view over a serialized automaton.
//!
//! Opens and validates the header eagerly; every other access reads
//! straight out of the mapping with bounds checks, per the "fail at load,
//! not mid-search, except for the child-table offsets that are cheaper to
//! validate lazily" resolution recorded in `DESIGN.md`.

use std::fs::File;
use std::path::Path;

use log::{debug, warn};
use memmap2::Mmap;

use crate::error::{AutomatonError, Result};
use crate::payload::Payload;
use crate::search::Automaton;
use crate::serialize::{FORMAT_VERSION, HEADER_LEN, KIND_DENSE, KIND_SPARSE, MAGIC, NODE_RECORD_LEN};
use crate::state_id::{NodeId, NO_CHILD, ROOT};
use crate::Match;

/// A read-only automaton backed by an `mmap`ped file, produced by
/// [`crate::AhoCorasick::write`].
pub struct Mapped {
    mmap: Option<Mmap>,
    node_count: usize,
}

impl Mapped {
    /// Opens `path`, maps it, and validates the header. The node table and
    /// children area are read lazily, on first access.
    pub fn open(path: impl AsRef<Path>) -> Result<Mapped> {
        let path = path.as_ref();
        debug!("opening mapped automaton at {}", path.display());
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < HEADER_LEN {
            warn!("mapped file {} shorter than header", path.display());
            return Err(AutomatonError::InvalidImage("file shorter than header"));
        }
        if &mmap[0..4] != MAGIC {
            warn!("mapped file {} has wrong magic", path.display());
            return Err(AutomatonError::InvalidImage("bad magic"));
        }
        let version = u32::from_le_bytes(mmap[4..8].try_into().unwrap());
        if version != FORMAT_VERSION {
            return Err(AutomatonError::InvalidImage("unsupported format version"));
        }
        let node_count = u32::from_le_bytes(mmap[8..12].try_into().unwrap()) as usize;
        let needed = HEADER_LEN + node_count * NODE_RECORD_LEN;
        if mmap.len() < needed {
            return Err(AutomatonError::InvalidImage("node table truncated"));
        }

        Ok(Mapped {
            mmap: Some(mmap),
            node_count,
        })
    }

    /// Total number of states, including the root.
    pub fn nodes_count(&self) -> usize {
        self.node_count
    }

    /// Unmaps the file. Idempotent; callable more than once, including from
    /// `Drop`.
    pub fn close(&mut self) {
        if self.mmap.take().is_some() {
            debug!("closed mapped automaton");
        }
    }

    fn mmap(&self) -> Result<&Mmap> {
        self.mmap.as_ref().ok_or(AutomatonError::Closed)
    }

    fn record(&self, state: NodeId) -> Result<&[u8]> {
        let mmap = self.mmap()?;
        let start = HEADER_LEN + state as usize * NODE_RECORD_LEN;
        mmap.get(start..start + NODE_RECORD_LEN)
            .ok_or(AutomatonError::InvalidImage("node index out of bounds"))
    }

    fn node_failure(&self, state: NodeId) -> Result<NodeId> {
        let r = self.record(state)?;
        Ok(u32::from_le_bytes(r[0..4].try_into().unwrap()))
    }

    fn node_length_hint(&self, state: NodeId) -> Result<u32> {
        let r = self.record(state)?;
        Ok(u32::from_le_bytes(r[4..8].try_into().unwrap()))
    }

    fn node_payload(&self, state: NodeId) -> Result<Payload> {
        let r = self.record(state)?;
        Ok(Payload::from_wire(i64::from_le_bytes(
            r[8..16].try_into().unwrap(),
        )))
    }

    fn node_output_state(&self, state: NodeId) -> Result<NodeId> {
        let r = self.record(state)?;
        Ok(u32::from_le_bytes(r[16..20].try_into().unwrap()))
    }

    fn node_shortest_output_state(&self, state: NodeId) -> Result<NodeId> {
        let r = self.record(state)?;
        Ok(u32::from_le_bytes(r[20..24].try_into().unwrap()))
    }

    fn node_depth(&self, state: NodeId) -> Result<u32> {
        let r = self.record(state)?;
        Ok(u32::from_le_bytes(r[24..28].try_into().unwrap()))
    }

    fn children_kind_and_offset(&self, state: NodeId) -> Result<(u8, u32)> {
        let r = self.record(state)?;
        Ok((r[28], u32::from_le_bytes(r[32..36].try_into().unwrap())))
    }

    /// `Some((depth, payload))` iff `out` is a terminal reported at
    /// `state` (`out` is `state`'s own output link, already resolved to a
    /// node that reports itself).
    fn output_of(&self, out: NodeId) -> Option<(u32, Payload)> {
        if out == NO_CHILD {
            return None;
        }
        let depth = self.node_depth(out).ok()?;
        let payload = self.node_payload(out).ok()?;
        Some((depth, payload))
    }
}

impl Drop for Mapped {
    fn drop(&mut self) {
        self.close();
    }
}

impl Automaton for Mapped {
    fn node_count(&self) -> usize {
        self.node_count
    }

    fn child(&self, state: NodeId, byte: u8) -> Option<NodeId> {
        let (kind, offset) = self.children_kind_and_offset(state).ok()?;
        let mmap = self.mmap.as_ref()?;
        let offset = offset as usize;
        match kind {
            KIND_SPARSE => {
                let count =
                    u32::from_le_bytes(mmap.get(offset..offset + 4)?.try_into().ok()?) as usize;
                let entries_start = offset + 4;
                let mut lo = 0usize;
                let mut hi = count;
                while lo < hi {
                    let mid = (lo + hi) / 2;
                    let entry_start = entries_start + mid * 8;
                    let entry = mmap.get(entry_start..entry_start + 8)?;
                    match entry[0].cmp(&byte) {
                        std::cmp::Ordering::Equal => {
                            return Some(u32::from_le_bytes(entry[4..8].try_into().ok()?));
                        }
                        std::cmp::Ordering::Less => lo = mid + 1,
                        std::cmp::Ordering::Greater => hi = mid,
                    }
                }
                None
            }
            KIND_DENSE => {
                let entry_start = offset + byte as usize * 4;
                let id =
                    u32::from_le_bytes(mmap.get(entry_start..entry_start + 4)?.try_into().ok()?);
                if id == NO_CHILD {
                    None
                } else {
                    Some(id)
                }
            }
            _ => None,
        }
    }

    fn failure(&self, state: NodeId) -> NodeId {
        self.node_failure(state).unwrap_or(ROOT)
    }

    fn length_hint(&self, state: NodeId) -> u32 {
        self.node_length_hint(state).unwrap_or(0)
    }

    fn local_terminal(&self, state: NodeId) -> Option<(u32, Payload)> {
        let out = self.node_output_state(state).ok()?;
        if out != state {
            return None;
        }
        self.output_of(out)
    }

    fn output_long(&self, state: NodeId) -> Option<(u32, Payload)> {
        let out = self.node_output_state(state).ok()?;
        self.output_of(out)
    }

    fn output_short(&self, state: NodeId) -> Option<(u32, Payload)> {
        let out = self.node_shortest_output_state(state).ok()?;
        self.output_of(out)
    }
}

impl Mapped {
    /// Shortest-match search starting at `start`.
    pub fn find_short(&self, text: &[u8], start: usize) -> Result<Option<Match>> {
        self.mmap()?;
        Ok(self.find_short_at(text, start))
    }

    /// Longest-match search starting at `start`.
    pub fn find_long(&self, text: &[u8], start: usize) -> Result<Option<Match>> {
        self.mmap()?;
        Ok(self.find_long_at(text, start))
    }

    /// Non-overlapping shortest-match occurrences, left to right.
    pub fn findall_short<'a>(&'a self, text: &'a [u8]) -> Result<MappedFindAllShort<'a>> {
        self.mmap()?;
        Ok(MappedFindAllShort {
            automaton: self,
            text,
            pos: 0,
        })
    }

    /// Non-overlapping longest-match occurrences, left to right.
    pub fn findall_long<'a>(&'a self, text: &'a [u8]) -> Result<MappedFindAllLong<'a>> {
        self.mmap()?;
        Ok(MappedFindAllLong {
            automaton: self,
            text,
            pos: 0,
        })
    }

    /// Non-overlapping whole-token matches, delimited by
    /// [`crate::ANCHOR_BYTE`].
    pub fn findall_anchored<'a>(&'a self, text: &'a [u8]) -> Result<MappedFindAllAnchored<'a>> {
        self.mmap()?;
        Ok(MappedFindAllAnchored {
            automaton: self,
            text,
            pos: 0,
        })
    }
}

/// Iterator returned by [`Mapped::findall_short`].
pub struct MappedFindAllShort<'a> {
    automaton: &'a Mapped,
    text: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for MappedFindAllShort<'a> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let m = self.automaton.find_short_at(self.text, self.pos)?;
        self.pos = m.end().max(self.pos + 1);
        Some(m)
    }
}

/// Iterator returned by [`Mapped::findall_long`].
pub struct MappedFindAllLong<'a> {
    automaton: &'a Mapped,
    text: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for MappedFindAllLong<'a> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let m = self.automaton.find_long_at(self.text, self.pos)?;
        self.pos = m.end().max(self.pos + 1);
        Some(m)
    }
}

/// Iterator returned by [`Mapped::findall_anchored`].
pub struct MappedFindAllAnchored<'a> {
    automaton: &'a Mapped,
    text: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for MappedFindAllAnchored<'a> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        loop {
            if self.pos >= self.text.len() {
                return None;
            }
            let m = self.automaton.find_long_at(self.text, self.pos)?;
            if crate::is_anchored_boundary(self.text, m.start(), m.end()) {
                self.pos = m.end().max(self.pos + 1);
                return Some(m);
            }
            self.pos = m.start() + 1;
        }
    }
}
