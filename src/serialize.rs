//! Binary image writer.
//!
//! Format (little-endian), matching [`crate::mapped`] byte-for-byte:
//!
//! - header (16 bytes): magic `b"NOA1"`, `u32` version (`1`), `u32` node
//!   count, `u32` reserved (zero).
//! - `node_count` fixed 36-byte node records, immediately after the header:
//!   `u32` failure link, `u32` length hint, `i64` payload (`i64::MIN` means
//!   "no payload"), `u32` output_state, `u32` shortest_output_state, `u32`
//!   depth (distance from root — the matched keyword's length when this
//!   node is a terminal), `u8` kind (0 sparse / 1 dense), 3 bytes padding,
//!   `u32` children-area offset. `output_state`/`shortest_output_state` are
//!   precomputed here (rather than re-walked from failure links at query
//!   time) so a mapped search never has to chase a failure chain through
//!   the mapping more than once per step.
//! - a children area, referenced only by offset from each node record: for
//!   sparse nodes, a `u32` count followed by that many `(u8, pad[3],
//!   u32)` pairs; for dense nodes, a flat 256-entry `u32` table
//!   (`u32::MAX` = no child).
//!
//! Grounded in the offset-based node encoding of
//! `other_examples/2f42d3c2_sethhall-matchy__src-ac_offset.rs.rs` — the
//! closest real-world precedent in the retrieval pack for "compile once,
//! mmap forever".

use std::io::Write as _;
use std::path::Path;

use log::{debug, trace};

use crate::error::{AutomatonError, Result};
use crate::node::{Children, Node};

pub(crate) const MAGIC: &[u8; 4] = b"NOA1";
pub(crate) const FORMAT_VERSION: u32 = 1;
pub(crate) const HEADER_LEN: usize = 16;
pub(crate) const NODE_RECORD_LEN: usize = 36;

pub(crate) const KIND_SPARSE: u8 = 0;
pub(crate) const KIND_DENSE: u8 = 1;

pub(crate) fn write(nodes: &[Node], path: &Path) -> Result<()> {
    debug!("serializing {} nodes to {}", nodes.len(), path.display());

    let mut buf = Vec::with_capacity(HEADER_LEN + nodes.len() * NODE_RECORD_LEN);
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&(nodes.len() as u32).to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());

    let node_table_start = buf.len();
    buf.resize(node_table_start + nodes.len() * NODE_RECORD_LEN, 0);

    for (i, node) in nodes.iter().enumerate() {
        let payload_wire = node.payload.to_wire().ok_or_else(|| {
            trace!("node {} has a non-integer payload, aborting write", i);
            AutomatonError::PayloadWriteError
        })?;

        let children_offset = buf.len() as u32;
        let kind = match &node.children {
            Children::Sparse(entries) => {
                buf.extend_from_slice(&(entries.len() as u32).to_le_bytes());
                for &(byte, child) in entries {
                    buf.push(byte);
                    buf.extend_from_slice(&[0u8; 3]);
                    buf.extend_from_slice(&child.to_le_bytes());
                }
                KIND_SPARSE
            }
            Children::Dense(table) => {
                for &child in table.iter() {
                    buf.extend_from_slice(&child.to_le_bytes());
                }
                KIND_DENSE
            }
        };

        let record_start = node_table_start + i * NODE_RECORD_LEN;
        let record = &mut buf[record_start..record_start + NODE_RECORD_LEN];
        record[0..4].copy_from_slice(&node.failure.to_le_bytes());
        record[4..8].copy_from_slice(&node.length_hint.to_le_bytes());
        record[8..16].copy_from_slice(&payload_wire.to_le_bytes());
        record[16..20].copy_from_slice(&node.output_state.to_le_bytes());
        record[20..24].copy_from_slice(&node.shortest_output_state.to_le_bytes());
        record[24..28].copy_from_slice(&node.depth.to_le_bytes());
        record[28] = kind;
        record[29..32].copy_from_slice(&[0u8; 3]);
        record[32..36].copy_from_slice(&children_offset.to_le_bytes());
    }

    atomic_write(path, &buf)
}

/// Writes `buf` to `path` via a temp file in the same directory, then
/// renames it into place, so a reader never observes a partially-written
/// image. Mirrors the pattern used for on-disk artifacts in
/// `foundry-rs-foundry`.
fn atomic_write(path: &Path, buf: &[u8]) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let dir = dir.unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(buf)?;
    tmp.flush()?;
    tmp.persist(path)
        .map_err(|e| AutomatonError::IOError(e.error))?;
    Ok(())
}
