//! Pre-compile mutation and dictionary-style access on [`crate::AhoCorasick`].
//!
//! Mirrors the original `noaho.NoAho` object's lifecycle: one mutable value
//! that keywords are added to, then compiled once, then only read. See
//! `examples/original_source/test-noaho.py` for the reference behavior this
//! file ports.

use crate::error::{AutomatonError, Result};
use crate::node::Node;
use crate::payload::Payload;
use crate::state_id::ROOT;
use crate::AhoCorasick;

impl AhoCorasick {
    /// Creates an empty, uncompiled automaton containing only the root.
    pub fn new() -> Self {
        AhoCorasick {
            nodes: vec![Node::new()],
            compiled: false,
            keyword_count: 0,
        }
    }

    /// Inserts `key` with `payload`, creating child states for any bytes
    /// not already on a path from the root. Re-adding an existing key
    /// overwrites its payload in place.
    pub fn add(&mut self, key: &[u8], payload: impl Into<Payload>) -> Result<()> {
        if self.compiled {
            return Err(AutomatonError::AlreadyCompiled);
        }
        if key.is_empty() {
            return Err(AutomatonError::InvalidKey);
        }

        let mut state = ROOT;
        for &byte in key {
            state = match self.nodes[state as usize].children.get(byte) {
                Some(next) => next,
                None => {
                    let depth = self.nodes[state as usize].depth + 1;
                    let mut child = Node::new();
                    child.depth = depth;
                    let new_id = self.nodes.len() as u32;
                    self.nodes.push(child);
                    self.nodes[state as usize].set_child(byte, new_id);
                    new_id
                }
            };
        }

        let node = &mut self.nodes[state as usize];
        if !node.terminal {
            self.keyword_count += 1;
        }
        node.terminal = true;
        node.payload = payload.into();
        Ok(())
    }

    /// Runs the compile pipeline (failure links, output summaries, length
    /// hints, dense repacking). Idempotent: a second call is a no-op.
    pub fn compile(&mut self) {
        if self.compiled {
            return;
        }
        crate::compiler::compile(&mut self.nodes);
        self.compiled = true;
    }

    /// Number of distinct keywords stored (not the number of states).
    pub fn len(&self) -> usize {
        self.keyword_count
    }

    /// `true` iff no keywords have been added.
    pub fn is_empty(&self) -> bool {
        self.keyword_count == 0
    }

    /// Total number of states, including the root.
    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total outgoing goto edges across all states (failure links excluded).
    pub fn children_count(&self) -> usize {
        self.nodes.iter().map(|n| n.children.len()).sum()
    }

    /// `true` iff `key` is exactly a stored keyword. Works before or after
    /// `compile()`.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.walk(key)
            .map(|state| self.nodes[state as usize].terminal)
            .unwrap_or(false)
    }

    /// The payload stored for `key`. The empty key fails `KeyNotFound`, same
    /// as any other key that was never added — only `add`/`set` treat it as
    /// `InvalidKey`.
    pub fn get(&self, key: &[u8]) -> Result<&Payload> {
        if key.is_empty() {
            return Err(AutomatonError::KeyNotFound);
        }
        let state = self.walk(key).ok_or(AutomatonError::KeyNotFound)?;
        let node = &self.nodes[state as usize];
        if node.terminal {
            Ok(&node.payload)
        } else {
            Err(AutomatonError::KeyNotFound)
        }
    }

    /// Dictionary-style sugar for [`AhoCorasick::add`] with an existing key.
    pub fn set(&mut self, key: &[u8], payload: impl Into<Payload>) -> Result<()> {
        self.add(key, payload)
    }

    /// Walks `key` from the root along goto edges only; `None` if the path
    /// doesn't fully exist.
    fn walk(&self, key: &[u8]) -> Option<u32> {
        let mut state = ROOT;
        for &byte in key {
            state = self.nodes[state as usize].children.get(byte)?;
        }
        Some(state)
    }
}

impl Default for AhoCorasick {
    fn default() -> Self {
        Self::new()
    }
}
