//! State identifiers.
//!
//! The upstream sketch this crate grew from parametrized the automaton over
//! the integer width used for state identifiers (`u8`/`u16`/`u32`/`u64`), so
//! that small automata could be packed tightly. Because the serialized
//! format (see [`crate::serialize`]) pins node indices to 32 bits, that
//! extra genericity bought nothing here, so state ids are a plain `u32`
//! alias and the in-memory and on-disk representations stay numerically
//! identical.

/// Identifies a node in the automaton's node store. Index `0` is always the
/// root.
pub(crate) type NodeId = u32;

/// The root state. Its own failure link points to itself.
pub(crate) const ROOT: NodeId = 0;

/// Sentinel used in child tables (and the `output_state`/`shortest_output_state`
/// fields) to mean "no such node".
pub(crate) const NO_CHILD: NodeId = u32::MAX;
