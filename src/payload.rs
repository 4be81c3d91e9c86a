/// The value associated with a keyword.
///
/// In-memory payloads may be arbitrary host-provided bytes (`Payload::Bytes`),
/// but only `Payload::None` and `Payload::Int` survive a round trip through
/// [`crate::AhoCorasick::write`] — anything else is a [`crate::AutomatonError::PayloadWriteError`].
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Payload {
    #[default]
    None,
    Int(i64),
    Bytes(Vec<u8>),
}

/// Sentinel written in place of a payload value for a terminal that carries
/// `Payload::None`. `Payload::Int(i64::MIN)` is therefore not representable
/// and is rejected by [`crate::AhoCorasick::write`] the same as `Bytes`.
pub(crate) const NONE_SENTINEL: i64 = i64::MIN;

impl Payload {
    /// The value to persist in a node record's payload slot, or `None` if
    /// this payload has no lossless integer representation.
    pub(crate) fn to_wire(&self) -> Option<i64> {
        match self {
            Payload::None => Some(NONE_SENTINEL),
            Payload::Int(v) if *v != NONE_SENTINEL => Some(*v),
            Payload::Int(_) | Payload::Bytes(_) => None,
        }
    }

    /// Inverse of [`Payload::to_wire`], used when reading a node record back.
    pub(crate) fn from_wire(v: i64) -> Payload {
        if v == NONE_SENTINEL {
            Payload::None
        } else {
            Payload::Int(v)
        }
    }
}

impl From<i64> for Payload {
    fn from(v: i64) -> Self {
        Payload::Int(v)
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Payload::None
    }
}

impl From<Vec<u8>> for Payload {
    fn from(v: Vec<u8>) -> Self {
        Payload::Bytes(v)
    }
}
