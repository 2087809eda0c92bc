//! Versioned binary snapshots.
//!
//! Any serde-serializable state (a single [`Mixture`](crate::mixture::Mixture),
//! a whole workshop) is encoded with `bitcode` behind a small header carrying a
//! magic number, a format version and the tick it was taken at. The payload is
//! stored as an opaque byte blob so the header can be checked before the
//! payload is decoded.

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::Ticks;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a smeltery snapshot.
pub const SNAPSHOT_MAGIC: u32 = 0x5A17_0001;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur while encoding a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

/// Errors that can occur while restoring a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SNAPSHOT_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("snapshot from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
    #[error("snapshot state is inconsistent: {0}")]
    Inconsistent(String),
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
    /// Tick count at the time the snapshot was taken.
    pub tick: Ticks,
}

impl SnapshotHeader {
    pub fn new(tick: Ticks) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
            tick,
        }
    }

    pub fn validate(&self) -> Result<(), RestoreError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(RestoreError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(RestoreError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(RestoreError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    header: SnapshotHeader,
    payload: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Encode / decode
// ---------------------------------------------------------------------------

/// Encode `state` taken at `tick`.
pub fn encode<T: Serialize>(tick: Ticks, state: &T) -> Result<Vec<u8>, SnapshotError> {
    let payload = bitcode::serialize(state).map_err(|e| SnapshotError::Encode(e.to_string()))?;
    let envelope = Envelope {
        header: SnapshotHeader::new(tick),
        payload,
    };
    bitcode::serialize(&envelope).map_err(|e| SnapshotError::Encode(e.to_string()))
}

/// Read and validate only the header.
pub fn read_header(data: &[u8]) -> Result<SnapshotHeader, RestoreError> {
    let envelope = decode_envelope(data)?;
    envelope.header.validate()?;
    Ok(envelope.header)
}

/// Decode a snapshot produced by [`encode`], returning its header and state.
pub fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<(SnapshotHeader, T), RestoreError> {
    let envelope = decode_envelope(data)?;
    if let Err(e) = envelope.header.validate() {
        warn!("rejecting snapshot: {e}");
        return Err(e);
    }
    let state = bitcode::deserialize(&envelope.payload).map_err(|e| {
        warn!("rejecting snapshot payload: {e}");
        RestoreError::Decode(e.to_string())
    })?;
    Ok((envelope.header, state))
}

fn decode_envelope(data: &[u8]) -> Result<Envelope, RestoreError> {
    bitcode::deserialize(data).map_err(|e| RestoreError::Decode(e.to_string()))
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixture::Mixture;
    use crate::test_utils::*;

    fn sample_mixture() -> Mixture {
        let mut m = Mixture::new(4000.0);
        m.add(copper(), 90.0);
        m.add(tin(), 10.0);
        m
    }

    #[test]
    fn mixture_snapshot_round_trip() {
        let m = sample_mixture();
        let data = encode(42, &m).unwrap();
        let (header, back): (SnapshotHeader, Mixture) = decode(&data).unwrap();
        assert_eq!(header.tick, 42);
        assert_eq!(back, m);
    }

    #[test]
    fn restored_mixture_resolves_like_the_original() {
        let catalog = sample_catalog();
        let m = sample_mixture();
        let data = encode(0, &m).unwrap();
        let (_, back): (SnapshotHeader, Mixture) = decode(&data).unwrap();
        assert_eq!(back.resolve(&catalog), m.resolve(&catalog));
    }

    #[test]
    fn read_header_only() {
        let data = encode(7, &sample_mixture()).unwrap();
        let header = read_header(&data).unwrap();
        assert_eq!(header.magic, SNAPSHOT_MAGIC);
        assert_eq!(header.version, FORMAT_VERSION);
        assert_eq!(header.tick, 7);
    }

    #[test]
    fn header_validation() {
        assert!(SnapshotHeader::new(0).validate().is_ok());

        let mut h = SnapshotHeader::new(0);
        h.magic = 0xDEAD_BEEF;
        assert!(matches!(h.validate(), Err(RestoreError::InvalidMagic(0xDEAD_BEEF))));

        let mut h = SnapshotHeader::new(0);
        h.version = FORMAT_VERSION + 1;
        assert!(matches!(h.validate(), Err(RestoreError::FutureVersion(_))));

        let mut h = SnapshotHeader::new(0);
        h.version = 0;
        assert!(matches!(h.validate(), Err(RestoreError::UnsupportedVersion(0))));
    }

    #[test]
    fn future_version_is_rejected_on_decode() {
        let envelope = Envelope {
            header: SnapshotHeader {
                magic: SNAPSHOT_MAGIC,
                version: FORMAT_VERSION + 1,
                tick: 0,
            },
            payload: bitcode::serialize(&sample_mixture()).unwrap(),
        };
        let data = bitcode::serialize(&envelope).unwrap();
        let result: Result<(SnapshotHeader, Mixture), _> = decode(&data);
        assert!(matches!(result, Err(RestoreError::FutureVersion(_))));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let result: Result<(SnapshotHeader, Mixture), _> = decode(&[1, 2, 3]);
        assert!(matches!(result, Err(RestoreError::Decode(_))));
    }

    #[test]
    fn invalid_mixture_record_is_rejected() {
        use crate::mixture::{ComponentAmount, MixtureRecord};
        let bad = MixtureRecord {
            capacity: 100.0,
            total: 10.0,
            contents: vec![ComponentAmount {
                component: copper(),
                amount: -10.0,
            }],
        };
        let data = encode(0, &bad).unwrap();
        let result: Result<(SnapshotHeader, Mixture), _> = decode(&data);
        assert!(matches!(result, Err(RestoreError::Decode(_))));
    }
}
