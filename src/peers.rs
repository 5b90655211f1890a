//! Peer lamp records shared with the discovery collaborator

use heapless::String;

use crate::color::Color;

/// Maximum length of an advertised lamp name
pub const MAX_LAMP_NAME_LEN: usize = 32;

/// A peer lamp as seen by proximity discovery
///
/// Records are owned and ordered by the discovery side (oldest first). The
/// expression engine only ever flips `acknowledged`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LampRecord {
    pub name: String<MAX_LAMP_NAME_LEN>,
    /// Signature color broadcast by the peer
    pub color: Color,
    pub acknowledged: bool,
}

impl LampRecord {
    /// Create an unacknowledged record, truncating overly long names
    pub fn new(name: &str, color: Color) -> Self {
        let mut stored = String::new();
        for ch in name.chars() {
            if stored.push(ch).is_err() {
                break;
            }
        }

        Self {
            name: stored,
            color,
            acknowledged: false,
        }
    }
}
