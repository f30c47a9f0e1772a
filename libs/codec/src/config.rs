//! # Framing Configuration
//!
//! Size limits applied when packing messages into MoldUDP64 frames, so the
//! same builder serves loopback replay (jumbo datagrams) and real networks
//! (Ethernet MTU) without hardcoded values.

use crate::error::{FramingError, FramingResult};
use crate::moldudp64::{HEADER_SIZE, LENGTH_PREFIX_SIZE, MAX_MESSAGE_COUNT};
use serde::{Deserialize, Serialize};

/// Largest UDP payload over IPv4 (65_535 - 20 IP - 8 UDP)
pub const MAX_UDP_PAYLOAD: usize = 65_507;

/// UDP payload that fits a 1500-byte Ethernet MTU without fragmentation
pub const ETHERNET_UDP_PAYLOAD: usize = 1_472;

/// Per-frame limits for [`FrameBuilder`](crate::FrameBuilder) and
/// [`SessionSequencer`](crate::SessionSequencer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    /// Maximum encoded frame size in bytes, header included
    pub max_frame_size: usize,
    /// Maximum message blocks per frame (the count field caps this at 65_535)
    pub max_messages_per_frame: usize,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            max_frame_size: MAX_UDP_PAYLOAD,
            max_messages_per_frame: MAX_MESSAGE_COUNT,
        }
    }
}

impl FramingConfig {
    /// Frames that survive a standard Ethernet path unfragmented
    pub fn ethernet() -> Self {
        Self {
            max_frame_size: ETHERNET_UDP_PAYLOAD,
            ..Self::default()
        }
    }

    /// Reject limits that cannot produce a frame holding at least one block
    pub fn validate(&self) -> FramingResult<()> {
        let min_frame = HEADER_SIZE + LENGTH_PREFIX_SIZE;
        if self.max_frame_size < min_frame {
            return Err(FramingError::invalid_config(format!(
                "max_frame_size {} is below the {min_frame}-byte minimum (header plus one length prefix)",
                self.max_frame_size
            )));
        }
        if self.max_messages_per_frame == 0 {
            return Err(FramingError::invalid_config(
                "max_messages_per_frame must be at least 1",
            ));
        }
        if self.max_messages_per_frame > MAX_MESSAGE_COUNT {
            return Err(FramingError::invalid_config(format!(
                "max_messages_per_frame {} exceeds the 2-byte count field maximum {MAX_MESSAGE_COUNT}",
                self.max_messages_per_frame
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(FramingConfig::default().validate().is_ok());
        assert!(FramingConfig::ethernet().validate().is_ok());
        assert_eq!(FramingConfig::ethernet().max_messages_per_frame, 65_535);
    }

    #[test]
    fn test_rejects_unusable_limits() {
        let tiny = FramingConfig {
            max_frame_size: 21,
            ..FramingConfig::default()
        };
        assert!(matches!(tiny.validate(), Err(FramingError::InvalidConfig { .. })));

        let smallest = FramingConfig {
            max_frame_size: 22,
            ..FramingConfig::default()
        };
        assert!(smallest.validate().is_ok());

        let zero = FramingConfig {
            max_messages_per_frame: 0,
            ..FramingConfig::default()
        };
        assert!(zero.validate().is_err());

        let wide = FramingConfig {
            max_messages_per_frame: 70_000,
            ..FramingConfig::default()
        };
        assert!(wide.validate().unwrap_err().to_string().contains("70000"));
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let cfg: FramingConfig = serde_json::from_str(r#"{"max_frame_size": 1000}"#).unwrap();
        assert_eq!(cfg.max_frame_size, 1000);
        assert_eq!(cfg.max_messages_per_frame, MAX_MESSAGE_COUNT);
    }
}
