//! Echo session configuration

use crate::core::DEFAULT_ARENA_CAPACITY;
use crate::error::{Error, Result};
use crate::protocol::MessageKind;

/// Default ukuran key per message
pub const DEFAULT_FIELD_SIZE: usize = 64;

/// Konfigurasi untuk satu echo session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoConfig {
    /// Panjang key payload, sama untuk semua message
    pub field_size: usize,
    /// Ukuran arena dalam bytes
    pub arena_capacity: usize,
    pub message_kind: MessageKind,
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            field_size: DEFAULT_FIELD_SIZE,
            arena_capacity: DEFAULT_ARENA_CAPACITY,
            message_kind: MessageKind::Get,
        }
    }
}

impl EchoConfig {
    pub fn with_field_size(mut self, field_size: usize) -> Self {
        self.field_size = field_size;
        self
    }

    pub fn with_arena_capacity(mut self, capacity: usize) -> Self {
        self.arena_capacity = capacity;
        self
    }

    pub fn with_message_kind(mut self, kind: MessageKind) -> Self {
        self.message_kind = kind;
        self
    }

    /// Cek konsistensi sebelum arena di-reserve
    pub fn validate(&self) -> Result<()> {
        if self.arena_capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        if self.field_size == 0 {
            return Err(Error::ZeroFieldSize);
        }
        if self.field_size > self.arena_capacity {
            return Err(Error::FieldSizeExceedsCapacity {
                field_size: self.field_size,
                capacity: self.arena_capacity,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EchoConfig::default();
        assert_eq!(config.arena_capacity, 4_096_000);
        assert_eq!(config.field_size, 64);
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects() {
        let base = EchoConfig::default();

        assert!(matches!(
            base.clone().with_field_size(0).validate(),
            Err(Error::ZeroFieldSize)
        ));
        assert!(matches!(
            base.clone().with_arena_capacity(0).validate(),
            Err(Error::ZeroCapacity)
        ));
        assert!(matches!(
            base.with_arena_capacity(128).with_field_size(129).validate(),
            Err(Error::FieldSizeExceedsCapacity { .. })
        ));
    }
}
