//! Zero-Copy Echo Codec
//!
//! Menjembatani message object dan descriptor set.
//! Codec stateless: setiap serialize/deserialize independen.
//! Tidak ada alokasi dan tidak ada copy payload di sini.

use tracing::warn;

use super::message::EchoMessage;
use super::sga::SgArray;
use crate::core::Arena;
use crate::error::{Error, Result};

/// Codec untuk satu ukuran field yang tetap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
///
/// Jenis message ditentukan oleh type parameter `M` di setiap call,
/// bukan disimpan di codec.
pub struct EchoCodec {
    field_size: usize,
}

impl EchoCodec {
    pub fn new(field_size: usize) -> Self {
        Self { field_size }
    }

    #[inline(always)]
    pub fn field_size(&self) -> usize {
        self.field_size
    }

    /// Serialize `msg` dengan key = `arena[0..field_size]`
    ///
    /// Key di-set ke base address arena, lalu descriptor set dibangun dari key itu.
    /// Tidak ada write ke arena; caller yang menaruh payload sebelumnya.
    #[inline]
    pub fn serialize<'a, M: EchoMessage<'a>>(
        &self,
        msg: &mut M,
        arena: &'a Arena,
    ) -> Result<SgArray<'a>> {
        if self.field_size == 0 {
            return Err(Error::ZeroFieldSize);
        }
        if self.field_size > arena.capacity() {
            return Err(Error::FieldSizeExceedsCapacity {
                field_size: self.field_size,
                capacity: arena.capacity(),
            });
        }
        if self.field_size > arena.valid_len() {
            // Sisa key berisi fill pattern
            warn!(
                field_size = self.field_size,
                valid_len = arena.valid_len(),
                "serializing past arena valid length"
            );
        }

        msg.set_key(&arena.as_slice()[..self.field_size]);
        self.reflect(msg)
    }

    /// Serialize message yang key-nya sudah di-set (mis. view hasil deserialize)
    ///
    /// Dipakai server untuk echo balik payload yang diterima tanpa copy.
    #[inline]
    pub fn reflect<'a, M: EchoMessage<'a>>(&self, msg: &M) -> Result<SgArray<'a>> {
        let mut sga = SgArray::new();
        msg.serialize(&mut sga)?;
        Ok(sga)
    }

    /// Bangun typed view dari descriptor set yang diterima transport
    ///
    /// View meng-alias memory transport; jangan disimpan melewati receive berikutnya.
    #[inline]
    pub fn deserialize<'a, M: EchoMessage<'a>>(&self, sga: &SgArray<'a>) -> Result<M> {
        M::deserialize(sga)
    }
}
