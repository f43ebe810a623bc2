//! Echo Message Types
//!
//! Wire layout untuk "get" message:
//! ┌─────────────────────────────────────────────────────┐
//! │ Segment 0: key payload (tepat `field_size` bytes)   │
//! └─────────────────────────────────────────────────────┘
//!
//! Tidak ada header. Peer men-decode tepat `field_size` bytes per message.

use std::str::FromStr;

use super::sga::{SgArray, SgSegment};
use crate::error::{Error, Result};

/// Jenis message yang didukung echo benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    /// Get request/response dengan satu key
    #[default]
    Get,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
        }
    }

    /// Jumlah segment di wire untuk jenis ini
    pub const fn segment_count(&self) -> usize {
        match self {
            Self::Get => 1,
        }
    }
}

impl FromStr for MessageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "get" | "GET" => Ok(Self::Get),
            other => Err(Error::UnsupportedMessageType(other.to_string())),
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message yang bisa dipetakan ke/dari descriptor set tanpa copy
///
/// Implementor hanya menyimpan view (`&'a [u8]`) ke key, tidak pernah memiliki bytes.
pub trait EchoMessage<'a>: Sized {
    const KIND: MessageKind;

    /// Arahkan key ke `key` (pointer + panjang)
    fn set_key(&mut self, key: &'a [u8]);

    fn key(&self) -> &'a [u8];

    /// Tambahkan segment message ke `sga`
    fn serialize(&self, sga: &mut SgArray<'a>) -> Result<()>;

    /// Bangun view dari descriptor set yang diterima
    fn deserialize(sga: &SgArray<'a>) -> Result<Self>;
}

/// Get message: satu key, zero-copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GetMessage<'a> {
    key: &'a [u8],
}

impl<'a> GetMessage<'a> {
    pub fn new(key: &'a [u8]) -> Self {
        Self { key }
    }

    /// Alamat key (untuk cek aliasing)
    #[inline(always)]
    pub fn key_addr(&self) -> *const u8 {
        self.key.as_ptr()
    }

    #[inline(always)]
    pub fn key_len(&self) -> usize {
        self.key.len()
    }
}

impl<'a> EchoMessage<'a> for GetMessage<'a> {
    const KIND: MessageKind = MessageKind::Get;

    #[inline(always)]
    fn set_key(&mut self, key: &'a [u8]) {
        self.key = key;
    }

    #[inline(always)]
    fn key(&self) -> &'a [u8] {
        self.key
    }

    #[inline(always)]
    fn serialize(&self, sga: &mut SgArray<'a>) -> Result<()> {
        if self.key.is_empty() {
            return Err(Error::EmptySegment {
                index: sga.num_segments(),
            });
        }
        sga.push(SgSegment::from_slice(self.key))
    }

    #[inline(always)]
    fn deserialize(sga: &SgArray<'a>) -> Result<Self> {
        let expected = Self::KIND.segment_count();
        match sga.num_segments() {
            0 => return Err(Error::EmptyDescriptor),
            n if n != expected => return Err(Error::SegmentCount { expected, found: n }),
            _ => {}
        }

        let seg = sga.segments()[0];
        if seg.is_empty() {
            return Err(Error::EmptySegment { index: 0 });
        }

        Ok(Self {
            key: seg.as_slice(),
        })
    }
}
