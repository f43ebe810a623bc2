//! Error types untuk arena dan codec
//!
//! Semua contract violation dilaporkan ke caller secara sinkron.
//! Tidak ada retry di layer ini.

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// mmap gagal saat arena dibuat
    #[error("failed to reserve {len}-byte arena: {source}")]
    Reserve {
        len: usize,
        #[source]
        source: io::Error,
    },

    #[error("arena capacity must be non-zero")]
    ZeroCapacity,

    #[error("valid length {len} exceeds arena capacity {capacity}")]
    ValidLengthOutOfRange { len: usize, capacity: usize },

    #[error("field size must be non-zero")]
    ZeroFieldSize,

    #[error("field size {field_size} exceeds arena capacity {capacity}")]
    FieldSizeExceedsCapacity { field_size: usize, capacity: usize },

    #[error("descriptor set has no segments")]
    EmptyDescriptor,

    #[error("descriptor segment {index} has zero length")]
    EmptySegment { index: usize },

    #[error("expected {expected} descriptor segment(s), found {found}")]
    SegmentCount { expected: usize, found: usize },

    #[error("descriptor set is full ({max} segments)")]
    DescriptorFull { max: usize },

    #[error("unsupported message type: {0}")]
    UnsupportedMessageType(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
