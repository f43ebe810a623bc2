//! Protocol Layer: Zero-Copy Scatter-Gather Encoding
//!
//! Prinsip desain:
//! - Descriptor set: Hanya pasangan (address, length), tidak ada copy payload
//! - Fixed shape: Get message selalu tepat satu segment
//! - No allocation: Descriptor set inline, kapasitas tetap

mod codec;
mod message;
mod sga;

pub use codec::EchoCodec;
pub use message::{EchoMessage, GetMessage, MessageKind};
pub use sga::{SgArray, SgSegment, SGARRAY_MAX_SEGMENTS};
