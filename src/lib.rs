//! Cornflake - Zero-Copy Echo Messaging
//!
//! Arsitektur:
//! - Arena: Satu anonymous mmap region per session, di-reserve sekali
//! - Codec: Message <-> scatter-gather descriptor set tanpa copy payload
//! - Transport: Descriptor set diserahkan langsung ke I/O layer
//! - Session: Mengikat arena, codec, dan transport secara eksplisit

pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod protocol;

pub use crate::config::EchoConfig;
pub use crate::core::Arena;
pub use crate::error::{Error, Result};
pub use crate::protocol::{EchoCodec, EchoMessage, GetMessage, SgArray, SgSegment};
