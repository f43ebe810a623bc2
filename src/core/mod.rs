//! Core module: Memory Arena dan Completion Queue
//!
//! Prinsip desain:
//! - Zero-Copy: Payload direferensikan langsung dari mmap region
//! - No-Allocation: Arena dan queue di-alokasi sekali saat init
//! - Ownership: Arena di-release tepat sekali lewat Drop

mod arena;
mod completion;

pub use arena::{Arena, DEFAULT_ARENA_CAPACITY, FILL_BYTE, PAGE_SIZE};
pub use completion::{Completion, CompletionQueue};
