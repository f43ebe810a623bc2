//! In-process loopback transport
//!
//! Frame yang di-push di-stage ke wire buffer pre-allocated, lalu tersedia
//! untuk `pop` berikutnya (urutan FIFO). Dipakai untuk test dan benchmark
//! tanpa socket.

use std::io;

use tracing::trace;

use super::transport::Transport;
use crate::core::{Completion, CompletionQueue};
use crate::protocol::SgArray;

/// Jumlah frame in-flight maksimum
pub const LOOPBACK_QUEUE_DEPTH: usize = 64;

/// Default ukuran wire buffer: 1MB
pub const DEFAULT_WIRE_CAPACITY: usize = 1024 * 1024;

pub struct LoopbackTransport {
    wire: Box<[u8]>,
    read_pos: usize,
    write_pos: usize,
    completions: CompletionQueue<LOOPBACK_QUEUE_DEPTH>,
    next_qtoken: u64,
}

impl Default for LoopbackTransport {
    fn default() -> Self {
        Self::new(DEFAULT_WIRE_CAPACITY)
    }
}

impl LoopbackTransport {
    pub fn new(wire_capacity: usize) -> Self {
        Self {
            wire: vec![0u8; wire_capacity].into_boxed_slice(),
            read_pos: 0,
            write_pos: 0,
            completions: CompletionQueue::new(),
            next_qtoken: 1,
        }
    }

    /// Jumlah frame yang belum di-pop
    #[inline(always)]
    pub fn pending(&self) -> usize {
        self.completions.len()
    }

    /// Completion untuk frame yang akan di-pop berikutnya
    #[inline(always)]
    pub fn next_completion(&self) -> Option<Completion> {
        self.completions.peek()
    }

    /// Geser bytes yang belum dibaca ke awal wire buffer
    fn compact(&mut self) {
        if self.read_pos == 0 {
            return;
        }
        self.wire.copy_within(self.read_pos..self.write_pos, 0);
        self.write_pos -= self.read_pos;
        self.read_pos = 0;
    }
}

impl Transport for LoopbackTransport {
    fn push(&mut self, sga: &SgArray<'_>) -> io::Result<u64> {
        let len = sga.total_len();
        if len > self.wire.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "frame larger than loopback wire buffer",
            ));
        }
        if self.completions.is_full() {
            return Err(io::ErrorKind::WouldBlock.into());
        }

        if self.write_pos + len > self.wire.len() {
            self.compact();
            if self.write_pos + len > self.wire.len() {
                return Err(io::ErrorKind::WouldBlock.into());
            }
        }

        for seg in sga.segments() {
            let bytes = seg.as_slice();
            self.wire[self.write_pos..self.write_pos + bytes.len()].copy_from_slice(bytes);
            self.write_pos += bytes.len();
        }

        let qtoken = self.next_qtoken;
        self.next_qtoken += 1;
        // Tidak bisa gagal: is_full sudah dicek
        self.completions.push(Completion { qtoken, len });

        Ok(qtoken)
    }

    fn pop<'b>(&mut self, buf: &'b mut [u8]) -> io::Result<SgArray<'b>> {
        let Completion { qtoken, len } = match self.completions.peek() {
            Some(c) => c,
            None => return Err(io::ErrorKind::WouldBlock.into()),
        };
        if buf.len() < len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "receive buffer smaller than frame",
            ));
        }
        self.completions.pop();
        trace!(qtoken, len, "loopback frame delivered");

        let (frame, _) = buf.split_at_mut(len);
        frame.copy_from_slice(&self.wire[self.read_pos..self.read_pos + len]);
        self.read_pos += len;
        if self.read_pos == self.write_pos {
            self.read_pos = 0;
            self.write_pos = 0;
        }

        Ok(SgArray::single(frame))
    }
}
