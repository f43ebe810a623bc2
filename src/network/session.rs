//! Echo Session
//!
//! Satu session = satu arena + satu codec + satu transport.
//! Arena di-reserve sekali di `new`, semua request keluar menunjuk ke arena,
//! semua response masuk dibaca dari receive buffer yang juga pre-allocated.

use tracing::{debug, warn};

use super::transport::Transport;
use crate::config::EchoConfig;
use crate::core::Arena;
use crate::error::Result;
use crate::protocol::{EchoCodec, EchoMessage, GetMessage};

pub struct EchoSession<T: Transport> {
    arena: Arena,
    codec: EchoCodec,
    transport: T,
    recv_buf: Box<[u8]>,
    requests_sent: u64,
    responses_received: u64,
}

impl<T: Transport> EchoSession<T> {
    /// Validasi config, reserve arena, siapkan receive buffer
    pub fn new(config: &EchoConfig, transport: T) -> Result<Self> {
        config.validate()?;
        let arena = Arena::reserve(config.arena_capacity)?;
        Ok(Self::with_arena(config, arena, transport))
    }

    /// Pakai arena yang sudah di-reserve caller
    pub fn with_arena(config: &EchoConfig, arena: Arena, transport: T) -> Self {
        debug!(
            field_size = config.field_size,
            capacity = arena.capacity(),
            kind = %config.message_kind,
            "echo session created"
        );

        Self {
            arena,
            codec: EchoCodec::new(config.field_size),
            transport,
            recv_buf: vec![0u8; config.field_size].into_boxed_slice(),
            requests_sent: 0,
            responses_received: 0,
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Untuk menaruh payload atau mengubah valid length di antara message
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn codec(&self) -> &EchoCodec {
        &self.codec
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn requests_sent(&self) -> u64 {
        self.requests_sent
    }

    pub fn responses_received(&self) -> u64 {
        self.responses_received
    }

    /// Kirim satu get request yang key-nya menunjuk ke awal arena
    pub fn send_request(&mut self) -> Result<u64> {
        let mut msg = GetMessage::default();
        let sga = self.codec.serialize(&mut msg, &self.arena)?;
        let qtoken = self.transport.push(&sga)?;
        self.requests_sent += 1;
        Ok(qtoken)
    }

    /// Terima satu response. View valid sampai receive berikutnya.
    pub fn recv_response(&mut self) -> Result<GetMessage<'_>> {
        let sga = self.transport.pop(&mut self.recv_buf)?;
        let msg = self.codec.deserialize(&sga)?;
        self.responses_received += 1;
        Ok(msg)
    }

    /// Kirim request lalu tunggu echo-nya. Returns panjang payload response.
    pub fn round_trip(&mut self) -> Result<usize> {
        self.send_request()?;

        let Self {
            arena,
            codec,
            transport,
            recv_buf,
            responses_received,
            ..
        } = self;

        let sga = transport.pop(recv_buf)?;
        let resp: GetMessage = codec.deserialize(&sga)?;
        *responses_received += 1;

        if resp.key() != &arena.as_slice()[..codec.field_size()] {
            warn!(len = resp.key_len(), "echo payload differs from request");
        }

        Ok(resp.key_len())
    }

    /// Server side: terima satu request dan kirim balik payload yang sama tanpa copy
    pub fn echo_once(&mut self) -> Result<usize> {
        let Self {
            codec,
            transport,
            recv_buf,
            requests_sent,
            responses_received,
            ..
        } = self;

        let sga = transport.pop(recv_buf)?;
        let req: GetMessage = codec.deserialize(&sga)?;
        *responses_received += 1;

        let reply = codec.reflect(&req)?;
        transport.push(&reply)?;
        *requests_sent += 1;

        Ok(req.key_len())
    }

    /// Tutup session: arena di-unmap, transport dikembalikan ke caller
    pub fn close(self) -> T {
        let Self {
            arena, transport, ..
        } = self;
        arena.release();
        transport
    }
}
