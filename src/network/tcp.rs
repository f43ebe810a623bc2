//! Blocking TCP transport
//!
//! Wire tidak punya header: setiap frame tepat `frame_len` bytes.
//! Segment dikirim dengan satu vectored write loop, jadi payload di arena
//! langsung diserahkan ke kernel tanpa copy ke buffer user space.

use std::io::{self, Read};
use std::net::{TcpStream, ToSocketAddrs};

use super::transport::{write_sga, Transport};
use crate::protocol::SgArray;

pub struct TcpTransport {
    stream: TcpStream,
    frame_len: usize,
    next_qtoken: u64,
}

impl TcpTransport {
    /// Connect ke echo server
    pub fn connect<A: ToSocketAddrs>(addr: A, frame_len: usize) -> io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        Self::from_stream(stream, frame_len)
    }

    /// Wrap stream yang sudah terkoneksi
    pub fn from_stream(stream: TcpStream, frame_len: usize) -> io::Result<Self> {
        // Disable Nagle: setiap request kecil harus langsung terkirim
        stream.set_nodelay(true)?;
        stream.set_nonblocking(false)?;

        Ok(Self {
            stream,
            frame_len,
            next_qtoken: 1,
        })
    }

    #[inline(always)]
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    pub fn stream(&self) -> &TcpStream {
        &self.stream
    }
}

impl Transport for TcpTransport {
    fn push(&mut self, sga: &SgArray<'_>) -> io::Result<u64> {
        let written = write_sga(&mut self.stream, sga)?;
        if written < sga.total_len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "short write on blocking stream",
            ));
        }

        let qtoken = self.next_qtoken;
        self.next_qtoken += 1;
        Ok(qtoken)
    }

    fn pop<'b>(&mut self, buf: &'b mut [u8]) -> io::Result<SgArray<'b>> {
        if buf.len() < self.frame_len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "receive buffer smaller than frame",
            ));
        }

        let (frame, _) = buf.split_at_mut(self.frame_len);
        self.stream.read_exact(frame)?;

        Ok(SgArray::single(frame))
    }
}
