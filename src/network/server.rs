//! Echo Server dengan event-driven I/O
//!
//! Menggunakan mio untuk non-blocking I/O multiplexing.
//! Setiap koneksi punya receive buffer tetap sebesar `field_size`; begitu penuh,
//! request di-deserialize dan payload yang sama di-echo balik lewat vectored write.

use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::net::SocketAddr;
use std::time::Duration;

use mio::net::{TcpListener, TcpStream};
use mio::{Events, Interest, Poll, Token};
use tracing::{debug, warn};

use super::transport::{stash_remaining, write_sga};
use crate::error::{Error, Result};
use crate::protocol::{EchoCodec, GetMessage, SgArray};

const SERVER_TOKEN: Token = Token(0);
const MAX_CONNECTIONS: usize = 1024;
const EVENTS_CAPACITY: usize = 1024;
/// Koneksi di-drop jika reply yang tertunda melebihi ini
const MAX_BACKLOG: usize = 1024 * 1024;

/// Counter server (single-threaded event loop)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerStats {
    pub requests_echoed: u64,
    pub connections_total: u64,
    pub connections_active: u64,
}

/// State per koneksi
struct EchoConnection {
    stream: TcpStream,
    addr: SocketAddr,
    recv_buf: Box<[u8]>,
    filled: usize,
    backlog: Vec<u8>,
    echoed: u64,
}

/// Echo Server
///
/// - Non-blocking I/O (epoll/kqueue/IOCP)
/// - Receive buffer pre-allocated per koneksi
/// - Reply menunjuk langsung ke receive buffer (zero-copy echo)
pub struct EchoServer {
    poll: Poll,
    listener: TcpListener,
    connections: HashMap<Token, EchoConnection>,
    next_token: usize,
    codec: EchoCodec,
    events: Events,
    stats: ServerStats,
}

impl EchoServer {
    /// Bind server untuk request berukuran `field_size`
    pub fn bind(addr: SocketAddr, field_size: usize) -> Result<Self> {
        if field_size == 0 {
            return Err(Error::ZeroFieldSize);
        }

        let poll = Poll::new()?;
        let mut listener = TcpListener::bind(addr)?;
        poll.registry()
            .register(&mut listener, SERVER_TOKEN, Interest::READABLE)?;

        Ok(Self {
            poll,
            listener,
            connections: HashMap::with_capacity(MAX_CONNECTIONS),
            next_token: 1,
            codec: EchoCodec::new(field_size),
            events: Events::with_capacity(EVENTS_CAPACITY),
            stats: ServerStats::default(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn stats(&self) -> ServerStats {
        self.stats
    }

    /// Event loop tanpa akhir
    pub fn run(&mut self) -> Result<()> {
        debug!(addr = ?self.local_addr()?, "echo server listening");

        loop {
            // Timeout 1ms untuk responsiveness
            self.poll_once(Some(Duration::from_millis(1)))?;
        }
    }

    /// Satu iterasi poll. Returns jumlah event yang diproses.
    pub fn poll_once(&mut self, timeout: Option<Duration>) -> Result<usize> {
        // Events dipinjam keluar supaya handler bisa pakai &mut self
        let mut events = std::mem::replace(&mut self.events, Events::with_capacity(0));

        if let Err(e) = self.poll.poll(&mut events, timeout) {
            self.events = events;
            if e.kind() == io::ErrorKind::Interrupted {
                return Ok(0);
            }
            return Err(e.into());
        }

        let result = self.dispatch(&events);
        self.events = events;
        result
    }

    fn dispatch(&mut self, events: &Events) -> Result<usize> {
        let mut handled = 0;
        for event in events.iter() {
            handled += 1;
            match event.token() {
                SERVER_TOKEN => self.accept_connections()?,
                token => {
                    let mut open = true;
                    if event.is_readable() {
                        open = self.handle_read(token);
                    }
                    if open && event.is_writable() {
                        open = self.handle_write(token);
                    }
                    if !open {
                        self.close_connection(token);
                    }
                }
            }
        }
        Ok(handled)
    }

    fn accept_connections(&mut self) -> Result<()> {
        loop {
            match self.listener.accept() {
                Ok((mut stream, addr)) => {
                    if self.connections.len() >= MAX_CONNECTIONS {
                        warn!(%addr, "max connections reached, rejecting");
                        continue;
                    }

                    let token = Token(self.next_token);
                    self.next_token += 1;

                    // Disable Nagle untuk lower latency
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!(%addr, error = %e, "failed to set TCP_NODELAY");
                    }
                    self.poll.registry().register(
                        &mut stream,
                        token,
                        Interest::READABLE | Interest::WRITABLE,
                    )?;

                    self.connections.insert(
                        token,
                        EchoConnection {
                            stream,
                            addr,
                            recv_buf: vec![0u8; self.codec.field_size()].into_boxed_slice(),
                            filled: 0,
                            backlog: Vec::new(),
                            echoed: 0,
                        },
                    );
                    self.stats.connections_total += 1;
                    self.stats.connections_active += 1;
                    debug!(%addr, ?token, "connection accepted");
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Returns `false` jika koneksi harus ditutup
    fn handle_read(&mut self, token: Token) -> bool {
        let codec = self.codec;
        let conn = match self.connections.get_mut(&token) {
            Some(c) => c,
            None => return true,
        };

        // Edge-triggered: baca sampai WouldBlock
        loop {
            match conn.stream.read(&mut conn.recv_buf[conn.filled..]) {
                Ok(0) => return false,
                Ok(n) => {
                    conn.filled += n;
                    if conn.filled == conn.recv_buf.len() {
                        if let Err(e) = conn.echo(&codec) {
                            warn!(addr = %conn.addr, error = %e, "echo failed");
                            return false;
                        }
                        conn.filled = 0;
                        self.stats.requests_echoed += 1;
                    }
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => return true,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    debug!(addr = %conn.addr, error = %e, "read error");
                    return false;
                }
            }
        }
    }

    fn handle_write(&mut self, token: Token) -> bool {
        match self.connections.get_mut(&token) {
            Some(conn) => match conn.flush_backlog() {
                Ok(()) => true,
                Err(e) => {
                    debug!(addr = %conn.addr, error = %e, "write error");
                    false
                }
            },
            None => true,
        }
    }

    fn close_connection(&mut self, token: Token) {
        if let Some(mut conn) = self.connections.remove(&token) {
            self.poll.registry().deregister(&mut conn.stream).ok();
            self.stats.connections_active -= 1;
            debug!(addr = %conn.addr, echoed = conn.echoed, "connection closed");
        }
    }
}

impl EchoConnection {
    /// Deserialize request penuh dan kirim balik payload-nya
    fn echo(&mut self, codec: &EchoCodec) -> Result<()> {
        let sga = SgArray::single(&self.recv_buf);
        let req: GetMessage = codec.deserialize(&sga)?;
        let reply = codec.reflect(&req)?;

        // Jaga urutan: jika masih ada backlog, reply ikut antre
        let written = if self.backlog.is_empty() {
            write_sga(&mut self.stream, &reply)?
        } else {
            0
        };

        if written < reply.total_len() {
            stash_remaining(&reply, written, &mut self.backlog);
            if self.backlog.len() > MAX_BACKLOG {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::OutOfMemory,
                    "reply backlog overflow",
                )));
            }
        }

        self.echoed += 1;
        Ok(())
    }

    /// Flush reply yang tertunda
    fn flush_backlog(&mut self) -> io::Result<()> {
        while !self.backlog.is_empty() {
            match self.stream.write(&self.backlog) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "failed to write to socket",
                    ));
                }
                Ok(n) => {
                    self.backlog.drain(..n);
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpStream as StdTcpStream;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{mpsc, Arc};
    use std::thread;

    #[test]
    fn test_bind_rejects_zero_field_size() {
        let addr = "127.0.0.1:0".parse().unwrap();
        assert!(matches!(
            EchoServer::bind(addr, 0),
            Err(Error::ZeroFieldSize)
        ));
    }

    #[test]
    fn test_echo_split_request() {
        let (addr_tx, addr_rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_server = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            let mut server = EchoServer::bind("127.0.0.1:0".parse().unwrap(), 16).unwrap();
            addr_tx.send(server.local_addr().unwrap()).unwrap();
            while !stop_server.load(Ordering::Relaxed) {
                server.poll_once(Some(Duration::from_millis(5))).unwrap();
            }
            server.stats()
        });

        let addr = addr_rx.recv().unwrap();
        let mut client = StdTcpStream::connect(addr).unwrap();
        client.set_nodelay(true).unwrap();

        // Request dikirim dalam dua potong
        client.write_all(b"01234567").unwrap();
        client.flush().unwrap();
        thread::sleep(Duration::from_millis(20));
        client.write_all(b"89abcdef").unwrap();

        let mut reply = [0u8; 16];
        client.read_exact(&mut reply).unwrap();
        assert_eq!(&reply, b"0123456789abcdef");

        drop(client);
        thread::sleep(Duration::from_millis(20));
        stop.store(true, Ordering::Relaxed);

        let stats = handle.join().unwrap();
        assert_eq!(stats.requests_echoed, 1);
        assert_eq!(stats.connections_total, 1);
    }
}
