//! Network Layer: Transport dan Echo Session
//!
//! Transport menerima/menyerahkan descriptor set, bukan byte buffer.
//! Session mengikat arena + codec ke satu transport.
//!
//! Fitur:
//! - Loopback transport in-process (test, benchmark)
//! - Blocking TCP transport dengan vectored write
//! - mio echo server untuk sisi peer

mod loopback;
mod server;
mod session;
mod tcp;
mod transport;

pub use loopback::{LoopbackTransport, DEFAULT_WIRE_CAPACITY, LOOPBACK_QUEUE_DEPTH};
pub use server::{EchoServer, ServerStats};
pub use session::EchoSession;
pub use tcp::TcpTransport;
pub use transport::Transport;
