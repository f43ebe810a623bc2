//! Cornflake Echo - harness untuk zero-copy echo benchmark
//!
//! Usage:
//!   cargo run --release -- server [--bind ADDR] [--field-size N]
//!   cargo run --release -- client [--connect ADDR] [--field-size N] [--iterations K]
//!   cargo run --release                 (loopback, tanpa socket)

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use cornflake::network::{EchoServer, EchoSession, LoopbackTransport, TcpTransport, Transport};
use cornflake::protocol::MessageKind;
use cornflake::{Arena, EchoConfig};
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Loopback,
    Server,
    Client,
}

/// Harness configuration
struct HarnessConfig {
    mode: Mode,
    bind_addr: String,
    connect_addr: String,
    iterations: usize,
    echo: EchoConfig,
    verbose: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Loopback,
            bind_addr: "0.0.0.0:9999".to_string(),
            connect_addr: "127.0.0.1:9999".to_string(),
            iterations: 100_000,
            echo: EchoConfig::default(),
            verbose: false,
        }
    }
}

fn print_help() {
    println!("Cornflake Echo - Zero-Copy Echo Benchmark\n");
    println!("Usage: cornflake [server|client] [OPTIONS]\n");
    println!("Options:");
    println!("  -b, --bind <ADDR>          Server bind address (default: 0.0.0.0:9999)");
    println!("  -c, --connect <ADDR>       Client target address (default: 127.0.0.1:9999)");
    println!("  -f, --field-size <BYTES>   Key payload size (default: 64)");
    println!("      --capacity <BYTES>     Arena size (default: 4096000)");
    println!("  -n, --iterations <N>       Requests to send (default: 100000)");
    println!("  -t, --message-type <TYPE>  Message type (default: get)");
    println!("  -v, --verbose              Debug logging");
    println!("  -h, --help                 Show this help");
}

fn parse_args() -> HarnessConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = HarnessConfig::default();

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "server" => config.mode = Mode::Server,
            "client" => config.mode = Mode::Client,
            "--bind" | "-b" => {
                if let Some(v) = value {
                    config.bind_addr = v.clone();
                    i += 1;
                }
            }
            "--connect" | "-c" => {
                if let Some(v) = value {
                    config.connect_addr = v.clone();
                    i += 1;
                }
            }
            "--field-size" | "-f" => {
                if let Some(v) = value {
                    config.echo.field_size = v.parse().unwrap_or(config.echo.field_size);
                    i += 1;
                }
            }
            "--capacity" => {
                if let Some(v) = value {
                    config.echo.arena_capacity = v.parse().unwrap_or(config.echo.arena_capacity);
                    i += 1;
                }
            }
            "--iterations" | "-n" => {
                if let Some(v) = value {
                    config.iterations = v.parse().unwrap_or(config.iterations);
                    i += 1;
                }
            }
            "--message-type" | "-t" => {
                if let Some(v) = value {
                    match v.parse::<MessageKind>() {
                        Ok(kind) => config.echo.message_kind = kind,
                        Err(e) => {
                            eprintln!("❌ {}", e);
                            std::process::exit(1);
                        }
                    }
                    i += 1;
                }
            }
            "--verbose" | "-v" => config.verbose = true,
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => eprintln!("⚠️ Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    config
}

/// Latency rata-rata dalam ns, tanpa membatasi `iterations` ke u32
fn per_op_nanos(elapsed: Duration, iterations: usize) -> f64 {
    if iterations == 0 {
        return 0.0;
    }
    elapsed.as_nanos() as f64 / iterations as f64
}

/// Jalankan `iterations` round trip dan print latency rata-rata
fn drive<T: Transport>(session: &mut EchoSession<T>, iterations: usize) -> cornflake::Result<()> {
    // Warm up
    for _ in 0..iterations.min(1000) {
        session.round_trip()?;
    }

    let start = Instant::now();
    for _ in 0..iterations {
        session.round_trip()?;
    }
    let elapsed = start.elapsed();

    let per_op = per_op_nanos(elapsed, iterations);

    println!("  Field size:  {} bytes", session.codec().field_size());
    println!("  Requests:    {}", iterations);
    println!(
        "  Round trip:  {:.2} ns/op ({:.3} μs/op)",
        per_op,
        per_op / 1000.0
    );
    println!(
        "  Throughput:  {:.2} K msgs/sec",
        iterations as f64 / elapsed.as_secs_f64() / 1000.0
    );
    Ok(())
}

fn run(config: HarnessConfig) -> cornflake::Result<()> {
    config.echo.validate()?;

    match config.mode {
        Mode::Server => {
            let addr: SocketAddr = config.bind_addr.parse().map_err(|e| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
            })?;
            let mut server = EchoServer::bind(addr, config.echo.field_size)?;
            println!("🔌 Echo server on {}", server.local_addr()?);
            println!("   Field size: {} bytes\n", config.echo.field_size);
            server.run()
        }
        Mode::Client => {
            // Tanpa working memory benchmark tidak bisa jalan
            let arena = Arena::reserve_or_exit(config.echo.arena_capacity);
            let transport = TcpTransport::connect(&config.connect_addr, config.echo.field_size)?;
            let mut session = EchoSession::with_arena(&config.echo, arena, transport);

            println!("📡 Echo client -> {}", config.connect_addr);
            drive(&mut session, config.iterations)?;
            session.close();
            Ok(())
        }
        Mode::Loopback => {
            let arena = Arena::reserve_or_exit(config.echo.arena_capacity);
            let mut session =
                EchoSession::with_arena(&config.echo, arena, LoopbackTransport::default());

            println!("📊 Loopback Echo (no socket)");
            drive(&mut session, config.iterations)?;
            session.close();
            Ok(())
        }
    }
}

fn main() {
    let config = parse_args();

    tracing_subscriber::fmt()
        .with_max_level(if config.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    if let Err(e) = run(config) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}
