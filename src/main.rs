//! Entry point for `rdt-over-udp`.
//!
//! Parses CLI arguments and dispatches into either **send** or **recv** mode.
//! All actual protocol work is delegated to library modules; `main.rs` owns
//! only process setup (logging, argument parsing, file I/O).

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use rdt_over_udp::receiver::{Receiver, ReceiverConfig};
use rdt_over_udp::sender::{Sender, SenderConfig};
use rdt_over_udp::simulator::{Simulator, SimulatorConfig};
use rdt_over_udp::socket::RdtSocket;

/// Reliable file transfer over a lossy UDP channel (Go-Back-N ARQ).
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Send a file to a receiver.
    Send {
        /// Receiver host name or IP address.
        receiver_host: String,
        /// Receiver UDP port.
        receiver_port: u16,
        /// File to transfer.
        file: PathBuf,
        /// Enable verbose diagnostic tracing on stderr.
        #[arg(short = 'd', long = "debug")]
        debug: bool,
    },
    /// Receive a file and write it to disk.
    Recv {
        /// UDP port to bind.
        port: u16,
        /// Where to write the received bytes.
        output: PathBuf,
        /// Enable verbose diagnostic tracing on stderr.
        #[arg(short = 'd', long = "debug")]
        debug: bool,
    },
}

/// Initialise env_logger; `-d` forces the `debug` level, otherwise `RUST_LOG`
/// controls verbosity.
fn init_logger(debug: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.mode {
        Mode::Send {
            receiver_host,
            receiver_port,
            file,
            debug,
        } => {
            init_logger(debug);
            run_send(&receiver_host, receiver_port, &file).await
        }
        Mode::Recv {
            port,
            output,
            debug,
        } => {
            init_logger(debug);
            run_recv(port, &output).await
        }
    }
}

async fn run_send(host: &str, port: u16, file: &PathBuf) -> Result<()> {
    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("cannot open file {}", file.display()))?;

    let dest: SocketAddr = tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("cannot resolve {host}:{port}"))?
        .next()
        .with_context(|| format!("no address found for {host}:{port}"))?;

    let bind: SocketAddr = (Ipv4Addr::UNSPECIFIED, 0).into();
    let socket = RdtSocket::bind(bind)
        .await
        .context("cannot create UDP socket")?;

    let impairment = Box::new(Simulator::new(SimulatorConfig::data_path()));
    let mut sender = Sender::new(socket, dest, SenderConfig::default(), impairment);
    let stats = sender.transfer(&data).await;

    println!("Transfer completed successfully.");
    println!("Total packets: {}", stats.total_packets);
    println!("Retransmissions: {}", stats.retransmissions);
    println!("Loss rate: {:.2}%", stats.loss_rate());
    println!("Throughput: {:.2} KB/s", stats.throughput_kbps);
    Ok(())
}

async fn run_recv(port: u16, output: &PathBuf) -> Result<()> {
    let bind: SocketAddr = (Ipv4Addr::UNSPECIFIED, port).into();
    let socket = RdtSocket::bind(bind)
        .await
        .with_context(|| format!("cannot bind UDP port {port}"))?;

    let mut out = tokio::fs::File::create(output)
        .await
        .with_context(|| format!("cannot create output file {}", output.display()))?;

    let impairment = Box::new(Simulator::new(SimulatorConfig::ack_path()));
    let mut receiver = Receiver::new(socket, ReceiverConfig::default(), impairment);
    let bytes = receiver
        .receive(&mut out)
        .await
        .context("receive failed")?;

    log::info!("received {bytes} byte(s)");
    println!("File received and saved to {}", output.display());
    Ok(())
}
