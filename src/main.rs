use clap::{Parser, Subcommand};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tcpgate::config::{self, ConfigStore};
use tcpgate::dataplane::{Evaluation, PacketFilter};
use tcpgate::telemetry::{init_logging, ChannelSink, NullSink, TraceRecord, TraceSink};
use tcpgate::{capture, Error};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "tcpgate")]
#[command(about = "TCP/IPv4 frame filter with a local-address policy")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate hex-encoded frames and print a verdict per frame
    Check {
        /// Path to config.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Local address, overrides the config file
        #[arg(short, long)]
        local_address: Option<Ipv4Addr>,

        /// File with one hex-encoded frame per line
        frames: PathBuf,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate config.toml
    Validate {
        /// Path to config.toml
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            config,
            local_address,
            frames,
        } => cmd_check(config.as_deref(), local_address, &frames),
        Commands::Config {
            action: ConfigAction::Validate { config },
        } => {
            init_logging(None);
            cmd_config_validate(&config)
        }
    };

    if let Err(e) = result {
        eprintln!("[ERROR] {}", e);
        std::process::exit(1);
    }
}

fn cmd_check(
    config_path: Option<&Path>,
    local_address: Option<Ipv4Addr>,
    frames_path: &Path,
) -> tcpgate::Result<()> {
    let mut cfg = match config_path {
        Some(path) => config::load(path)?,
        None => config::Config::default(),
    };
    if local_address.is_some() {
        cfg.local_address = local_address;
    }

    init_logging(Some(&cfg.logging));

    let validation = config::validate(&cfg);
    validation.print_diagnostics();
    if validation.has_errors() {
        return Err(Error::Config("validation failed".into()));
    }

    let frames = capture::load_hex_frames(frames_path)?;
    info!("Loaded {} frames from {}", frames.len(), frames_path.display());

    let store = Arc::new(ConfigStore::new());
    if let Some(configuration) = cfg.configuration() {
        store.replace(configuration);
    }

    let rt = Runtime::new()?;
    rt.block_on(async move {
        let mut consumer = None;
        let sink: Box<dyn TraceSink> = if cfg.trace.enabled {
            let (sink, rx) = ChannelSink::new(cfg.trace.capacity);
            consumer = Some(tokio::spawn(drain_traces(rx)));
            Box::new(sink)
        } else {
            Box::new(NullSink)
        };

        let filter = PacketFilter::with_sink(store, sink);

        for frame in &frames {
            let evaluation = filter.process_evaluation(&frame.bytes);
            let detail = match evaluation {
                Evaluation::Terminal(err) => err.to_string(),
                Evaluation::Decided(_, decision) => decision.rule.to_string(),
            };
            println!("{} {} {}", frame.line, evaluation.verdict(), detail);
        }

        for (name, value) in filter.metrics().export() {
            debug!("{} = {}", name, value);
        }

        // Closing the sender lets the consumer finish
        drop(filter);
        if let Some(consumer) = consumer {
            let _ = consumer.await;
        }
    });

    Ok(())
}

async fn drain_traces(mut rx: mpsc::Receiver<TraceRecord>) {
    while let Some(record) = rx.recv().await {
        info!(
            "{}:{} -> {}:{} len={} {} ({})",
            record.source_address,
            record.source_port,
            record.destination_address,
            record.destination_port,
            record.payload_length,
            record.verdict,
            record.rule
        );
    }
}

fn cmd_config_validate(config_path: &Path) -> tcpgate::Result<()> {
    println!("[INFO] Validating {}...", config_path.display());

    let cfg = config::load(config_path)?;

    let validation = config::validate(&cfg);
    validation.print_diagnostics();

    if validation.has_errors() {
        Err(Error::Config("validation failed".into()))
    } else {
        println!("[INFO] Configuration is valid");
        Ok(())
    }
}
