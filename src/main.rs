use clap::{ArgAction, Parser};
use miette::{IntoDiagnostic, Result};
use pos_backoffice::application::pool::{ConnectionPool, DEFAULT_MAX_CONNECTIONS};
use pos_backoffice::domain::clock::SystemClock;
use pos_backoffice::domain::ports::RecordStoreBox;
use pos_backoffice::infrastructure::in_memory::InMemoryRecordStore;
#[cfg(feature = "storage-rocksdb")]
use pos_backoffice::infrastructure::rocksdb::RocksDBStore;
use pos_backoffice::interfaces::dispatch::Dispatcher;
use pos_backoffice::interfaces::jsonl::request_reader::RequestReader;
use pos_backoffice::interfaces::jsonl::response_writer::ResponseWriter;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input requests file, one JSON request per line
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Upper bound on concurrently open store connections
    #[arg(long, env = "POS_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    max_connections: usize,

    /// Log verbosity: -v info, -vv debug, -vvv trace. RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: Option<PathBuf>) -> Result<RecordStoreBox> {
    match db_path {
        Some(path) => {
            info!(path = %path.display(), "opening persistent store");
            Ok(Box::new(RocksDBStore::open(path).into_diagnostic()?))
        }
        None => Ok(Box::new(InMemoryRecordStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(db_path: Option<PathBuf>) -> Result<RecordStoreBox> {
    if db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
        );
    }
    Ok(Box::new(InMemoryRecordStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store = open_store(cli.db_path)?;
    let pool = ConnectionPool::new(store, cli.max_connections);
    info!(connections = pool.size(), "store ready");
    let dispatcher = Dispatcher::new(pool, Arc::new(SystemClock));

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = RequestReader::new(file);
    let stdout = io::stdout();
    let mut writer = ResponseWriter::new(stdout.lock());

    for request in reader.requests() {
        match request {
            Ok(request) => match dispatcher.dispatch(request).await {
                Ok(response) => writer.write(&response).into_diagnostic()?,
                Err(e) => error!(error = %e, "Error processing request"),
            },
            Err(e) => error!(error = %e, "Error reading request"),
        }
    }

    writer.flush().into_diagnostic()?;
    Ok(())
}
