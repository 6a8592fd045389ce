//! folio-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus `FOLIO_*`
//! environment variables, opens the SQLite store, and serves the JSON API.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `admin_password_hash`:
//!
//! ```text
//! cargo run -p folio-server -- --hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use folio_server::{ServerConfig, bootstrap_admin};
use folio_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Folio portfolio API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    let hash = folio_core::credentials::hash_password(&password).context("failed to hash password")?;
    println!("{hash}");
    return Ok(());
  }

  let settings = config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 5000)?
    .set_default("store_path", "folio.db")?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("FOLIO"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let store = Arc::new(store);

  bootstrap_admin(&*store, &server_cfg)
    .await
    .context("failed to seed admin credentials")?;

  let app = folio_server::router(store);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  match (s.strip_prefix("~/"), std::env::var("HOME")) {
    (Some(rest), Ok(home)) => PathBuf::from(home).join(rest),
    _ => path.to_path_buf(),
  }
}
