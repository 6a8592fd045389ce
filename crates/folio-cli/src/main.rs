//! `folio`: admin command line for a Folio portfolio store.
//!
//! # Usage
//!
//! ```
//! folio --store folio.db project list
//! folio --config ~/.config/folio/config.toml about set-image home me.png
//! folio --url http://localhost:5000 remote stats
//! ```

mod commands;
mod config;
mod console;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use folio_remote::image::ImgbbHost;
use folio_store_sqlite::SqliteStore;
use folio_sync::notify::Notifier;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use commands::{
  admin::AdminCommand,
  content::{AboutCommand, CertificateCommand, ProjectCommand, SkillCommand},
  contact::ContactCommand,
  inbox::MessageCommand,
  remote::RemoteCommand,
};
use config::{ConfigFile, Overrides, Settings};
use console::ConsoleNotifier;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "folio", about = "Manage the content of a Folio portfolio")]
struct Args {
  /// Path to a TOML config file (store, imgbb_key, url, email, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Path to the SQLite document store (default: folio.db).
  #[arg(long, env = "FOLIO_STORE")]
  store: Option<PathBuf>,

  /// API key for the image host.
  #[arg(long, env = "FOLIO_IMGBB_KEY")]
  imgbb_key: Option<String>,

  /// Base URL of the folio server, for `remote` commands.
  #[arg(long, env = "FOLIO_URL")]
  url: Option<String>,

  /// Admin email.
  #[arg(long, env = "FOLIO_USER")]
  user: Option<String>,

  /// Admin password (plaintext).
  #[arg(long, env = "FOLIO_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// About section text, images and résumé.
  #[command(subcommand)]
  About(AboutCommand),
  /// Portfolio projects.
  #[command(subcommand)]
  Project(ProjectCommand),
  /// Skill list.
  #[command(subcommand)]
  Skill(SkillCommand),
  /// Certificates.
  #[command(subcommand)]
  Certificate(CertificateCommand),
  /// Public contact details.
  #[command(subcommand)]
  Contact(ContactCommand),
  /// Contact-form inbox.
  #[command(subcommand)]
  Messages(MessageCommand),
  /// Admin credentials and profile.
  #[command(subcommand)]
  Admin(AdminCommand),
  /// Show dashboard figures.
  Stats {
    /// Keep refreshing until interrupted.
    #[arg(long)]
    watch: bool,
  },
  /// Record a visit from this machine's public IP.
  Visit,
  /// Talk to a running folio server instead of the local store.
  #[command(subcommand)]
  Remote(RemoteCommand),
}

// ─── Context ──────────────────────────────────────────────────────────────────

/// What every command gets: resolved settings and the notice sink.
pub struct Ctx {
  pub settings: Settings,
  notifier:     Arc<dyn Notifier>,
}

impl Ctx {
  pub fn notifier(&self) -> Arc<dyn Notifier> { Arc::clone(&self.notifier) }

  pub async fn store(&self) -> Result<Arc<SqliteStore>> {
    let path = &self.settings.store;
    let store = SqliteStore::open(path)
      .await
      .with_context(|| format!("opening store {}", path.display()))?;
    Ok(Arc::new(store))
  }

  pub fn image_host(&self) -> Result<ImgbbHost> {
    Ok(ImgbbHost::new(self.settings.imgbb_key()?)?)
  }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let file = ConfigFile::load(args.config.as_deref())?;
  let settings = Settings::resolve(
    Overrides {
      store:     args.store,
      imgbb_key: args.imgbb_key,
      url:       args.url,
      email:     args.user,
      password:  args.password,
    },
    file,
  );
  let ctx = Ctx { settings, notifier: Arc::new(ConsoleNotifier) };

  match args.command {
    Command::About(cmd) => commands::content::about(&ctx, cmd).await,
    Command::Project(cmd) => commands::content::project(&ctx, cmd).await,
    Command::Skill(cmd) => commands::content::skill(&ctx, cmd).await,
    Command::Certificate(cmd) => commands::content::certificate(&ctx, cmd).await,
    Command::Contact(cmd) => commands::contact::run(&ctx, cmd).await,
    Command::Messages(cmd) => commands::inbox::run(&ctx, cmd).await,
    Command::Admin(cmd) => commands::admin::run(&ctx, cmd).await,
    Command::Stats { watch } => commands::admin::stats(&ctx, watch).await,
    Command::Visit => commands::admin::visit(&ctx).await,
    Command::Remote(cmd) => commands::remote::run(&ctx, cmd).await,
  }
}
