//! The contact-form inbox.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Subcommand;
use folio_core::{
  resource::{ContactMessage, Record},
  store::DocumentStore,
};
use folio_store_sqlite::SqliteStore;
use folio_sync::{
  collection::fetch_all,
  inbox::{self, MessageInbox, Silent},
};

use crate::{
  Ctx,
  console::{self, BellChime},
};

/// How often `watch` rereads the store. Writes from other processes are only
/// visible this way.
const WATCH_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Subcommand, Debug)]
pub enum MessageCommand {
  /// List messages, newest first.
  List {
    /// Only messages whose name, email or date contains this.
    #[arg(long)]
    search: Option<String>,
  },
  /// Print one message in full.
  Show { id: String },
  Delete {
    id:  String,
    #[arg(long)]
    yes: bool,
  },
  /// Print messages as they arrive and ring the bell for each batch.
  Watch,
}

fn summary(m: &Record<ContactMessage>) -> String {
  format!("{}  {}  {} <{}>", m.id, m.value.display_date(), m.value.name, m.value.email)
}

async fn load(store: &SqliteStore) -> Result<Vec<Record<ContactMessage>>> {
  Ok(fetch_all::<_, ContactMessage>(store, &inbox::inbox_query()).await?)
}

pub async fn run(ctx: &Ctx, cmd: MessageCommand) -> Result<()> {
  let store = ctx.store().await?;
  match cmd {
    MessageCommand::List { search } => {
      let term = search.unwrap_or_default();
      for message in load(&store).await?.iter().filter(|m| inbox::matches(&m.value, &term)) {
        println!("{}", summary(message));
      }
    }
    MessageCommand::Show { id } => {
      let messages = load(&store).await?;
      let m = messages
        .iter()
        .find(|m| m.id == id)
        .with_context(|| format!("no message with id {id}"))?;
      println!("{}\n\n{}", summary(m), m.value.message);
    }
    MessageCommand::Delete { id, yes } => {
      let messages = load(&store).await?;
      let m = messages
        .iter()
        .find(|m| m.id == id)
        .with_context(|| format!("no message with id {id}"))?;

      let mut inbox = MessageInbox::new(Arc::clone(&store), ctx.notifier(), Arc::new(Silent));
      inbox.request_delete(&m.id);
      if yes || console::ask(&format!("Delete the message from {}?", m.value.name)) {
        inbox.confirm_delete().await?;
      } else {
        inbox.cancel_delete();
        println!("cancelled");
      }
    }
    MessageCommand::Watch => watch(ctx, store).await?,
  }
  Ok(())
}

async fn watch(ctx: &Ctx, store: Arc<SqliteStore>) -> Result<()> {
  let mut inbox = MessageInbox::new(Arc::clone(&store), ctx.notifier(), Arc::new(BellChime));
  // Running the command counts as the first interaction.
  inbox.mark_interacted();

  let mut interval = tokio::time::interval(WATCH_INTERVAL);
  let ctrl_c = tokio::signal::ctrl_c();
  tokio::pin!(ctrl_c);

  let mut first = true;
  loop {
    tokio::select! {
      _ = interval.tick() => {}
      _ = &mut ctrl_c => return Ok(()),
    }

    let docs = match store.list(&inbox::inbox_query()).await {
      Ok(docs) => docs,
      Err(e) => {
        tracing::warn!(error = %e, "failed to read inbox");
        continue;
      }
    };
    let arrived = inbox.apply_snapshot(docs);
    if first {
      println!("{} message(s) in the inbox; waiting for more", inbox.messages().len());
      first = false;
      continue;
    }
    for m in inbox.messages().iter().filter(|m| arrived.contains(&m.id)) {
      println!("{}", summary(m));
    }
  }
}
