//! Public contact details and the contact form.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use folio_core::resource::ContactInfo;
use folio_remote::geocode::NominatimGeocoder;
use folio_store_sqlite::SqliteStore;
use folio_sync::{
  contact::{self, ContactEditor},
  editor::DocumentEditor,
};

use crate::{Ctx, print_json};

#[derive(Subcommand, Debug)]
pub enum ContactCommand {
  /// Print the contact details.
  Show,
  /// Change contact fields; the location is set with `locate`.
  Set(ContactPatch),
  /// Suggest places for a location; with `--pick`, store one of them.
  Locate {
    query: String,
    /// Zero-based index of the suggestion to store.
    #[arg(long)]
    pick:  Option<usize>,
  },
  /// Submit a message through the contact form.
  Send {
    #[arg(long)]
    name:    String,
    #[arg(long)]
    email:   String,
    message: String,
  },
}

#[derive(Args, Debug)]
pub struct ContactPatch {
  #[arg(long)]
  email:    Option<String>,
  #[arg(long)]
  phone:    Option<String>,
  #[arg(long)]
  linkedin: Option<String>,
  #[arg(long)]
  github:   Option<String>,
}

/// An editor over `fields` only, or every field when `fields` is empty.
async fn open(ctx: &Ctx, fields: &[&str]) -> Result<ContactEditor<SqliteStore>> {
  let mut editor = DocumentEditor::<_, ContactInfo>::new(ctx.store().await?, ctx.notifier());
  if !fields.is_empty() {
    editor = editor.with_fields(fields);
  }
  editor.load().await;
  Ok(editor)
}

pub async fn run(ctx: &Ctx, cmd: ContactCommand) -> Result<()> {
  match cmd {
    ContactCommand::Show => {
      let editor = open(ctx, &[]).await?;
      print_json(editor.persisted())?;
    }
    ContactCommand::Set(patch) => {
      let mut editor = open(ctx, &["email", "phone", "linkedin", "github"]).await?;
      editor.edit()?;
      editor.update(|info| {
        let fields = [
          (&mut info.email, patch.email),
          (&mut info.phone, patch.phone),
          (&mut info.linkedin, patch.linkedin),
          (&mut info.github, patch.github),
        ];
        for (target, value) in fields {
          if let Some(value) = value {
            *target = value;
          }
        }
      })?;
      editor.save().await?;
    }
    ContactCommand::Locate { query, pick } => {
      let geocoder = NominatimGeocoder::new()?;
      let places = contact::suggest_locations(&geocoder, ctx.notifier().as_ref(), &query).await;
      let Some(index) = pick else {
        for (i, place) in places.iter().enumerate() {
          println!("{i}  {}  ({}, {})", place.display_name, place.lat, place.lon);
        }
        return Ok(());
      };
      let place = places
        .get(index)
        .with_context(|| format!("no suggestion at index {index} ({} found)", places.len()))?;
      let mut editor = open(ctx, &["location", "lat", "lon"]).await?;
      editor.edit()?;
      contact::pick_location(&mut editor, place)?;
      editor.save().await?;
      println!("{}", place.display_name);
    }
    ContactCommand::Send { name, email, message } => {
      let store = ctx.store().await?;
      let id = contact::submit_message(&*store, ctx.notifier().as_ref(), &name, &email, &message).await?;
      println!("{id}");
    }
  }
  Ok(())
}
