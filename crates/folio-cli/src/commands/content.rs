//! About section and the three portfolio collections.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand, ValueEnum};
use folio_core::resource::{AboutContent, Certificate, Project, Record, Resource, Skill};
use folio_store_sqlite::SqliteStore;
use folio_sync::{
  carousel::{AUTO_ADVANCE, CarouselSet},
  collection::{CollectionEditor, DeleteOutcome},
  editor::DocumentEditor,
  images::{self, AboutImage, ImageList},
};

use crate::{Ctx, console, print_json};

// ─── About ───────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum AboutCommand {
  /// Print the about section.
  Show,
  /// Replace the about text.
  SetText { text: String },
  /// Upload an image and use it for one of the slots.
  SetImage { slot: Slot, file: PathBuf },
  /// Remove the image from one of the slots.
  ClearImage { slot: Slot },
  /// Upload a résumé (PNG or JPEG).
  UploadResume { file: PathBuf },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Slot {
  About,
  Home,
}

impl From<Slot> for AboutImage {
  fn from(slot: Slot) -> Self {
    match slot {
      Slot::About => Self::About,
      Slot::Home => Self::Home,
    }
  }
}

pub async fn about(ctx: &Ctx, cmd: AboutCommand) -> Result<()> {
  let mut editor = DocumentEditor::<_, AboutContent>::new(ctx.store().await?, ctx.notifier());
  editor.load().await;

  match cmd {
    AboutCommand::Show => print_json(editor.persisted())?,
    AboutCommand::SetText { text } => {
      editor.save_fields(&["text"], move |about| about.text = text).await?;
    }
    AboutCommand::SetImage { slot, file } => {
      let host = ctx.image_host()?;
      let url = images::upload_about_image(&mut editor, &host, slot.into(), console::load_image(&file)?)
        .await?;
      println!("{url}");
    }
    AboutCommand::ClearImage { slot } => {
      editor.clear_field(AboutImage::from(slot).field()).await?;
    }
    AboutCommand::UploadResume { file } => {
      let host = ctx.image_host()?;
      let url = images::upload_resume(&mut editor, &host, console::load_image(&file)?).await?;
      println!("{url}");
    }
  }
  Ok(())
}

// ─── Shared helpers ──────────────────────────────────────────────────────────

async fn open_editor<R: Resource>(ctx: &Ctx) -> Result<CollectionEditor<SqliteStore, R>> {
  let mut editor = CollectionEditor::new(ctx.store().await?, ctx.notifier());
  editor.refresh().await;
  Ok(editor)
}

fn existing<'a, R: Resource>(
  editor: &'a CollectionEditor<SqliteStore, R>,
  id: &str,
) -> Result<&'a Record<R>> {
  editor
    .find(id)
    .with_context(|| format!("no {} with id {id}", R::COLLECTION))
}

async fn delete<R: Resource>(ctx: &Ctx, id: &str, yes: bool) -> Result<()> {
  let mut editor = open_editor::<R>(ctx).await?;
  let confirm = |prompt: &str| yes || console::ask(prompt);
  match editor.delete(id, &confirm).await? {
    DeleteOutcome::Deleted => Ok(()),
    DeleteOutcome::Cancelled => {
      println!("cancelled");
      Ok(())
    }
    DeleteOutcome::Missing => bail!("no {} with id {id}", R::COLLECTION),
  }
}

async fn upload_all(ctx: &Ctx, list: &mut ImageList, files: &[PathBuf]) -> Result<()> {
  if files.is_empty() {
    return Ok(());
  }
  let host = ctx.image_host()?;
  let notifier = ctx.notifier();
  for file in files {
    list.upload(&host, notifier.as_ref(), console::load_image(file)?).await?;
  }
  Ok(())
}

fn remove_all(list: &mut ImageList, mut indices: Vec<usize>) -> Result<()> {
  indices.sort_unstable();
  indices.dedup();
  for index in indices.into_iter().rev() {
    list
      .remove(index)
      .with_context(|| format!("no image at index {index}"))?;
  }
  Ok(())
}

/// Cycle each card's images the way the public site does, printing what every
/// card shows after each advance.
async fn play_carousels(cards: Vec<(String, String, Vec<String>)>) -> Result<()> {
  let mut set = CarouselSet::new();
  set.sync(
    cards
      .iter()
      .map(|(id, _, images)| (id.as_str(), Arc::<[String]>::from(images.clone()))),
  );
  println!("{} of {} card(s) auto-advancing; ctrl-c to stop", set.timer_count(), cards.len());

  // Frames land halfway between ticks.
  let start = tokio::time::Instant::now() + AUTO_ADVANCE + AUTO_ADVANCE / 2;
  let mut frames = tokio::time::interval_at(start, AUTO_ADVANCE);
  let ctrl_c = tokio::signal::ctrl_c();
  tokio::pin!(ctrl_c);
  loop {
    for (id, title, _) in &cards {
      println!("{title}: {}", set.current(id));
    }
    println!();
    tokio::select! {
      _ = frames.tick() => {}
      _ = &mut ctrl_c => return Ok(()),
    }
  }
}

fn set_if(target: &mut String, value: Option<String>) {
  if let Some(value) = value {
    *target = value;
  }
}

// ─── Projects ────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
  List,
  /// Preview the project image carousels.
  Carousel,
  Add(NewProject),
  Edit {
    id:    String,
    #[command(flatten)]
    patch: ProjectPatch,
  },
  Delete {
    id:  String,
    /// Skip the confirmation prompt.
    #[arg(long)]
    yes: bool,
  },
}

#[derive(Args, Debug)]
pub struct NewProject {
  #[arg(long)]
  title:        String,
  #[arg(long)]
  description:  String,
  #[arg(long, default_value = "")]
  live_link:    String,
  #[arg(long, default_value = "")]
  github_link:  String,
  /// Technology tag; repeatable.
  #[arg(long = "tech")]
  technologies: Vec<String>,
  /// Image file to upload; repeatable.
  #[arg(long = "image")]
  images:       Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ProjectPatch {
  #[arg(long)]
  title:        Option<String>,
  #[arg(long)]
  description:  Option<String>,
  #[arg(long)]
  live_link:    Option<String>,
  #[arg(long)]
  github_link:  Option<String>,
  #[arg(long)]
  add_tech:     Vec<String>,
  #[arg(long)]
  remove_tech:  Vec<String>,
  #[arg(long)]
  add_image:    Vec<PathBuf>,
  /// Zero-based index of an image to drop; repeatable.
  #[arg(long)]
  remove_image: Vec<usize>,
}

pub async fn project(ctx: &Ctx, cmd: ProjectCommand) -> Result<()> {
  match cmd {
    ProjectCommand::List => {
      for Record { id, value } in open_editor::<Project>(ctx).await?.items() {
        println!(
          "{id}  {}  [{}]  {} image(s)",
          value.title,
          value.technologies.join(", "),
          value.images.len()
        );
      }
    }
    ProjectCommand::Add(new) => {
      let mut editor = open_editor::<Project>(ctx).await?;
      let mut project = Project {
        title: new.title,
        description: new.description,
        live_link: new.live_link,
        github_link: new.github_link,
        ..Default::default()
      };
      for tech in &new.technologies {
        project.add_technology(tech);
      }
      let mut images = ImageList::default();
      upload_all(ctx, &mut images, &new.images).await?;
      project.images = images.to_vec();
      println!("{}", editor.create(project).await?);
    }
    ProjectCommand::Edit { id, patch } => {
      let mut editor = open_editor::<Project>(ctx).await?;
      let mut project = existing(&editor, &id)?.value.clone();
      set_if(&mut project.title, patch.title);
      set_if(&mut project.description, patch.description);
      set_if(&mut project.live_link, patch.live_link);
      set_if(&mut project.github_link, patch.github_link);
      for tech in &patch.remove_tech {
        project.remove_technology(tech);
      }
      for tech in &patch.add_tech {
        project.add_technology(tech);
      }
      let mut images = ImageList::new(project.images);
      remove_all(&mut images, patch.remove_image)?;
      upload_all(ctx, &mut images, &patch.add_image).await?;
      project.images = images.to_vec();
      editor.update(&id, project).await?;
    }
    ProjectCommand::Delete { id, yes } => delete::<Project>(ctx, &id, yes).await?,
    ProjectCommand::Carousel => {
      let cards = open_editor::<Project>(ctx)
        .await?
        .items()
        .iter()
        .map(|r| (r.id.clone(), r.value.title.clone(), r.value.images.clone()))
        .collect();
      play_carousels(cards).await?;
    }
  }
  Ok(())
}

// ─── Skills ──────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum SkillCommand {
  List,
  Add {
    name: String,
  },
  Rename {
    id:   String,
    name: String,
  },
  Delete {
    id:  String,
    #[arg(long)]
    yes: bool,
  },
}

pub async fn skill(ctx: &Ctx, cmd: SkillCommand) -> Result<()> {
  match cmd {
    SkillCommand::List => {
      for Record { id, value } in open_editor::<Skill>(ctx).await?.items() {
        println!("{id}  {}", value.name);
      }
    }
    SkillCommand::Add { name } => {
      let id = open_editor::<Skill>(ctx).await?.create(Skill { name }).await?;
      println!("{id}");
    }
    SkillCommand::Rename { id, name } => {
      let mut editor = open_editor::<Skill>(ctx).await?;
      existing(&editor, &id)?;
      editor.update(&id, Skill { name }).await?;
    }
    SkillCommand::Delete { id, yes } => delete::<Skill>(ctx, &id, yes).await?,
  }
  Ok(())
}

// ─── Certificates ────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum CertificateCommand {
  List,
  /// Preview the certificate image carousels.
  Carousel,
  Add(NewCertificate),
  Edit {
    id:    String,
    #[command(flatten)]
    patch: CertificatePatch,
  },
  Delete {
    id:  String,
    #[arg(long)]
    yes: bool,
  },
}

#[derive(Args, Debug)]
pub struct NewCertificate {
  #[arg(long)]
  title:       String,
  #[arg(long)]
  description: String,
  #[arg(long)]
  issuer:      String,
  #[arg(long)]
  date:        String,
  /// Image file to upload; at least one is required.
  #[arg(long = "image", required = true)]
  images:      Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CertificatePatch {
  #[arg(long)]
  title:        Option<String>,
  #[arg(long)]
  description:  Option<String>,
  #[arg(long)]
  issuer:       Option<String>,
  #[arg(long)]
  date:         Option<String>,
  #[arg(long)]
  add_image:    Vec<PathBuf>,
  #[arg(long)]
  remove_image: Vec<usize>,
}

pub async fn certificate(ctx: &Ctx, cmd: CertificateCommand) -> Result<()> {
  match cmd {
    CertificateCommand::List => {
      for Record { id, value } in open_editor::<Certificate>(ctx).await?.items() {
        println!(
          "{id}  {} ({}, {})  {} image(s)",
          value.title,
          value.issuer,
          value.date,
          value.image_urls.len()
        );
      }
    }
    CertificateCommand::Add(new) => {
      let mut editor = open_editor::<Certificate>(ctx).await?;
      let mut images = ImageList::default();
      upload_all(ctx, &mut images, &new.images).await?;
      let cert = Certificate {
        title:       new.title,
        description: new.description,
        issuer:      new.issuer,
        date:        new.date,
        image_urls:  images.to_vec(),
      };
      println!("{}", editor.create(cert).await?);
    }
    CertificateCommand::Edit { id, patch } => {
      let mut editor = open_editor::<Certificate>(ctx).await?;
      let mut cert = existing(&editor, &id)?.value.clone();
      set_if(&mut cert.title, patch.title);
      set_if(&mut cert.description, patch.description);
      set_if(&mut cert.issuer, patch.issuer);
      set_if(&mut cert.date, patch.date);
      let mut images = ImageList::new(cert.image_urls);
      remove_all(&mut images, patch.remove_image)?;
      upload_all(ctx, &mut images, &patch.add_image).await?;
      cert.image_urls = images.to_vec();
      editor.update(&id, cert).await?;
    }
    CertificateCommand::Delete { id, yes } => delete::<Certificate>(ctx, &id, yes).await?,
    CertificateCommand::Carousel => {
      let cards = open_editor::<Certificate>(ctx)
        .await?
        .items()
        .iter()
        .map(|r| (r.id.clone(), r.value.title.clone(), r.value.image_urls.clone()))
        .collect();
      play_carousels(cards).await?;
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn removing_images_by_index_keeps_the_rest_in_order() {
    let mut list = ImageList::new(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
    remove_all(&mut list, vec![2, 0, 2]).unwrap();
    assert_eq!(list.urls(), ["b", "d"]);
  }

  #[test]
  fn out_of_range_index_is_an_error() {
    let mut list = ImageList::new(vec!["a".into()]);
    assert!(remove_all(&mut list, vec![3]).is_err());
  }
}
