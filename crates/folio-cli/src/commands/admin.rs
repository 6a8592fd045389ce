//! Admin credentials, profile, and the dashboard.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Subcommand;
use folio_core::resource::AdminProfile;
use folio_remote::ip::IpifyLookup;
use folio_sync::{
  dashboard::{self, DashboardStats, StatsPoller},
  editor::DocumentEditor,
  presence, profile,
  session::Session,
};

use crate::{Ctx, console, print_json};

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
  /// Replace the admin email and password.
  SetCredentials {
    #[arg(long)]
    email: Option<String>,
  },
  /// Change the admin password; prompts for the old and new passwords.
  ChangePassword,
  /// Check a login against the stored credentials.
  Login {
    #[arg(long)]
    email: Option<String>,
  },
  /// Print the admin profile.
  Profile,
  /// Update the admin profile.
  SetProfile {
    #[arg(long)]
    name:  Option<String>,
    #[arg(long)]
    email: Option<String>,
  },
}

fn email(ctx: &Ctx, flag: Option<String>) -> Result<String> {
  flag
    .or_else(|| ctx.settings.email.clone())
    .context("no admin email; pass --email or --user")
}

fn password(ctx: &Ctx, prompt: &str) -> Result<String> {
  match &ctx.settings.password {
    Some(p) => Ok(p.clone()),
    None => console::read_secret(prompt),
  }
}

pub async fn run(ctx: &Ctx, cmd: AdminCommand) -> Result<()> {
  let store = ctx.store().await?;
  match cmd {
    AdminCommand::SetCredentials { email: flag } => {
      let email = email(ctx, flag)?;
      let password = password(ctx, "New password")?;
      profile::set_credentials(&*store, &email, &password).await?;
      println!("credentials set for {email}");
    }
    AdminCommand::ChangePassword => {
      let old = console::read_secret("Old password")?;
      let new = console::read_secret("New password")?;
      let confirmation = console::read_secret("Confirm new password")?;
      profile::change_password(&*store, ctx.notifier().as_ref(), &old, &new, &confirmation).await?;
    }
    AdminCommand::Login { email: flag } => {
      let email = email(ctx, flag)?;
      let password = password(ctx, "Password")?;
      let mut session = Session::default();
      session.login(&*store, &email, &password).await?;
      println!("signed in as {}", session.email().unwrap_or_default());
    }
    AdminCommand::Profile => {
      let mut editor = DocumentEditor::<_, AdminProfile>::new(store, ctx.notifier());
      editor.load().await;
      print_json(editor.persisted())?;
    }
    AdminCommand::SetProfile { name, email } => {
      let mut editor = DocumentEditor::<_, AdminProfile>::new(store, ctx.notifier());
      editor.load().await;
      editor.edit()?;
      editor.update(|p| {
        if let Some(name) = name {
          p.name = name;
        }
        if let Some(email) = email {
          p.email = email;
        }
      })?;
      editor.save().await?;
    }
  }
  Ok(())
}

fn print_stats(stats: &DashboardStats) {
  println!(
    "active users: {}  projects: {}  skills: {}",
    stats.active_users, stats.total_projects, stats.total_skills
  );
}

pub async fn stats(ctx: &Ctx, watch: bool) -> Result<()> {
  let store = ctx.store().await?;
  if !watch {
    print_stats(&dashboard::load_stats(&*store, Utc::now()).await?);
    return Ok(());
  }

  let mut poller = StatsPoller::spawn(Arc::clone(&store), dashboard::STATS_REFRESH);
  let ctrl_c = tokio::signal::ctrl_c();
  tokio::pin!(ctrl_c);
  loop {
    let update = tokio::select! {
      stats = poller.changed() => stats,
      _ = &mut ctrl_c => return Ok(()),
    };
    match update {
      Some(stats) => print_stats(&stats),
      None => return Ok(()),
    }
  }
}

pub async fn visit(ctx: &Ctx) -> Result<()> {
  let store = ctx.store().await?;
  let lookup = IpifyLookup::new()?;
  match presence::register_visit(&*store, &lookup).await {
    Some(ip) => {
      let active = presence::count_active_visitors(&*store, Utc::now()).await?;
      println!("recorded visit from {ip}; {active} active visitor(s)");
      Ok(())
    }
    None => bail!("could not record the visit; see the log for details"),
  }
}
