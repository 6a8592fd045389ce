//! Commands against a running folio server.

use anyhow::Result;
use clap::Subcommand;
use folio_core::remote::IpLookup;
use folio_remote::{
  api::{ApiClient, Credentials},
  ip::IpifyLookup,
};

use crate::{Ctx, console, print_json};

#[derive(Subcommand, Debug)]
pub enum RemoteCommand {
  /// List directory users marked active.
  ActiveUsers,
  /// Dashboard figures; needs admin credentials.
  Stats,
  /// Check the admin credentials with the server.
  Login,
  /// Submit a contact-form message.
  Send {
    #[arg(long)]
    name:    String,
    #[arg(long)]
    email:   String,
    message: String,
  },
  /// Send a presence heartbeat, for this machine's public IP by default.
  Heartbeat { ip: Option<String> },
}

fn client(ctx: &Ctx) -> Result<ApiClient> {
  let client = ApiClient::new(ctx.settings.url.clone())?;
  Ok(match (&ctx.settings.email, &ctx.settings.password) {
    (Some(email), Some(password)) => {
      client.with_credentials(Credentials { email: email.clone(), password: password.clone() })
    }
    _ => client,
  })
}

pub async fn run(ctx: &Ctx, cmd: RemoteCommand) -> Result<()> {
  let api = client(ctx)?;
  match cmd {
    RemoteCommand::ActiveUsers => print_json(&api.active_users().await?)?,
    RemoteCommand::Stats => print_json(&api.stats().await?)?,
    RemoteCommand::Login => {
      let email = ctx.settings.email.clone().unwrap_or_default();
      let password = match &ctx.settings.password {
        Some(p) => p.clone(),
        None => console::read_secret("Password")?,
      };
      println!("signed in as {}", api.login(&email, &password).await?);
    }
    RemoteCommand::Send { name, email, message } => {
      println!("{}", api.send_message(&name, &email, &message).await?);
    }
    RemoteCommand::Heartbeat { ip } => {
      let ip = match ip {
        Some(ip) => ip,
        None => IpifyLookup::new()?.public_ip().await?,
      };
      api.heartbeat(&ip).await?;
      println!("heartbeat sent for {ip}");
    }
  }
  Ok(())
}
