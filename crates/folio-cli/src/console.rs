//! Terminal implementations of the sync layer's user-facing hooks.

use std::{
  io::{self, BufRead, Write},
  path::Path,
};

use anyhow::{Context, Result};
use folio_core::remote::ImageUpload;
use folio_sync::{
  inbox::Chime,
  notify::{Level, Notice, Notifier},
};

/// Prints notices to stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
  fn notify(&self, notice: Notice) {
    let tag = match notice.level {
      Level::Success => "ok",
      Level::Info => "info",
      Level::Error => "error",
    };
    eprintln!("[{tag}] {}", notice.message);
  }
}

/// Rings the terminal bell.
#[derive(Debug, Default)]
pub struct BellChime;

impl Chime for BellChime {
  fn play(&self) {
    print!("\x07");
    io::stdout().flush().ok();
  }
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no.
pub fn ask(prompt: &str) -> bool {
  print!("{prompt} [y/N] ");
  io::stdout().flush().ok();
  let mut line = String::new();
  if io::stdin().lock().read_line(&mut line).is_err() {
    return false;
  }
  matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Read a line from stdin after printing `prompt`.
pub fn read_secret(prompt: &str) -> Result<String> {
  print!("{prompt}: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Load an image file for upload, guessing its MIME type from the extension.
pub fn load_image(path: &Path) -> Result<ImageUpload> {
  let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
  let file_name = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| "image".to_owned());
  Ok(ImageUpload { content_type: guess_mime(&file_name).map(str::to_owned), file_name, bytes })
}

fn guess_mime(file_name: &str) -> Option<&'static str> {
  let ext = file_name.rsplit_once('.')?.1.to_lowercase();
  match ext.as_str() {
    "png" => Some("image/png"),
    "jpg" | "jpeg" => Some("image/jpeg"),
    "gif" => Some("image/gif"),
    "webp" => Some("image/webp"),
    "pdf" => Some("application/pdf"),
    _ => None,
  }
}
