use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("unexpected status {status}: {body}")]
  Status { status: u16, body: String },

  #[error("request rejected: {0}")]
  Rejected(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
