//! Typed resource schemas.
//!
//! Documents are schemaless on the wire; every resource is decoded once at the
//! read boundary through [`Resource::from_fields`]. Decoding is lenient:
//! missing or malformed fields fall back to their defaults rather than failing
//! the whole document, so callers never need to re-check field shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
  Error, Result,
  document::{Fields, collections},
};

// ─── Traits ──────────────────────────────────────────────────────────────────

/// A document shape stored in a single collection.
pub trait Resource:
  Serialize + DeserializeOwned + Default + Clone + PartialEq + Send + Sync + 'static
{
  const COLLECTION: &'static str;

  /// Check the record on its own (required fields and the like).
  fn validate(&self) -> Result<()> { Ok(()) }

  /// Check the record against the rest of its collection. `editing` is the id
  /// of the record being updated, if any, so it is not compared with itself.
  fn validate_against(&self, existing: &[Record<Self>], editing: Option<&str>) -> Result<()> {
    let _ = (existing, editing);
    self.validate()
  }

  fn from_fields(fields: &Fields) -> Result<Self> {
    Ok(serde_json::from_value(Value::Object(fields.clone()))?)
  }

  fn to_fields(&self) -> Result<Fields> {
    match serde_json::to_value(self)? {
      Value::Object(map) => Ok(map),
      other => Err(Error::Validation(format!(
        "{} did not serialize to an object: {other}",
        Self::COLLECTION
      ))),
    }
  }

  /// Every top-level field name this resource writes.
  fn field_names() -> Vec<String> {
    Self::default()
      .to_fields()
      .map(|f| f.keys().cloned().collect())
      .unwrap_or_default()
  }
}

/// A resource stored as one well-known document.
pub trait Singleton: Resource {
  const DOC_ID: &'static str;
}

/// A resource paired with its document id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<R> {
  pub id:    String,
  #[serde(flatten)]
  pub value: R,
}

fn require(value: &str, what: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::Validation(format!("{what} is required")));
  }
  Ok(())
}

// ─── About ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutContent {
  #[serde(default, deserialize_with = "lenient::string")]
  pub text:             String,
  #[serde(default, deserialize_with = "lenient::opt_string")]
  pub about_image:      Option<String>,
  #[serde(default, deserialize_with = "lenient::opt_string")]
  pub home_image:       Option<String>,
  #[serde(default, deserialize_with = "lenient::opt_string")]
  pub resume_file:      Option<String>,
  #[serde(default, deserialize_with = "lenient::opt_string")]
  pub resume_file_name: Option<String>,
}

impl Resource for AboutContent {
  const COLLECTION: &'static str = collections::ABOUT;
}

impl Singleton for AboutContent {
  const DOC_ID: &'static str = "content";
}

// ─── Projects ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
  #[serde(default, deserialize_with = "lenient::string")]
  pub title:        String,
  #[serde(default, deserialize_with = "lenient::string")]
  pub description:  String,
  #[serde(default, deserialize_with = "lenient::string")]
  pub live_link:    String,
  #[serde(default, deserialize_with = "lenient::string")]
  pub github_link:  String,
  #[serde(default, deserialize_with = "lenient::strings")]
  pub technologies: Vec<String>,
  #[serde(default, deserialize_with = "lenient::strings")]
  pub images:       Vec<String>,
}

impl Project {
  /// Add a technology tag. Blank and duplicate tags are ignored; returns
  /// whether the tag was added.
  pub fn add_technology(&mut self, tech: &str) -> bool {
    let tech = tech.trim();
    if tech.is_empty() || self.technologies.iter().any(|t| t == tech) {
      return false;
    }
    self.technologies.push(tech.to_owned());
    true
  }

  pub fn remove_technology(&mut self, tech: &str) {
    self.technologies.retain(|t| t != tech);
  }
}

impl Resource for Project {
  const COLLECTION: &'static str = collections::PROJECTS;

  fn validate(&self) -> Result<()> {
    require(&self.title, "title")?;
    require(&self.description, "description")
  }
}

// ─── Skills ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skill {
  #[serde(default, deserialize_with = "lenient::string")]
  pub name: String,
}

impl Resource for Skill {
  const COLLECTION: &'static str = collections::SKILLS;

  fn validate(&self) -> Result<()> { require(&self.name, "skill name") }

  fn validate_against(&self, existing: &[Record<Self>], editing: Option<&str>) -> Result<()> {
    self.validate()?;
    let name = self.name.trim().to_lowercase();
    let duplicate = existing
      .iter()
      .filter(|r| Some(r.id.as_str()) != editing)
      .any(|r| r.value.name.trim().to_lowercase() == name);
    if duplicate {
      return Err(Error::Validation(format!("skill {:?} already exists", self.name.trim())));
    }
    Ok(())
  }
}

// ─── Certificates ────────────────────────────────────────────────────────────

/// A certificate. Older documents carry a single `imageUrl`; it is folded into
/// `image_urls` on read and never written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawCertificate")]
pub struct Certificate {
  pub title:       String,
  pub description: String,
  pub issuer:      String,
  pub date:        String,
  pub image_urls:  Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCertificate {
  #[serde(default, deserialize_with = "lenient::string")]
  title:       String,
  #[serde(default, deserialize_with = "lenient::string")]
  description: String,
  #[serde(default, deserialize_with = "lenient::string")]
  issuer:      String,
  #[serde(default, deserialize_with = "lenient::string")]
  date:        String,
  #[serde(default, deserialize_with = "lenient::strings")]
  image_urls:  Vec<String>,
  #[serde(default, deserialize_with = "lenient::opt_string")]
  image_url:   Option<String>,
}

impl From<RawCertificate> for Certificate {
  fn from(raw: RawCertificate) -> Self {
    let image_urls = if raw.image_urls.is_empty() {
      raw.image_url.into_iter().filter(|u| !u.is_empty()).collect()
    } else {
      raw.image_urls
    };
    Self {
      title: raw.title,
      description: raw.description,
      issuer: raw.issuer,
      date: raw.date,
      image_urls,
    }
  }
}

impl Resource for Certificate {
  const COLLECTION: &'static str = collections::CERTIFICATES;

  fn validate(&self) -> Result<()> {
    require(&self.title, "title")?;
    require(&self.description, "description")?;
    require(&self.issuer, "issuer")?;
    require(&self.date, "date")?;
    if self.image_urls.is_empty() {
      return Err(Error::Validation("at least one image is required".into()));
    }
    Ok(())
  }
}

// ─── Messages ────────────────────────────────────────────────────────────────

/// A message submitted through the public contact form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
  #[serde(default, deserialize_with = "lenient::string")]
  pub name:      String,
  #[serde(default, deserialize_with = "lenient::string")]
  pub email:     String,
  #[serde(default, deserialize_with = "lenient::string")]
  pub message:   String,
  #[serde(
    default,
    deserialize_with = "lenient::timestamp",
    serialize_with = "lenient::serialize_timestamp"
  )]
  pub timestamp: Option<DateTime<Utc>>,
}

impl ContactMessage {
  /// Human-readable submission time, or a dash placeholder.
  pub fn display_date(&self) -> String {
    self
      .timestamp
      .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
      .unwrap_or_else(|| "-".to_owned())
  }
}

impl Resource for ContactMessage {
  const COLLECTION: &'static str = collections::MESSAGES;

  fn validate(&self) -> Result<()> {
    require(&self.name, "name")?;
    require(&self.email, "email")?;
    require(&self.message, "message")?;
    if !looks_like_email(&self.email) {
      return Err(Error::Validation("please enter a valid email".into()));
    }
    Ok(())
  }
}

/// Accepts `<non-space>@<non-space>.<non-space>` anywhere in the input.
pub fn looks_like_email(input: &str) -> bool {
  input.split_whitespace().any(|word| {
    word.char_indices().any(|(at, c)| {
      if c != '@' || at == 0 {
        return false;
      }
      let domain = &word[at + 1..];
      domain
        .char_indices()
        .any(|(dot, d)| d == '.' && dot > 0 && dot + 1 < domain.len())
    })
  })
}

// ─── Contact info ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
  #[serde(default, deserialize_with = "lenient::string")]
  pub email:    String,
  #[serde(default, deserialize_with = "lenient::string")]
  pub phone:    String,
  #[serde(default, deserialize_with = "lenient::string")]
  pub location: String,
  #[serde(default, deserialize_with = "lenient::string")]
  pub linkedin: String,
  #[serde(default, deserialize_with = "lenient::string")]
  pub github:   String,
  /// Coordinates are kept as strings; the geocoder returns them that way.
  #[serde(default, deserialize_with = "lenient::string")]
  pub lat:      String,
  #[serde(default, deserialize_with = "lenient::string")]
  pub lon:      String,
}

impl ContactInfo {
  pub fn coordinates(&self) -> Option<(f64, f64)> {
    Some((self.lat.parse().ok()?, self.lon.parse().ok()?))
  }
}

impl Resource for ContactInfo {
  const COLLECTION: &'static str = collections::CONTACTS;
}

impl Singleton for ContactInfo {
  const DOC_ID: &'static str = "main";
}

// ─── Admin ───────────────────────────────────────────────────────────────────

/// Admin login credentials. The password is stored as an argon2 PHC string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCredentials {
  #[serde(default, deserialize_with = "lenient::string")]
  pub email:         String,
  #[serde(default, deserialize_with = "lenient::string")]
  pub password_hash: String,
}

impl Resource for AdminCredentials {
  const COLLECTION: &'static str = collections::ADMIN;
}

impl Singleton for AdminCredentials {
  const DOC_ID: &'static str = "credentials";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminProfile {
  #[serde(default, deserialize_with = "lenient::string")]
  pub name:  String,
  #[serde(default, deserialize_with = "lenient::string")]
  pub email: String,
}

impl Resource for AdminProfile {
  const COLLECTION: &'static str = collections::ADMIN;

  fn validate(&self) -> Result<()> {
    require(&self.name, "name")?;
    if !looks_like_email(&self.email) {
      return Err(Error::Validation("please enter a valid email".into()));
    }
    Ok(())
  }
}

impl Singleton for AdminProfile {
  const DOC_ID: &'static str = "profile";
}

// ─── Presence ────────────────────────────────────────────────────────────────

/// A presence heartbeat. The document id is the visitor's public IP.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUser {
  #[serde(
    default,
    deserialize_with = "lenient::timestamp",
    serialize_with = "lenient::serialize_timestamp"
  )]
  pub last_seen: Option<DateTime<Utc>>,
}

impl Resource for ActiveUser {
  const COLLECTION: &'static str = collections::ACTIVE_USERS;
}

/// A user record from the user directory, the source of the REST
/// `active-users` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
  #[serde(default, deserialize_with = "lenient::string")]
  pub name:      String,
  #[serde(default, deserialize_with = "lenient::string")]
  pub email:     String,
  #[serde(default, deserialize_with = "lenient::boolean")]
  pub is_active: bool,
}

impl Resource for DirectoryUser {
  const COLLECTION: &'static str = collections::USERS;
}

// ─── Lenient field decoding ──────────────────────────────────────────────────

mod lenient {
  use chrono::{DateTime, Utc};
  use serde::{Deserialize, Deserializer, Serializer};
  use serde_json::Value;

  use crate::document::{decode_timestamp, encode_timestamp};

  pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
      Value::String(s) => s,
      Value::Number(n) => n.to_string(),
      Value::Bool(b) => b.to_string(),
      _ => String::new(),
    })
  }

  pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
      Value::String(s) if !s.is_empty() => Some(s),
      _ => None,
    })
  }

  pub fn strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
      Value::Array(items) => items
        .into_iter()
        .filter_map(|v| match v {
          Value::String(s) => Some(s),
          _ => None,
        })
        .collect(),
      _ => Vec::new(),
    })
  }

  pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(d)?, Value::Bool(true)))
  }

  pub fn timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(decode_timestamp(&Value::deserialize(d)?))
  }

  pub fn serialize_timestamp<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    s: S,
  ) -> Result<S::Ok, S::Error> {
    match value {
      Some(dt) => s.serialize_str(&encode_timestamp(*dt)),
      None => s.serialize_none(),
    }
  }
}
