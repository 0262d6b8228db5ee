//! The portfolio document: profile, technology showcase and projects.
//!
//! A single versioned document lives under [`crate::PORTFOLIO_KEY`]. Field
//! names are camelCase on disk so stored blobs stay interchangeable with the
//! browser build of the site.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Image shown when a project has no image URL (or it fails to load).
pub const PROJECT_PLACEHOLDER_IMAGE: &str =
  "https://placehold.co/600x400/1e293b/f8fafc?text=Project+Visual";

/// Link target used when a project has no repository URL.
pub const MISSING_REPOSITORY_URL: &str = "#";

/// Hero name shown when the profile has none.
pub const FALLBACK_NAME: &str = "John Doe";

/// Hero bio shown when the profile has none.
pub const FALLBACK_BIO: &str = "I transform complex data into actionable \
                                insights to drive strategic business growth.";

// ─── Document ────────────────────────────────────────────────────────────────

/// The singleton document rendered by the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioDocument {
  /// Schema stamp; compared for exact equality with
  /// [`crate::CURRENT_VERSION`].
  #[serde(default)]
  pub version:      String,
  #[serde(default)]
  pub profile:      Profile,
  #[serde(default)]
  pub technologies: Vec<Technology>,
  #[serde(default)]
  pub projects:     Vec<Project>,
}

impl PortfolioDocument {
  /// Sort projects by ascending `order`. The sort is stable, so ties keep
  /// their stored relative position.
  pub fn sort_projects(&mut self) {
    self.projects.sort_by_key(|p| p.order);
  }

  /// Projects to render: the stored list, or the built-in projects when the
  /// stored list is empty.
  pub fn display_projects(&self) -> Vec<Project> {
    if self.projects.is_empty() {
      crate::defaults::default_projects()
    } else {
      self.projects.clone()
    }
  }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub designation: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bio:         Option<String>,
}

impl Profile {
  pub fn display_name(&self) -> &str {
    non_empty(self.name.as_deref()).unwrap_or(FALLBACK_NAME)
  }

  pub fn display_designation(&self) -> &str {
    self.designation.as_deref().unwrap_or_default()
  }

  pub fn display_bio(&self) -> &str {
    non_empty(self.bio.as_deref()).unwrap_or(FALLBACK_BIO)
  }
}

// ─── Technologies ────────────────────────────────────────────────────────────

/// Icon tags with a dedicated glyph. Anything else falls back to a label
/// derived from the technology name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString)]
pub enum TechIcon {
  Python,
  #[strum(serialize = "SQL")]
  Sql,
  Terminal,
  #[strum(serialize = "ML")]
  Ml,
  Tableau,
  Excel,
  #[strum(serialize = "PowerBI")]
  PowerBi,
  R,
}

/// What to draw for a technology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconDisplay {
  Known(TechIcon),
  /// Up to four upper-cased characters of the technology name.
  Label(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
  pub name: String,
  /// Raw icon tag. One of the [`TechIcon`] tags or free text.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub icon: Option<String>,
}

impl Technology {
  pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
    Self { name: name.into(), icon: Some(icon.into()) }
  }

  /// Resolve the icon tag, falling back to a label for unknown or absent
  /// tags.
  pub fn icon(&self) -> IconDisplay {
    match self.icon.as_deref().and_then(|tag| tag.parse::<TechIcon>().ok()) {
      Some(icon) => IconDisplay::Known(icon),
      None => IconDisplay::Label(
        self.name.chars().take(4).collect::<String>().to_uppercase(),
      ),
    }
  }
}

// ─── Projects ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
  pub id:             String,
  /// Display position; ascending.
  pub order:          i64,
  pub name:           String,
  #[serde(default)]
  pub description:    String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub repository_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url:      Option<String>,
  #[serde(default)]
  pub key_steps:      Vec<String>,
}

impl Project {
  pub fn image_or_placeholder(&self) -> &str {
    non_empty(self.image_url.as_deref()).unwrap_or(PROJECT_PLACEHOLDER_IMAGE)
  }

  pub fn repository_or_placeholder(&self) -> &str {
    non_empty(self.repository_url.as_deref()).unwrap_or(MISSING_REPOSITORY_URL)
  }
}

fn non_empty(s: Option<&str>) -> Option<&str> { s.filter(|s| !s.is_empty()) }
