// ── Course catalog ──
//
// Profile, skills and the weekly syllabus, loaded from TOML. The default
// catalog is compiled into the binary; a file on disk can replace it.
// Weeks are keyed by slug and kept in course order.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::CoreError;

const EMBEDDED: &str = include_str!("catalog.toml");

// ── Profile ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    pub name: String,
    pub role: String,
    pub tagline: String,
    pub location: String,
    #[serde(default)]
    pub bio: Vec<String>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub contacts: Vec<ContactChannel>,
}

impl Profile {
    pub fn skills_in(&self, category: SkillCategory) -> impl Iterator<Item = &Skill> {
        self.skills.iter().filter(move |s| s.category == category)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Frontend,
    Backend,
    Tool,
    Database,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Skill {
    pub name: String,
    pub category: SkillCategory,
    /// Self-assessed proficiency, 0..=100.
    pub level: u8,
}

/// A way to reach the author, shown beside the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContactChannel {
    pub label: String,
    pub value: String,
    pub note: String,
    pub link: Option<Url>,
}

// ── Weeks ───────────────────────────────────────────────────────────

/// Icon shown on a week card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
pub enum Glyph {
    FileText,
    Code,
    Palette,
    Zap,
    Cpu,
    Component,
    Play,
}

impl Glyph {
    /// Short terminal-friendly symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::FileText => "≡",
            Self::Code => "</>",
            Self::Palette => "◐",
            Self::Zap => "ϟ",
            Self::Cpu => "▣",
            Self::Component => "❖",
            Self::Play => "▶",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Week {
    pub slug: String,
    pub number: u32,
    pub title: String,
    pub subtitle: String,
    /// One-line card blurb.
    pub summary: String,
    /// Full text for the detail page.
    pub description: String,
    pub glyph: Glyph,
    /// Card accent as `#rrggbb`.
    pub accent: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// One collapsible syllabus block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Section {
    pub name: String,
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Example {
    pub title: String,
    pub description: String,
    pub objective: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Resource {
    pub name: String,
    pub url: Url,
}

// ── Catalog ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CatalogFile {
    profile: Profile,
    #[serde(rename = "week", default)]
    weeks: Vec<Week>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    profile: Profile,
    weeks: IndexMap<String, Week>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self, CoreError> {
        Self::from_toml(EMBEDDED)
    }

    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path).map_err(|e| CoreError::Content {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, CoreError> {
        let file: CatalogFile = toml::from_str(text)?;
        Self::build(file.profile, file.weeks)
    }

    fn build(profile: Profile, weeks: Vec<Week>) -> Result<Self, CoreError> {
        if weeks.is_empty() {
            return Err(invalid("the catalog has no weeks"));
        }
        if let Some(skill) = profile.skills.iter().find(|s| s.level > 100) {
            return Err(invalid(format!(
                "skill '{}' has level {} (max 100)",
                skill.name, skill.level
            )));
        }

        let mut by_slug = IndexMap::with_capacity(weeks.len());
        for (position, week) in weeks.into_iter().enumerate() {
            let expected = u32::try_from(position + 1).unwrap_or(u32::MAX);
            if week.number != expected {
                return Err(invalid(format!(
                    "week '{}' is numbered {} but appears in position {expected}",
                    week.slug, week.number
                )));
            }
            if !is_hex_color(&week.accent) {
                return Err(invalid(format!(
                    "week '{}' has accent '{}', expected #rrggbb",
                    week.slug, week.accent
                )));
            }
            if by_slug.contains_key(&week.slug) {
                return Err(invalid(format!("duplicate week slug '{}'", week.slug)));
            }
            by_slug.insert(week.slug.clone(), week);
        }

        debug!(weeks = by_slug.len(), skills = profile.skills.len(), "catalog loaded");
        Ok(Self {
            profile,
            weeks: by_slug,
        })
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    /// Never true for a loaded catalog.
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn week(&self, slug: &str) -> Option<&Week> {
        self.weeks.get(slug)
    }

    pub fn week_at(&self, index: usize) -> Option<&Week> {
        self.weeks.get_index(index).map(|(_, w)| w)
    }

    pub fn index_of(&self, slug: &str) -> Option<usize> {
        self.weeks.get_index_of(slug)
    }

    pub fn weeks(&self) -> impl Iterator<Item = &Week> {
        self.weeks.values()
    }
}

fn invalid(message: impl Into<String>) -> CoreError {
    CoreError::Content {
        message: message.into(),
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s.chars().skip(1).all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MINIMAL: &str = r##"
[profile]
name = "Test"
role = "Student"
tagline = "Learning"
location = "Remote"

[[week]]
slug = "one"
number = 1
title = "One"
subtitle = "First"
summary = "s"
description = "d"
glyph = "code"
accent = "#112233"
"##;

    #[test]
    fn embedded_catalog_loads() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(catalog.len(), 7);
        let first = catalog.week_at(0).unwrap();
        assert_eq!(first.number, 1);
        assert_eq!(catalog.index_of(&first.slug), Some(0));
        assert!(catalog.weeks().all(|w| !w.sections.is_empty()));
        assert!(catalog.weeks().all(|w| !w.examples.is_empty()));
        assert!(catalog.profile().skills.iter().all(|s| s.level <= 100));
    }

    #[test]
    fn minimal_catalog_defaults_collections() {
        let catalog = Catalog::from_toml(MINIMAL).unwrap();
        let week = catalog.week("one").unwrap();
        assert!(week.sections.is_empty());
        assert!(week.resources.is_empty());
        assert_eq!(week.glyph, Glyph::Code);
        assert!(catalog.week("two").is_none());
    }

    #[test]
    fn rejects_catalog_without_weeks() {
        let text = MINIMAL.split("[[week]]").next().unwrap();
        let err = Catalog::from_toml(text).unwrap_err();
        assert!(err.to_string().contains("no weeks"), "got: {err}");
    }

    #[test]
    fn rejects_duplicate_slugs() {
        let dup = MINIMAL.replace("number = 1", "number = 2");
        let text = format!("{MINIMAL}\n[[week]]{}", dup.split("[[week]]").nth(1).unwrap());
        let err = Catalog::from_toml(&text).unwrap_err();
        assert!(err.to_string().contains("duplicate"), "got: {err}");
    }

    #[test]
    fn rejects_gaps_in_numbering() {
        let text = MINIMAL.replace("number = 1", "number = 3");
        let err = Catalog::from_toml(&text).unwrap_err();
        assert!(err.to_string().contains("numbered 3"), "got: {err}");
    }

    #[test]
    fn rejects_bad_accent() {
        let text = MINIMAL.replace("#112233", "blue");
        assert!(Catalog::from_toml(&text).is_err());
    }

    #[test]
    fn rejects_skill_over_100() {
        let text = MINIMAL.replace(
            "location = \"Remote\"",
            "location = \"Remote\"\nskills = [{ name = \"Rust\", category = \"backend\", level = 140 }]",
        );
        let err = Catalog::from_toml(&text).unwrap_err();
        assert!(err.to_string().contains("Rust"), "got: {err}");
    }

    #[test]
    fn malformed_toml_is_content_error() {
        let err = Catalog::from_toml("[[week]\n").unwrap_err();
        assert!(matches!(err, CoreError::Content { .. }));
    }

    #[test]
    fn from_path_reads_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, MINIMAL).unwrap();
        assert_eq!(Catalog::from_path(&path).unwrap().len(), 1);
        assert!(Catalog::from_path(&dir.path().join("missing.toml")).is_err());
    }
}
