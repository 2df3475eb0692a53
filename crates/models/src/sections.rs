//! Site content sections.
//!
//! Records are pass-through payloads: they use the camelCase field names the
//! site front end reads, and every field has a default so a partially filled
//! document still loads.

use serde::{Deserialize, Serialize};

/// The sections the site front end knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SiteSection {
    Profile,
    Featured,
    Projects,
    About,
}

impl SiteSection {
    pub const ALL: [SiteSection; 4] = [Self::Profile, Self::Featured, Self::Projects, Self::About];

    /// Storage key used by every backend.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Featured => "featured",
            Self::Projects => "projects",
            Self::About => "about",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileData {
    pub profile_image: String,
    pub name: String,
    pub bio: String,
    pub github_url: String,
    pub twitter_url: String,
    pub substack_url: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FeaturedData {
    pub showcase_image: String,
    pub featured_title: String,
    pub featured_description: String,
    pub demo_url: String,
    pub source_code_url: String,
    pub technologies: Vec<String>,
    pub key_features: Vec<String>,
}

/// Badge shown on a project card; `class` carries the CSS classes for the badge.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectTag {
    pub name: String,
    pub class: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image: String,
    pub tags: Vec<ProjectTag>,
    pub stars: i64,
    pub repo: String,
}

/// One paragraph of the about page.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AboutSection {
    pub id: i64,
    pub content: String,
}
