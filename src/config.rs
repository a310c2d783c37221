use anyhow::{Context, Result};
use std::env;

use crate::core::Group;

/// Default slug of the profile tab
pub const DEFAULT_SLUG: &str = "group-profile";

/// Default nav label of the profile tab
pub const DEFAULT_NAME: &str = "About us";

/// Settings of the profile tab and the URLs it redirects to
///
/// Similar to the host's own group-extension registration arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionConfig {
    /// Absolute URL of the groups directory, always ending with `/`
    pub groups_directory: String,

    /// Slug of the tab inside a group and of its creation step
    pub slug: String,

    /// Label shown in the group navigation
    pub name: String,

    /// Position of the tab in the group navigation
    pub nav_item_position: u32,

    /// Position of the step in the creation wizard
    pub create_step_position: u32,
}

impl ExtensionConfig {
    pub fn new(groups_directory: &str) -> Self {
        Self {
            groups_directory: trailing_slash(groups_directory),
            slug: DEFAULT_SLUG.to_string(),
            name: DEFAULT_NAME.to_string(),
            nav_item_position: 14,
            create_step_position: 14,
        }
    }

    /// Set the tab slug
    pub fn slug(mut self, slug: &str) -> Self {
        self.slug = slug.trim_matches('/').to_string();
        self
    }

    /// Set the tab label
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set the navigation position
    pub fn nav_item_position(mut self, position: u32) -> Self {
        self.nav_item_position = position;
        self
    }

    /// Set the creation wizard position
    pub fn create_step_position(mut self, position: u32) -> Self {
        self.create_step_position = position;
        self
    }

    /// Public URL of a group, ending with `/`
    pub fn group_permalink(&self, group: &Group) -> String {
        format!("{}{}/", self.groups_directory, group.slug)
    }

    /// Edit screen of the tab for a group
    pub fn group_admin_url(&self, group: &Group) -> String {
        format!("{}admin/{}", self.group_permalink(group), self.slug)
    }

    /// A step of the group creation wizard
    pub fn create_step_url(&self, step: &str) -> String {
        trailing_slash(&format!("{}create/step/{}", self.groups_directory, step))
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.groups_directory.starts_with("http://")
            || self.groups_directory.starts_with("https://")
            || self.groups_directory.starts_with('/'))
        {
            return Err("groups_directory must be an absolute URL or path".to_string());
        }

        if self.slug.is_empty() {
            return Err("slug cannot be empty".to_string());
        }

        if self.slug.contains('/') || self.slug == "admin" || self.slug == "create" {
            return Err(format!("'{}' cannot be used as a slug", self.slug));
        }

        if self.name.trim().is_empty() {
            return Err("name cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self::new("/groups/")
    }
}

fn trailing_slash(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}

/// Server process configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub extension: ExtensionConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("APP_PORT must be a valid u16")?;

        let groups_directory =
            env::var("GROUPS_BASE_URL").unwrap_or_else(|_| "/groups/".to_string());

        let mut extension = ExtensionConfig::new(&groups_directory);
        if let Ok(slug) = env::var("EXTENSION_SLUG") {
            extension = extension.slug(&slug);
        }
        if let Ok(name) = env::var("EXTENSION_NAME") {
            extension = extension.name(&name);
        }

        extension
            .validate()
            .map_err(|err| anyhow::anyhow!(err))
            .context("invalid extension configuration")?;

        Ok(Self {
            host,
            port,
            extension,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
