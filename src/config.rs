// src/config.rs
use crate::constants::DEFAULT_GHOST_API_VERSION;
use crate::error::AppError;
use crate::ghost::GhostAdminKey;
use crate::types::{DatabaseId, NotionToken, ValidatedUrl};
use clap::{Parser, Subcommand};
use std::collections::HashMap;

pub const NOTION_TOKEN_VAR: &str = "NOTION_TOKEN";
pub const NOTION_DATABASE_ID_VAR: &str = "NOTION_DATABASE_ID";
pub const NOTION_READY_STATUS_VAR: &str = "NOTION_READY_STATUS";
pub const GHOST_URL_VAR: &str = "GHOST_URL";
pub const GHOST_ADMIN_KEY_VAR: &str = "GHOST_ADMIN_KEY";
pub const GHOST_API_VERSION_VAR: &str = "GHOST_API_VERSION";
pub const PUBLISH_SECRET_VAR: &str = "PUBLISH_SECRET";

/// Parsed command-line input. Service configuration lives in the environment.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Publish once and exit (the default when no subcommand is given)
    Publish,
    /// Serve the HTTP publish trigger
    Serve {
        /// Address to listen on
        #[arg(long, env = "PUBLISH_BIND", default_value = "0.0.0.0:3000")]
        bind: String,
    },
}

/// A source of configuration values.
///
/// Empty values are reported as absent, so `FOO=` behaves like an unset `FOO`.
pub trait Environment: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|value| !value.is_empty())
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).filter(|value| !value.is_empty()).cloned()
    }
}

/// Connection details for the Notion source database.
#[derive(Debug, Clone)]
pub struct NotionSettings {
    pub token: NotionToken,
    pub database_id: DatabaseId,
    /// When set, only rows whose Status equals this value are published.
    pub ready_status: Option<String>,
}

/// Connection details for the Ghost site.
#[derive(Debug, Clone)]
pub struct GhostSettings {
    pub url: ValidatedUrl,
    pub admin_key: GhostAdminKey,
    pub api_version: String,
}

/// Resolved configuration for one publish run, validated before any network call.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub notion: NotionSettings,
    pub ghost: GhostSettings,
}

impl PublisherConfig {
    /// Resolves and validates the configuration.
    ///
    /// Every required variable is checked for presence first, in a fixed
    /// order, so the error always names the first one missing.
    pub fn resolve(env: &dyn Environment) -> Result<Self, AppError> {
        let notion_token = require(env, NOTION_TOKEN_VAR)?;
        let database_id = require(env, NOTION_DATABASE_ID_VAR)?;
        let ghost_url = require(env, GHOST_URL_VAR)?;
        let admin_key = require(env, GHOST_ADMIN_KEY_VAR)?;

        let config = PublisherConfig {
            notion: NotionSettings {
                token: NotionToken::new(notion_token)?,
                database_id: DatabaseId::parse(&database_id)?,
                ready_status: env
                    .var(NOTION_READY_STATUS_VAR)
                    .map(|status| status.trim().to_string()),
            },
            ghost: GhostSettings {
                url: ValidatedUrl::parse(&ghost_url)?,
                admin_key: GhostAdminKey::parse(&admin_key)?,
                api_version: env
                    .var(GHOST_API_VERSION_VAR)
                    .unwrap_or_else(|| DEFAULT_GHOST_API_VERSION.to_string()),
            },
        };

        log::debug!(
            "Resolved configuration: database {}, Ghost site {}, API {}",
            config.notion.database_id,
            config.ghost.url,
            config.ghost.api_version
        );
        Ok(config)
    }
}

/// The shared secret guarding the HTTP trigger, if one is configured.
pub fn publish_secret(env: &dyn Environment) -> Option<String> {
    env.var(PUBLISH_SECRET_VAR)
}

fn require(env: &dyn Environment, name: &str) -> Result<String, AppError> {
    env.var(name)
        .ok_or_else(|| AppError::MissingConfiguration(name.to_string()))
}
