//! Configuration for the external collaborators.
//!
//! The engine itself needs no configuration; the sync and identity
//! boundaries each need credentials resolved at session start. A missing
//! credential is fatal to that collaborator only, never to the engine.

use std::env;
use thiserror::Error;

/// Errors raised while resolving collaborator configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

const SYNC_PUBLIC_KEY: &str = "COLLABCANVAS_SYNC_PUBLIC_KEY";
const SYNC_ROOM: &str = "COLLABCANVAS_SYNC_ROOM";
const IDENTITY_API_KEY: &str = "COLLABCANVAS_IDENTITY_API_KEY";
const IDENTITY_AUTH_DOMAIN: &str = "COLLABCANVAS_IDENTITY_AUTH_DOMAIN";
const IDENTITY_PROJECT_ID: &str = "COLLABCANVAS_IDENTITY_PROJECT_ID";

/// Credentials for the realtime sync service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Public API key for the realtime service.
    pub public_api_key: String,
    /// Room to join; defaults to "main" when unset.
    pub room: String,
}

impl SyncConfig {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let public_api_key = match lookup(SYNC_PUBLIC_KEY) {
            Some(key) if !key.is_empty() => key,
            _ => {
                if cfg!(debug_assertions) {
                    log::warn!("sync public API key missing, set {SYNC_PUBLIC_KEY}");
                }
                return Err(ConfigError::MissingVar(SYNC_PUBLIC_KEY));
            }
        };
        let room = lookup(SYNC_ROOM).unwrap_or_else(|| "main".to_string());
        Ok(Self {
            public_api_key,
            room,
        })
    }
}

/// Credentials for the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
}

impl IdentityConfig {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let require = |key: &'static str| -> Result<String, ConfigError> {
            match lookup(key) {
                Some(value) if !value.is_empty() => Ok(value),
                _ => Err(ConfigError::MissingVar(key)),
            }
        };
        Ok(Self {
            api_key: require(IDENTITY_API_KEY)?,
            auth_domain: require(IDENTITY_AUTH_DOMAIN)?,
            project_id: require(IDENTITY_PROJECT_ID)?,
        })
    }
}
