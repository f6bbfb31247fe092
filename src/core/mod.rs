//! Core module - configuration, remote API and classroom logic

pub mod config;
pub mod content;
pub mod forge;
pub mod push;
pub mod roster;

pub use config::{Config, ConfigError};
pub use content::{ContentError, ContentFile};
pub use forge::{Forge, ForgeError, GithubClient};
pub use push::{push_content, PushError, PushOutcome, PushTarget};
pub use roster::InviteStatus;
