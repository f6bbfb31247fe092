//! CLI command implementations

pub mod completions;
pub mod init;
pub mod invite;
pub mod push;
pub mod repos;
pub mod students;
