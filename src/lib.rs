//! Krozek: classroom administration for GitHub organizations
//!
//! Lists students, creates and deletes their repositories, pushes course
//! content as a single commit and manages organization invitations.

pub mod cli;
pub mod core;
