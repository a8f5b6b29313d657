//! Jotter: a single-author blog with a password-gated admin panel.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod util;
