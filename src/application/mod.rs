//! Application services: post workflows, admin sessions and error mapping.

pub mod auth;
pub mod error;
pub mod posts;
pub mod repos;
