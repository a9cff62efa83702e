mod attendance;
mod auth;
pub mod client;
mod parent;
mod school;
mod teacher;
pub mod types;

pub use client::*;
pub use types::*;
