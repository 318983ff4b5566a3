//! CLI command implementations

pub mod explain;
pub mod health;
pub mod index;
pub mod info;
pub mod init;
pub mod output;
pub mod search;
pub mod stats;
pub mod upload;
