//! Movie, director and genre catalog served over http and stored in sqlite.

pub mod api;
pub mod config;
pub mod core;
pub mod db;
