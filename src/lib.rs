//! Almanah - recommendation and statistics engine for a recipe sharing platform
//!
//! This library computes personalized recipe recommendations, aggregates
//! site-wide statistics, and provides the caching and scheduled-refresh
//! machinery around both. Recipe/comment CRUD, authentication and the HTTP
//! layer live in the hosting application and talk to this crate through the
//! service types in [`services`].

pub mod cache;
pub mod config;
pub mod db;
pub mod jobs;
pub mod models;
pub mod services;
