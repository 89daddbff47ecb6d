//! HTTP API for teams, roles and the many-to-many links between them.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod openapi;
pub mod routes;
