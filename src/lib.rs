pub mod auth;
pub mod config;
pub mod converters;
pub mod database;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod server;
pub mod services;
pub mod types;

#[cfg(test)]
pub mod testing;
