// handlers/public/mod.rs - Endpoints that need no token

pub mod home;
pub mod security;
