// handlers/protected/mod.rs - Endpoints behind the session gate
//
// Every router here is wrapped in a role guard in server.rs; handlers can
// rely on a `SessionContext` being present.

pub mod categories;
pub mod devices;
pub mod security;
pub mod zones;
