// handlers/mod.rs - HTTP adapters, grouped by who may call them
//
// Public (anonymous) → Protected (signed-in session, role-gated per router)

pub mod protected;
pub mod public;
