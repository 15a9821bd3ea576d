//! Pure entity <-> DTO mapping, one module per resource.

pub mod category;
pub mod device;
pub mod system_user;
pub mod zone;
