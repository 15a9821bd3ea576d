pub mod category;
pub mod device;
pub mod system_user;
pub mod user_session;
pub mod zone;

pub use category::Category;
pub use device::Device;
pub use system_user::{NewSystemUser, SystemUser};
pub use user_session::UserSession;
pub use zone::Zone;
