pub mod password;
pub mod role;
pub mod service;

pub use role::{Actor, Capability, Role};
pub use service::{AccountService, ProfileUpdate};
