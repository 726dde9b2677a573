pub mod service;

pub use service::{PublicConfig, SettingService, SettingUpsert};
