pub mod accounts;
pub mod circulars;
pub mod error;
pub mod identity;
pub mod interaction;
pub mod notes;
pub mod payments;
pub mod settings;
pub mod storage;

pub use error::{ServiceError, ServiceResult};
