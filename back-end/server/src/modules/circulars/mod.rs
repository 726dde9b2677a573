pub mod service;

pub use service::{CircularService, NewCircular};
