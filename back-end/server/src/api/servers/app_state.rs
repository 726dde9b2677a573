use std::sync::Arc;

use crate::api::platform::Platform;

#[derive(Clone)]
pub struct AppState {
    pub platform: Arc<Platform>,
}

impl AppState {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform: Arc::new(platform),
        }
    }
}
