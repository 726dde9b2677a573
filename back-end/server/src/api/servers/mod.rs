pub mod app_state;
pub mod auth_extractor;
pub mod extract;
pub mod rest;
