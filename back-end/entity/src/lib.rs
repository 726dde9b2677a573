pub mod prelude;

pub mod circular;
pub mod download;
pub mod note;
pub mod review;
pub mod subscription;
pub mod system_setting;
pub mod user;
pub mod vote;
