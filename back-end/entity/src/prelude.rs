pub use super::circular::Entity as Circular;
pub use super::download::Entity as Download;
pub use super::note::Entity as Note;
pub use super::review::Entity as Review;
pub use super::subscription::Entity as Subscription;
pub use super::system_setting::Entity as SystemSetting;
pub use super::user::Entity as User;
pub use super::vote::Entity as Vote;
