pub mod gateway;
pub mod plan;
pub mod service;

pub use gateway::{sign_payment, Order, PaymentGateway, RazorpayGateway};
pub use plan::SubscriptionPlan;
pub use service::{PaymentConfirmation, SubscriptionService};
