pub mod cache;
pub mod jwt;
pub mod provider;
pub mod resolver;

pub use cache::{Clock, ManualClock, SystemClock, TokenCache};
pub use jwt::{Claims, JwtError, JwtIssuer};
pub use provider::{IdentityProvider, LocalJwtProvider, RemoteIdentityProvider};
pub use resolver::IdentityResolver;
