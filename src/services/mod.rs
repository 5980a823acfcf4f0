// Service exports
pub mod auth;
pub mod cache;
pub mod hosted;
pub mod postgres;
pub mod profiles;
pub mod session;
pub mod store;

pub use auth::{AccessClaims, AuthClient, AuthError, AuthProvider, TokenVerifier};
pub use cache::{CacheKey, CacheStats, Clock, ManualClock, SystemClock, TtlCache};
pub use hosted::{HostedError, HostedStore};
pub use postgres::{PostgresError, PostgresStore};
pub use profiles::{ProfileService, ProfileServiceError};
pub use session::{AuthState, SessionError, SessionMachine};
pub use store::{InMemoryStore, ProfileStore, StoreError};
