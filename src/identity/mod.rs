//! Session and identity management for the admin portal client.
//! Keep the public surface thin and split implementation across sub-modules.

mod principal;
mod session;
mod store;

pub use principal::Principal;
pub use session::{LoginNavigator, Session, SessionManager};
pub use store::{FileTokenStore, MemoryTokenStore, StoredTokens, TokenStore};
