// ABOUTME: Planforge session verification
// ABOUTME: Turns opaque session tokens into an AuthContext for the API layer

pub mod context;
pub mod error;
pub mod session;

// Re-export main types
pub use context::{AuthContext, SessionVerifier, StaticSessionVerifier};
pub use error::{AuthError, AuthResult};
pub use session::{IssuedSession, SessionStore};
