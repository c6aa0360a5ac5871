//! Authentication
//!
//! Access tokens are issued by the hosted auth provider. This service only
//! verifies them and turns the caller into a `Viewer`: anonymous requests
//! become guests, signed-in requests carry the profile's role and premium
//! flag.

mod error;
pub mod jwt;
mod middleware;

pub use error::{AuthError, AuthResult};
pub use middleware::{require_viewer_identity, resolve_viewer, CurrentViewer};
