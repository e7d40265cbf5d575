//! Request middleware

pub mod session_gate;

pub use session_gate::{require_session, validate_or_reject, RequestContext};
