//! # Sportmeet Security
//! 
//! Security utilities: session tokens, session cookie codec, password hashing.

pub mod cookie;
pub mod password;
pub mod token;

pub use cookie::{CookieError, SessionCookie};
pub use password::{PasswordError, PasswordService};
pub use token::{TokenError, TokenGenerator};
