//! # Sportmeet Core
//! 
//! Domain entities, ports, and the session and discovery-feed services.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
