//! Domain entities

pub mod event;
pub mod session;
pub mod user;

pub use event::{CreateEvent, Event, Location, NewLocation, UpdateEvent};
pub use session::{NewSession, Session};
pub use user::{NewUser, RegisterUser, UpdateUser, User, UserProfile};
