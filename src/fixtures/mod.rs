//! Setup routines shared by test suites.
//!
//! Each fixture sends its request through a [`TestSession`](crate::session::TestSession)
//! and, on a 2xx response, records the ids or tokens later steps depend on.

pub mod events;
pub mod users;

pub use events::{create_event, create_event_with, NewEvent};
pub use users::{login, register, NewUser};
