//! Environment management module for REST Harness
//!
//! This module holds the variable store shared by every step of a test run and
//! the loader that seeds it from an environment file. Values written by one step
//! (an auth token, the id of a freshly created event) are read by later steps
//! through `{{name}}` placeholders.
//!
//! # Example
//!
//! ```
//! use rest_harness::environment::EnvironmentStore;
//!
//! let store = EnvironmentStore::new();
//! store.set("org_member_token", "abc123");
//!
//! assert_eq!(store.get("org_member_token").as_deref(), Some("abc123"));
//! assert_eq!(store.get("last_event_id"), None);
//! ```

pub mod loader;
pub mod models;
pub mod store;

pub use loader::{
    discover_environment, find_environment_file, load_environment_file, seed_from_json, EnvError,
};
pub use models::{Binding, MissingVariablePolicy};
pub use store::EnvironmentStore;
