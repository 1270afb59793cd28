//! Core library for ACME Users: a single-window editor over a schema-less JSON user list.
//! Provides the record store with its synchronous subscriber stream and single edit session,
//! header derivation for heterogeneous records, and the presentation rules used by the views.

pub mod config;
pub mod fetch;
mod gui;
pub mod nav;
pub mod projection;
mod record;
pub mod schema;
pub mod statics;
mod store;
pub mod telemetry;
mod value;

pub use config::AppConfig;
pub use fetch::{FetchError, UserSource};
pub use gui::run_gui;
pub use record::Record;
pub use store::{EditError, EditSession, RecordStore, Snapshot, SubscriptionId};
pub use value::{UserNumber, UserValue};
