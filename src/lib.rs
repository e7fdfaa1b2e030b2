//! Records back office: a typed client for the `/records` REST store, the dashboard's
//! view state (search, sort, paging, selection, export) and a reference store server.

pub mod record;
pub mod client;
pub mod view;
pub mod config;
pub mod tools;
pub mod server;

pub use tools::{Error, Result};
pub use record::{Gender, Record, RecordDraft, RecordField, RecordFields, RecordId};
pub use client::{RecordClient, RecordStore};
pub use view::{Dashboard, RecordView};
