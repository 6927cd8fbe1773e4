//! `recordbook` - an in-memory keyword/description record book
//!
//! This library provides a newest-first record store, pure view derivation
//! (pagination, search, row numbering), and a reducer-driven interaction
//! controller for adding, editing, deleting, and selecting records.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod logging;
pub mod notice;
pub mod record;
pub mod shell;
pub mod state;
pub mod store;
pub mod validation;
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use controller::Controller;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{Record, RecordDraft, RecordId};
pub use state::{Action, Mode, UiState};
pub use store::{RecordStore, StoreStats};
pub use view::{PageNav, SearchScope};
