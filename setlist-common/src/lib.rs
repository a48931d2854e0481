//! # Setlist Common Library
//!
//! Shared code for the setlist service and its tools:
//! - Song and order models
//! - Key-value store trait with SQLite and in-memory backends
//! - Order reconciliation
//! - Library aggregate, command objects and the optimistic client view
//! - Display ordinals for the song list
//! - Import/export document format
//! - Configuration loading

pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod library;
pub mod models;
pub mod reconcile;
pub mod repository;
pub mod store;
pub mod transfer;
pub mod view;

pub use command::{Applied, Command, Touched};
pub use error::{Error, Result};
pub use library::Library;
pub use models::{OrderEntry, Song, SongBook};
pub use reconcile::{reconcile, Reconciled};
pub use repository::Repository;
pub use store::{KvStore, MemoryStore, SqliteStore, ORDER_KEY, SONGS_KEY};
pub use transfer::{ExportFormat, TransferDocument};
pub use view::LocalView;
