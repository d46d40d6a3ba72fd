//! dexterm - terminal viewer for a creature catalog REST API
//!
//! The library holds everything except the terminal loop:
//!
//! - `api`: one async function per catalog query
//! - `loader` and `fetcher`: per-query loading state and the background task
//!   that serves requests for it
//! - `favorites`: the persisted favorites list
//! - `view` and `stats`: filter, sort, pagination and catalog counts
//! - `router`, `app`, `ui`: screens, deep links, state machine and rendering
//!
//! The `native` feature (default) adds SQLite persistence and the `dexterm`
//! binary.

// Catalog data and fetching
pub mod api;
pub mod fetcher;
pub mod loader;
pub mod types;

// Local state and pure view logic
pub mod favorites;
pub mod stats;
pub mod view;

// Configuration and theming
pub mod config;
pub mod theme;

// Screens
pub mod app;
pub mod router;
pub mod ui;

// Re-export commonly used types
pub use api::{ApiClient, FetchError};
pub use app::{App, InputMode};
pub use config::Config;
pub use favorites::{FavoritesStore, KvStore, MemoryKv, StoreError};
pub use types::{AppEvent, Category, Creature};
