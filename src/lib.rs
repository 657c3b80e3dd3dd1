//! Client-side behavior for the EclipseSec site: the light/dark theme toggle,
//! blog post search and tag filtering, and the tool catalog.
//!
//! The catalog pipeline is split into a pure filter ([`compute_visible`]), a
//! pure renderer ([`render`]), and a [`CatalogController`] that owns the UI
//! state and writes fragments through the [`Dom`] trait. [`Site`] wires the
//! three controllers to a single event stream.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod filter;
pub mod posts;
pub mod render;
pub mod site;
pub mod theme;

#[cfg(all(feature = "browser", target_arch = "wasm32"))]
pub mod browser;

pub use catalog::{Catalog, Status, ToolRecord};
pub use config::SiteConfig;
pub use controller::{CatalogController, InitOutcome};
pub use dom::{Display, Dom, MemoryDocument, MemoryElement, ReadyState};
pub use error::{CatalogError, SiteError, StoreError};
pub use filter::{ALL_TAG, CatalogState, TagIndex, compute_visible};
pub use posts::{KeyStroke, PostFilter, PostFilterState};
pub use site::{EventOutcome, Site, SiteEvent};
pub use theme::{FileStore, MemoryStore, PreferenceStore, SystemScheme, Theme, ThemeController};
