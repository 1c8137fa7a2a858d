//! # Logovo
//!
//! The LogovoDushnil site as a headless page: hash-routed navigation between
//! the home view, the feed and category grids, a fullscreen item overlay with
//! deep links, and the page widgets around it.
//!
//! ## Example
//!
//! ```no_run
//! use logovo::{Site, SiteConfig};
//! use page_dom::Document;
//!
//! # fn page() -> Document { Document::new() }
//! logovo::init_tracing();
//! let mut site = Site::boot(page(), "#category/coding", SiteConfig::default())?;
//! site.run_until_idle();
//! assert_eq!(site.document().title(), "LogovoDushnil");
//! # Ok::<(), anyhow::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod site;

pub use config::SiteConfig;
pub use site::{Handled, Site};

use tracing_subscriber::EnvFilter;

/// Install a `RUST_LOG`-driven subscriber, `info` when unset
///
/// Calling it again after a subscriber is installed does nothing.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
