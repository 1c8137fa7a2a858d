//! Page model for Logovo
//!
//! This crate provides the retained document the site scripts operate on:
//! an element tree, the browser window (location, history, scroll),
//! a virtual event-loop clock with timer queues, and handler bindings.
//!
//! # Modules
//!
//! - [`document`] - Element arena with class, style and attribute access
//! - [`builder`] - Declarative element construction
//! - [`window`] - Location fragment, session history and viewport
//! - [`timers`] - Virtual clock and deadline-ordered task queues
//! - [`events`] - Handler bindings keyed by element identity

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod document;
pub mod events;
pub mod timers;
pub mod window;

pub use builder::El;
pub use document::{Document, NodeId};
pub use events::{Bindings, EventKind};
pub use timers::{Clock, TimerId, Timers};
pub use window::{History, HistoryItem, PopState, Window};
