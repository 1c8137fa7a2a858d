//! # Widgets
//!
//! Page widgets that sit beside navigation: the image lightbox, the code
//! copy buttons, the theme toggle and the mobile tab bar.
//!
//! Each widget owns its own bindings and timers. Widgets that must rebind
//! after navigation implement [`navigation::NavigationObserver`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod copy;
pub mod error;
pub mod lightbox;
pub mod mobile_nav;
pub mod theme;

pub use copy::{Clipboard, ClipboardError, CodeCopyButtons, MemoryClipboard};
pub use error::{Result, WidgetError};
pub use lightbox::{ImageLightbox, LightboxTimings};
pub use mobile_nav::{MobileNavBar, MobileTab};
pub use theme::ThemeToggle;
