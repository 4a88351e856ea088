//! Browser session and DevTools event capture for the `cdt` CLI.
//!
//! The crate is organized around an explicit [`Session`]: it owns at most
//! one browser connection (launched or attached over a WebSocket endpoint),
//! at most one active page, and the append-only capture stores fed by
//! console and network subscriptions. Everything else operates on the page
//! handle the session hands out:
//!
//! - [`pages`] — ordinal page directory (list/select/close/create)
//! - [`navigation`] — goto and condition polling with explicit timeouts
//! - [`input`] — mouse/keyboard primitives addressed by `data-uid`
//! - [`emulation`] — device profiles and viewport overrides
//! - [`debugging`] — evaluate, screenshots, page snapshots
//! - [`performance`] — trace recording and runtime metrics
//! - [`capture`] — the console and network stores themselves
//!
//! The DevTools wire protocol is owned by `chromiumoxide`; this crate never
//! speaks CDP framing directly.

pub mod capture;
pub mod debugging;
pub mod emulation;
pub mod error;
pub mod input;
pub mod navigation;
pub mod options;
pub mod pages;
pub mod performance;
pub mod session;

pub use chromiumoxide::{Browser, Page};

pub use error::{CdtError, Result};
pub use options::{BrowserOptions, Channel};
pub use session::Session;
