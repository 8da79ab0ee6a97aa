//! # prefkit
//!
//! Typed settings over a host-provided string key-value store.
//!
//! Every value is persisted as text and interpreted only when read, so
//! data written by one build (say an `f32`) stays readable by a later build
//! that asks for a different compatible type (say an `f64`). Reads are
//! tolerant: absent keys, malformed text and store read failures all return
//! the caller's default.
//!
//! ## Quick Start
//!
//! ```rust
//! use prefkit::{Flush, MemoryStore, Prefs};
//!
//! # fn main() -> prefkit::PrefsResult<()> {
//! let mut prefs = Prefs::new(MemoryStore::new());
//! prefs.put_bool("audio.muted", true, Flush::Defer)?;
//! prefs.put_double("player.height", 1.82, Flush::Defer)?;
//! prefs.save()?;
//!
//! assert!(prefs.get_bool("audio.muted", false));
//! # Ok(())
//! # }
//! ```
//!
//! Host integrations implement [`PrefStore`]; [`MemoryStore`] stands in for
//! the host in tests.

#![warn(clippy::all)]

mod config;
mod error;
mod prefs;
mod store;
mod value;

pub use config::PrefsConfig;
pub use error::{PrefsError, PrefsResult};
pub use prefs::{Flush, Prefs};
pub use store::{MemoryStore, PrefStore, StoreError, StoreResult};
pub use value::{try_parse, PrefValue};
