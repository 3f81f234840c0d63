//! Editing state over a rich-text surface.
//!
//! The [`EditingState`] tracker follows the selection of an
//! [`EditingHost`] and turns user intents (toggle bold, promote a heading,
//! insert a link or an image) into native primitives plus the repairs those
//! primitives need. [`MemoryHost`] is a complete in-memory surface.
//!
//! ```
//! use plume::editor::{EditingHost, EditingState, MemoryHost};
//!
//! let mut host = MemoryHost::from_html("<p>un deux trois</p>");
//! host.focus();
//! host.select_text("deux");
//!
//! let mut state = EditingState::new(host);
//! state.toggle_bold();
//! assert!(state.formats().bold);
//! assert_eq!(state.host().html(), "<p>un <b>deux</b> trois</p>");
//! ```

pub mod host;
pub mod images;
pub mod links;
pub mod memory;
pub mod selection;
pub mod state;
pub mod styles;

pub use host::{BlockKind, Command, EditingHost, InlineFormat, ListKind};
pub use images::{ImageEdit, ImageFile, ImageRequest};
pub use links::{LinkDraft, LinkKind, LinkRequest};
pub use memory::MemoryHost;
pub use selection::{Position, SelectionRange};
pub use state::{ActiveFormats, EditingState};
