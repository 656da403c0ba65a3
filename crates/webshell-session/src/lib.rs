#![forbid(unsafe_code)]

//! Host-independent console session.
//!
//! Everything the browser console does that is not DOM plumbing lives here:
//! routing socket frames, the push contract, the upload flow, editor state
//! and shortcuts, and copy normalisation. The web crate drives these types
//! from its event callbacks.

pub mod address;
pub mod clipboard;
pub mod config;
pub mod editor;
pub mod error;
pub mod frame;
pub mod session;
pub mod transport;
pub mod upload;

pub use address::PageLocation;
pub use config::ShellConfig;
pub use editor::{Editor, EditorState, SaveOutcome, ShortcutAction};
pub use error::{Result, ShellError};
pub use frame::{Inbound, PushContent};
pub use session::{MessageOutcome, Session, ViewState};
pub use transport::{MemoryTransport, Transport};
pub use upload::{Upload, UploadDirective, UploadOutcome, UploadRequest};
