#![forbid(unsafe_code)]

//! Browser frontend for webshell.
//!
//! [`markup`] turns render trees and output entries into HTML and builds on
//! every target. The DOM, `WebSocket`, XHR and editor bindings are
//! wasm32-only and surface as [`WebShell`] through `wasm-bindgen`.

pub mod markup;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::WebShell;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct WebShell;

#[cfg(not(target_arch = "wasm32"))]
impl WebShell {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
