// Library crate: scene store, challenge validation, tutoring chat and the
// headless agent interface. Frontends (web, wasm, server) build on top.

pub mod align;
pub mod challenge;
pub mod chat;
pub mod command;
pub mod fixtures;
pub mod harness;
pub mod measure;
pub mod state;
pub mod tracking;
