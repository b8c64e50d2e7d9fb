//! Module wrapper state and artifact generation.

mod state;
mod writer;

pub use state::ModuleWrapper;
pub use writer::{render_header, render_module, save_artifact};
