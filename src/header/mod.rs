// Header generation
pub mod config;
pub mod render;
pub mod symbol;

pub use config::{RenderConfig, DEFAULT_CHUNK_WIDTH};
pub use render::{format_int_list, render, render_nonempty};
pub use symbol::{sanitize_identifier, SymbolName, SymbolRegistry};
