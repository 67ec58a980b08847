// Header formatting options

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Values per array row unless configured otherwise
pub const DEFAULT_CHUNK_WIDTH: NonZeroUsize = match NonZeroUsize::new(24) {
    Some(width) => width,
    None => unreachable!(),
};

/// Controls how a capture is laid out in the generated header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Number of values per array row
    pub chunk_width: NonZeroUsize,

    /// Negate every timing value (swap mark/space polarity)
    pub invert: bool,

    /// Place the array in program memory (`PROGMEM` on AVR)
    pub use_memory_placement: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            chunk_width: DEFAULT_CHUNK_WIDTH,
            invert: false,
            use_memory_placement: false,
        }
    }
}

impl RenderConfig {
    pub fn with_chunk_width(mut self, chunk_width: NonZeroUsize) -> Self {
        self.chunk_width = chunk_width;
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_memory_placement(mut self, use_memory_placement: bool) -> Self {
        self.use_memory_placement = use_memory_placement;
        self
    }
}
