// Capture file handling
pub mod parser;
pub mod reader;

pub use parser::{parse, ParsedCapture, RAW_DATA_MARKER};
pub use reader::{load_capture, parse_bytes, CaptureError};
