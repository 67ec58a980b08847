// Capture file loading

use super::parser::{parse, ParsedCapture};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CaptureError>;

/// Load and parse a capture file.
///
/// Invalid UTF-8 is replaced rather than rejected; only failing to read
/// the file is an error.
pub fn load_capture(filename: impl AsRef<Path>) -> Result<ParsedCapture> {
    let mut file = File::open(filename)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;

    Ok(parse_bytes(&data))
}

/// Parse capture contents that may not be valid UTF-8
pub fn parse_bytes(data: &[u8]) -> ParsedCapture {
    parse(&String::from_utf8_lossy(data))
}
