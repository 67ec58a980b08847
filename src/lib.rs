// SUB2HEADER: turn SubGhz RAW captures into C/C++ headers for firmware builds
// Copyright 2026 - Licensed under GPLv3

pub mod batch;
pub mod capture;
pub mod header;

// Re-export commonly used types
pub use batch::{run_batch, BatchConfig, BatchEntry, BatchReport, GeneratedHeader, SkipReason};
pub use capture::{load_capture, parse, CaptureError, ParsedCapture};
pub use header::{render, sanitize_identifier, RenderConfig, SymbolName, SymbolRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
