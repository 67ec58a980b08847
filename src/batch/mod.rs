// Batch conversion of capture files into headers
pub mod output;

pub use output::{probe_writable, resolve_output_dir, write_header, OutputError};

use crate::capture::{load_capture, ParsedCapture};
use crate::header::{render, RenderConfig, SymbolName, SymbolRegistry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything a conversion run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Capture files, processed in order
    pub inputs: Vec<PathBuf>,

    /// Write every header here instead of beside its input
    pub out_dir: Option<PathBuf>,

    /// Used when an input's directory is not writable
    pub fallback_dir: PathBuf,

    /// Array layout options
    pub render: RenderConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            out_dir: None,
            fallback_dir: std::env::temp_dir(),
            render: RenderConfig::default(),
        }
    }
}

impl BatchConfig {
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            ..Default::default()
        }
    }

    /// Deserialize from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// A rendered header and where it belongs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedHeader {
    pub symbol: SymbolName,
    pub path: PathBuf,
    pub text: String,
}

impl GeneratedHeader {
    /// Render `capture` under `symbol`, destined for `out_dir/<symbol>.h`
    pub fn new(
        symbol: SymbolName,
        capture: &ParsedCapture,
        config: &RenderConfig,
        out_dir: &Path,
    ) -> Self {
        let text = render(&symbol, capture, config);
        let path = out_dir.join(symbol.header_file_name());
        Self { symbol, path, text }
    }

    pub fn write(&self) -> output::Result<()> {
        write_header(&self.path, &self.text)
    }
}

/// One successfully generated header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    pub source: PathBuf,
    pub symbol: SymbolName,
    pub header_path: PathBuf,
    pub count: usize,
    pub frequency_hz: Option<u64>,
    pub protocol: Option<String>,
}

/// Why an input produced no header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    Missing,
    Unreadable(String),
    Empty,
    WriteFailed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Missing => write!(f, "file not found"),
            SkipReason::Unreadable(e) => write!(f, "unreadable: {}", e),
            SkipReason::Empty => write!(f, "no RAW_Data values"),
            SkipReason::WriteFailed(e) => write!(f, "write failed: {}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedInput {
    pub source: PathBuf,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Outcome of a batch run, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub generated: Vec<BatchEntry>,
    pub skipped: Vec<SkippedInput>,
}

impl BatchReport {
    /// True when no header was generated
    pub fn is_empty(&self) -> bool {
        self.generated.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn skip(&mut self, source: &Path, reason: SkipReason) {
        tracing::warn!("Skipping {}: {}", source.display(), reason);
        self.skipped.push(SkippedInput {
            source: source.to_path_buf(),
            reason,
        });
    }
}

/// Convert every input of `config`, one file at a time.
///
/// Per-file problems are recorded in the report and never stop the batch.
pub fn run_batch(config: &BatchConfig) -> BatchReport {
    let mut report = BatchReport::default();
    let mut registry = SymbolRegistry::new();

    for source in &config.inputs {
        if !source.exists() {
            report.skip(source, SkipReason::Missing);
            continue;
        }

        let capture = match load_capture(source) {
            Ok(capture) => capture,
            Err(e) => {
                report.skip(source, SkipReason::Unreadable(e.to_string()));
                continue;
            }
        };
        if capture.is_empty() {
            report.skip(source, SkipReason::Empty);
            continue;
        }

        let symbol = registry.claim(SymbolName::from_path(source));

        let out_dir =
            match resolve_output_dir(source, config.out_dir.as_deref(), &config.fallback_dir) {
                Ok(dir) => dir,
                Err(e) => {
                    report.skip(source, SkipReason::WriteFailed(e.to_string()));
                    continue;
                }
            };

        let header = GeneratedHeader::new(symbol, &capture, &config.render, &out_dir);
        if let Err(e) = header.write() {
            report.skip(source, SkipReason::WriteFailed(e.to_string()));
            continue;
        }

        tracing::info!(
            "Wrote {} ({} values) to {}",
            header.symbol,
            capture.len(),
            header.path.display()
        );
        report.generated.push(BatchEntry {
            source: source.clone(),
            symbol: header.symbol,
            header_path: header.path,
            count: capture.len(),
            frequency_hz: capture.frequency_hz,
            protocol: capture.protocol,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    const CAPTURE: &str = "Filetype: Flipper SubGhz RAW File\n\
                           Frequency: 433920000\n\
                           Protocol: RAW\n\
                           RAW_Data: 100 -200 300\n";

    fn write_capture(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_batch_writes_beside_inputs() {
        let root = tempfile::tempdir().unwrap();
        let input = write_capture(root.path(), "Gate Open.sub", CAPTURE);

        let report = run_batch(&BatchConfig::new(vec![input.clone()]));

        assert_eq!(report.generated.len(), 1);
        let entry = &report.generated[0];
        assert_eq!(entry.source, input);
        assert_eq!(entry.symbol.as_str(), "Gate_Open");
        assert_eq!(entry.header_path, root.path().join("Gate_Open.h"));
        assert_eq!(entry.count, 3);
        assert_eq!(entry.frequency_hz, Some(433_920_000));
        assert_eq!(entry.protocol.as_deref(), Some("RAW"));

        let text = fs::read_to_string(&entry.header_path).unwrap();
        assert!(text.starts_with("#ifndef GATE_OPEN_H\n"));
        assert!(text.contains("static const int32_t Gate_Open[] = {\n    100, -200, 300\n};"));
    }

    #[test]
    fn test_batch_resolves_collisions_in_order() {
        let root = tempfile::tempdir().unwrap();
        let a = write_capture(root.path(), "one/remote.sub", CAPTURE);
        let b = write_capture(root.path(), "two/remote.sub", CAPTURE);
        let c = write_capture(root.path(), "three/remote.txt", CAPTURE);
        let out = root.path().join("out");

        let mut config = BatchConfig::new(vec![a, b, c]);
        config.out_dir = Some(out.clone());
        let report = run_batch(&config);

        let symbols: Vec<&str> = report.generated.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["remote", "remote_2", "remote_3"]);
        assert!(out.join("remote.h").is_file());
        assert!(out.join("remote_2.h").is_file());
        assert!(out.join("remote_3.h").is_file());
    }

    #[test]
    fn test_batch_skips_missing_and_empty() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("missing.sub");
        let empty = write_capture(root.path(), "empty.sub", "Frequency: 433920000\n");
        let good = write_capture(root.path(), "good.sub", CAPTURE);

        let report = run_batch(&BatchConfig::new(vec![missing.clone(), empty.clone(), good]));

        assert_eq!(report.generated.len(), 1);
        assert_eq!(report.generated[0].symbol.as_str(), "good");
        assert_eq!(
            report.skipped,
            vec![
                SkippedInput {
                    source: missing,
                    reason: SkipReason::Missing
                },
                SkippedInput {
                    source: empty,
                    reason: SkipReason::Empty
                },
            ]
        );
        assert!(!root.path().join("empty.h").exists());
    }

    #[test]
    fn test_batch_continues_past_unreadable_input() {
        let root = tempfile::tempdir().unwrap();
        let dir_input = root.path().join("folder.sub");
        fs::create_dir(&dir_input).unwrap();
        let good = write_capture(root.path(), "good.sub", CAPTURE);

        let report = run_batch(&BatchConfig::new(vec![dir_input.clone(), good]));

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].source, dir_input);
        assert!(matches!(report.skipped[0].reason, SkipReason::Unreadable(_)));
        assert_eq!(report.generated.len(), 1);
        assert_eq!(report.generated[0].symbol.as_str(), "good");
    }

    #[test]
    fn test_batch_continues_past_write_failures() {
        let root = tempfile::tempdir().unwrap();
        let dir_input = root.path().join("folder.sub");
        fs::create_dir(&dir_input).unwrap();
        let first = write_capture(root.path(), "first.sub", CAPTURE);
        let second = write_capture(root.path(), "second.sub", CAPTURE);
        // A regular file standing where the output directory should be
        let blocker = root.path().join("not_a_dir");
        fs::write(&blocker, b"").unwrap();

        let mut config = BatchConfig::new(vec![dir_input, first.clone(), second.clone()]);
        config.out_dir = Some(blocker);
        let report = run_batch(&config);

        assert!(report.is_empty());
        let reasons: Vec<&SkipReason> = report.skipped.iter().map(|s| &s.reason).collect();
        assert_eq!(reasons.len(), 3);
        assert!(matches!(reasons[0], SkipReason::Unreadable(_)));
        assert!(matches!(reasons[1], SkipReason::WriteFailed(_)));
        assert!(matches!(reasons[2], SkipReason::WriteFailed(_)));
        assert_eq!(report.skipped[1].source, first);
        assert_eq!(report.skipped[2].source, second);
    }

    #[test]
    fn test_batch_reports_uncreatable_fallback() {
        let root = tempfile::tempdir().unwrap();
        let caps = root.path().join("caps");
        let input = write_capture(&caps, "a.sub", CAPTURE);
        // A directory in the way of the scratch file fails the write check
        fs::create_dir(caps.join(output::WRITE_PROBE_NAME)).unwrap();
        let blocker = root.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let good = write_capture(&root.path().join("ok"), "good.sub", CAPTURE);

        let mut config = BatchConfig::new(vec![input.clone(), good]);
        config.fallback_dir = blocker.join("fallback");
        let report = run_batch(&config);

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].source, input);
        assert!(matches!(report.skipped[0].reason, SkipReason::WriteFailed(_)));
        assert_eq!(report.generated.len(), 1);
        assert_eq!(report.generated[0].symbol.as_str(), "good");
        assert!(root.path().join("ok/good.h").is_file());
    }

    #[test]
    fn test_empty_batch() {
        let report = run_batch(&BatchConfig::default());
        assert!(report.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_batch_applies_render_config() {
        let root = tempfile::tempdir().unwrap();
        let input = write_capture(root.path(), "x.sub", CAPTURE);

        let mut config = BatchConfig::new(vec![input]);
        config.render = RenderConfig::default()
            .with_chunk_width(NonZeroUsize::new(2).unwrap())
            .with_invert(true)
            .with_memory_placement(true);
        let report = run_batch(&config);

        let text = fs::read_to_string(&report.generated[0].header_path).unwrap();
        assert!(text.contains("#include <avr/pgmspace.h>"));
        assert!(text.contains("x[] PROGMEM = {\n    -100, 200,\n    -300\n};"));
        assert_eq!(report.generated[0].count, 3);
    }

    #[test]
    fn test_config_from_json() {
        let config = BatchConfig::from_json(
            r#"{"inputs":["a.sub","b.sub"],"out_dir":"out","render":{"chunk_width":8}}"#,
        )
        .unwrap();
        assert_eq!(config.inputs, vec![PathBuf::from("a.sub"), PathBuf::from("b.sub")]);
        assert_eq!(config.out_dir, Some(PathBuf::from("out")));
        assert_eq!(config.fallback_dir, std::env::temp_dir());
        assert_eq!(config.render.chunk_width.get(), 8);
        assert!(!config.render.invert);

        assert!(matches!(
            BatchConfig::from_json(r#"{"render":{"chunk_width":0}}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_report_json() {
        let mut report = BatchReport::default();
        report.skipped.push(SkippedInput {
            source: PathBuf::from("a.sub"),
            reason: SkipReason::Empty,
        });
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["skipped"][0]["source"], "a.sub");
        assert_eq!(json["skipped"][0]["reason"], "empty");
        assert!(json["generated"].as_array().unwrap().is_empty());
    }
}
