// Line matchers and tokenizer for SubGhz RAW capture files
// Format: key/value metadata lines plus one or more "RAW_Data:" lines of
// signed pulse durations in microseconds.

use nom::{
    bytes::complete::{tag, take_while},
    character::complete::{char, digit1},
    combinator::{eof, rest},
    IResult,
};
use serde::Serialize;

/// Marker that introduces a line of raw timing values
pub const RAW_DATA_MARKER: &str = "RAW_Data:";

/// A capture file reduced to the data needed to emit a header
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ParsedCapture {
    /// Pulse/gap durations in file order; positive = mark, negative = space
    pub timings: Vec<i32>,

    /// Carrier frequency from the `Frequency:` line
    pub frequency_hz: Option<u64>,

    /// Trimmed text of the `Protocol:` line
    pub protocol: Option<String>,
}

impl ParsedCapture {
    /// Number of timing values
    pub fn len(&self) -> usize {
        self.timings.len()
    }

    /// True when the capture contained no usable timing values
    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }

    /// Carrier frequency in MHz
    pub fn frequency_mhz(&self) -> Option<f64> {
        self.frequency_hz.map(|hz| hz as f64 / 1_000_000.0)
    }

    /// Number of mark (positive) durations
    pub fn mark_count(&self) -> usize {
        self.timings.iter().filter(|&&t| t > 0).count()
    }

    /// Number of space (negative) durations
    pub fn space_count(&self) -> usize {
        self.timings.iter().filter(|&&t| t < 0).count()
    }

    /// Sum of all durations regardless of sign
    pub fn total_duration(&self) -> u64 {
        self.timings.iter().map(|t| u64::from(t.unsigned_abs())).sum()
    }
}

/// Parse the full text of a capture file.
///
/// Never fails: missing metadata yields `None`, malformed timing tokens are
/// dropped, and a file without raw data yields an empty `timings` vector.
pub fn parse(source: &str) -> ParsedCapture {
    let frequency_hz = extract_frequency(source);
    let protocol = extract_protocol(source);

    let raw_lines = collect_raw_lines(source);
    let timings = parse_timings(&raw_lines);

    ParsedCapture {
        timings,
        frequency_hz,
        protocol,
    }
}

/// Split text into lines, accepting `\n`, `\r\n` and bare `\r` endings
fn lines(source: &str) -> impl Iterator<Item = &str> {
    source.split(['\n', '\r'])
}

fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while(char::is_whitespace)(input)
}

/// `<ws>Frequency<ws>:<ws><digits><ws><eol>`
fn frequency_field(input: &str) -> IResult<&str, &str> {
    let (input, _) = whitespace(input)?;
    let (input, _) = tag("Frequency")(input)?;
    let (input, _) = whitespace(input)?;
    let (input, _) = char(':')(input)?;
    let (input, _) = whitespace(input)?;
    let (input, digits) = digit1(input)?;
    let (input, _) = whitespace(input)?;
    let (input, _) = eof(input)?;
    Ok((input, digits))
}

/// `<ws>Protocol<ws>:<text>`, yielding the trimmed text
fn protocol_field(input: &str) -> IResult<&str, &str> {
    let (input, _) = whitespace(input)?;
    let (input, _) = tag("Protocol")(input)?;
    let (input, _) = whitespace(input)?;
    let (input, _) = char(':')(input)?;
    let (input, value) = rest(input)?;
    Ok((input, value.trim()))
}

/// `<ws>RAW_Data:<text>`, yielding the trimmed text
fn raw_data_field(input: &str) -> IResult<&str, &str> {
    let (input, _) = whitespace(input)?;
    let (input, _) = tag(RAW_DATA_MARKER)(input)?;
    let (input, value) = rest(input)?;
    Ok((input, value.trim()))
}

fn extract_frequency(source: &str) -> Option<u64> {
    let digits = lines(source).find_map(|line| frequency_field(line).ok().map(|(_, d)| d))?;
    match digits.parse::<u64>() {
        Ok(hz) => Some(hz),
        Err(e) => {
            tracing::debug!("Ignoring frequency {:?}: {}", digits, e);
            None
        }
    }
}

fn extract_protocol(source: &str) -> Option<String> {
    lines(source)
        .filter_map(|line| protocol_field(line).ok().map(|(_, p)| p))
        .find(|p| !p.is_empty())
        .map(str::to_string)
}

/// Collect the payload of every raw data line.
///
/// Lines that start with the marker win. Only when none do is the marker
/// searched for anywhere in a line.
fn collect_raw_lines(source: &str) -> Vec<&str> {
    let strict: Vec<&str> = lines(source)
        .filter_map(|line| raw_data_field(line).ok().map(|(_, payload)| payload))
        .collect();
    if !strict.is_empty() {
        return strict;
    }

    let loose: Vec<&str> = lines(source)
        .filter_map(|line| {
            let idx = line.find(RAW_DATA_MARKER)?;
            let payload = line[idx + RAW_DATA_MARKER.len()..].trim();
            (!payload.is_empty()).then_some(payload)
        })
        .collect();
    if !loose.is_empty() {
        tracing::debug!("Found {} embedded {} payload(s)", loose.len(), RAW_DATA_MARKER);
    }
    loose
}

fn parse_timings(raw_lines: &[&str]) -> Vec<i32> {
    let joined = raw_lines.join(" ");
    let mut dropped = 0usize;
    let timings: Vec<i32> = joined
        .split_whitespace()
        .filter_map(|token| {
            let value = parse_token(token);
            if value.is_none() {
                tracing::trace!("Dropping malformed token {:?}", token);
                dropped += 1;
            }
            value
        })
        .collect();
    if dropped > 0 {
        tracing::debug!("Dropped {} malformed token(s), kept {}", dropped, timings.len());
    }
    timings
}

/// Parse a single timing token, retrying once without trailing `,`/`;`
pub fn parse_token(token: &str) -> Option<i32> {
    token
        .parse::<i32>()
        .ok()
        .or_else(|| token.trim_end_matches([',', ';']).parse::<i32>().ok())
}
