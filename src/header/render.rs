// C/C++ header generation for captured timings
//
// Output is a pure function of (symbol, capture, config): identical inputs
// produce byte-identical text.

use super::config::RenderConfig;
use super::symbol::SymbolName;
use crate::capture::ParsedCapture;

/// First line of every generated comment block
pub const PROVENANCE_COMMENT: &str = "// Generated from Flipper Zero SubGhz RAW capture";

/// Indentation of array rows
pub const ROW_INDENT: &str = "    ";

/// Preprocessor block pulling in `PROGMEM` support on AVR targets only
pub const MEMORY_PLACEMENT_INCLUDE: &str =
    "#if defined(__AVR__)\n#include <avr/pgmspace.h>\n#endif\n";

/// Storage attribute added to the declaration in memory-placement mode
pub const MEMORY_PLACEMENT_ATTRIBUTE: &str = "PROGMEM";

/// Render a complete header for `capture`
pub fn render(symbol: &SymbolName, capture: &ParsedCapture, config: &RenderConfig) -> String {
    let timings = apply_polarity(&capture.timings, config.invert);
    let guard = symbol.guard();

    let mut out = format!("#ifndef {}\n#define {}\n\n", guard, guard);
    out.push_str("#include <stdint.h>\n");
    if config.use_memory_placement {
        out.push_str(MEMORY_PLACEMENT_INCLUDE);
    }
    out.push_str(&metadata_comment(capture, timings.len()));
    out.push_str("\n\n");
    out.push_str(&array_declaration(symbol, &timings, config));
    out.push_str("\n\n");
    out.push_str(&format!(
        "static constexpr size_t {count} = sizeof({name}) / sizeof({name}[0]);\n\n",
        count = symbol.count_constant(),
        name = symbol
    ));
    out.push_str(&format!("#endif // {}\n", guard));
    out
}

/// Render a header only when the capture has timing values.
///
/// An empty capture would produce a zero-length array, which C rejects.
pub fn render_nonempty(
    symbol: &SymbolName,
    capture: &ParsedCapture,
    config: &RenderConfig,
) -> Option<String> {
    (!capture.is_empty()).then(|| render(symbol, capture, config))
}

/// Negate every value when `invert` is set; `i32::MIN` saturates
pub fn apply_polarity(timings: &[i32], invert: bool) -> Vec<i32> {
    if invert {
        timings.iter().map(|t| t.saturating_neg()).collect()
    } else {
        timings.to_vec()
    }
}

/// Comment block describing where the data came from
pub fn metadata_comment(capture: &ParsedCapture, count: usize) -> String {
    let mut lines = vec![PROVENANCE_COMMENT.to_string()];
    if let (Some(hz), Some(mhz)) = (capture.frequency_hz, capture.frequency_mhz()) {
        if hz != 0 {
            lines.push(format!("// Frequency: {} Hz (~{:.3} MHz)", hz, mhz));
        }
    }
    if let Some(protocol) = capture.protocol.as_deref().filter(|p| !p.is_empty()) {
        lines.push(format!("// Protocol: {}", protocol));
    }
    lines.push(format!("// Total timing values: {}", count));
    lines.join("\n")
}

fn array_declaration(symbol: &SymbolName, timings: &[i32], config: &RenderConfig) -> String {
    let body = format_int_list(timings, config.chunk_width.get());
    if config.use_memory_placement {
        format!(
            "static const int32_t {}[] {} = {{\n{}\n}};",
            symbol, MEMORY_PLACEMENT_ATTRIBUTE, body
        )
    } else {
        format!("static const int32_t {}[] = {{\n{}\n}};", symbol, body)
    }
}

/// Lay values out `per_line` to a row; every row but the last ends with a comma
pub fn format_int_list(values: &[i32], per_line: usize) -> String {
    let per_line = per_line.max(1);
    let rows = values.chunks(per_line).count();
    values
        .chunks(per_line)
        .enumerate()
        .map(|(i, chunk)| {
            let row = chunk
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let trail = if i + 1 < rows { "," } else { "" };
            format!("{}{}{}", ROW_INDENT, row, trail)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
