use crate::csv::{parse_csv, DEFAULT_DELIMITER};
use crate::model::ImportResult;
use crate::ofx::parse_ofx;

const OFX_MARKERS: &[&str] = &["<OFX>", "OFXHEADER"];

/// Dispatches a raw statement file to the right dialect parser.
///
/// Owns no parsing logic: extension and content-marker checks pick the
/// dialect, a one-line sniff picks the CSV delimiter, and the file name is
/// stamped onto whatever the parser returns. Total — a result always comes
/// back, however mangled the input.
pub fn import_file(file_name: &str, content: &str) -> ImportResult {
    let lower_name = file_name.to_lowercase();

    let mut result = if lower_name.ends_with(".ofx") || has_ofx_markers(content) {
        tracing::debug!(file_name, "detected OFX statement");
        parse_ofx(content)
    } else if lower_name.ends_with(".csv") || lower_name.ends_with(".txt") {
        let delimiter = sniff_delimiter(content);
        tracing::debug!(file_name, delimiter = %(delimiter as char), "detected CSV statement");
        parse_csv(content, delimiter)
    } else {
        // Unknown extension and no OFX markers: assume CSV.
        tracing::debug!(file_name, "unrecognized extension, assuming CSV");
        parse_csv(content, DEFAULT_DELIMITER)
    };

    result.file_name = Some(file_name.to_string());
    result
}

fn has_ofx_markers(content: &str) -> bool {
    OFX_MARKERS.iter().any(|marker| content.contains(marker))
}

/// Semicolon wins when the header line carries one, comma otherwise.
fn sniff_delimiter(content: &str) -> u8 {
    match content.lines().next() {
        Some(first) if first.contains(';') => b';',
        _ => b',',
    }
}
