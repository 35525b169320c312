//! CSV range parser with encoding and delimiter auto-detection.
//!
//! Turns the bytes of one exported named range into a raw [`Table`] of display
//! values. No knowledge of the competition tables here.

use crate::error::{StoreError, StoreResult};
use crate::store::Table;

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParsedRange {
    /// Raw rows, header row included
    pub table: Table,
    /// Detected encoding
    pub encoding: String,
    /// Detected delimiter
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Unknown encodings and invalid UTF-8 fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => {
            let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            String::from_utf8_lossy(bytes).into_owned()
        }
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text into raw rows with an explicit delimiter.
///
/// Rows may have different lengths; cells keep their display text untrimmed
/// except for surrounding whitespace.
///
/// # Example
/// ```ignore
/// use api_files::parser::parse_table;
///
/// let table = parse_table("id,title\n1,\"Lisboa, Elite\"", ',', "TableRace").unwrap();
/// assert_eq!(table.rows[1][1], "Lisboa, Elite");
/// ```
pub fn parse_table(content: &str, delimiter: char, range: &str) -> StoreResult<Table> {
    let delimiter = u8::try_from(delimiter).map_err(|_| StoreError::Parse {
        range: range.to_string(),
        message: format!("unsupported delimiter '{}'", delimiter),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (line_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| StoreError::Parse {
            range: range.to_string(),
            message: format!("line {}: {}", line_idx + 1, e),
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::new(rows))
}

/// Parse range bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8], range: &str) -> StoreResult<ParsedRange> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    let table = parse_table(&content, delimiter, range)?;

    Ok(ParsedRange {
        table,
        encoding,
        delimiter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_range() {
        let table = parse_table("id;title\n1;Sprint\n2;Standard", ';', "TableRace").unwrap();

        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], vec!["id", "title"]);
        assert_eq!(table.rows[2], vec!["2", "Standard"]);
    }

    #[test]
    fn test_quoted_values_keep_delimiters() {
        let csv = "id,title\n1,\"Lisboa, Elite\"";
        let table = parse_table(csv, ',', "TableRace").unwrap();

        assert_eq!(table.rows[1][1], "Lisboa, Elite");
    }

    #[test]
    fn test_ragged_rows() {
        let table = parse_table("a,b,c\n1\n1,2,3,4", ',', "TableEvent").unwrap();

        assert_eq!(table.rows[1], vec!["1"]);
        assert_eq!(table.rows[2].len(), 4);
    }

    #[test]
    fn test_empty_content() {
        let table = parse_table("", ',', "TableEvent").unwrap();
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
    }

    #[test]
    fn test_detect_delimiter_comma() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
    }

    #[test]
    fn test_detect_delimiter_pipe() {
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
    }

    #[test]
    fn test_auto_parse() {
        let result = parse_bytes_auto(b"id;city\n7;Lisboa\n8;Porto", "TableEvent").unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.table.rows.len(), 3);
        assert_eq!(result.table.rows[2], vec!["8", "Porto"]);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Évora" in ISO-8859-1
        let bytes: &[u8] = &[0xC9, 0x76, 0x6F, 0x72, 0x61];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Évora");
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let decoded = decode_content(b"\xEF\xBB\xBFid,title", "utf-8");
        assert_eq!(decoded, "id,title");
    }
}
