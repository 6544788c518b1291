//! JSON rendering for outlines.

use std::io::Write;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};
use crate::model::Outline;

const PRETTY_INDENT: &[u8] = b"    ";

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with four-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline to a JSON string.
///
/// Non-ASCII text is written as-is rather than escaped.
pub fn to_json(outline: &Outline, format: JsonFormat) -> Result<String> {
    let mut buf = Vec::new();
    to_json_writer(outline, format, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::Render(format!("JSON is not UTF-8: {}", e)))
}

/// Write an outline as JSON.
pub fn to_json_writer<W: Write>(outline: &Outline, format: JsonFormat, writer: W) -> Result<()> {
    let result = match format {
        JsonFormat::Pretty => {
            let formatter = PrettyFormatter::with_indent(PRETTY_INDENT);
            let mut ser = Serializer::with_formatter(writer, formatter);
            outline.serialize(&mut ser)
        }
        JsonFormat::Compact => serde_json::to_writer(writer, outline),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, OutlineEntry};

    fn sample() -> Outline {
        Outline::new(
            "Rapport annuel",
            vec![OutlineEntry::new(HeadingLevel::H1, "Résumé", 1)],
        )
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.starts_with("{\n    \"title\": \"Rapport annuel\""));
        assert!(json.contains("\n            \"level\": \"H1\""));
        assert!(json.contains("Résumé"));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Rapport annuel","outline":[{"level":"H1","text":"Résumé","page":1}]}"#
        );
    }

    #[test]
    fn test_empty_outline() {
        let json = to_json(&Outline::default(), JsonFormat::Compact).unwrap();
        assert_eq!(json, r#"{"title":"","outline":[]}"#);
    }
}
