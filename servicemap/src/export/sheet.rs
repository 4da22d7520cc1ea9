use crate::record::Feature;
use crate::schema::fields::{ADDRESS_FIELD, ADDRESS_SUITE_FIELD, AGENCY_NAME_FIELD};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const SHEET_TITLE: &str = "Service centre details";

const LANGUAGES_FIELD: &str = "Languages";
const WEBSITE_FIELD: &str = "Website";
const ELLIPSIS: &str = "...";

/// One service centre on the sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetEntry {
    pub agency_name: String,
    pub address: String,
    pub address_with_suite: String,
    pub languages: String,
    pub website: String,
}

impl SheetEntry {
    pub fn from_feature(feature: &Feature) -> Self {
        Self {
            agency_name: feature.text(AGENCY_NAME_FIELD),
            address: feature.text(ADDRESS_FIELD),
            address_with_suite: feature.text(ADDRESS_SUITE_FIELD),
            languages: feature.text(LANGUAGES_FIELD),
            website: feature.text(WEBSITE_FIELD),
        }
    }

    /// Label/value lines in display order; the flag marks the link line.
    pub fn lines(&self) -> [(&'static str, &str, bool); 5] {
        [
            ("Agency Name", &self.agency_name, false),
            ("Address", &self.address, false),
            ("Address w/ suite #", &self.address_with_suite, false),
            ("Languages", &self.languages, false),
            ("Website", &self.website, true),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportSheet {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<SheetEntry>,
}

impl ExportSheet {
    pub fn from_features(features: &[Feature]) -> Self {
        Self {
            title: SHEET_TITLE.to_string(),
            generated_at: Utc::now(),
            entries: features.iter().map(SheetEntry::from_feature).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lays a sheet out into a document (PDF, text, ...)
pub trait SheetRenderer {
    fn render(&self, sheet: &ExportSheet) -> Result<Vec<u8>>;
}

/// Fixed-width text layout. Values that do not fit next to their label are
/// truncated with `...`; link lines keep the full URL on the next line.
pub struct PlainTextRenderer {
    pub width: usize,
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self { width: 80 }
    }
}

impl PlainTextRenderer {
    pub fn render_string(&self, sheet: &ExportSheet) -> String {
        let mut out = String::new();
        let title_pad = self.width.saturating_sub(sheet.title.chars().count()) / 2;
        out.push_str(&" ".repeat(title_pad));
        out.push_str(&sheet.title);
        out.push('\n');
        out.push_str(&" ".repeat(title_pad));
        out.push_str(&"=".repeat(sheet.title.chars().count()));
        out.push_str("\n\n");

        for (idx, entry) in sheet.entries.iter().enumerate() {
            if idx > 0 {
                out.push_str(&"-".repeat(self.width));
                out.push('\n');
            }
            for (label, value, is_link) in entry.lines() {
                let label = format!("{}: ", label);
                let label_width = label.chars().count().min(self.width / 2);
                let remaining = self.width.saturating_sub(label_width);
                let shown = fit_to_width(value, remaining);
                out.push_str(&label);
                out.push_str(&shown);
                out.push('\n');
                if is_link && shown != value {
                    out.push_str(&format!("  <{}>\n", value));
                }
            }
            out.push('\n');
        }
        out
    }
}

impl SheetRenderer for PlainTextRenderer {
    fn render(&self, sheet: &ExportSheet) -> Result<Vec<u8>> {
        Ok(self.render_string(sheet).into_bytes())
    }
}

/// Truncate `text` to at most `max_chars` characters, ending in `...` when
/// cut. Widths of three or less are left as-is.
pub fn fit_to_width(text: &str, max_chars: usize) -> String {
    let len = text.chars().count();
    if len <= max_chars || max_chars <= ELLIPSIS.len() {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars - ELLIPSIS.len()).collect();
    format!("{}{}", kept, ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn centre(value: serde_json::Value) -> Feature {
        serde_json::from_value(json!({ "attributes": value })).unwrap()
    }

    #[test]
    fn test_fit_to_width() {
        assert_eq!(fit_to_width("short", 10), "short");
        assert_eq!(fit_to_width("abcdefghij", 10), "abcdefghij");
        assert_eq!(fit_to_width("abcdefghijk", 10), "abcdefg...");
        assert_eq!(fit_to_width("abcdef", 3), "abcdef");
        assert_eq!(fit_to_width("", 5), "");
    }

    #[test]
    fn test_entry_nulls_become_empty() {
        let entry = SheetEntry::from_feature(&centre(json!({
            "Agency_Name": "Acme",
            "Address": null,
            "Languages": "English, Spanish",
        })));
        assert_eq!(entry.agency_name, "Acme");
        assert_eq!(entry.address, "");
        assert_eq!(entry.website, "");
        assert_eq!(entry.languages, "English, Spanish");
    }

    #[test]
    fn test_render_text_layout() {
        let sheet = ExportSheet::from_features(&[
            centre(json!({"Agency_Name": "Acme", "Website": "https://acme.example.org/services/elder-care"})),
            centre(json!({"Agency_Name": "Beacon"})),
        ]);
        let text = PlainTextRenderer { width: 40 }.render_string(&sheet);

        assert!(text.contains(SHEET_TITLE));
        assert!(text.contains("Agency Name: Acme\n"));
        assert!(text.contains("Agency Name: Beacon\n"));
        assert!(text.contains("  <https://acme.example.org/services/elder-care>\n"));
        assert_eq!(text.matches(&"-".repeat(40)).count(), 1);
    }

    #[test]
    fn test_renderer_returns_bytes() {
        let sheet = ExportSheet::from_features(&[]);
        let bytes = PlainTextRenderer::default().render(&sheet).unwrap();
        assert!(String::from_utf8(bytes).unwrap().contains(SHEET_TITLE));
        assert!(sheet.is_empty());
    }
}
