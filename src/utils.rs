//! Utility helpers shared across the WASM frontend.

use unicode_segmentation::UnicodeSegmentation;

/// Which human-readable size formatter a page uses.  Two create-ticket
/// templates ship with different ones, so this stays configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeFormat {
    /// `0 Bytes`, `1.46 KB`, `2.5 MB` – binary units, up to two decimals
    /// with trailing zeros dropped.
    #[default]
    Binary,
    /// `0 بايت`, `1 كيلوبايت`, `2.5 ميجابايت` – whole kilobytes, one decimal
    /// for megabytes.
    Arabic,
}

impl SizeFormat {
    /// Parse the `data-size-locale` attribute value.
    pub fn from_locale(locale: &str) -> Self {
        if locale.trim().eq_ignore_ascii_case("ar") {
            SizeFormat::Arabic
        } else {
            SizeFormat::Binary
        }
    }

    pub fn format(self, bytes: u64) -> String {
        match self {
            SizeFormat::Binary => format_size_binary(bytes),
            SizeFormat::Arabic => format_size_arabic(bytes),
        }
    }
}

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

fn format_size_binary(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    let mut scaled = bytes as f64;
    let mut exp = 0;
    while scaled >= KIB && exp < UNITS.len() - 1 {
        scaled /= KIB;
        exp += 1;
    }

    format!("{} {}", trim_decimals(&format!("{:.2}", scaled)), UNITS[exp])
}

fn format_size_arabic(bytes: u64) -> String {
    let b = bytes as f64;
    if b < KIB {
        format!("{} بايت", bytes)
    } else if b < MIB {
        format!("{} كيلوبايت", (b / KIB).round() as u64)
    } else {
        format!("{:.1} ميجابايت", b / MIB)
    }
}

/// `"1.50"` → `"1.5"`, `"2.00"` → `"2"`.
fn trim_decimals(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Cut `text` to `max` user-perceived characters, appending `...` when
/// anything was dropped.  Works on grapheme clusters so Arabic diacritics
/// are never split from their base letter.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    let mut graphemes = text.grapheme_indices(true);
    match graphemes.nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Icon family for a non-image attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
    Word,
    Excel,
    Archive,
    Text,
    Generic,
}

impl FileKind {
    pub fn classify(mime: &str, file_name: &str) -> Self {
        let mime = mime.to_ascii_lowercase();
        let name = file_name.to_ascii_lowercase();
        let ext_is = |exts: &[&str]| exts.iter().any(|e| name.ends_with(e));

        if mime.starts_with("image/") {
            FileKind::Image
        } else if mime.contains("pdf") {
            FileKind::Pdf
        } else if mime.contains("word") || ext_is(&[".doc", ".docx"]) {
            FileKind::Word
        } else if mime.contains("excel") || mime.contains("spreadsheet") || ext_is(&[".xls", ".xlsx"]) {
            FileKind::Excel
        } else if mime.contains("zip") || mime.contains("compressed") || ext_is(&[".zip", ".rar", ".7z"]) {
            FileKind::Archive
        } else if mime.contains("text") {
            FileKind::Text
        } else {
            FileKind::Generic
        }
    }

    /// Font Awesome classes for the preview card.  Images get a thumbnail
    /// instead, so they have none.
    pub fn icon_class(self) -> Option<&'static str> {
        let class = match self {
            FileKind::Image => return None,
            FileKind::Pdf => "fas fa-file-pdf fa-3x text-danger mb-2",
            FileKind::Word => "fas fa-file-word fa-3x text-primary mb-2",
            FileKind::Excel => "fas fa-file-excel fa-3x text-success mb-2",
            FileKind::Archive => "fas fa-file-archive fa-3x text-warning mb-2",
            FileKind::Text => "fas fa-file-alt fa-3x text-info mb-2",
            FileKind::Generic => "fas fa-file fa-3x text-secondary mb-2",
        };
        Some(class)
    }
}

// wasm-bindgen tests ----------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn binary_size_format() {
        assert_eq!(SizeFormat::Binary.format(0), "0 Bytes");
        assert_eq!(SizeFormat::Binary.format(500), "500 Bytes");
        assert_eq!(SizeFormat::Binary.format(1500), "1.46 KB");
        assert_eq!(SizeFormat::Binary.format(1024), "1 KB");
        assert_eq!(SizeFormat::Binary.format(1536), "1.5 KB");
        assert_eq!(SizeFormat::Binary.format(5 * 1024 * 1024), "5 MB");
    }

    #[wasm_bindgen_test]
    fn arabic_size_format() {
        assert_eq!(SizeFormat::Arabic.format(0), "0 بايت");
        assert_eq!(SizeFormat::Arabic.format(1023), "1023 بايت");
        assert_eq!(SizeFormat::Arabic.format(1500), "1 كيلوبايت");
        assert_eq!(SizeFormat::Arabic.format(1800), "2 كيلوبايت");
        assert_eq!(SizeFormat::Arabic.format(2_621_440), "2.5 ميجابايت");
    }

    #[wasm_bindgen_test]
    fn size_locale_attribute() {
        assert_eq!(SizeFormat::from_locale("ar"), SizeFormat::Arabic);
        assert_eq!(SizeFormat::from_locale("en"), SizeFormat::Binary);
        assert_eq!(SizeFormat::from_locale(""), SizeFormat::Binary);
    }

    #[wasm_bindgen_test]
    fn truncation_only_when_longer() {
        assert_eq!(truncate_with_ellipsis("short", 100), "short");
        let long = "ا".repeat(150);
        let cut = truncate_with_ellipsis(&long, 100);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 103);
        let exact = "x".repeat(100);
        assert_eq!(truncate_with_ellipsis(&exact, 100), exact);
    }

    #[wasm_bindgen_test]
    fn file_kind_table() {
        assert_eq!(FileKind::classify("image/png", "a.png"), FileKind::Image);
        assert_eq!(FileKind::classify("application/pdf", "a.pdf"), FileKind::Pdf);
        assert_eq!(FileKind::classify("", "report.DOCX"), FileKind::Word);
        assert_eq!(FileKind::classify("application/vnd.ms-excel", "x"), FileKind::Excel);
        assert_eq!(FileKind::classify("", "sheet.xlsx"), FileKind::Excel);
        assert_eq!(FileKind::classify("application/x-zip-compressed", "a.zip"), FileKind::Archive);
        assert_eq!(FileKind::classify("text/plain", "notes.txt"), FileKind::Text);
        assert_eq!(FileKind::classify("application/octet-stream", "blob.bin"), FileKind::Generic);
    }

    #[wasm_bindgen_test]
    fn only_non_images_have_an_icon() {
        assert_eq!(FileKind::Image.icon_class(), None);
        assert_eq!(FileKind::Pdf.icon_class(), Some("fas fa-file-pdf fa-3x text-danger mb-2"));
        assert!(FileKind::Generic.icon_class().is_some());
    }

    #[wasm_bindgen_test]
    fn truncation_never_exceeds_limit() {
        let mut runner = proptest::test_runner::TestRunner::default();
        runner
            .run(&("\\PC{0,200}", 1usize..150), |(text, max)| {
                let out = truncate_with_ellipsis(&text, max);
                let body = out.strip_suffix("...").unwrap_or(&out);
                prop_assert!(body.graphemes(true).count() <= max);
                prop_assert!(text.starts_with(body));
                Ok(())
            })
            .expect("truncation property failed");
    }
}
