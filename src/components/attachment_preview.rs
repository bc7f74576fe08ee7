//! Attachment preview panel for the ticket forms.
//!
//! Every `change` on the file input throws the previous cards away and
//! rebuilds them from the new selection (native file inputs replace, they
//! never append).  Only the first [`MAX_PREVIEW_FILES`] files get a card;
//! images load their thumbnail asynchronously into their own `<img>`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, File, FileReader, HtmlImageElement, HtmlInputElement};

use crate::constants::MAX_PREVIEW_FILES;
use crate::dom_utils;
use crate::utils::{FileKind, SizeFormat};

/// One selected file as the panel sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentDraft {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

impl AttachmentDraft {
    pub fn from_file(file: &File) -> Self {
        Self { name: file.name(), size: file.size() as u64, mime_type: file.type_() }
    }

    pub fn kind(&self) -> FileKind {
        FileKind::classify(&self.mime_type, &self.name)
    }
}

/// Number of cards rendered for `selected` files.
pub fn preview_count(selected: usize) -> usize {
    selected.min(MAX_PREVIEW_FILES)
}

/// Warning shown when more files were picked than will be uploaded.
pub fn overflow_warning(selected: usize) -> Option<String> {
    (selected > MAX_PREVIEW_FILES).then(|| {
        format!(
            "تم اختيار {} ملفات، ولكن سيتم رفع أول {} ملفات فقط.",
            selected, MAX_PREVIEW_FILES
        )
    })
}

/// Bound preview panel.
#[derive(Clone)]
pub struct AttachmentPreview {
    input: HtmlInputElement,
    container: Element,
    grid: Element,
    size_format: SizeFormat,
}

impl AttachmentPreview {
    /// Bind `#attachments`, `.preview-container` and `#attachments-preview`.
    /// `Ok(None)` when the page has no attachment field.
    pub fn mount(document: &Document, size_format: SizeFormat) -> Result<Option<Self>, JsValue> {
        let input = dom_utils::input_by_id(document, "attachments");
        let container = document.query_selector(".preview-container")?;
        let grid = document.get_element_by_id("attachments-preview");
        let (Some(input), Some(container), Some(grid)) = (input, container, grid) else {
            return Ok(None);
        };
        Self::attach(input, container, grid, size_format).map(Some)
    }

    pub fn attach(
        input: HtmlInputElement,
        container: Element,
        grid: Element,
        size_format: SizeFormat,
    ) -> Result<Self, JsValue> {
        let this = Self { input, container, grid, size_format };
        let handle = this.clone();
        dom_utils::on(&this.input, "change", move |_| {
            if let Err(e) = handle.refresh() {
                web_sys::console::warn_1(&e);
            }
        })?;
        Ok(this)
    }

    /// Rebuild the panel from the input's current selection.
    pub fn refresh(&self) -> Result<(), JsValue> {
        self.grid.set_inner_html("");

        let files: Vec<File> = match self.input.files() {
            Some(list) => (0..list.length()).filter_map(|i| list.get(i)).collect(),
            None => Vec::new(),
        };

        if files.is_empty() {
            dom_utils::hide(&self.container);
            return Ok(());
        }
        dom_utils::show(&self.container);

        let document = self
            .grid
            .owner_document()
            .ok_or_else(|| JsValue::from_str("preview grid is detached"))?;

        for file in files.iter().take(preview_count(files.len())) {
            let card = self.build_card(&document, file)?;
            self.grid.append_child(&card)?;
        }

        if let Some(text) = overflow_warning(files.len()) {
            let alert = document.create_element("div")?;
            alert.set_class_name("alert alert-warning mt-2 attachments-overflow");
            alert.set_text_content(Some(&text));
            self.grid.append_child(&alert)?;
        }
        Ok(())
    }

    fn build_card(&self, document: &Document, file: &File) -> Result<Element, JsValue> {
        let draft = AttachmentDraft::from_file(file);

        let col = document.create_element("div")?;
        col.set_class_name("col-md-4 mb-3 attachment-card");
        let card = document.create_element("div")?;
        card.set_class_name("card h-100");
        let body = document.create_element("div")?;
        body.set_class_name("card-body text-center");

        match draft.kind().icon_class() {
            None => {
                let img: HtmlImageElement = document.create_element("img")?.dyn_into()?;
                img.set_class_name("img-thumbnail mb-2");
                img.style().set_property("max-height", "100px")?;
                img.style().set_property("max-width", "100%")?;
                img.set_alt(&draft.name);
                load_thumbnail(file, img.clone())?;
                body.append_child(&img)?;
            }
            Some(class) => {
                let icon = document.create_element("i")?;
                icon.set_class_name(class);
                body.append_child(&icon)?;
            }
        }

        let name = document.create_element("p")?;
        name.set_class_name("mb-0 text-truncate");
        name.set_attribute("title", &draft.name)?;
        name.set_text_content(Some(&draft.name));
        body.append_child(&name)?;

        let size = document.create_element("small")?;
        size.set_class_name("text-muted");
        size.set_text_content(Some(&self.size_format.format(draft.size)));
        body.append_child(&size)?;

        card.append_child(&body)?;
        col.append_child(&card)?;
        Ok(col)
    }
}

/// Read `file` as a data URL and point `img` at it once done.  The handler
/// owns its own `<img>`, so reads completing out of order cannot cross.
fn load_thumbnail(file: &File, img: HtmlImageElement) -> Result<(), JsValue> {
    let reader = FileReader::new()?;
    let reader_ref = reader.clone();
    let onload = Closure::once_into_js(move |_event: web_sys::ProgressEvent| {
        if let Ok(result) = reader_ref.result() {
            if let Some(url) = result.as_string() {
                img.set_src(&url);
            }
        }
    });
    reader.set_onload(Some(onload.unchecked_ref()));
    reader.read_as_data_url(file)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn warning_only_above_limit() {
        assert!(overflow_warning(0).is_none());
        assert!(overflow_warning(5).is_none());
        let w = overflow_warning(7).unwrap();
        assert!(w.contains('7'));
        assert!(w.contains('5'));
    }

    #[wasm_bindgen_test]
    fn card_count_is_capped() {
        let mut runner = proptest::test_runner::TestRunner::default();
        runner
            .run(&(0usize..50), |m| {
                prop_assert_eq!(preview_count(m), m.min(5));
                prop_assert_eq!(overflow_warning(m).is_some(), m > 5);
                Ok(())
            })
            .expect("preview plan property failed");
    }

    #[wasm_bindgen_test]
    fn draft_classifies_by_mime_and_name() {
        let draft = AttachmentDraft { name: "x.docx".into(), size: 10, mime_type: String::new() };
        assert_eq!(draft.kind(), FileKind::Word);
    }
}
