//! Attachment preview panel fed through a real `FileList`.

use fixltpro_frontend::components::attachment_preview::AttachmentPreview;
use fixltpro_frontend::dom_utils;
use fixltpro_frontend::utils::SizeFormat;
use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{DataTransfer, Document, Element, File, FilePropertyBag, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

struct Fixture {
    input: HtmlInputElement,
    container: Element,
    grid: Element,
}

fn fixture(document: &Document) -> Fixture {
    let body = document.body().unwrap();
    let input: HtmlInputElement = document.create_element("input").unwrap().dyn_into().unwrap();
    input.set_type("file");
    input.set_multiple(true);
    let container = document.create_element("div").unwrap();
    container.set_class_name("preview-container d-none");
    let grid = document.create_element("div").unwrap();
    container.append_child(&grid).unwrap();
    body.append_child(&input).unwrap();
    body.append_child(&container).unwrap();
    Fixture { input, container, grid }
}

fn file(name: &str, mime: &str, bytes: usize) -> File {
    let parts = Array::of1(&JsValue::from_str(&"x".repeat(bytes)));
    let opts = FilePropertyBag::new();
    opts.set_type(mime);
    File::new_with_str_sequence_and_options(&parts, name, &opts).unwrap()
}

fn select_files(input: &HtmlInputElement, files: &[File]) {
    let transfer = DataTransfer::new().unwrap();
    for f in files {
        transfer.items().add_with_file(f).unwrap();
    }
    input.set_files(transfer.files().as_ref());
}

fn cards(grid: &Element) -> u32 {
    grid.query_selector_all(".attachment-card").unwrap().length()
}

#[wasm_bindgen_test]
fn seven_files_show_five_cards_and_a_warning() {
    let document = dom_utils::document().unwrap();
    let fx = fixture(&document);
    let preview =
        AttachmentPreview::attach(fx.input.clone(), fx.container.clone(), fx.grid.clone(), SizeFormat::Binary).unwrap();

    let files: Vec<File> = (0..7).map(|i| file(&format!("f{}.pdf", i), "application/pdf", 10)).collect();
    select_files(&fx.input, &files);
    preview.refresh().unwrap();

    assert_eq!(cards(&fx.grid), 5);
    assert!(fx.grid.query_selector(".alert-warning").unwrap().is_some());
    assert!(!fx.container.class_list().contains("d-none"));
}

#[wasm_bindgen_test]
fn reselecting_replaces_cards_and_empty_hides_panel() {
    let document = dom_utils::document().unwrap();
    let fx = fixture(&document);
    let preview =
        AttachmentPreview::attach(fx.input.clone(), fx.container.clone(), fx.grid.clone(), SizeFormat::Binary).unwrap();

    select_files(&fx.input, &[file("a.txt", "text/plain", 1500), file("b.zip", "application/zip", 3)]);
    preview.refresh().unwrap();
    assert_eq!(cards(&fx.grid), 2);
    assert!(fx.grid.query_selector(".alert-warning").unwrap().is_none());
    assert!(fx.grid.text_content().unwrap().contains("1.46 KB"));

    select_files(&fx.input, &[]);
    preview.refresh().unwrap();
    assert_eq!(cards(&fx.grid), 0);
    assert!(fx.container.class_list().contains("d-none"));
}

#[wasm_bindgen_test]
fn card_keeps_full_name_as_title() {
    let document = dom_utils::document().unwrap();
    let fx = fixture(&document);
    let preview =
        AttachmentPreview::attach(fx.input.clone(), fx.container.clone(), fx.grid.clone(), SizeFormat::Arabic).unwrap();

    let long = "تقرير-الصيانة-الشهري-للمبنى-الرئيسي.docx";
    select_files(&fx.input, &[file(long, "", 2048)]);
    preview.refresh().unwrap();

    let label = fx.grid.query_selector("p.text-truncate").unwrap().unwrap();
    assert_eq!(label.get_attribute("title").as_deref(), Some(long));
    assert!(fx.grid.query_selector("i.fa-file-word").unwrap().is_some());
    assert!(fx.grid.text_content().unwrap().contains("2 كيلوبايت"));
}
