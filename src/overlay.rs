use crate::constants::{DIALOG_CLOSE_ID, DIALOG_ID, READOUT_ID};
use crate::core::CameraReadout;
use web_sys as web;

const DIALOG_TITLE: &str = "The Fortress Keeper";
const DIALOG_PARAGRAPHS: [&str; 3] = [
    "Welcome, traveller. These walls have stood against the desert wind for longer than anyone remembers.",
    "The others keep to their posts and will not speak with you. I alone was asked to greet visitors.",
    "Walk the ramparts as you like. Drag to look around, scroll to come closer, and press Escape when you are done here.",
];

#[inline]
pub fn show(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(DIALOG_ID) {
        _ = el.class_list().remove_1("hidden");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(DIALOG_ID) {
        _ = el.class_list().add_1("hidden");
    }
}

#[inline]
pub fn is_hidden(document: &web::Document) -> bool {
    document
        .get_element_by_id(DIALOG_ID)
        .map(|el| el.class_list().contains("hidden"))
        .unwrap_or(true)
}

/// Bring the dialog element in line with `open`, touching the DOM only when
/// it disagrees.
pub fn set_dialog_visible(document: &web::Document, open: bool) {
    if open == !is_hidden(document) {
        return;
    }
    if open {
        show(document);
    } else {
        hide(document);
    }
}

/// Fill the dialog container with its narrative and close button. Starts hidden.
pub fn mount_dialog(document: &web::Document) {
    let Some(el) = document.get_element_by_id(DIALOG_ID) else {
        log::warn!("[dialog] no #{} in page", DIALOG_ID);
        return;
    };
    let body: String = DIALOG_PARAGRAPHS
        .iter()
        .map(|p| format!("<p>{}</p>", p))
        .collect();
    el.set_inner_html(&format!(
        "<div class='dialog-panel' role='dialog' aria-modal='true'>\
         <h2>{}</h2>{}\
         <button id='{}' type='button'>Close</button></div>",
        DIALOG_TITLE, body, DIALOG_CLOSE_ID
    ));
    hide(document);
}

/// Write the rounded camera position into the readout panel.
pub fn update_readout(document: &web::Document, readout: &CameraReadout) {
    if let Some(el) = document.get_element_by_id(READOUT_ID) {
        el.set_text_content(Some(&readout.to_string()));
    }
}
