//! Annex merging: every page of an externally supplied PDF gets a red frame
//! overlay stamped on top, then the pages are appended after the generated
//! document.
//!
//! The overlay page is wrapped as a Form XObject and invoked from each annex
//! page's content, so annex content stays untouched beneath the frame.

use lopdf::{
    Document as LoDocument, Object as LoObject, ObjectId as LoObjectId, Stream as LoStream,
    dictionary,
};

use crate::error::{Error, Result};
use crate::fonts::FontStyle;
use crate::pdf::canvas::{Align, Border, Canvas, mm};
use crate::sanitize::sanitize;

/// Caption shown above the frame when the caller does not provide one.
pub const DEFAULT_CAPTION: &str = "Documents pour la seance";

const FRAME_NAME: &str = "AnnexFrame";

/// One-page overlay: centered red bold caption near the top edge and a 1 mm
/// red frame inset 5 mm from every edge.
fn overlay_page(caption: &str) -> Result<Vec<u8>> {
    let mut c = Canvas::a4(mm(10.0));
    c.set_font(FontStyle::Bold, 14.0);
    c.set_text_color(200, 0, 0);
    c.set_y(mm(5.0));
    c.cell_ln(
        0.0,
        mm(10.0),
        &sanitize(caption),
        Border::None,
        Align::Center,
        false,
    );
    c.set_draw_color(200, 0, 0);
    c.set_line_width(mm(1.0));
    c.place_box(mm(5.0), mm(5.0), mm(200.0), mm(287.0));
    c.finish()
}

/// Renumber `src` above `dst`'s id space and move its objects over. Returns
/// the imported page ids in document order.
fn import_objects(dst: &mut LoDocument, mut src: LoDocument) -> Vec<LoObjectId> {
    let start_id = dst.max_id + 1;
    src.renumber_objects_with(start_id);
    let page_ids: Vec<LoObjectId> = src.get_pages().values().copied().collect();
    if src.max_id > dst.max_id {
        dst.max_id = src.max_id;
    }
    dst.objects.extend(src.objects);
    page_ids
}

fn page_box(page: &lopdf::Dictionary) -> Vec<LoObject> {
    if let Ok(arr) = page.get(b"CropBox").and_then(LoObject::as_array) {
        return arr.clone();
    }
    if let Ok(arr) = page.get(b"MediaBox").and_then(LoObject::as_array) {
        return arr.clone();
    }
    // A4 fallback for pages that inherited their box from the old page tree.
    vec![0.into(), 0.into(), 595.into(), 842.into()]
}

fn page_resources_object(doc: &LoDocument, page: &lopdf::Dictionary) -> LoObject {
    match page.get(b"Resources") {
        Ok(LoObject::Reference(id)) => doc
            .get_object(*id)
            .cloned()
            .unwrap_or_else(|_| LoObject::Dictionary(lopdf::Dictionary::new())),
        Ok(LoObject::Dictionary(d)) => LoObject::Dictionary(d.clone()),
        _ => LoObject::Dictionary(lopdf::Dictionary::new()),
    }
}

/// Look up a page attribute that may be inherited from an ancestor Pages
/// node, walking the Parent chain. Returns the first value found.
fn inherited_attribute(doc: &LoDocument, page: &lopdf::Dictionary, key: &[u8]) -> Option<LoObject> {
    if let Ok(obj) = page.get(key) {
        return Some(obj.clone());
    }
    let mut parent = page.get(b"Parent").and_then(LoObject::as_reference).ok();
    while let Some(id) = parent {
        let dict = doc.get_object(id).and_then(LoObject::as_dict).ok()?;
        if let Ok(obj) = dict.get(key) {
            return Some(obj.clone());
        }
        parent = dict.get(b"Parent").and_then(LoObject::as_reference).ok();
    }
    None
}

/// The page's effective resource dictionary, materialized: direct entry,
/// inherited entry, or reference, resolved to an owned dictionary.
fn resolved_resources(doc: &LoDocument, page: &lopdf::Dictionary) -> lopdf::Dictionary {
    match inherited_attribute(doc, page, b"Resources") {
        Some(LoObject::Dictionary(d)) => d,
        Some(LoObject::Reference(id)) => doc
            .get_object(id)
            .ok()
            .and_then(|o| o.as_dict().ok())
            .cloned()
            .unwrap_or_default(),
        _ => lopdf::Dictionary::new(),
    }
}

fn page_xobject_dict(resources: &lopdf::Dictionary, doc: &LoDocument) -> lopdf::Dictionary {
    match resources.get(b"XObject") {
        Ok(LoObject::Dictionary(d)) => d.clone(),
        Ok(LoObject::Reference(id)) => doc
            .get_object(*id)
            .ok()
            .and_then(|o| o.as_dict().ok())
            .cloned()
            .unwrap_or_default(),
        _ => lopdf::Dictionary::new(),
    }
}

/// Append `annex`'s pages after `primary`, each stamped with the caption
/// frame. `primary` must be well-formed (it is our own output); a broken
/// `annex` yields [`Error::AnnexParse`] so the caller can fall back to the
/// unmerged document.
pub fn merge(primary: &[u8], annex: &[u8], caption: &str) -> Result<Vec<u8>> {
    let mut doc = LoDocument::load_mem(primary)?;
    let annex_doc = LoDocument::load_mem(annex).map_err(Error::AnnexParse)?;
    let overlay_doc = LoDocument::load_mem(&overlay_page(caption)?)?;

    // Wrap the overlay page as a Form XObject shared by every annex page.
    let overlay_ids = import_objects(&mut doc, overlay_doc);
    let overlay_id = *overlay_ids.first().expect("overlay has one page");
    let overlay_dict = doc
        .get_object(overlay_id)
        .and_then(LoObject::as_dict)?
        .clone();
    let overlay_content = doc.get_page_content(overlay_id)?;
    let bbox = page_box(&overlay_dict);
    let overlay_resources = page_resources_object(&doc, &overlay_dict);
    let form_id = doc.add_object(LoStream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "FormType" => 1,
            "BBox" => LoObject::Array(bbox),
            "Resources" => overlay_resources,
        },
        overlay_content,
    ));

    let pages_root_id = doc
        .catalog()?
        .get(b"Pages")
        .and_then(LoObject::as_reference)?;

    let annex_page_ids = import_objects(&mut doc, annex_doc);
    for page_id in &annex_page_ids {
        let page_dict = doc.get_object(*page_id).and_then(LoObject::as_dict)?.clone();
        // Materialize attributes the page inherits from its old Pages nodes
        // before re-parenting cuts it off from them.
        let mut resources = resolved_resources(&doc, &page_dict);
        let mut xobjects = page_xobject_dict(&resources, &doc);
        xobjects.set(FRAME_NAME, LoObject::Reference(form_id));
        resources.set("XObject", LoObject::Dictionary(xobjects));
        let media_box = inherited_attribute(&doc, &page_dict, b"MediaBox");
        let crop_box = inherited_attribute(&doc, &page_dict, b"CropBox");
        let rotate = inherited_attribute(&doc, &page_dict, b"Rotate");
        {
            let page_mut = doc
                .get_object_mut(*page_id)
                .and_then(LoObject::as_dict_mut)?;
            page_mut.set("Resources", LoObject::Dictionary(resources));
            page_mut.set("Parent", LoObject::Reference(pages_root_id));
            match media_box {
                Some(obj) => page_mut.set("MediaBox", obj),
                None => page_mut.set(
                    "MediaBox",
                    LoObject::Array(vec![0.into(), 0.into(), 595.into(), 842.into()]),
                ),
            }
            if let Some(obj) = crop_box {
                page_mut.set("CropBox", obj);
            }
            if let Some(obj) = rotate {
                page_mut.set("Rotate", obj);
            }
        }
        doc.add_page_contents(*page_id, format!("q /{FRAME_NAME} Do Q\n").into_bytes())?;
    }

    {
        let pages_root = doc
            .get_object_mut(pages_root_id)
            .and_then(LoObject::as_dict_mut)?;
        let prev_count = pages_root.get(b"Count").and_then(LoObject::as_i64)?;
        let kids = pages_root.get_mut(b"Kids").and_then(LoObject::as_array_mut)?;
        kids.extend(annex_page_ids.iter().map(|id| LoObject::Reference(*id)));
        pages_root.set("Count", prev_count + annex_page_ids.len() as i64);
    }

    doc.prune_objects();
    doc.renumber_objects();
    doc.compress();
    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_is_a_single_red_framed_page() {
        let bytes = overlay_page(DEFAULT_CAPTION).unwrap();
        let mut doc = LoDocument::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        doc.decompress();
        let page_id = *doc.get_pages().values().next().unwrap();
        let content = doc.get_page_content(page_id).unwrap();
        let text = String::from_utf8_lossy(&content);
        // Red caption and a stroked rectangle with a non-default color.
        assert!(text.contains("Documents pour la seance"));
        assert!(text.contains(" RG"));
        assert!(text.contains(" re"));
    }

    #[test]
    fn garbage_annex_is_annex_parse() {
        let primary = overlay_page("x").unwrap();
        let err = merge(&primary, b"not a pdf at all", DEFAULT_CAPTION).unwrap_err();
        assert!(matches!(err, Error::AnnexParse(_)));
    }
}
