//! Lesson-plan composer ("fiche de préparation pédagogique").
//!
//! Page anatomy: repeated page banner, optional grey document id, title and
//! sequence/session sub-line, date/class/duration triple, optional objective
//! and description paragraphs, competency cards, the session schedule table,
//! and three side-by-side resource boxes.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::fonts::FontStyle;
use crate::model::{CompetencyBlock, SessionInfo, SessionPhase};
use crate::sanitize::sanitize;

use super::canvas::{Align, Border, Canvas, PAGE_WIDTH, mm};
use super::layout::wrap_lines;

/// Bottom margin below which a page break is forced.
const BOTTOM_MARGIN: f32 = 15.0;

fn page_banner(c: &mut Canvas) {
    c.set_font(FontStyle::Bold, 16.0);
    c.set_text_color(0, 0, 0);
    c.cell_ln(
        0.0,
        mm(10.0),
        "Fiche de Preparation Pedagogique",
        Border::None,
        Align::Center,
        false,
    );
    c.advance(mm(5.0));
}

/// Light-blue full-width section banner.
fn section_title(c: &mut Canvas, label: &str) {
    c.set_font(FontStyle::Bold, 12.0);
    c.set_fill_color(230, 240, 255);
    c.cell_ln(
        0.0,
        mm(8.0),
        &format!("  {label}"),
        Border::None,
        Align::Left,
        true,
    );
    c.advance(mm(2.0));
}

fn schedule_header(c: &mut Canvas) {
    c.set_font(FontStyle::Bold, 9.0);
    c.set_fill_color(240, 240, 240);
    c.set_text_color(0, 0, 0);
    c.cell(mm(20.0), mm(8.0), "Duree", Border::Frame, Align::Center, true);
    c.cell(mm(40.0), mm(8.0), "Phase", Border::Frame, Align::Center, true);
    c.cell_ln(
        0.0,
        mm(8.0),
        "Consignes / Actions",
        Border::Frame,
        Align::Center,
        true,
    );
}

fn schedule_continuation(c: &mut Canvas) {
    page_banner(c);
    schedule_header(c);
}

/// Split a comma/semicolon-separated field into the accumulating set.
fn collect_items(acc: &mut BTreeSet<String>, field: &str) {
    for part in field.replace(';', ",").split(',') {
        let part = part.trim();
        if !part.is_empty() {
            acc.insert(part.to_string());
        }
    }
}

/// One resource column: title banner plus a dashed item list sharing the
/// banner's bottom edge. Returns the total height so the caller can align
/// the cursor under the tallest of the three.
fn resource_box(c: &mut Canvas, title: &str, items: &BTreeSet<String>, x: f32, y: f32, w: f32) -> f32 {
    c.set_font(FontStyle::Bold, 10.0);
    c.set_fill_color(240, 240, 240);
    c.set_xy(x, y);
    c.cell(w, mm(8.0), title, Border::Frame, Align::Center, true);
    let body = if items.is_empty() {
        "-".to_string()
    } else {
        items
            .iter()
            .map(|i| format!("- {i}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    c.set_font(FontStyle::Regular, 9.0);
    c.set_xy(x, y + mm(8.0));
    mm(8.0) + c.multi_cell(w, mm(6.0), &body, Border::SidesBottom, Align::Left, false)
}

pub fn compose(
    info: &SessionInfo,
    blocks: &[CompetencyBlock],
    phases: &[SessionPhase],
) -> Result<Vec<u8>> {
    let mut c = Canvas::a4(mm(BOTTOM_MARGIN));
    c.set_continuation(Some(page_banner));
    page_banner(&mut c);

    if let Some(id) = crate::doc_id(&info.sequence, &info.session) {
        c.set_font(FontStyle::Bold, 12.0);
        c.set_text_color(100, 100, 100);
        c.cell_ln(0.0, mm(5.0), &id, Border::None, Align::Right, false);
        c.advance(mm(5.0));
        c.set_text_color(0, 0, 0);
    }

    let title = sanitize(info.title.trim());
    let title = if title.is_empty() {
        "Seance sans titre".to_string()
    } else {
        title
    };
    c.set_font(FontStyle::Bold, 16.0);
    c.cell_ln(0.0, mm(10.0), &title, Border::None, Align::Left, false);

    let seq = sanitize(info.sequence.trim());
    let sea = sanitize(info.session.trim());
    if !seq.is_empty() || !sea.is_empty() {
        c.set_font(FontStyle::Bold, 11.0);
        c.set_text_color(80, 80, 80);
        let txt_seq = if seq.is_empty() {
            String::new()
        } else {
            format!("Sequence : {seq}")
        };
        let txt_sea = if sea.is_empty() {
            String::new()
        } else {
            format!("Seance : {sea}")
        };
        let sep = if !txt_seq.is_empty() && !txt_sea.is_empty() {
            "  |  "
        } else {
            ""
        };
        c.cell_ln(
            0.0,
            mm(6.0),
            &format!("{txt_seq}{sep}{txt_sea}"),
            Border::None,
            Align::Left,
            false,
        );
        c.set_text_color(0, 0, 0);
        c.advance(mm(2.0));
    }

    c.set_font(FontStyle::Regular, 10.0);
    let date = format!("Date : {}", sanitize(&info.date));
    let class = format!("Classe : {}", sanitize(&info.class));
    let duration = format!("Duree : {}", sanitize(&info.duration));
    c.cell(mm(60.0), mm(6.0), &date, Border::None, Align::Left, false);
    c.cell(mm(60.0), mm(6.0), &class, Border::None, Align::Left, false);
    c.cell_ln(mm(60.0), mm(6.0), &duration, Border::None, Align::Left, false);
    c.advance(mm(5.0));

    let objectives = sanitize(info.objectives.trim());
    if !objectives.is_empty() {
        c.set_font(FontStyle::Bold, 10.0);
        c.cell_ln(
            0.0,
            mm(6.0),
            "Objectifs Pedagogiques :",
            Border::None,
            Align::Left,
            false,
        );
        c.set_font(FontStyle::Regular, 10.0);
        c.multi_cell(0.0, mm(5.0), &objectives, Border::None, Align::Left, false);
        c.advance(mm(3.0));
    }

    let description = sanitize(info.description.trim());
    if !description.is_empty() {
        c.set_font(FontStyle::Bold, 10.0);
        c.cell_ln(
            0.0,
            mm(6.0),
            "Description / Contexte :",
            Border::None,
            Align::Left,
            false,
        );
        c.set_font(FontStyle::Regular, 10.0);
        c.multi_cell(0.0, mm(5.0), &description, Border::None, Align::Left, false);
        c.advance(mm(5.0));
    }

    if !blocks.is_empty() {
        section_title(&mut c, "Competences & Activites");
        for block in blocks {
            c.ensure_space(mm(40.0));
            competency_card(&mut c, block);
        }
        c.advance(mm(2.0));
    }

    c.ensure_space(mm(20.0));
    section_title(&mut c, "Deroulement de la seance");
    schedule_header(&mut c);
    c.set_continuation(Some(schedule_continuation));
    let desc_w = PAGE_WIDTH - mm(10.0) - mm(70.0);
    for phase in phases {
        let desc = sanitize(phase.instructions.trim());
        let desc = if desc.is_empty() { "-".to_string() } else { desc };
        let lines = wrap_lines(&desc, c.inner_width(desc_w), FontStyle::Regular, 9.0);
        let h = (lines.len() as f32 * mm(6.0)).max(mm(8.0));
        c.ensure_space(h);
        let y0 = c.y();
        c.set_font(FontStyle::Regular, 9.0);
        c.set_xy(mm(10.0), y0);
        c.cell(
            mm(20.0),
            h,
            &sanitize(&phase.duration),
            Border::Frame,
            Align::Center,
            false,
        );
        c.cell(
            mm(40.0),
            h,
            &sanitize(&phase.title),
            Border::Frame,
            Align::Left,
            false,
        );
        c.cell(desc_w, h, "", Border::Frame, Align::Left, false);
        c.set_xy(mm(70.0), y0);
        c.draw_wrapped(desc_w, mm(6.0), &lines, Border::None, Align::Left, false);
        c.set_y(y0 + h);
    }
    c.set_continuation(Some(page_banner));
    c.advance(mm(5.0));

    let mut pre = BTreeSet::new();
    let mut mat = BTreeSet::new();
    let mut lie = BTreeSet::new();
    for block in blocks {
        collect_items(&mut pre, &sanitize(&block.prerequisites));
        collect_items(&mut mat, &sanitize(&block.materials));
        collect_items(&mut lie, &sanitize(&block.subject_links));
    }
    if !(pre.is_empty() && mat.is_empty() && lie.is_empty()) {
        c.ensure_space(mm(50.0));
        section_title(&mut c, "Ressources & Informations Complementaires");
        let w_col = mm(63.0);
        let y0 = c.y();
        let h1 = resource_box(&mut c, "Pre-requis", &pre, mm(10.0), y0, w_col);
        let h2 = resource_box(&mut c, "Materiel", &mat, mm(10.0) + w_col, y0, w_col);
        let h3 = resource_box(&mut c, "Liens Matieres", &lie, mm(10.0) + 2.0 * w_col, y0, w_col);
        c.set_y(y0 + h1.max(h2).max(h3));
    }

    c.finish()
}

/// Grey activity banner followed by the two-column competency | skills card.
/// Both columns are framed at the taller of the two measured heights, then the
/// text is drawn borderless on top so the borders stay aligned.
fn competency_card(c: &mut Canvas, block: &CompetencyBlock) {
    let domain = sanitize(block.domain.trim());
    let dom_prefix = if domain.is_empty() {
        String::new()
    } else {
        format!("[{domain}] ")
    };
    c.set_font(FontStyle::Bold, 11.0);
    c.set_fill_color(220, 220, 220);
    c.set_text_color(0, 50, 100);
    let banner = format!(" {dom_prefix}Activite : {}", sanitize(&block.label));
    c.multi_cell(0.0, mm(8.0), &banner, Border::Frame, Align::Left, true);
    c.set_text_color(0, 0, 0);

    let competency = sanitize(&block.competency);
    let skills_text = block
        .skills
        .iter()
        .map(|s| format!("- {}", sanitize(s)))
        .collect::<Vec<_>>()
        .join("\n");

    let left_w = mm(60.0);
    let right_w = PAGE_WIDTH - mm(10.0) - mm(70.0);
    let left_lines = wrap_lines(&competency, c.inner_width(left_w), FontStyle::Italic, 9.0);
    let right_lines = wrap_lines(
        &skills_text,
        c.inner_width(right_w),
        FontStyle::Regular,
        10.0,
    );
    let h_left = left_lines.len() as f32 * mm(6.0);
    let h_right = right_lines.len() as f32 * mm(6.0);
    let h = h_left.max(h_right);

    let y0 = c.y();
    c.set_xy(mm(10.0), y0);
    c.cell(left_w, h, "", Border::Frame, Align::Left, false);
    c.cell(right_w, h, "", Border::Frame, Align::Left, false);
    c.set_font(FontStyle::Italic, 9.0);
    c.set_xy(mm(10.0), y0);
    c.draw_wrapped(left_w, mm(6.0), &left_lines, Border::None, Align::Left, false);
    c.set_font(FontStyle::Regular, 10.0);
    c.set_xy(mm(70.0), y0);
    c.draw_wrapped(right_w, mm(6.0), &right_lines, Border::None, Align::Left, false);
    c.set_y(y0 + h);
    c.advance(mm(4.0));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_items_splits_both_separators() {
        let mut acc = BTreeSet::new();
        collect_items(&mut acc, "Camera; Pied, Micro-cravate");
        collect_items(&mut acc, "Camera,  , Enregistreur");
        let items: Vec<&str> = acc.iter().map(String::as_str).collect();
        assert_eq!(items, ["Camera", "Enregistreur", "Micro-cravate", "Pied"]);
    }

    #[test]
    fn collect_items_ignores_blank_fields() {
        let mut acc = BTreeSet::new();
        collect_items(&mut acc, "");
        collect_items(&mut acc, " ; , ");
        assert!(acc.is_empty());
    }
}
