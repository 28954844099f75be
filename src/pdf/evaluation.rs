//! Evaluation-grid composer ("fiche d'évaluation"): student header frame,
//! grading table with four 0..3 score columns per criterion, the "Non evalue"
//! annotation per block, and a trailing comment frame when space remains.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::fonts::FontStyle;
use crate::model::{EvalBlock, EvalInfo};
use crate::sanitize::sanitize;

use super::canvas::{Align, Border, CELL_PAD, Canvas, PAGE_HEIGHT, mm};
use super::layout::{measure_wrapped_height, wrap_lines};

const W_TEXT: f32 = 150.0;
const W_NOTE: f32 = 10.0;
const W_ACT: f32 = 70.0;
const W_COMP: f32 = 120.0;

/// Grading banner, re-emitted on every continuation page.
fn grading_header(c: &mut Canvas) {
    c.set_font(FontStyle::Bold, 9.0);
    c.set_fill_color(220, 220, 220);
    c.set_text_color(0, 0, 0);
    c.cell(
        mm(W_TEXT),
        mm(5.0),
        "Competences / Savoirs-faire Evalues",
        Border::Frame,
        Align::Center,
        true,
    );
    c.cell(mm(W_NOTE), mm(5.0), "0", Border::Frame, Align::Center, true);
    c.cell(mm(W_NOTE), mm(5.0), "1", Border::Frame, Align::Center, true);
    c.cell(mm(W_NOTE), mm(5.0), "2", Border::Frame, Align::Center, true);
    c.cell_ln(mm(W_NOTE), mm(5.0), "3", Border::Frame, Align::Center, true);
}

pub fn compose(info: &EvalInfo, blocks: &[EvalBlock]) -> Result<Vec<u8>> {
    let mut c = Canvas::a4(mm(10.0));

    c.set_font(FontStyle::Bold, 16.0);
    c.cell_ln(
        0.0,
        mm(8.0),
        "FICHE D'EVALUATION",
        Border::None,
        Align::Center,
        false,
    );
    c.advance(mm(2.0));

    student_header(&mut c, info);

    let desc = sanitize(info.description.trim());
    if !desc.is_empty() {
        c.set_font(FontStyle::Bold, 9.0);
        c.cell_ln(0.0, mm(5.0), "Contexte :", Border::None, Align::Left, false);
        c.set_font(FontStyle::Regular, 9.0);
        c.multi_cell(0.0, mm(4.0), &desc, Border::None, Align::Left, false);
        c.advance(mm(3.0));
    }

    grading_header(&mut c);
    c.set_continuation(Some(grading_header));

    for block in blocks {
        c.ensure_space(mm(20.0));
        block_header(&mut c, block);

        c.set_text_color(0, 0, 0);
        c.set_font(FontStyle::Regular, 8.0);
        for skill in &block.skills {
            criterion_row(&mut c, skill);
        }

        not_evaluated_note(&mut c, block);
    }

    // Comment frame fills the leftover space, capped at 40 mm.
    let space_left = PAGE_HEIGHT - mm(15.0) - c.y();
    if space_left > mm(20.0) {
        c.advance(mm(3.0));
        c.set_font(FontStyle::Bold, 9.0);
        c.cell_ln(0.0, mm(5.0), "Commentaires :", Border::None, Align::Left, false);
        let h_comments = (space_left - mm(10.0)).min(mm(40.0));
        let y = c.y();
        c.place_box(mm(10.0), y, mm(190.0), h_comments);
    }

    c.finish()
}

/// 18 mm frame with the name dots, date, and the class/type/seq context line.
fn student_header(c: &mut Canvas, info: &EvalInfo) {
    c.set_font(FontStyle::Regular, 10.0);
    let y0 = c.y();
    c.place_box(mm(10.0), y0, mm(190.0), mm(18.0));

    c.set_xy(mm(15.0), y0 + mm(4.0));
    c.cell(
        mm(100.0),
        mm(6.0),
        "Nom / Prenom : ............................................................",
        Border::None,
        Align::Left,
        false,
    );
    let date = format!("Date : {}", sanitize(&info.date));
    c.cell_ln(mm(80.0), mm(6.0), &date, Border::None, Align::Right, false);

    c.set_xy(mm(15.0), y0 + mm(10.0));
    let seq = sanitize(info.sequence.trim());
    let sea = sanitize(info.session.trim());
    let txt_seq = if seq.is_empty() {
        String::new()
    } else {
        format!("Seq {seq}")
    };
    let txt_sea = if sea.is_empty() {
        String::new()
    } else {
        format!("Sea {sea}")
    };
    let context = format!(
        "Classe : {}   |   {}   |   {txt_seq}  {txt_sea}",
        sanitize(&info.class),
        sanitize(&info.eval_type)
    );
    c.cell_ln(0.0, mm(6.0), &context, Border::None, Align::Left, false);

    c.set_y(y0 + mm(22.0));
}

/// Height of the two-column activity | competency card: both frames stretch
/// to the taller wrapped side.
pub fn card_height(block: &EvalBlock) -> f32 {
    let act = format!("Act : {}", sanitize(&block.label));
    let comp = format!("Comp : {}", sanitize(&block.competency));
    let h_act = measure_wrapped_height(
        &act,
        mm(W_ACT) - 2.0 * CELL_PAD,
        FontStyle::Bold,
        9.0,
        mm(6.0),
    );
    let h_comp = measure_wrapped_height(
        &comp,
        mm(W_COMP) - 2.0 * CELL_PAD,
        FontStyle::Italic,
        8.0,
        mm(6.0),
    );
    h_act.max(h_comp)
}

/// Blue-tinted activity | competency card with both frames stretched to the
/// taller measured side.
fn block_header(c: &mut Canvas, block: &EvalBlock) {
    let act = format!("Act : {}", sanitize(&block.label));
    let comp = format!("Comp : {}", sanitize(&block.competency));
    let act_lines = wrap_lines(&act, c.inner_width(mm(W_ACT)), FontStyle::Bold, 9.0);
    let comp_lines = wrap_lines(&comp, c.inner_width(mm(W_COMP)), FontStyle::Italic, 8.0);
    let h = card_height(block);

    let y0 = c.y();
    c.set_fill_color(240, 245, 255);
    c.set_text_color(0, 50, 100);
    c.set_xy(mm(10.0), y0);
    c.filled_box(mm(10.0), y0, mm(W_ACT), h);
    c.filled_box(mm(10.0) + mm(W_ACT), y0, mm(W_COMP), h);
    c.cell(mm(W_ACT), h, "", Border::Frame, Align::Left, false);
    c.cell(mm(W_COMP), h, "", Border::Frame, Align::Left, false);

    c.set_font(FontStyle::Bold, 9.0);
    c.set_xy(mm(10.0), y0);
    c.draw_wrapped(mm(W_ACT), mm(6.0), &act_lines, Border::None, Align::Left, false);
    c.set_font(FontStyle::Italic, 8.0);
    c.set_xy(mm(10.0) + mm(W_ACT), y0);
    c.draw_wrapped(mm(W_COMP), mm(6.0), &comp_lines, Border::None, Align::Left, false);
    c.set_y(y0 + h);
}

/// One skill row: wrapped criterion text plus four empty score cells, all
/// framed at the same height (min 5 mm).
fn criterion_row(c: &mut Canvas, skill: &str) {
    let item = format!("- {}", sanitize(skill));
    let lines = wrap_lines(&item, c.inner_width(mm(W_TEXT)), FontStyle::Regular, 8.0);
    let h = (lines.len() as f32 * mm(4.0)).max(mm(5.0));

    c.ensure_space(h);
    c.set_font(FontStyle::Regular, 8.0);
    let y0 = c.y();
    c.set_xy(mm(10.0) + mm(W_TEXT), y0);
    for _ in 0..4 {
        c.cell(mm(W_NOTE), h, "", Border::Frame, Align::Center, false);
    }
    c.set_xy(mm(10.0), y0);
    c.cell(mm(W_TEXT), h, "", Border::Frame, Align::Left, false);
    c.set_xy(mm(10.0), y0);
    c.draw_wrapped(mm(W_TEXT), mm(4.0), &lines, Border::None, Align::Left, false);
    c.set_y(y0 + h);
}

/// Skills the activity offers that this grid does not grade, in code-point
/// order.
pub fn not_evaluated(block: &EvalBlock) -> Vec<String> {
    let selected: BTreeSet<String> = block.skills.iter().map(|s| sanitize(s)).collect();
    block
        .all_skills
        .iter()
        .map(|s| sanitize(s))
        .collect::<BTreeSet<String>>()
        .difference(&selected)
        .cloned()
        .collect()
}

fn not_evaluated_note(c: &mut Canvas, block: &EvalBlock) {
    let missing = not_evaluated(block);
    if missing.is_empty() {
        return;
    }
    c.ensure_space(mm(10.0));
    c.set_font(FontStyle::Italic, 7.0);
    c.set_text_color(100, 100, 100);
    c.set_fill_color(250, 250, 250);
    let txt = format!("Non evalue : {}", missing.join(", "));
    c.multi_cell(mm(190.0), mm(4.0), &txt, Border::Frame, Align::Left, true);
    c.set_text_color(0, 0, 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(skills: &[&str], all: &[&str]) -> EvalBlock {
        EvalBlock {
            domain: "IMAGE".into(),
            label: "Cadrage".into(),
            competency: "Mettre en oeuvre une captation".into(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            all_skills: all.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn not_evaluated_is_the_set_difference() {
        let b = block(
            &["Cadrer", "Régler l'exposition"],
            &["Cadrer", "Régler l'exposition", "Monter un plan"],
        );
        assert_eq!(not_evaluated(&b), vec!["Monter un plan".to_string()]);
    }

    #[test]
    fn not_evaluated_sorts_by_code_point() {
        let b = block(
            &["Cadrer"],
            &["Cadrer", "Étalonner", "Monter un plan"],
        );
        // 'É' (U+00C9) sorts after every ASCII letter.
        assert_eq!(
            not_evaluated(&b),
            vec!["Monter un plan".to_string(), "Étalonner".to_string()]
        );
    }

    #[test]
    fn card_height_is_the_taller_column() {
        let mut b = block(&["Cadrer"], &["Cadrer"]);
        b.competency = "Mettre en oeuvre une captation multicam conforme aux intentions de \
                        realisation et aux contraintes techniques du plateau"
            .into();
        let h_act = measure_wrapped_height(
            &format!("Act : {}", b.label),
            mm(W_ACT) - 2.0 * CELL_PAD,
            FontStyle::Bold,
            9.0,
            mm(6.0),
        );
        let h_comp = measure_wrapped_height(
            &format!("Comp : {}", b.competency),
            mm(W_COMP) - 2.0 * CELL_PAD,
            FontStyle::Italic,
            8.0,
            mm(6.0),
        );
        assert!(h_comp > h_act, "long competency must drive the card height");
        assert_eq!(card_height(&b), h_comp);
    }

    #[test]
    fn fully_evaluated_block_has_no_leftover() {
        let b = block(&["Cadrer"], &["Cadrer"]);
        assert!(not_evaluated(&b).is_empty());
    }
}
