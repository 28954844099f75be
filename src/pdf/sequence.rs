//! Sequence-plan composer ("fiche séquence"), a compact single-banner layout:
//! title line, underlined context line, the objective/problem two-column
//! block, targeted-competency blocks, and the tinted session/evaluation table.

use crate::error::Result;
use crate::fonts::FontStyle;
use crate::model::{SequenceInfo, SequenceStep, StepKind, TargetedCompetency};
use crate::sanitize::sanitize;

use super::canvas::{Align, Border, Canvas, mm};
use super::layout::wrap_lines;

const W_TYPE: f32 = 25.0;
const W_DESC: f32 = 150.0;
const W_DUR: f32 = 15.0;

fn table_header(c: &mut Canvas) {
    c.set_font(FontStyle::Bold, 9.0);
    c.set_fill_color(50, 50, 50);
    c.set_text_color(255, 255, 255);
    c.cell(mm(W_TYPE), mm(6.0), "Type", Border::Frame, Align::Center, true);
    c.cell(
        mm(W_DESC),
        mm(6.0),
        "Contenu / Description",
        Border::Frame,
        Align::Center,
        true,
    );
    c.cell_ln(mm(W_DUR), mm(6.0), "Duree", Border::Frame, Align::Center, true);
    c.set_text_color(0, 0, 0);
}

pub fn compose(
    info: &SequenceInfo,
    steps: &[SequenceStep],
    skills: &[TargetedCompetency],
) -> Result<Vec<u8>> {
    let mut c = Canvas::a4(mm(10.0));

    c.set_font(FontStyle::Bold, 14.0);
    let banner = format!(
        "FICHE SEQUENCE {} : {}",
        sanitize(&info.number),
        sanitize(&info.title)
    );
    c.cell_ln(0.0, mm(8.0), &banner, Border::None, Align::Center, false);

    c.set_font(FontStyle::Regular, 9.0);
    let context = format!(
        "Classe : {}   |   Dates : {}   |   Nb Seances : {}",
        sanitize(&info.class),
        sanitize(&info.dates),
        steps.len()
    );
    c.cell_ln(0.0, mm(6.0), &context, Border::Bottom, Align::Center, false);
    c.advance(mm(3.0));

    objective_problem_block(&mut c, info);

    if !skills.is_empty() {
        c.ensure_space(mm(20.0));
        c.set_font(FontStyle::Bold, 10.0);
        c.set_fill_color(50, 50, 50);
        c.set_text_color(255, 255, 255);
        c.cell_ln(
            0.0,
            mm(6.0),
            " Competences & Savoir-faire vises",
            Border::Frame,
            Align::Left,
            true,
        );
        c.set_text_color(0, 0, 0);

        for block in skills {
            c.ensure_space(mm(12.0));
            c.set_fill_color(235, 235, 235);
            c.set_font(FontStyle::Bold, 8.0);
            let header = format!(
                "[{}] {} : {}",
                sanitize(&block.domain),
                sanitize(&block.label),
                sanitize(&block.competency)
            );
            c.multi_cell(0.0, mm(5.0), &header, Border::Frame, Align::Left, true);
            c.set_font(FontStyle::Regular, 8.0);
            let joined = block
                .skills
                .iter()
                .map(|s| sanitize(s))
                .collect::<Vec<_>>()
                .join(" / ");
            let body = format!("Savoir-faire : {joined}");
            c.multi_cell(0.0, mm(4.0), &body, Border::Frame, Align::Left, false);
            c.advance(mm(1.0));
        }
        c.advance(mm(2.0));
    }

    c.ensure_space(mm(15.0));
    table_header(&mut c);
    c.set_continuation(Some(table_header));
    for step in steps {
        schedule_row(&mut c, step);
    }

    c.finish()
}

/// Two header cells side by side, then borderless paragraphs below them,
/// finally both frames drawn at the taller measured height.
fn objective_problem_block(c: &mut Canvas, info: &SequenceInfo) {
    let y0 = c.y();
    c.set_font(FontStyle::Bold, 9.0);
    c.set_fill_color(240, 240, 240);
    c.cell(
        mm(95.0),
        mm(6.0),
        "Objectif Terminal :",
        Border::Frame,
        Align::Left,
        true,
    );
    c.set_xy(mm(105.0), y0);
    c.cell_ln(
        mm(95.0),
        mm(6.0),
        "Problematique :",
        Border::Frame,
        Align::Left,
        true,
    );

    let y_content = c.y();
    c.set_font(FontStyle::Regular, 8.0);
    c.set_xy(mm(10.0), y_content);
    let h_obj = c.multi_cell(
        mm(95.0),
        mm(4.0),
        &sanitize(&info.objective),
        Border::None,
        Align::Left,
        false,
    );
    c.set_xy(mm(105.0), y_content);
    let h_prob = c.multi_cell(
        mm(95.0),
        mm(4.0),
        &sanitize(&info.problem),
        Border::None,
        Align::Left,
        false,
    );
    let h = h_obj.max(h_prob).max(mm(8.0));
    c.place_box(mm(10.0), y_content, mm(95.0), h);
    c.place_box(mm(105.0), y_content, mm(95.0), h);
    c.set_y(y_content + h + mm(3.0));
}

fn schedule_row(c: &mut Canvas, step: &SequenceStep) {
    let (bg, type_label) = match step.kind {
        StepKind::Evaluation => ((255, 240, 240), format!("EVAL {}", sanitize(&step.number))),
        StepKind::Session => ((245, 250, 255), format!("SEANCE {}", sanitize(&step.number))),
    };
    let full_desc = format!(
        "{} : {}",
        sanitize(&step.title),
        sanitize(&step.description)
    );
    let lines = wrap_lines(
        &full_desc,
        c.inner_width(mm(W_DESC)),
        FontStyle::Regular,
        8.0,
    );
    let h = (lines.len() as f32 * mm(4.0)).max(mm(6.0));

    c.ensure_space(h);
    let y0 = c.y();
    c.set_fill_color(bg.0, bg.1, bg.2);
    c.set_font(FontStyle::Bold, 8.0);
    c.set_xy(mm(10.0), y0);
    c.cell(mm(W_TYPE), h, &type_label, Border::Frame, Align::Center, true);

    c.set_font(FontStyle::Regular, 8.0);
    c.cell(mm(W_DESC), h, "", Border::Frame, Align::Left, false);
    c.set_xy(mm(10.0) + mm(W_TYPE), y0);
    c.draw_wrapped(mm(W_DESC), mm(4.0), &lines, Border::None, Align::Left, false);

    c.set_xy(mm(10.0) + mm(W_TYPE) + mm(W_DESC), y0);
    c.cell(
        mm(W_DUR),
        h,
        &sanitize(&step.duration),
        Border::Frame,
        Align::Center,
        false,
    );
    c.set_y(y0 + h);
}
