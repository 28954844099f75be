//! Printable A4 documents for a vocational audiovisual program: lesson plans,
//! sequence plans, and evaluation grids, with optional annex merging.
//!
//! The composers take structured records (see [`model`]) and return finished
//! PDF bytes; `*_to_file` variants write them out. [`merge_annex`] appends an
//! external PDF behind a generated document, stamping a caption frame on
//! every annex page.

pub mod error;
pub mod fonts;
pub mod merge;
pub mod model;
pub mod pdf;
pub mod sanitize;

use std::fs;
use std::path::Path;
use std::time::Instant;

use log::debug;

pub use error::{Error, Result};
pub use merge::DEFAULT_CAPTION;

use model::{
    CompetencyBlock, EvalBlock, EvalInfo, SequenceInfo, SequenceStep, SessionInfo, SessionPhase,
    TargetedCompetency,
};

pub fn compose_lesson(
    info: &SessionInfo,
    blocks: &[CompetencyBlock],
    phases: &[SessionPhase],
) -> Result<Vec<u8>> {
    let start = Instant::now();
    let bytes = pdf::lesson::compose(info, blocks, phases)?;
    debug!(
        "composed lesson plan: {} bytes in {:?}",
        bytes.len(),
        start.elapsed()
    );
    Ok(bytes)
}

pub fn compose_sequence(
    info: &SequenceInfo,
    steps: &[SequenceStep],
    skills: &[TargetedCompetency],
) -> Result<Vec<u8>> {
    let start = Instant::now();
    let bytes = pdf::sequence::compose(info, steps, skills)?;
    debug!(
        "composed sequence plan: {} bytes in {:?}",
        bytes.len(),
        start.elapsed()
    );
    Ok(bytes)
}

pub fn compose_evaluation(info: &EvalInfo, blocks: &[EvalBlock]) -> Result<Vec<u8>> {
    let start = Instant::now();
    let bytes = pdf::evaluation::compose(info, blocks)?;
    debug!(
        "composed evaluation grid: {} bytes in {:?}",
        bytes.len(),
        start.elapsed()
    );
    Ok(bytes)
}

pub fn compose_lesson_to_file<P: AsRef<Path>>(
    path: P,
    info: &SessionInfo,
    blocks: &[CompetencyBlock],
    phases: &[SessionPhase],
) -> Result<()> {
    let bytes = compose_lesson(info, blocks, phases)?;
    fs::write(path, bytes)?;
    Ok(())
}

pub fn compose_sequence_to_file<P: AsRef<Path>>(
    path: P,
    info: &SequenceInfo,
    steps: &[SequenceStep],
    skills: &[TargetedCompetency],
) -> Result<()> {
    let bytes = compose_sequence(info, steps, skills)?;
    fs::write(path, bytes)?;
    Ok(())
}

pub fn compose_evaluation_to_file<P: AsRef<Path>>(
    path: P,
    info: &EvalInfo,
    blocks: &[EvalBlock],
) -> Result<()> {
    let bytes = compose_evaluation(info, blocks)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Append `annex` behind `primary` with the caption frame stamped on every
/// annex page. See [`merge::merge`] for the error contract.
pub fn merge_annex(primary: &[u8], annex: &[u8], caption: &str) -> Result<Vec<u8>> {
    let start = Instant::now();
    let bytes = merge::merge(primary, annex, caption)?;
    debug!(
        "merged annex: {} -> {} bytes in {:?}",
        primary.len(),
        bytes.len(),
        start.elapsed()
    );
    Ok(bytes)
}

/// Document id shown top-right on lesson plans: `SEQ<n>SE<m>`, only when both
/// numbers are present. Embedded spaces are stripped.
pub fn doc_id(sequence: &str, session: &str) -> Option<String> {
    let seq = sequence.trim().replace(' ', "");
    let sea = session.trim().replace(' ', "");
    if seq.is_empty() || sea.is_empty() {
        None
    } else {
        Some(format!("SEQ{seq}SE{sea}"))
    }
}

/// Download filename for a lesson plan.
pub fn lesson_filename(info: &SessionInfo) -> String {
    let title = sanitize::sanitize(info.title.trim());
    match doc_id(&info.sequence, &info.session) {
        Some(id) => format!("{id}_{}.pdf", title.replace(' ', "_")),
        None => format!("Fiche_{title}.pdf"),
    }
}

/// Download filename for a sequence plan.
pub fn sequence_filename(info: &SequenceInfo) -> String {
    format!(
        "Sequence_{}_{}.pdf",
        sanitize::sanitize(info.number.trim()),
        sanitize::sanitize(info.title.trim()).replace(' ', "_")
    )
}

/// Download filename for an evaluation grid.
pub fn evaluation_filename(info: &EvalInfo) -> String {
    let class = sanitize::sanitize(&info.class).replace(' ', "");
    let class = if class.is_empty() {
        "Classe".to_string()
    } else {
        class
    };
    format!(
        "Eval_{}_{}_{}.pdf",
        class,
        sanitize::sanitize(info.sequence.trim()),
        sanitize::sanitize(info.session.trim())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_id_needs_both_numbers() {
        assert_eq!(doc_id("3", "1"), Some("SEQ3SE1".to_string()));
        assert_eq!(doc_id(" 3 ", "1 bis"), Some("SEQ3SE1bis".to_string()));
        assert_eq!(doc_id("3", ""), None);
        assert_eq!(doc_id("", ""), None);
    }

    #[test]
    fn lesson_filename_prefers_doc_id() {
        let mut info = SessionInfo {
            title: "Attaque placée".into(),
            sequence: "3".into(),
            session: "1".into(),
            ..SessionInfo::default()
        };
        assert_eq!(lesson_filename(&info), "SEQ3SE1_Attaque_placée.pdf");
        info.session.clear();
        assert_eq!(lesson_filename(&info), "Fiche_Attaque placée.pdf");
    }

    #[test]
    fn evaluation_filename_strips_class_spaces() {
        let info = EvalInfo {
            eval_type: "CCF Blanc".into(),
            sequence: "2".into(),
            session: "4".into(),
            class: "T IEE".into(),
            ..EvalInfo::default()
        };
        assert_eq!(evaluation_filename(&info), "Eval_TIEE_2_4.pdf");
    }
}
