//! Input record shapes supplied by the form-handling collaborator.
//!
//! All text fields arrive unsanitized; the composers normalize them before
//! measuring or drawing. Field defaults let callers omit optional sections
//! entirely (an empty field means "leave the section out").

use serde::{Deserialize, Serialize};

/// Header record for a lesson plan.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionInfo {
    pub title: String,
    /// Sequence number within the progression, free text ("3").
    #[serde(default)]
    pub sequence: String,
    /// Session number within the sequence, free text ("1").
    #[serde(default)]
    pub session: String,
    pub date: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub duration: String,
    /// Pedagogical objectives; section omitted when blank.
    #[serde(default)]
    pub objectives: String,
    /// Description / context paragraph; section omitted when blank.
    #[serde(default)]
    pub description: String,
}

/// One competency worked during a lesson, with its selected skills and the
/// comma/semicolon-separated resource fields pulled from the referential.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CompetencyBlock {
    /// Referential domain the competency comes from ("TIEE", "IMAGE", ...).
    #[serde(default)]
    pub domain: String,
    /// Activity label shown on the banner.
    pub label: String,
    /// Official competency wording.
    pub competency: String,
    pub skills: Vec<String>,
    #[serde(default)]
    pub prerequisites: String,
    #[serde(default)]
    pub materials: String,
    #[serde(default)]
    pub subject_links: String,
}

/// One row of the lesson schedule table.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionPhase {
    pub title: String,
    pub duration: String,
    #[serde(default)]
    pub instructions: String,
}

/// Header record for a sequence plan.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SequenceInfo {
    pub number: String,
    pub title: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub dates: String,
    /// Terminal objective; left column of the reconciled block.
    #[serde(default)]
    pub objective: String,
    /// Problem statement; right column of the reconciled block.
    #[serde(default)]
    pub problem: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    #[default]
    Session,
    Evaluation,
}

/// One row of the sequence schedule: a session or an evaluation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SequenceStep {
    #[serde(default)]
    pub kind: StepKind,
    pub number: String,
    pub title: String,
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

/// A competency targeted by a sequence (header + skill list block).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TargetedCompetency {
    #[serde(default)]
    pub domain: String,
    pub label: String,
    pub competency: String,
    pub skills: Vec<String>,
}

/// Header record for an evaluation grid.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EvalInfo {
    /// "Evaluation Formative", "CCF Blanc", ...
    pub eval_type: String,
    #[serde(default)]
    pub sequence: String,
    #[serde(default)]
    pub session: String,
    pub date: String,
    #[serde(default)]
    pub class: String,
    /// Global instructions paragraph; omitted when blank.
    #[serde(default)]
    pub description: String,
}

/// One graded competency: the skills actually evaluated plus the full skill
/// list of the activity, so the grid can annotate what was left out.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EvalBlock {
    #[serde(default)]
    pub domain: String,
    pub label: String,
    pub competency: String,
    /// Skills graded on this sheet (one criterion row each).
    pub skills: Vec<String>,
    /// Every skill the activity offers in the referential.
    pub all_skills: Vec<String>,
}
