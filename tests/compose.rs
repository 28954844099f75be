//! Document-level assertions on the composed PDFs, inspected through lopdf.

use fichegen::model::{
    CompetencyBlock, EvalBlock, EvalInfo, SequenceInfo, SequenceStep, SessionInfo, SessionPhase,
    StepKind, TargetedCompetency,
};

fn load(bytes: &[u8]) -> lopdf::Document {
    let mut doc = lopdf::Document::load_mem(bytes).expect("composed PDF parses");
    doc.decompress();
    doc
}

/// Decompressed content of every page, in page order.
fn page_texts(doc: &lopdf::Document) -> Vec<String> {
    doc.get_pages()
        .values()
        .map(|&id| {
            let content = doc.get_page_content(id).expect("page content");
            String::from_utf8_lossy(&content).into_owned()
        })
        .collect()
}

fn lesson_info() -> SessionInfo {
    SessionInfo {
        title: "Hand-ball - Attaque placée".into(),
        sequence: "3".into(),
        session: "1".into(),
        date: "2026-08-25".into(),
        class: "3ème B".into(),
        duration: "55 min".into(),
        objectives: "Améliorer la prise d'information".into(),
        description: "Séance axée sur le jeu réduit".into(),
    }
}

fn lesson_block() -> CompetencyBlock {
    CompetencyBlock {
        domain: "IMAGE".into(),
        label: "Cadrage".into(),
        competency: "Mettre en oeuvre une captation conforme aux intentions".into(),
        skills: vec!["Cadrer".into(), "Régler l'exposition".into()],
        prerequisites: "Connaitre la camera; Regles de securite".into(),
        materials: "Camera, Pied".into(),
        subject_links: "Physique".into(),
    }
}

fn phase(title: &str, instructions: &str) -> SessionPhase {
    SessionPhase {
        title: title.into(),
        duration: "10'".into(),
        instructions: instructions.into(),
    }
}

#[test]
fn lesson_plan_carries_header_and_sections() {
    let phases = vec![
        phase("Échauffement", "Mise en place du plateau"),
        phase("Corps de séance", ""),
    ];
    let bytes =
        fichegen::compose_lesson(&lesson_info(), &[lesson_block()], &phases).expect("compose");
    let doc = load(&bytes);
    assert_eq!(doc.get_pages().len(), 1);

    let text = page_texts(&doc).concat();
    assert!(text.contains("Fiche de Preparation Pedagogique"));
    assert!(text.contains("SEQ3SE1"));
    assert!(text.contains("Duree : 55 min"));
    assert!(text.contains("Objectifs Pedagogiques :"));
    assert!(text.contains("Deroulement de la seance"));
    assert!(text.contains("Pre-requis"));
    assert!(text.contains("Liens Matieres"));
    // Blank instructions render as the dash placeholder.
    assert!(text.contains("(-)"));
}

#[test]
fn lesson_blank_sections_are_omitted() {
    let info = SessionInfo {
        title: "Sans options".into(),
        date: "2026-08-25".into(),
        ..SessionInfo::default()
    };
    let bytes = fichegen::compose_lesson(&info, &[], &[]).expect("compose");
    let text = page_texts(&load(&bytes)).concat();
    assert!(!text.contains("Objectifs Pedagogiques"));
    assert!(!text.contains("Description / Contexte"));
    assert!(!text.contains("Competences & Activites"));
    assert!(!text.contains("Ressources"));
    // The schedule section is always present, even empty.
    assert!(text.contains("Deroulement de la seance"));
}

#[test]
fn lesson_schedule_paginates_with_header_on_every_page() {
    let phases: Vec<SessionPhase> = (0..80)
        .map(|i| phase(&format!("Phase {i}"), "Consigne courte"))
        .collect();
    let bytes = fichegen::compose_lesson(&lesson_info(), &[], &phases).expect("compose");
    let doc = load(&bytes);
    assert!(doc.get_pages().len() >= 2, "80 rows must not fit one page");

    for (i, text) in page_texts(&doc).iter().enumerate() {
        assert!(
            text.contains("Consignes / Actions"),
            "page {} misses the schedule header",
            i + 1
        );
        assert!(
            text.contains("Fiche de Preparation Pedagogique"),
            "page {} misses the page banner",
            i + 1
        );
    }
}

#[test]
fn sequence_plan_labels_steps_by_kind() {
    let info = SequenceInfo {
        number: "2".into(),
        title: "Captation multicam".into(),
        class: "TIEE".into(),
        dates: "Sept - Oct".into(),
        objective: "Produire une captation propre".into(),
        problem: "Comment synchroniser plusieurs sources ?".into(),
    };
    let steps = vec![
        SequenceStep {
            kind: StepKind::Session,
            number: "1".into(),
            title: "Reperage".into(),
            duration: "4h".into(),
            description: "Plan de plateau".into(),
        },
        SequenceStep {
            kind: StepKind::Evaluation,
            number: "1".into(),
            title: "CCF blanc".into(),
            duration: "2h".into(),
            description: "Grille commune".into(),
        },
    ];
    let skills = vec![TargetedCompetency {
        domain: "TIEE".into(),
        label: "Plateau".into(),
        competency: "Installer un plateau de tournage".into(),
        skills: vec!["Cabler".into(), "Configurer la regie".into()],
    }];
    let bytes = fichegen::compose_sequence(&info, &steps, &skills).expect("compose");
    let text = page_texts(&load(&bytes)).concat();

    assert!(text.contains("FICHE SEQUENCE 2 : Captation multicam"));
    assert!(text.contains("Nb Seances : 2"));
    assert!(text.contains("SEANCE 1"));
    assert!(text.contains("EVAL 1"));
    assert!(text.contains("Objectif Terminal :"));
    assert!(text.contains("Savoir-faire : Cabler / Configurer la regie"));
}

#[test]
fn sequence_table_paginates_with_header_on_every_page() {
    let info = SequenceInfo {
        number: "1".into(),
        title: "Longue".into(),
        ..SequenceInfo::default()
    };
    let steps: Vec<SequenceStep> = (0..90)
        .map(|i| SequenceStep {
            kind: StepKind::Session,
            number: format!("{i}"),
            title: format!("Seance {i}"),
            duration: "2h".into(),
            description: "Contenu".into(),
        })
        .collect();
    let bytes = fichegen::compose_sequence(&info, &steps, &[]).expect("compose");
    let doc = load(&bytes);
    assert!(doc.get_pages().len() >= 2);
    for (i, text) in page_texts(&doc).iter().enumerate() {
        assert!(
            text.contains("Contenu / Description"),
            "page {} misses the table header",
            i + 1
        );
    }
}

fn eval_info() -> EvalInfo {
    EvalInfo {
        eval_type: "Evaluation Formative".into(),
        sequence: "3".into(),
        session: "1".into(),
        date: "2026-08-25".into(),
        class: "TIEE".into(),
        description: "Câblage complet du plateau".into(),
    }
}

#[test]
fn evaluation_grid_annotates_not_evaluated_skills() {
    let blocks = vec![EvalBlock {
        domain: "IMAGE".into(),
        label: "Cadrage".into(),
        competency: "Mettre en oeuvre une captation".into(),
        skills: vec!["Cadrer".into(), "Régler l'exposition".into()],
        all_skills: vec![
            "Cadrer".into(),
            "Régler l'exposition".into(),
            "Monter un plan".into(),
        ],
    }];
    let bytes = fichegen::compose_evaluation(&eval_info(), &blocks).expect("compose");
    let text = page_texts(&load(&bytes)).concat();

    assert!(text.contains("FICHE D'EVALUATION"));
    assert!(text.contains("Competences / Savoirs-faire Evalues"));
    assert!(text.contains("Non evalue : Monter un plan"));
    assert!(text.contains("Commentaires :"));
}

#[test]
fn evaluation_grid_paginates_with_grading_header_on_every_page() {
    let blocks: Vec<EvalBlock> = (0..6)
        .map(|b| EvalBlock {
            domain: "TIEE".into(),
            label: format!("Activite {b}"),
            competency: "Competence officielle".into(),
            skills: (0..15).map(|s| format!("Critere {b}-{s}")).collect(),
            all_skills: (0..15).map(|s| format!("Critere {b}-{s}")).collect(),
        })
        .collect();
    let bytes = fichegen::compose_evaluation(&eval_info(), &blocks).expect("compose");
    let doc = load(&bytes);
    assert!(doc.get_pages().len() >= 2);
    for (i, text) in page_texts(&doc).iter().enumerate() {
        assert!(
            text.contains("Competences / Savoirs-faire Evalues"),
            "page {} misses the grading header",
            i + 1
        );
    }
}
