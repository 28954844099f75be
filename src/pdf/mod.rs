//! PDF page composition: canvas primitives, text layout, and the three
//! document composers.

pub mod canvas;
pub mod evaluation;
pub mod layout;
pub mod lesson;
pub mod sequence;
