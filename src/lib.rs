//! sympred: symptom-to-disease prediction over pre-trained classifier artifacts.
//!
//! This crate encodes a user's symptom selection against a fixed vocabulary,
//! runs a single forward inference call on a loaded classifier, decodes the
//! resulting class index into a disease name, and looks up recommended
//! precautions from a reference table. Everything is load-once, read-only and
//! synchronous; the crate performs no training.

pub mod artifacts;
pub mod encode;
pub mod labels;
pub mod model;
pub mod pipeline;
pub mod precautions;
pub mod testing;
pub mod vocabulary;
