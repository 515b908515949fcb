//! Artifact bundle loading: checked-in fixtures and corrupted bundles.

mod common;

use std::fs;
use std::path::Path;

use sympred::artifacts::{
    self, ArtifactError, LABELS_FILE, MODEL_FILE, PRECAUTIONS_FILE, VOCABULARY_FILE,
};
use sympred::model::{Classifier, SymptomClassifier};
use sympred::pipeline::PredictError;

// =============================================================================
// Checked-in bundles
// =============================================================================

#[test]
fn linear_bundle_loads_and_predicts() {
    let pipeline = artifacts::load_bundle(common::bundle_dir("linear")).unwrap();

    assert_eq!(pipeline.vocabulary().len(), 3);
    assert_eq!(pipeline.classifier().num_features(), 3);
    assert_eq!(pipeline.classifier().num_classes(), 3);
    assert_eq!(pipeline.labels().decode(2), Some("Flu"));

    let prediction = pipeline.predict(["fever", "cough"]).unwrap();
    assert_eq!(prediction.disease, "Flu");
    assert_eq!(prediction.precautions, vec!["rest", "fluids"]);

    let prediction = pipeline.predict(["fever"]).unwrap();
    assert_eq!(prediction.disease, "Common Cold");
    assert_eq!(
        prediction.precautions,
        vec!["stay warm", "vitamin c", "rest", "avoid cold drinks"]
    );
}

#[test]
fn linear_bundle_duplicate_rows_resolve_first_match() {
    // The fixture carries a second Flu row that must never surface.
    let pipeline = artifacts::load_bundle(common::bundle_dir("linear")).unwrap();

    assert_eq!(pipeline.precautions().duplicate_rows(), 1);
    let prediction = pipeline.predict(["fever", "cough"]).unwrap();
    assert_eq!(prediction.precautions, vec!["rest", "fluids"]);
}

#[test]
fn linear_bundle_uncovered_label_is_recoverable() {
    // Malaria has no precaution row: the bundle still loads (coverage is a
    // warning) and the gap surfaces per request.
    let pipeline = artifacts::load_bundle(common::bundle_dir("linear")).unwrap();

    match pipeline.predict(["fatigue"]).unwrap_err() {
        PredictError::DiseaseNotFound { disease } => assert_eq!(disease, "Malaria"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn tree_bundle_loads_and_predicts() {
    let pipeline = artifacts::load_bundle(common::bundle_dir("trees")).unwrap();

    let SymptomClassifier::Trees(ensemble) = pipeline.classifier() else {
        panic!("expected a tree ensemble");
    };
    assert_eq!(ensemble.num_trees(), 3);

    assert_eq!(pipeline.predict(["fever", "cough"]).unwrap().disease, "Flu");
    assert_eq!(pipeline.predict(["cough"]).unwrap().disease, "Flu");
    assert_eq!(pipeline.predict(["fever"]).unwrap().disease, "Common Cold");

    match pipeline.predict(["fatigue"]).unwrap_err() {
        PredictError::DiseaseNotFound { disease } => assert_eq!(disease, "Malaria"),
        other => panic!("unexpected error: {other:?}"),
    }
}

// =============================================================================
// Generated bundles
// =============================================================================

const VOCABULARY: &str = r#"["fever", "cough", "fatigue"]"#;
const LABELS: &str = r#"["Common Cold", "Malaria", "Flu"]"#;
const LINEAR_MODEL: &str = r#"{
  "model_type": "linear",
  "num_features": 3,
  "num_classes": 3,
  "weights": [0.9, 0.0, 0.5, 0.2, 0.0, 1.0, 0.0, 2.0, 0.0, 0.1, 0.0, 0.0]
}"#;
const PRECAUTIONS: &str = "\
Disease,Precaution_1,Precaution_2,Precaution_3,Precaution_4
Flu,rest,,fluids,
Common Cold,stay warm,vitamin c,rest,avoid cold drinks
Malaria,use mosquito nets,,,
";

fn write_bundle(dir: &Path, vocabulary: &str, model: &str, labels: &str, precautions: &str) {
    fs::write(dir.join(VOCABULARY_FILE), vocabulary).unwrap();
    fs::write(dir.join(MODEL_FILE), model).unwrap();
    fs::write(dir.join(LABELS_FILE), labels).unwrap();
    fs::write(dir.join(PRECAUTIONS_FILE), precautions).unwrap();
}

#[test]
fn generated_bundle_loads() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path(), VOCABULARY, LINEAR_MODEL, LABELS, PRECAUTIONS);

    let pipeline = artifacts::load_bundle(dir.path()).unwrap();
    let prediction = pipeline.predict(["fatigue"]).unwrap();
    assert_eq!(prediction.disease, "Malaria");
    assert_eq!(prediction.precautions, vec!["use mosquito nets"]);
}

#[test]
fn missing_model_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path(), VOCABULARY, LINEAR_MODEL, LABELS, PRECAUTIONS);
    fs::remove_file(dir.path().join(MODEL_FILE)).unwrap();

    let err = artifacts::load_bundle(dir.path()).unwrap_err();
    assert!(matches!(err, ArtifactError::Io { file: MODEL_FILE, .. }));
}

#[test]
fn malformed_vocabulary_is_json_error() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path(), "not json", LINEAR_MODEL, LABELS, PRECAUTIONS);

    let err = artifacts::load_bundle(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        ArtifactError::Json {
            file: VOCABULARY_FILE,
            ..
        }
    ));
}

#[test]
fn duplicate_vocabulary_name_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(
        dir.path(),
        r#"["fever", "cough", "fever"]"#,
        LINEAR_MODEL,
        LABELS,
        PRECAUTIONS,
    );

    let err = artifacts::load_bundle(dir.path()).unwrap_err();
    assert!(matches!(err, ArtifactError::Vocabulary(_)));
}

#[test]
fn duplicate_label_name_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(
        dir.path(),
        VOCABULARY,
        LINEAR_MODEL,
        r#"["Common Cold", "Flu", "Flu"]"#,
        PRECAUTIONS,
    );

    let err = artifacts::load_bundle(dir.path()).unwrap_err();
    assert!(matches!(err, ArtifactError::Labels(_)));
}

#[test]
fn vocabulary_model_width_mismatch_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(
        dir.path(),
        r#"["fever", "cough"]"#,
        LINEAR_MODEL,
        LABELS,
        PRECAUTIONS,
    );

    let err = artifacts::load_bundle(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        ArtifactError::FeatureCountMismatch {
            vocabulary: 2,
            model: 3
        }
    ));
}

#[test]
fn label_model_class_mismatch_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle(
        dir.path(),
        VOCABULARY,
        LINEAR_MODEL,
        r#"["Common Cold", "Flu"]"#,
        PRECAUTIONS,
    );

    let err = artifacts::load_bundle(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        ArtifactError::ClassCountMismatch {
            labels: 2,
            model: 3
        }
    ));
}

#[test]
fn empty_disease_row_rejected() {
    let bad = "\
Disease,Precaution_1,Precaution_2,Precaution_3,Precaution_4
,rest,,,
";
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path(), VOCABULARY, LINEAR_MODEL, LABELS, bad);

    let err = artifacts::load_bundle(dir.path()).unwrap_err();
    assert!(matches!(err, ArtifactError::Precautions(_)));
}

#[test]
fn tree_with_out_of_range_child_rejected() {
    let bad_model = r#"{
      "model_type": "trees",
      "num_features": 3,
      "num_classes": 3,
      "base_score": [0.0, 0.0, 0.0],
      "tree_classes": [0, 1, 2],
      "trees": [
        {
          "split_indices": [0, 0, 0],
          "split_thresholds": [0.5, 0.0, 0.0],
          "left_children": [1, -1, -1],
          "right_children": [9, -1, -1],
          "leaf_values": [0.0, 0.0, 1.0]
        },
        {
          "split_indices": [0, 0, 0],
          "split_thresholds": [0.5, 0.0, 0.0],
          "left_children": [1, -1, -1],
          "right_children": [2, -1, -1],
          "leaf_values": [0.0, 0.0, 1.0]
        },
        {
          "split_indices": [0, 0, 0],
          "split_thresholds": [0.5, 0.0, 0.0],
          "left_children": [1, -1, -1],
          "right_children": [2, -1, -1],
          "leaf_values": [0.0, 0.0, 1.0]
        }
      ]
    }"#;
    let dir = tempfile::tempdir().unwrap();
    write_bundle(dir.path(), VOCABULARY, bad_model, LABELS, PRECAUTIONS);

    let err = artifacts::load_bundle(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        ArtifactError::InvalidNodeIndex {
            tree: 0,
            node: 0,
            child: 9,
            ..
        }
    ));
}
