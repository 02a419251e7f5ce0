#[path = "../common/mod.rs"]
mod common;

use common::*;
use mailsieve_lib::{
    format_accuracy, Dataset, FeaturizerOptions, Hyperparameters, LabeledExample,
    MailsieveError, TrainedModel,
};
use proptest::prelude::*;

fn train(dataset: &Dataset) -> TrainedModel {
    TrainedModel::train(dataset, &FeaturizerOptions::default(), &Hyperparameters::default())
        .unwrap()
}

fn flipped(dataset: &Dataset) -> Dataset {
    dataset
        .iter()
        .map(|e| LabeledExample::new(e.text.as_str(), !e.label))
        .collect()
}

#[test]
fn test_two_record_scenario() {
    let model = train(&dataset(&[("Invoice due", true), ("Lunch plans", false)]));
    let report = model
        .evaluate(&dataset(&[("Payment due", true), ("Team meeting", false)]))
        .unwrap();

    assert_eq!(report.accuracy, 1.0);
    assert_eq!(format_accuracy(report.accuracy), "Accuracy of the Model = 100%");
    assert!(model.predict("Invoice attached").label);
    assert!(!model.predict("Project status").label);
}

#[test]
fn test_training_is_deterministic() {
    let corpus = invoice_corpus();
    let first = train(&corpus);
    let second = train(&corpus);

    assert_eq!(first.classifier(), second.classifier());
    assert_eq!(first.transform().dimension(), second.transform().dimension());
    for subject in ["Invoice overdue", "Team lunch", "", "???"] {
        assert_eq!(first.predict(subject), second.predict(subject));
    }
}

#[test]
fn test_corpus_fits_training_data() {
    let corpus = invoice_corpus();
    let model = train(&corpus);

    let report = model.evaluate(&corpus).unwrap();
    assert_eq!(report.total, 12);
    assert_eq!(report.accuracy, 1.0);
    assert_eq!(report.false_positives + report.false_negatives, 0);
}

#[test]
fn test_flipped_labels_score_the_complement() {
    let corpus = invoice_corpus();
    let model = train(&corpus);

    let straight = model.evaluate(&corpus).unwrap();
    let inverted = model.evaluate(&flipped(&corpus)).unwrap();

    assert_eq!(straight.correct() + inverted.correct(), corpus.len());
    assert!(inverted.accuracy < 1.0);
}

#[test]
fn test_generalizes_to_unseen_subjects() {
    let model = train(&invoice_corpus());

    let invoice = model.predict("Invoice overdue");
    assert!(invoice.label);
    assert!(invoice.probability > 0.5);

    let chatter = model.predict("Lunch tomorrow");
    assert!(!chatter.label);
    assert!(chatter.probability < 0.5);
}

#[test]
fn test_unknown_text_gets_a_verdict() {
    let model = train(&invoice_corpus());
    let prediction = model.predict("zzz qqq");

    assert!(prediction.score.is_finite());
    assert!((0.0..=1.0).contains(&prediction.probability));
    assert_eq!(prediction.label, prediction.score > 0.0);
}

#[test]
fn test_single_class_training_fails() {
    let only_invoices = dataset(&[("Invoice due", true), ("Invoice paid", true)]);
    let options = FeaturizerOptions::default();
    let params = Hyperparameters::default();
    let err = TrainedModel::train(&only_invoices, &options, &params).unwrap_err();
    assert!(matches!(err, MailsieveError::TrainingData(_)));

    let empty = Dataset::default();
    let err = TrainedModel::train(&empty, &options, &params).unwrap_err();
    assert!(matches!(err, MailsieveError::TrainingData(_)));
}

#[test]
fn test_empty_test_set_fails() {
    let model = train(&invoice_corpus());
    let err = model.evaluate(&Dataset::default()).unwrap_err();
    assert!(matches!(err, MailsieveError::EmptyDataset(_)));
}

#[test]
fn test_tree_budget_is_respected() {
    let params = Hyperparameters {
        num_trees: 5,
        num_leaves: 3,
        ..Hyperparameters::default()
    };
    let model =
        TrainedModel::train(&invoice_corpus(), &FeaturizerOptions::default(), &params).unwrap();

    assert_eq!(model.classifier().tree_count(), 5);
    for tree in model.classifier().trees() {
        assert!(tree.leaf_count() <= 3);
    }
}

#[test]
fn test_large_vocabulary_trains_on_sparse_rows() {
    let corpus: Dataset = (0..150)
        .flat_map(|i| {
            [
                LabeledExample::new(format!("Invoice {} for account {}", 1000 + i, i * 7), true),
                LabeledExample::new(format!("Meeting {} about project {}", 5000 + i, i * 11), false),
            ]
        })
        .collect();
    let model = train(&corpus);

    let dimension = model.transform().dimension();
    assert!(dimension > 1500);
    for example in corpus.iter() {
        let row = model.transform().transform(&example.text);
        assert!(row.nnz() < 60);
        assert!(row.entries().iter().all(|&(idx, _)| idx < dimension));
    }

    assert_eq!(model.evaluate(&corpus).unwrap().accuracy, 1.0);
    assert!(model.predict("Invoice 9999 for account 42").label);
    assert!(!model.predict("Meeting 9999 about project 42").label);
}

#[test]
fn test_word_only_features() {
    let options = FeaturizerOptions {
        char_ngrams: 0,
        ..FeaturizerOptions::default()
    };
    let model =
        TrainedModel::train(&invoice_corpus(), &options, &Hyperparameters::default()).unwrap();

    assert!((0..model.transform().dimension())
        .filter_map(|i| model.transform().term(i))
        .all(|term| term.starts_with("w:")));
    assert!(model.predict("Your invoice").label);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_accuracy_is_a_fraction(
        subjects in prop::collection::vec(("[a-z]{1,8}( [a-z]{1,8}){0,3}", any::<bool>()), 1..10)
    ) {
        let model = train(&invoice_corpus());
        let test: Dataset = subjects
            .iter()
            .map(|(text, label)| LabeledExample::new(text.as_str(), *label))
            .collect();

        let report = model.evaluate(&test).unwrap();
        prop_assert!((0.0..=1.0).contains(&report.accuracy));
        prop_assert_eq!(report.total, test.len());
        prop_assert_eq!(
            report.true_positives
                + report.true_negatives
                + report.false_positives
                + report.false_negatives,
            report.total
        );
    }
}
