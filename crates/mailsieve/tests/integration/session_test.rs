#[path = "../common/mod.rs"]
mod common;

use common::*;
use mailsieve_lib::{
    derive_label, IterationOutcome, LabeledExample, MailsieveError, QueueSource,
    RecordingObserver, ScriptedFeedback, Session, SessionState,
};
use proptest::prelude::*;

#[test]
fn test_affirmed_prediction_is_stored() {
    let fixture = setup_test_fixture().unwrap();
    let mut observer = RecordingObserver::default();

    let mut session = Session::new(
        fixture.training(),
        fixture.test(),
        QueueSource::new(["Invoice attached"]),
        ScriptedFeedback::new([true]),
        &mut observer,
    );
    let summary = session.run().unwrap();
    assert_eq!(session.state(), SessionState::Stopped);
    drop(session);

    assert_eq!(summary.appended, 1);
    assert_eq!(summary.iterations, 2);
    assert_eq!(
        observer.lines[..2],
        ["Accuracy of the Model = 100%", "This is an Invoice"]
    );
    assert_eq!(observer.persisted, vec![LabeledExample::new("Invoice attached", true)]);

    let records = fixture.training().load().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records.examples().last(), Some(&LabeledExample::new("Invoice attached", true)));
}

#[test]
fn test_rejected_prediction_stores_opposite_label() {
    let fixture = setup_test_fixture().unwrap();
    let mut observer = RecordingObserver::default();

    let mut session = Session::new(
        fixture.training(),
        fixture.test(),
        QueueSource::new(["Project status"]),
        ScriptedFeedback::new([false]),
        &mut observer,
    );
    session.run().unwrap();
    drop(session);

    assert_eq!(observer.predictions, vec![("Project status".to_string(), false)]);
    assert_eq!(observer.lines[1], "This is NOT an Invoice");

    insta::assert_snapshot!(fixture.training_contents(), @r"
    Invoice due|Yes
    Lunch plans|No
    Project status|Yes
    ");
}

#[test]
fn test_immediate_exit_leaves_store_unchanged() {
    let fixture = setup_test_fixture().unwrap();
    let before = fixture.training_contents();
    let mut observer = RecordingObserver::default();

    let mut session = Session::new(
        fixture.training(),
        fixture.test(),
        QueueSource::default(),
        ScriptedFeedback::default(),
        &mut observer,
    );
    let summary = session.run().unwrap();
    drop(session);

    assert_eq!(summary.iterations, 1);
    assert_eq!(summary.appended, 0);
    assert_eq!(observer.lines, vec!["Accuracy of the Model = 100%".to_string()]);
    assert_eq!(fixture.training_contents(), before);
}

#[test]
fn test_each_round_trains_on_previous_labels() {
    let fixture = setup_test_fixture().unwrap();
    let subjects = ["Invoice attached", "Project status", "Payment overdue", "Team lunch"];
    let answers = [true, false, true, true];

    let mut session = Session::new(
        fixture.training(),
        fixture.test(),
        QueueSource::new(subjects),
        ScriptedFeedback::new(answers),
        (),
    );

    let mut expected_len = 2;
    for (subject, affirmed) in subjects.iter().zip(answers) {
        let IterationOutcome::Labeled(record) = session.step().unwrap() else {
            panic!("session stopped early");
        };
        expected_len += 1;

        assert_eq!(record.text, *subject);
        assert_eq!(record.affirmed, affirmed);
        assert_eq!(record.label, derive_label(record.prediction.label, affirmed));
        assert_eq!(session.state(), SessionState::Loading);

        let records = fixture.training().load().unwrap();
        assert_eq!(records.len(), expected_len);
        assert_eq!(
            records.examples().last(),
            Some(&LabeledExample::new(*subject, record.label))
        );
    }

    assert_eq!(session.step().unwrap(), IterationOutcome::Stopped);
    assert_eq!(fixture.training().count().unwrap(), 6);
}

#[test]
fn test_malformed_store_aborts_without_append() {
    let fixture = TestFixture::new("Invoice due|Yes\nLunch plans\n", TEST_RECORDS).unwrap();
    let before = fixture.training_contents();

    let mut session = Session::new(
        fixture.training(),
        fixture.test(),
        QueueSource::new(["Invoice attached"]),
        ScriptedFeedback::new([true]),
        (),
    );

    let err = session.run().unwrap_err();
    assert!(matches!(err, MailsieveError::Format { line: 2, .. }));
    assert_eq!(session.source().remaining(), 1);
    assert_eq!(fixture.training_contents(), before);
}

#[test]
fn test_empty_test_set_aborts() {
    let fixture = TestFixture::new(TRAINING_RECORDS, "\n").unwrap();

    let mut session = Session::new(
        fixture.training(),
        fixture.test(),
        QueueSource::new(["Invoice attached"]),
        ScriptedFeedback::new([true]),
        (),
    );

    assert!(matches!(session.run().unwrap_err(), MailsieveError::EmptyDataset(_)));
    assert_eq!(fixture.training().count().unwrap(), 2);
}

#[test]
fn test_missing_feedback_aborts_before_persisting() {
    let fixture = setup_test_fixture().unwrap();

    let mut session = Session::new(
        fixture.training(),
        fixture.test(),
        QueueSource::new(["Invoice attached"]),
        ScriptedFeedback::default(),
        (),
    );

    assert!(matches!(session.step().unwrap_err(), MailsieveError::UserInput(_)));
    assert_eq!(session.state(), SessionState::Loading);
    assert_eq!(fixture.training().count().unwrap(), 2);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_store_grows_by_one_per_round(answers in prop::collection::vec(any::<bool>(), 1..5)) {
        let fixture = setup_test_fixture().unwrap();
        let subjects: Vec<String> = (0..answers.len())
            .map(|i| format!("Subject number {}", i))
            .collect();

        let mut observer = RecordingObserver::default();
        let mut session = Session::new(
            fixture.training(),
            fixture.test(),
            QueueSource::new(subjects.clone()),
            ScriptedFeedback::new(answers.clone()),
            &mut observer,
        );
        let summary = session.run().unwrap();
        drop(session);

        prop_assert_eq!(summary.appended, answers.len());
        prop_assert_eq!(summary.iterations, answers.len() + 1);
        prop_assert_eq!(observer.accuracies.len(), answers.len() + 1);

        let records = fixture.training().load().unwrap();
        prop_assert_eq!(records.len(), 2 + answers.len());
        let rounds = observer.predictions.iter().zip(&answers).enumerate();
        for (i, ((subject, predicted), affirmed)) in rounds {
            let stored = &records.examples()[2 + i];
            prop_assert_eq!(&stored.text, subject);
            prop_assert_eq!(stored.label, derive_label(*predicted, *affirmed));
        }
    }
}
