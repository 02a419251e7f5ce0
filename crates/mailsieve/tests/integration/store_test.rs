#[path = "../common/mod.rs"]
mod common;

use common::*;
use mailsieve_lib::{LabelStore, LabeledExample, MailsieveError};
use proptest::prelude::*;

#[test]
fn test_append_then_load_preserves_order() {
    let fixture = setup_test_fixture().unwrap();
    let store = fixture.training();

    store.append("Invoice attached", true).unwrap();
    store.append("Project status", false).unwrap();

    let dataset = store.load().unwrap();
    assert_eq!(dataset.len(), 4);
    assert_eq!(
        dataset.examples()[2..],
        [
            LabeledExample::new("Invoice attached", true),
            LabeledExample::new("Project status", false),
        ]
    );
    assert_eq!(
        fixture.training_contents(),
        "Invoice due|Yes\nLunch plans|No\nInvoice attached|Yes\nProject status|No"
    );
}

#[test]
fn test_append_after_trailing_newline() {
    let fixture = TestFixture::new("Invoice due|Yes\n", TEST_RECORDS).unwrap();

    fixture.training().append("Lunch plans", false).unwrap();

    assert_eq!(fixture.training_contents(), "Invoice due|Yes\nLunch plans|No");
}

#[test]
fn test_append_creates_missing_file() {
    let fixture = setup_test_fixture().unwrap();
    let store = LabelStore::new(fixture.temp_dir.path().join("fresh.txt"));

    store.append("Invoice due", true).unwrap();

    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "Invoice due|Yes");
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn test_rejected_text_is_not_written() {
    let fixture = setup_test_fixture().unwrap();
    let before = fixture.training_contents();

    for text in ["Invoice|due", "Invoice\ndue", "Invoice\rdue"] {
        let err = fixture.training().append(text, true).unwrap_err();
        assert!(matches!(err, MailsieveError::InvalidText(_)));
    }

    assert_eq!(fixture.training_contents(), before);
}

#[test]
fn test_malformed_line_reports_position() {
    let fixture = TestFixture::new("Invoice due|Yes\n\nLunch plans\n", TEST_RECORDS).unwrap();

    let err = fixture.training().load().unwrap_err();
    match err {
        MailsieveError::Format { path, line, content } => {
            assert_eq!(path, fixture.training_path);
            assert_eq!(line, 3);
            assert_eq!(content, "Lunch plans");
        }
        other => panic!("expected a format error, got {other:?}"),
    }
}

#[test]
fn test_label_token_variants() {
    let fixture = TestFixture::new(
        "a|Yes\nb|yes\nc| YES \nd|No\ne|maybe\nf|Yes|extra\ng|",
        TEST_RECORDS,
    )
    .unwrap();

    let labels = fixture.training().load().unwrap().labels();
    assert_eq!(labels, vec![true, true, true, false, false, true, false]);
}

#[test]
fn test_missing_file_is_io_error() {
    let fixture = setup_test_fixture().unwrap();
    let store = LabelStore::new(fixture.temp_dir.path().join("absent.txt"));

    assert!(matches!(store.load().unwrap_err(), MailsieveError::Io(_)));
}

proptest! {
    #[test]
    fn prop_appended_records_read_back(
        records in prop::collection::vec(("[^|\r\n]{0,40}", any::<bool>()), 1..12)
    ) {
        let fixture = TestFixture::new("", "").unwrap();
        let store = fixture.training();

        for (text, label) in &records {
            store.append(text, *label).unwrap();
        }

        let expected: Vec<LabeledExample> = records
            .iter()
            .map(|(text, label)| LabeledExample::new(text.as_str(), *label))
            .collect();
        let loaded = store.load().unwrap();
        prop_assert_eq!(loaded.examples(), expected.as_slice());
    }

    #[test]
    fn prop_append_grows_by_one(
        existing in prop::collection::vec(("[a-zA-Z0-9 ]{1,20}", any::<bool>()), 0..8),
        text in "[^|\r\n]{1,30}",
        label in any::<bool>(),
    ) {
        let lines: Vec<String> = existing
            .iter()
            .map(|(t, l)| LabeledExample::new(t.as_str(), *l).to_record())
            .collect();
        let fixture = TestFixture::new(&lines.join("\n"), "").unwrap();
        let store = fixture.training();

        let before = store.load().unwrap();
        store.append(&text, label).unwrap();
        let after = store.load().unwrap();

        prop_assert_eq!(after.len(), before.len() + 1);
        prop_assert_eq!(&after.examples()[..before.len()], before.examples());
        let appended = LabeledExample::new(text.as_str(), label);
        prop_assert_eq!(after.examples().last(), Some(&appended));
    }
}
