#![allow(dead_code)]

use mailsieve_lib::{LabelStore, Result};
use std::path::PathBuf;
use tempfile::TempDir;

pub use helpers::*;

pub const TRAINING_RECORDS: &str = "Invoice due|Yes\nLunch plans|No";
pub const TEST_RECORDS: &str = "Payment due|Yes\nTeam meeting|No";

pub struct TestFixture {
    pub temp_dir: TempDir,
    pub training_path: PathBuf,
    pub test_path: PathBuf,
}

impl TestFixture {
    pub fn new(training: &str, test: &str) -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let training_path = temp_dir.path().join("training.txt");
        let test_path = temp_dir.path().join("test.txt");
        std::fs::write(&training_path, training)?;
        std::fs::write(&test_path, test)?;

        Ok(Self {
            temp_dir,
            training_path,
            test_path,
        })
    }

    pub fn training(&self) -> LabelStore {
        LabelStore::new(&self.training_path)
    }

    pub fn test(&self) -> LabelStore {
        LabelStore::new(&self.test_path)
    }

    pub fn training_contents(&self) -> String {
        std::fs::read_to_string(&self.training_path).unwrap()
    }
}

pub fn setup_test_fixture() -> Result<TestFixture> {
    TestFixture::new(TRAINING_RECORDS, TEST_RECORDS)
}
