use std::{io::Write, path::Path};

use crate::{parse::ReviewRecord, Result};

/// Every review row collected during a run, in storefront then page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<ReviewRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of one storefront's finished batch.
    pub fn append(&mut self, batch: Vec<ReviewRecord>) {
        self.records.extend(batch);
    }

    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(file)
    }

    /// Writes a header row followed by one row per record. A missing country is an empty field.
    pub fn write_to(&self, writer: impl Write) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        if self.records.is_empty() {
            wtr.write_record(COLUMNS)?;
        }
        for record in &self.records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

const COLUMNS: [&str; 11] = [
    "review_id",
    "title",
    "date",
    "country",
    "author",
    "author_url",
    "version",
    "rating",
    "review",
    "vote_count",
    "page",
];
