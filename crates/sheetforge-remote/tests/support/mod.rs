use std::sync::Mutex;

use sheetforge_remote::ServiceError;
use sheetforge_remote::traits::{
    CellMatrix, Request, SpreadsheetMetadata, SpreadsheetReader, SpreadsheetWriter, Translator,
};

/// In-memory sheet service recording every call it receives.
pub struct FakeSheets {
    pub metadata: Result<SpreadsheetMetadata, ServiceError>,
    /// Row returned for any successful values read.
    pub header_row: Vec<String>,
    /// Ranges (in request order) whose reads fail.
    pub failing_ranges: Vec<String>,
    pub value_reads: Mutex<Vec<String>>,
    pub metadata_reads: Mutex<usize>,
    pub batches: Mutex<Vec<Vec<Request>>>,
}

impl FakeSheets {
    pub fn new(metadata: SpreadsheetMetadata, header_row: Vec<&str>) -> Self {
        FakeSheets {
            metadata: Ok(metadata),
            header_row: header_row.into_iter().map(str::to_string).collect(),
            failing_ranges: Vec::new(),
            value_reads: Mutex::new(Vec::new()),
            metadata_reads: Mutex::new(0),
            batches: Mutex::new(Vec::new()),
        }
    }
}

impl SpreadsheetReader for FakeSheets {
    fn read_values(
        &self,
        _spreadsheet_id: &str,
        ranges: &[String],
    ) -> Result<Vec<CellMatrix>, ServiceError> {
        let mut reads = self.value_reads.lock().unwrap();
        for range in ranges {
            reads.push(range.clone());
            if self.failing_ranges.contains(range) {
                return Err(ServiceError(format!("read failed for {range}")));
            }
        }
        Ok(vec![vec![self.header_row.clone()]; ranges.len()])
    }

    fn read_metadata(&self, _spreadsheet_id: &str) -> Result<SpreadsheetMetadata, ServiceError> {
        *self.metadata_reads.lock().unwrap() += 1;
        self.metadata.clone()
    }
}

impl SpreadsheetWriter for FakeSheets {
    fn batch_update(
        &self,
        _spreadsheet_id: &str,
        requests: Vec<Request>,
    ) -> Result<(), ServiceError> {
        self.batches.lock().unwrap().push(requests);
        Ok(())
    }
}

/// Translator that echoes a fixed output and counts invocations.
pub struct FakeTranslator {
    pub output: Result<Vec<String>, ServiceError>,
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl FakeTranslator {
    pub fn returning(output: Vec<&str>) -> Self {
        FakeTranslator {
            output: Ok(output.into_iter().map(str::to_string).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        FakeTranslator {
            output: Err(ServiceError(message.to_string())),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Translator for FakeTranslator {
    fn translate(
        &self,
        texts: &[String],
        _source_language: &str,
        _target_language: &str,
    ) -> Result<Vec<String>, ServiceError> {
        self.calls.lock().unwrap().push(texts.to_vec());
        self.output.clone()
    }
}
