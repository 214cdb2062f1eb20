use crate::output::traits::{OutputResult, RecordExporter};
use crate::record::ItemRecord;
use std::io::{Read, Write};

/// Comma-separated export with a header row; missing values are empty cells
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl RecordExporter for CsvExporter {
    fn write_records(&self, records: &[ItemRecord], writer: &mut dyn Write) -> OutputResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for record in records {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    fn read_records(&self, reader: &mut dyn Read) -> OutputResult<Vec<ItemRecord>> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();
        for record in csv_reader.deserialize::<ItemRecord>() {
            records.push(record?);
        }
        Ok(records)
    }
}
