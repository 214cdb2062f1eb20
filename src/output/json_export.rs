use crate::output::traits::{OutputResult, RecordExporter};
use crate::record::ItemRecord;
use std::io::{Read, Write};

/// Pretty-printed JSON array of record objects; missing values are `null`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl RecordExporter for JsonExporter {
    fn write_records(&self, records: &[ItemRecord], writer: &mut dyn Write) -> OutputResult<()> {
        serde_json::to_writer_pretty(&mut *writer, records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn read_records(&self, reader: &mut dyn Read) -> OutputResult<Vec<ItemRecord>> {
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ItemRecord> {
        vec![
            ItemRecord::new(
                "Lenovo V110",
                Some(321.94),
                Some(2.0),
                Some("Lenovo V110-15IAP, 15.6\" HD".to_string()),
                None,
                Some(5),
            )
            .unwrap(),
            ItemRecord::new("Bare listing", Some(0.0), None, None, None, None).unwrap(),
        ]
    }

    #[test]
    fn test_writes_array_of_objects() {
        let mut buffer = Vec::new();
        JsonExporter.write_records(&sample(), &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["name"], "Lenovo V110");
        assert_eq!(items[0]["price"], 321.94);
        assert!(items[0]["image"].is_null());
        assert_eq!(items[1]["reviews"], serde_json::Value::Null);
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let records = sample();
        let mut buffer = Vec::new();
        JsonExporter.write_records(&records, &mut buffer).unwrap();

        let read = JsonExporter.read_records(&mut buffer.as_slice()).unwrap();
        assert_eq!(read, records);
    }

    #[test]
    fn test_missing_name_rejected_on_read() {
        let text = r#"[{"name": "", "price": 1.0, "rating": null, "description": null, "image": null, "reviews": null}]"#;
        assert!(JsonExporter.read_records(&mut text.as_bytes()).is_err());
    }
}
