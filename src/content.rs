use crate::error::{IngestError, IngestResult};

/// One decoded content row. `offset_ms` is relative to the previous record
/// (the first record is relative to the filename's base timestamp).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedRecord {
    pub offset_ms: i64,
    pub fhra: i64,
    pub uc: i64,
    pub fm: i64,
}

/// Strips the fixed two-line header and normalizes the tab-delimited body
/// into a comma-delimited block. Pure; a file with fewer than two lines
/// after the header yields an empty block.
pub fn normalize(raw: &str) -> String {
    let mut block = String::with_capacity(raw.len());
    for line in raw.lines().skip(2) {
        block.push_str(&line.replace('\t', ","));
        block.push('\n');
    }
    block
}

/// Lazy, single-pass reader over a normalized block. The first row is a
/// mandatory units row, consumed and discarded at construction; every
/// subsequent row must expose at least five fields with integers at
/// indexes 0 (offset ms), 1 (fhra), 3 (uc) and 4 (fm).
pub struct RecordReader<'a> {
    rows: csv::StringRecordsIntoIter<&'a [u8]>,
    row: usize,
}

impl<'a> RecordReader<'a> {
    pub fn new(block: &'a str) -> IngestResult<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(block.as_bytes());
        let mut rows = reader.into_records();
        match rows.next() {
            Some(Ok(_units_row)) => Ok(Self { rows, row: 0 }),
            Some(Err(err)) => Err(IngestError::MalformedContent(format!(
                "unreadable units row: {err}"
            ))),
            None => Err(IngestError::MalformedContent(
                "decoded block is empty; expected a units row".to_string(),
            )),
        }
    }

    fn parse_field(&self, record: &csv::StringRecord, index: usize) -> IngestResult<i64> {
        let raw = &record[index];
        raw.trim()
            .parse::<i64>()
            .map_err(|err| IngestError::MalformedRecord {
                row: self.row,
                reason: format!("field {index} {raw:?} is not an integer: {err}"),
            })
    }
}

impl Iterator for RecordReader<'_> {
    type Item = IngestResult<ParsedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.rows.next()? {
            Ok(record) => record,
            Err(err) => {
                return Some(Err(IngestError::MalformedRecord {
                    row: self.row + 1,
                    reason: err.to_string(),
                }))
            }
        };
        self.row += 1;

        if record.len() < 5 {
            return Some(Err(IngestError::MalformedRecord {
                row: self.row,
                reason: format!("expected at least 5 fields, found {}", record.len()),
            }));
        }

        let parsed = self
            .parse_field(&record, 0)
            .and_then(|offset_ms| {
                Ok(ParsedRecord {
                    offset_ms,
                    fhra: self.parse_field(&record, 1)?,
                    uc: self.parse_field(&record, 3)?,
                    fm: self.parse_field(&record, 4)?,
                })
            });
        Some(parsed)
    }
}
