use chrono::{DateTime, Duration, Utc};

use crate::content::ParsedRecord;
use crate::error::IngestResult;

/// A record with its absolute timestamp reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datapoint {
    pub ts: DateTime<Utc>,
    pub fhra: i64,
    pub uc: i64,
    pub fm: i64,
}

/// Folds relative millisecond offsets into absolute timestamps. The clock
/// starts at the base timestamp and is advanced by each record's own offset
/// before that record is emitted, so row n's timestamp already includes
/// row n's offset. Strictly sequential; offsets are not validated, a
/// negative offset moves the clock backwards.
pub struct ClockFold<I> {
    clock: DateTime<Utc>,
    records: I,
    row: usize,
}

pub fn reconstruct<I>(base: DateTime<Utc>, records: I) -> ClockFold<I>
where
    I: Iterator<Item = IngestResult<ParsedRecord>>,
{
    ClockFold {
        clock: base,
        records,
        row: 0,
    }
}

impl<I> Iterator for ClockFold<I>
where
    I: Iterator<Item = IngestResult<ParsedRecord>>,
{
    type Item = IngestResult<Datapoint>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.records.next()? {
            Ok(record) => {
                self.row += 1;
                let advanced = self
                    .clock
                    .checked_add_signed(Duration::milliseconds(record.offset_ms));
                let Some(clock) = advanced else {
                    return Some(Err(crate::error::IngestError::MalformedRecord {
                        row: self.row,
                        reason: format!(
                            "offset {}ms moves the clock outside the representable range",
                            record.offset_ms
                        ),
                    }));
                };
                self.clock = clock;
                Some(Ok(Datapoint {
                    ts: self.clock,
                    fhra: record.fhra,
                    uc: record.uc,
                    fm: record.fm,
                }))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(offset_ms: i64) -> IngestResult<ParsedRecord> {
        Ok(ParsedRecord {
            offset_ms,
            fhra: 0,
            uc: 0,
            fm: 0,
        })
    }

    #[test]
    fn accumulates_offsets_from_base() {
        let base = Utc.with_ymd_and_hms(2023, 6, 15, 14, 30, 22).unwrap();
        let offsets = [100, 250, 50].into_iter().map(record);
        let times: Vec<DateTime<Utc>> = reconstruct(base, offsets)
            .map(|point| point.unwrap().ts)
            .collect();
        assert_eq!(
            times,
            vec![
                base + Duration::milliseconds(100),
                base + Duration::milliseconds(350),
                base + Duration::milliseconds(400),
            ]
        );
    }

    #[test]
    fn non_negative_offsets_yield_non_decreasing_timestamps() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let offsets = [0, 1, 0, 500, 2].into_iter().map(record);
        let times: Vec<DateTime<Utc>> = reconstruct(base, offsets)
            .map(|point| point.unwrap().ts)
            .collect();
        assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn negative_offsets_are_accepted_and_move_the_clock_backwards() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let offsets = [100, -40].into_iter().map(record);
        let times: Vec<DateTime<Utc>> = reconstruct(base, offsets)
            .map(|point| point.unwrap().ts)
            .collect();
        assert_eq!(times[1], base + Duration::milliseconds(60));
    }

    #[test]
    fn same_input_reconstructs_identically() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let run = || -> Vec<Datapoint> {
            reconstruct(base, [100, 250, 50].into_iter().map(record))
                .map(|point| point.unwrap())
                .collect()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn unrepresentable_offset_is_an_error_not_a_panic() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut fold = reconstruct(base, [100, i64::MAX].into_iter().map(record));
        assert!(fold.next().unwrap().is_ok());
        let err = fold.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            crate::error::IngestError::MalformedRecord { row: 2, .. }
        ));
    }

    #[test]
    fn record_errors_pass_through() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let records = vec![
            record(100),
            Err(crate::error::IngestError::MalformedRecord {
                row: 2,
                reason: "bad".to_string(),
            }),
        ];
        let mut fold = reconstruct(base, records.into_iter());
        assert!(fold.next().unwrap().is_ok());
        assert!(fold.next().unwrap().is_err());
    }
}
