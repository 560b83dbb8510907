use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{IngestError, IngestResult};

/// Identity metadata encoded in a `.SIM` filename:
/// `<start>-<id>-<YYYYMMDD>-<HHMMSS>...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameToken {
    pub start: String,
    pub id: String,
    pub base: DateTime<Utc>,
}

pub fn parse_filename(name: &str) -> IngestResult<FilenameToken> {
    let malformed = |reason: String| IngestError::MalformedFilename {
        name: name.to_string(),
        reason,
    };

    // Everything after the third hyphen belongs to the time segment; names
    // like `A1-42-20230615-143022-tail.SIM` carry a trailing marker there.
    let segments: Vec<&str> = name.splitn(4, '-').collect();
    if segments.len() != 4 {
        return Err(malformed(format!(
            "expected 4 hyphen-delimited segments, found {}",
            segments.len()
        )));
    }

    let date = segments[2];
    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(format!(
            "date segment {date:?} is not 8 digits (YYYYMMDD)"
        )));
    }
    let time = segments[3];
    if time.len() < 6 || !time.as_bytes()[..6].iter().all(|b| b.is_ascii_digit()) {
        return Err(malformed(format!(
            "time segment {time:?} does not start with 6 digits (HHMMSS)"
        )));
    }

    let field = |digits: &str| -> IngestResult<u32> {
        digits
            .parse()
            .map_err(|err| malformed(format!("segment {digits:?} is not numeric: {err}")))
    };
    let year = field(&date[0..4])? as i32;
    let month = field(&date[4..6])?;
    let day = field(&date[6..8])?;
    let hour = field(&time[0..2])?;
    let minute = field(&time[2..4])?;
    let second = field(&time[4..6])?;

    let base = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .ok_or_else(|| malformed(format!("invalid calendar date/time {date} {time}")))?
        .and_utc();

    Ok(FilenameToken {
        start: segments[0].to_string(),
        id: segments[1].to_string(),
        base,
    })
}
