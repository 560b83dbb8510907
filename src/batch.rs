use chrono::{DateTime, Utc};

use crate::filename::FilenameToken;
use crate::timeline::Datapoint;

pub const FHRA_SERIES: &str = "sisporto.fhra";
pub const UC_SERIES: &str = "sisporto.uc";
pub const FM_SERIES: &str = "sisporto.fm";

/// Identity labels shared by all three series of one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub start: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSeries {
    pub name: &'static str,
    pub labels: Labels,
    pub points: Vec<(DateTime<Utc>, i64)>,
}

impl TimeSeries {
    fn new(name: &'static str, labels: Labels) -> Self {
        Self {
            name,
            labels,
            points: Vec::new(),
        }
    }
}

/// The three series produced from one source file. They grow in lockstep,
/// one triple per reconstructed record, and are pushed as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub fhra: TimeSeries,
    pub uc: TimeSeries,
    pub fm: TimeSeries,
}

impl Batch {
    pub fn new(token: &FilenameToken) -> Self {
        let labels = Labels {
            start: token.start.clone(),
            id: token.id.clone(),
        };
        Self {
            fhra: TimeSeries::new(FHRA_SERIES, labels.clone()),
            uc: TimeSeries::new(UC_SERIES, labels.clone()),
            fm: TimeSeries::new(FM_SERIES, labels),
        }
    }

    pub fn append(&mut self, point: &Datapoint) {
        self.fhra.points.push((point.ts, point.fhra));
        self.uc.points.push((point.ts, point.uc));
        self.fm.points.push((point.ts, point.fm));
    }

    /// Datapoints per series (identical across the three by construction).
    pub fn len(&self) -> usize {
        self.fhra.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fhra.points.is_empty()
    }

    pub fn series(&self) -> [&TimeSeries; 3] {
        [&self.fhra, &self.uc, &self.fm]
    }

    /// Warp10 plaintext update body: one
    /// `<ts_us>// <class>{start=<v>,id=<v>} <value>` line per datapoint,
    /// series in registration order, points in insertion order.
    pub fn to_update_body(&self) -> String {
        let mut body = String::new();
        for series in self.series() {
            for (ts, value) in &series.points {
                body.push_str(&format!(
                    "{}// {}{{start={},id={}}} {}\n",
                    ts.timestamp_micros(),
                    series.name,
                    series.labels.start,
                    series.labels.id,
                    value
                ));
            }
        }
        body
    }
}
