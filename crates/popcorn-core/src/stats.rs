use popcorn_models::WatchedRecord;
use serde::Serialize;

/// Summary figures shown above the watched list
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct WatchedStats {
    pub count: usize,
    pub mean_external_rating: f64,
    pub mean_user_rating: f64,
    pub mean_runtime_minutes: f64,
}

/// Mean of the values; 0 for an empty input
fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    values.sum::<f64>() / len as f64
}

pub fn compute_stats(records: &[WatchedRecord]) -> WatchedStats {
    WatchedStats {
        count: records.len(),
        mean_external_rating: mean(records.iter().map(|r| r.external_rating)),
        mean_user_rating: mean(records.iter().map(|r| f64::from(r.user_rating))),
        mean_runtime_minutes: mean(records.iter().map(|r| f64::from(r.runtime_minutes))),
    }
}
