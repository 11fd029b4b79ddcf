//! Dashboard metrics over an inspection history.
//!
//! Every function is pure and takes the reference date and UTC offset
//! explicitly, so "today" is whatever the caller says it is.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::signature::FinalizedInspection;
use crate::status::VehicleStatus;
use crate::types::{DbId, Timestamp};

/// Number of buckets in [`weekly_activity`].
pub const WEEK_DAYS: usize = 7;

/// Calendar date of `ts` in the given offset.
pub fn local_date(ts: Timestamp, offset: FixedOffset) -> NaiveDate {
    ts.with_timezone(&offset).date_naive()
}

// ---------------------------------------------------------------------------
// Streak
// ---------------------------------------------------------------------------

/// Consecutive days with at least one inspection, counting back from `today`.
///
/// Today is not required to have an entry yet: when it has none the count
/// starts from yesterday. The first empty day after that ends the streak.
pub fn streak(history: &[FinalizedInspection], today: NaiveDate, offset: FixedOffset) -> u32 {
    let days: HashSet<NaiveDate> = history
        .iter()
        .map(|r| local_date(r.created_at, offset))
        .collect();

    let mut count = 0;
    let mut day = today;
    let mut first = true;
    loop {
        if days.contains(&day) {
            count += 1;
        } else if !first {
            break;
        }
        first = false;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    count
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectorRank {
    pub inspector_id: DbId,
    pub name: String,
    pub count: u32,
}

/// Inspection counts per inspector, busiest first.
///
/// Ties keep the order in which inspectors first appear in `history`.
/// `names` supplies current profile names; the name stamped on the record is
/// used for anyone missing from it.
pub fn rank_inspectors(
    history: &[FinalizedInspection],
    names: &HashMap<DbId, String>,
) -> Vec<InspectorRank> {
    let mut ranks: Vec<InspectorRank> = Vec::new();
    let mut index: HashMap<DbId, usize> = HashMap::new();

    for record in history {
        match index.get(&record.inspector_id) {
            Some(&i) => ranks[i].count += 1,
            None => {
                index.insert(record.inspector_id, ranks.len());
                let name = names
                    .get(&record.inspector_id)
                    .cloned()
                    .unwrap_or_else(|| record.inspector_name.clone());
                ranks.push(InspectorRank {
                    inspector_id: record.inspector_id,
                    name,
                    count: 1,
                });
            }
        }
    }

    // Vec::sort_by is stable.
    ranks.sort_by(|a, b| b.count.cmp(&a.count));
    ranks
}

// ---------------------------------------------------------------------------
// Rates and lists
// ---------------------------------------------------------------------------

/// Percentage of operational inspections, rounded half up. Empty history is 0.
pub fn pass_rate(history: &[FinalizedInspection]) -> u32 {
    let total = history.len().max(1) as u64;
    let operational = history
        .iter()
        .filter(|r| r.status == VehicleStatus::Operational)
        .count() as u64;
    ((200 * operational + total) / (2 * total)) as u32
}

/// Inspections whose truck is grounded or being monitored, in input order.
pub fn attention_list(history: &[FinalizedInspection]) -> Vec<&FinalizedInspection> {
    history
        .iter()
        .filter(|r| r.status.needs_attention())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u32,
}

/// Inspection counts for the seven days ending `today`, oldest first.
pub fn weekly_activity(
    history: &[FinalizedInspection],
    today: NaiveDate,
    offset: FixedOffset,
) -> Vec<DailyCount> {
    let mut buckets: Vec<DailyCount> = (0..WEEK_DAYS as i64)
        .rev()
        .map(|back| DailyCount {
            date: today - Duration::days(back),
            count: 0,
        })
        .collect();

    for record in history {
        let date = local_date(record.created_at, offset);
        if let Some(bucket) = buckets.iter_mut().find(|b| b.date == date) {
            bucket.count += 1;
        }
    }
    buckets
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Everything the dashboard shows, computed in one pass of calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub pass_rate: u32,
    pub streak: u32,
    pub weekly_activity: Vec<DailyCount>,
    pub attention: Vec<FinalizedInspection>,
    pub rankings: Vec<InspectorRank>,
}

pub fn summarize(
    history: &[FinalizedInspection],
    names: &HashMap<DbId, String>,
    now: Timestamp,
    offset: FixedOffset,
) -> DashboardSummary {
    let today = local_date(now, offset);
    DashboardSummary {
        total: history.len(),
        pass_rate: pass_rate(history),
        streak: streak(history, today, offset),
        weekly_activity: weekly_activity(history, today, offset),
        attention: attention_list(history).into_iter().cloned().collect(),
        rankings: rank_inspectors(history, names),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
