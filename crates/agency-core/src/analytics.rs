//! Lead Analytics
//!
//! Totals per status plus a weekly breakdown of the last six weeks. Weeks
//! start on Monday (UTC).

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{Lead, LeadStatus};

/// Days of history covered by the weekly breakdown
pub const WEEKLY_WINDOW_DAYS: i64 = 42;

/// Maximum number of weeks reported
pub const MAX_WEEKS: usize = 6;

/// Lead counts for one week
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyStat {
    /// Monday the week starts on
    pub week: NaiveDate,
    pub received: u64,
    pub converted: u64,
    pub rejected: u64,
}

/// Agency lead analytics
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadAnalytics {
    pub total_leads: u64,
    pub converted_leads: u64,
    pub rejected_leads: u64,
    /// Newest week first
    pub weekly_stats: Vec<WeeklyStat>,
}

impl LeadAnalytics {
    pub fn compute(leads: &[Lead], now: DateTime<Utc>) -> Self {
        let count = |status: LeadStatus| leads.iter().filter(|l| l.status == status).count() as u64;

        let since = now - Duration::days(WEEKLY_WINDOW_DAYS);
        let mut weeks: BTreeMap<NaiveDate, WeeklyStat> = BTreeMap::new();

        for lead in leads.iter().filter(|l| l.created_at >= since) {
            let week = week_start(lead.created_at);
            let stat = weeks.entry(week).or_insert_with(|| WeeklyStat {
                week,
                received: 0,
                converted: 0,
                rejected: 0,
            });

            stat.received += 1;
            match lead.status {
                LeadStatus::Converted => stat.converted += 1,
                LeadStatus::Rejected => stat.rejected += 1,
                _ => {}
            }
        }

        Self {
            total_leads: leads.len() as u64,
            converted_leads: count(LeadStatus::Converted),
            rejected_leads: count(LeadStatus::Rejected),
            weekly_stats: weeks.into_values().rev().take(MAX_WEEKS).collect(),
        }
    }
}

/// Monday of the week containing `at`
pub fn week_start(at: DateTime<Utc>) -> NaiveDate {
    let date = at.date_naive();
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{AgencyId, UserId};
    use chrono::TimeZone;

    fn lead_at(created_at: DateTime<Utc>, status: LeadStatus) -> Lead {
        let mut lead = Lead::new(AgencyId::from_string("a1"), UserId::from_string("u1"), "t", "d");
        lead.created_at = created_at;
        lead.status = status;
        lead
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2026-10-15 is a Thursday
        let thursday = Utc.with_ymd_and_hms(2026, 10, 15, 18, 30, 0).unwrap();
        assert_eq!(week_start(thursday), NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());

        let monday = Utc.with_ymd_and_hms(2026, 10, 12, 0, 0, 0).unwrap();
        assert_eq!(week_start(monday), NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
    }

    #[test]
    fn test_totals_and_weekly_breakdown() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();
        let leads = vec![
            lead_at(now - Duration::days(1), LeadStatus::Converted),
            lead_at(now - Duration::days(2), LeadStatus::New),
            lead_at(now - Duration::days(8), LeadStatus::Rejected),
            // outside the weekly window but still counted in totals
            lead_at(now - Duration::days(60), LeadStatus::Converted),
        ];

        let analytics = LeadAnalytics::compute(&leads, now);
        assert_eq!(analytics.total_leads, 4);
        assert_eq!(analytics.converted_leads, 2);
        assert_eq!(analytics.rejected_leads, 1);

        assert_eq!(analytics.weekly_stats.len(), 2);
        let latest = &analytics.weekly_stats[0];
        assert_eq!(latest.week, NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
        assert_eq!((latest.received, latest.converted, latest.rejected), (2, 1, 0));

        let previous = &analytics.weekly_stats[1];
        assert_eq!(previous.week, NaiveDate::from_ymd_opt(2026, 10, 5).unwrap());
        assert_eq!((previous.received, previous.converted, previous.rejected), (1, 0, 1));
    }

    #[test]
    fn test_at_most_six_weeks() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();
        let leads: Vec<Lead> = (0..WEEKLY_WINDOW_DAYS)
            .map(|d| lead_at(now - Duration::days(d), LeadStatus::New))
            .collect();

        let analytics = LeadAnalytics::compute(&leads, now);
        assert_eq!(analytics.weekly_stats.len(), MAX_WEEKS);
        assert!(analytics.weekly_stats.windows(2).all(|w| w[0].week > w[1].week));
    }

    #[test]
    fn test_empty() {
        let analytics = LeadAnalytics::compute(&[], Utc::now());
        assert_eq!(analytics.total_leads, 0);
        assert!(analytics.weekly_stats.is_empty());
    }
}
