//! Daily and weekly statistics.
//!
//! Aggregates stored session records and breathing logs into the numbers
//! shown by `foco stats`:
//! - Sessions started and completed, completion rate
//! - Focus minutes (time the countdown ran, pauses excluded) and interruptions
//! - Breathing sessions
//! - Weekly goal progress (weeks start on Monday), best day and streak

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{level_for_points, StoreState};

/// Weekly targets set by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeeklyGoals {
    pub focus_minutes: u32,
    pub breathing_sessions: u32,
}

impl Default for WeeklyGoals {
    fn default() -> Self {
        Self {
            focus_minutes: 600,
            breathing_sessions: 5,
        }
    }
}

/// Statistics for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: Option<NaiveDate>,
    /// Work phases started
    pub sessions: u32,
    /// Work phases that ran to completion
    pub completed_sessions: u32,
    pub focus_minutes: u32,
    pub interruptions: u32,
    /// Completion rate as percentage (0-100)
    pub completion_rate: u32,
    pub breathing_sessions: u32,
}

impl DailyStats {
    /// Calculates the statistics for `date` as seen in `tz`.
    pub fn for_date<Tz: TimeZone>(state: &StoreState, date: NaiveDate, tz: &Tz) -> Self {
        let from = start_of_day(date, tz);
        let to = start_of_day(date + Days::new(1), tz);

        let sessions = state.sessions_between(from, to);
        let total = sessions.len() as u32;
        let completed = sessions.iter().filter(|s| s.was_completed).count() as u32;
        let focus_seconds: u64 = sessions.iter().map(|s| u64::from(s.focus_seconds())).sum();
        let interruptions = sessions.iter().map(|s| s.interruption_count).sum();

        Self {
            date: Some(date),
            sessions: total,
            completed_sessions: completed,
            focus_minutes: (focus_seconds / 60) as u32,
            interruptions,
            completion_rate: percentage(completed, total),
            breathing_sessions: state.breathing_between(from, to).len() as u32,
        }
    }

    /// Focus time as (hours, minutes).
    pub fn focus_time(&self) -> (u32, u32) {
        (self.focus_minutes / 60, self.focus_minutes % 60)
    }

    /// A day counts towards the streak once some focus was recorded.
    pub fn is_active(&self) -> bool {
        self.focus_minutes > 0 || self.completed_sessions > 0
    }
}

/// Statistics for a Monday-to-Sunday week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub days: Vec<DailyStats>,
    pub focus_minutes: u32,
    pub completed_sessions: u32,
    pub breathing_sessions: u32,
    pub goals: WeeklyGoals,
    /// Progress towards the focus goal (0-100)
    pub focus_goal_progress: u32,
    /// Progress towards the breathing goal (0-100)
    pub breathing_goal_progress: u32,
    pub magic_points: u64,
    pub level: u64,
    /// Consecutive active days ending on the reference date
    pub streak_days: u32,
    /// Day of the week with the most focus minutes
    pub best_day: Option<NaiveDate>,
    pub best_day_minutes: u32,
}

impl WeeklySummary {
    /// Calculates the summary for the week containing `date`.
    ///
    /// `date` is taken as today: the streak counts back from it and may
    /// reach into earlier weeks.
    pub fn for_week_of<Tz: TimeZone>(
        state: &StoreState,
        date: NaiveDate,
        goals: WeeklyGoals,
        tz: &Tz,
    ) -> Self {
        let week_start = week_start(date);
        let days: Vec<DailyStats> = (0..7)
            .map(|offset| DailyStats::for_date(state, week_start + Days::new(offset), tz))
            .collect();

        let focus_minutes = days.iter().map(|d| d.focus_minutes).sum();
        let completed_sessions = days.iter().map(|d| d.completed_sessions).sum();
        let breathing_sessions = days.iter().map(|d| d.breathing_sessions).sum();

        // Earliest day wins a tie
        let best = days
            .iter()
            .filter(|d| d.focus_minutes > 0)
            .fold(None::<&DailyStats>, |best, day| match best {
                Some(b) if b.focus_minutes >= day.focus_minutes => Some(b),
                _ => Some(day),
            });
        let best_day = best.and_then(|d| d.date);
        let best_day_minutes = best.map_or(0, |d| d.focus_minutes);

        Self {
            week_start,
            days,
            focus_minutes,
            completed_sessions,
            breathing_sessions,
            goals,
            focus_goal_progress: capped_percentage(focus_minutes, goals.focus_minutes),
            breathing_goal_progress: capped_percentage(
                breathing_sessions,
                goals.breathing_sessions,
            ),
            magic_points: state.magic_points,
            level: level_for_points(state.magic_points),
            streak_days: streak_ending(state, date, tz),
            best_day,
            best_day_minutes,
        }
    }

    /// Returns true when every non-zero goal has been reached.
    pub fn goals_met(&self) -> bool {
        self.focus_goal_progress == 100 && self.breathing_goal_progress == 100
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// Counts consecutive active days backwards from `today`.
///
/// An inactive `today` yields zero.
pub fn streak_ending<Tz: TimeZone>(state: &StoreState, today: NaiveDate, tz: &Tz) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while DailyStats::for_date(state, day, tz).is_active() {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}

fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => naive.and_utc(),
    }
}

fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        0
    } else {
        part * 100 / whole
    }
}

fn capped_percentage(part: u32, goal: u32) -> u32 {
    if goal == 0 {
        100
    } else {
        percentage(part, goal).min(100)
    }
}
