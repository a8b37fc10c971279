//! Pure derivations over a day's record: the unified goal percentage shown in
//! the progress ring, per-activity ratios for the bars, and the calendar
//! markers. Nothing in here mutates state.

use crate::utils::percentage::Percentage;

use super::store::DailyRecord;

pub const WALKING_GOAL_MINUTES: u32 = 30;

/// The unified daily goal: arithmetic mean of the yoga, diet and walking
/// contributions. Unrounded, rounding is presentation's job.
pub fn daily_goal_percent(
    record: &DailyRecord,
    total_classes: usize,
    walking_goal_minutes: u32,
) -> Percentage {
    let yoga = if record.yoga {
        1.
    } else if total_classes == 0 {
        0.
    } else {
        record.completed_yoga_classes.len() as f64 / total_classes as f64
    };
    let diet = if record.diet { 1. } else { 0. };
    let walking = if walking_goal_minutes == 0 {
        1.
    } else {
        (record.walking_minutes as f64 / walking_goal_minutes as f64).min(1.)
    };

    Percentage::new_opt((yoga + diet + walking) / 3. * 100.)
        .expect("contributions are never negative")
}

pub fn yoga_percent(record: &DailyRecord, total_classes: usize) -> Percentage {
    if record.yoga {
        return Percentage::new_opt(100.).expect("100 is a valid percentage");
    }
    Percentage::from_ratio_capped(
        record.completed_yoga_classes.len() as f64,
        total_classes as f64,
    )
}

pub fn walking_percent(record: &DailyRecord, walking_goal_minutes: u32) -> Percentage {
    Percentage::from_ratio_capped(record.walking_minutes as f64, walking_goal_minutes as f64)
}

/// Which activity dots a calendar day shows. Walking counts as soon as any
/// minutes were logged, matching the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMarkers {
    pub yoga: bool,
    pub diet: bool,
    pub walking: bool,
}

pub fn day_markers(record: &DailyRecord) -> DayMarkers {
    DayMarkers {
        yoga: record.yoga,
        diet: record.diet,
        walking: record.walking_minutes > 0,
    }
}

impl DayMarkers {
    pub fn any(&self) -> bool {
        self.yoga || self.diet || self.walking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        yoga_classes: &[u32],
        total: usize,
        diet: bool,
        walking_minutes: u32,
    ) -> DailyRecord {
        let mut record = DailyRecord {
            diet,
            walking_minutes,
            ..Default::default()
        };
        record.completed_yoga_classes.extend(yoga_classes);
        record.recompute_yoga(total);
        record
    }

    #[test]
    fn walking_over_goal_contributes_exactly_one_third() {
        // 10 + 25 minutes against a goal of 30: walking capped at 100%, the
        // other two contribute nothing.
        let record = record(&[], 5, false, 35);
        assert_eq!(*walking_percent(&record, 30), 100.);
        let goal = daily_goal_percent(&record, 5, 30);
        assert!((*goal - 100. / 3.).abs() < 1e-9, "got {goal}");
    }

    #[test]
    fn everything_met_is_exactly_one_hundred() {
        let record = record(&[1, 2, 3, 4, 5], 5, true, 30);
        assert!(record.yoga);
        assert_eq!(*daily_goal_percent(&record, 5, 30), 100.);
    }

    #[test]
    fn partial_yoga_counts_proportionally() {
        let record = record(&[1, 2], 5, false, 0);
        assert_eq!(*yoga_percent(&record, 5), 40.);
        let goal = daily_goal_percent(&record, 5, 30);
        assert!((*goal - 40. / 3.).abs() < 1e-9);
    }

    #[test]
    fn monotonic_in_each_contribution() {
        let base = record(&[1], 5, false, 10);
        let base_goal = *daily_goal_percent(&base, 5, 30);

        let more_yoga = record(&[1, 2], 5, false, 10);
        let more_diet = record(&[1], 5, true, 10);
        let more_walking = record(&[1], 5, false, 20);

        assert!(*daily_goal_percent(&more_yoga, 5, 30) > base_goal);
        assert!(*daily_goal_percent(&more_diet, 5, 30) > base_goal);
        assert!(*daily_goal_percent(&more_walking, 5, 30) > base_goal);
    }

    #[test]
    fn markers_follow_the_record() {
        let record = record(&[1], 5, true, 0);
        let markers = day_markers(&record);
        assert_eq!(
            markers,
            DayMarkers {
                yoga: false,
                diet: true,
                walking: false,
            }
        );
        assert!(markers.any());
        assert!(!day_markers(&DailyRecord::default()).any());
    }
}
