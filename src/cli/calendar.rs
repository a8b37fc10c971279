use ansi_term::Colour;
use chrono::{Datelike, NaiveDate};

use crate::engine::{
    goal::day_markers,
    store::{DayKey, ProgressStore},
};

const CELL_WIDTH: usize = 8;

pub const YOGA_COLOUR: Colour = Colour::Green;
pub const DIET_COLOUR: Colour = Colour::Cyan;
pub const WALKING_COLOUR: Colour = Colour::Yellow;

/// Renders one month of the progress store as a week grid. Each day shows a
/// dot per activity, colored like the legend below the grid.
pub fn render_month(store: &ProgressStore, month_start: NaiveDate, today: NaiveDate) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", month_start.format("%B %Y")));
    let width = CELL_WIDTH;
    for name in ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"] {
        out.push_str(&format!("{name:<width$}"));
    }
    out.push('\n');

    let leading = month_start.weekday().num_days_from_sunday() as usize;
    out.push_str(&" ".repeat(leading * CELL_WIDTH));

    for day in 1..=days_in_month(month_start) {
        let date = month_start.with_day(day).unwrap();
        out.push_str(&day_cell(store, date, today));
        if (leading + day as usize) % 7 == 0 {
            out.push('\n');
        }
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }

    out.push_str(&format!(
        "\n{} yoga  {} diet  {} walking\n",
        YOGA_COLOUR.paint("●"),
        DIET_COLOUR.paint("●"),
        WALKING_COLOUR.paint("●"),
    ));
    out
}

fn day_cell(store: &ProgressStore, date: NaiveDate, today: NaiveDate) -> String {
    let number = format!("{:>3}", date.day());
    let mut cell = if date == today {
        Colour::Green.bold().paint(number.as_str()).to_string()
    } else {
        number
    };
    let mut visible = 3;

    if let Some(record) = store.day(&DayKey::new(date)) {
        let markers = day_markers(record);
        for (present, colour) in [
            (markers.yoga, YOGA_COLOUR),
            (markers.diet, DIET_COLOUR),
            (markers.walking, WALKING_COLOUR),
        ] {
            if present {
                cell.push_str(&colour.paint("●").to_string());
                visible += 1;
            }
        }
    }

    // Color codes have no width, pad by what is actually visible.
    cell.push_str(&" ".repeat(CELL_WIDTH - visible));
    cell
}

fn days_in_month(month_start: NaiveDate) -> u32 {
    let next_month = if month_start.month() == 12 {
        NaiveDate::from_ymd_opt(month_start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(month_start.year(), month_start.month() + 1, 1)
    }
    .unwrap();
    (next_month - month_start).num_days() as u32
}

#[cfg(test)]
mod tests {
    use crate::{catalog::catalog, engine::logger::ActivityLogger};

    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(date("2024-02-01")), 29);
        assert_eq!(days_in_month(date("2023-02-01")), 28);
        assert_eq!(days_in_month(date("2024-12-01")), 31);
    }

    #[test]
    fn marked_days_show_their_dots() {
        let logger = ActivityLogger::new(catalog());
        let mut store = ProgressStore::default();
        let key: DayKey = "2024-03-15".parse().unwrap();
        logger.set_diet_completed(&mut store, &key);
        logger.add_walking_minutes(&mut store, &key, 20).unwrap();

        let rendered = render_month(&store, date("2024-03-01"), date("2024-03-20"));
        assert!(rendered.contains("March 2024"));
        // Two dots for the 15th plus three in the legend.
        assert_eq!(rendered.matches('●').count(), 5);
    }

    #[test]
    fn empty_store_renders_only_the_legend_dots() {
        let rendered =
            render_month(&ProgressStore::default(), date("2024-03-01"), date("2024-03-20"));
        assert_eq!(rendered.matches('●').count(), 3);
        assert!(rendered.contains("31"));
    }
}
