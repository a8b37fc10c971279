
use chrono::{DateTime, Duration, NaiveTime, TimeZone};


/// Returns start of the next day. Used to tell the user when the current day rolls over.
pub fn next_day_start<Tz: TimeZone>(date: DateTime<Tz>) -> DateTime<Tz> {
    (date + Duration::days(1)).with_time(NaiveTime::MIN).unwrap()
}
