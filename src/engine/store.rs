use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
    str::FromStr,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifies one calendar day in local time. This is the only key used to
/// address progress data, and its `YYYY-MM-DD` text form is the key of the
/// remote document map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Display for DayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(NaiveDate::parse_from_str(s, "%Y-%m-%d")?))
    }
}

impl Serialize for DayKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Completion state of a single day. Absent fields in the stored form default
/// to false/0/empty, so a freshly created record equals a never-written one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DailyRecord {
    pub yoga: bool,
    pub diet: bool,
    pub walking_minutes: u32,
    pub completed_yoga_classes: BTreeSet<u32>,
}

impl DailyRecord {
    /// The `yoga` flag is derived, never set directly. It must be recomputed
    /// after every change to the class set so the two can't drift apart.
    pub(crate) fn recompute_yoga(&mut self, total_classes: usize) {
        self.yoga = total_classes > 0 && self.completed_yoga_classes.len() == total_classes;
    }
}

/// The canonical progress state, one record per day. Loaded wholesale from the
/// remote document at session start and replaced wholesale on every save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressStore {
    days: BTreeMap<DayKey, DailyRecord>,
}

impl ProgressStore {
    pub fn day(&self, key: &DayKey) -> Option<&DailyRecord> {
        self.days.get(key)
    }

    /// Returns the record for a day, creating a zero-valued one if absent.
    /// Mutation goes through the [ActivityLogger](super::logger::ActivityLogger)
    /// operations, not through this method directly.
    pub(crate) fn day_mut(&mut self, key: &DayKey) -> &mut DailyRecord {
        self.days.entry(*key).or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    #[test]
    fn day_key_text_form() {
        let k = key("2024-03-05");
        assert_eq!(k.to_string(), "2024-03-05");
        assert_eq!(k.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert!("05/03/2024".parse::<DayKey>().is_err());
    }

    #[test]
    fn record_uses_remote_field_names() {
        let mut record = DailyRecord {
            diet: true,
            walking_minutes: 25,
            ..Default::default()
        };
        record.completed_yoga_classes.extend([1, 3]);
        record.recompute_yoga(5);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "yoga": false,
                "diet": true,
                "walkingMinutes": 25,
                "completedYogaClasses": [1, 3],
            })
        );
    }

    #[test]
    fn absent_fields_default() {
        let record: DailyRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, DailyRecord::default());

        let store: ProgressStore =
            serde_json::from_str(r#"{"2024-03-05": {"walkingMinutes": 10}}"#).unwrap();
        let record = store.day(&key("2024-03-05")).unwrap();
        assert_eq!(record.walking_minutes, 10);
        assert!(!record.yoga);
        assert!(record.completed_yoga_classes.is_empty());
    }

    #[test]
    fn yoga_is_derived_from_the_class_set() {
        let mut record = DailyRecord::default();
        record.completed_yoga_classes.extend([1, 2, 3, 4, 5]);
        record.recompute_yoga(5);
        assert!(record.yoga);

        record.completed_yoga_classes.remove(&3);
        record.recompute_yoga(5);
        assert!(!record.yoga);
    }
}
