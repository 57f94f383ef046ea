//! Chronological ordering of normalized records.

use chrono::{DateTime, Utc};
use tracker_core::models::Timestamped;

/// Stable ascending sort by timestamp.
///
/// Records without a usable timestamp are never placed before another record:
/// they stay in their original slots, and the timestamped records are sorted
/// among the remaining slots. Equal timestamps keep their input order. The
/// output always has the input's length.
pub fn sort_by_timestamp<T: Timestamped>(records: Vec<T>) -> Vec<T> {
    let mut slots: Vec<Option<T>> = Vec::with_capacity(records.len());
    let mut timed: Vec<(DateTime<Utc>, T)> = Vec::new();
    let mut timed_slots: Vec<usize> = Vec::new();

    for (i, record) in records.into_iter().enumerate() {
        match record.timestamp() {
            Some(ts) => {
                timed_slots.push(i);
                timed.push((ts, record));
                slots.push(None);
            }
            None => slots.push(Some(record)),
        }
    }

    timed.sort_by_key(|(ts, _)| *ts);
    for (slot, (_, record)) in timed_slots.into_iter().zip(timed) {
        slots[slot] = Some(record);
    }

    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    #[derive(Debug, PartialEq)]
    struct Item {
        id: &'static str,
        at: Option<i64>,
    }

    impl Timestamped for Item {
        fn timestamp(&self) -> Option<DateTime<Utc>> {
            self.at.and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        }
    }

    fn item(id: &'static str, at: Option<i64>) -> Item {
        Item { id, at }
    }

    fn ids(items: &[Item]) -> Vec<&'static str> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_sort_ascending() {
        let sorted = sort_by_timestamp(vec![
            item("c", Some(300)),
            item("a", Some(100)),
            item("b", Some(200)),
        ]);
        assert_eq!(ids(&sorted), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_timestamps() {
        let sorted = sort_by_timestamp(vec![
            item("x", Some(100)),
            item("first", Some(50)),
            item("y", Some(100)),
        ]);
        assert_eq!(ids(&sorted), vec!["first", "x", "y"]);
    }

    #[test]
    fn test_untimed_records_keep_their_slots() {
        let sorted = sort_by_timestamp(vec![
            item("late", Some(900)),
            item("none-1", None),
            item("early", Some(100)),
            item("none-2", None),
            item("mid", Some(500)),
        ]);
        assert_eq!(
            ids(&sorted),
            vec!["early", "none-1", "mid", "none-2", "late"]
        );
    }

    #[test]
    fn test_length_preserved() {
        let input = vec![item("a", None), item("b", None), item("c", Some(1))];
        assert_eq!(sort_by_timestamp(input).len(), 3);
        assert!(sort_by_timestamp(Vec::<Item>::new()).is_empty());
    }
}
