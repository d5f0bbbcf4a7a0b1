use crate::domain::model::Record;
use chrono::{Local, NaiveDate};

pub const BUSINESS_END_FIELD: &str = "bizPrdEndYmd";
pub const APPLY_PERIOD_FIELD: &str = "aplyYmd";
const PERIOD_SEPARATOR: &str = " ~ ";

/// `YYYYMMDD` with exactly eight ASCII digits.
pub fn as_compact_date(value: &str) -> Option<&str> {
    (value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit())).then_some(value)
}

fn ended_before(value: &str, today: &str) -> bool {
    as_compact_date(value).is_some_and(|date| date < today)
}

/// End date of the application period, if the field carries one.
fn apply_period_end(period: &str) -> Option<&str> {
    if period.contains(PERIOD_SEPARATOR) {
        let parts: Vec<&str> = period.split(PERIOD_SEPARATOR).collect();
        if parts.len() == 2 {
            return Some(parts[1].trim());
        }
        return None;
    }
    Some(period)
}

/// A policy stays active unless one of its windows provably ended before `today`.
pub fn is_active(policy: &Record, today: NaiveDate) -> bool {
    let today = today.format("%Y%m%d").to_string();

    if ended_before(&policy.text(BUSINESS_END_FIELD), &today) {
        return false;
    }

    let period = policy.text(APPLY_PERIOD_FIELD);
    if let Some(end) = apply_period_end(&period) {
        if ended_before(end, &today) {
            return false;
        }
    }

    true
}

pub fn filter_active(policies: &[Record], today: NaiveDate) -> Vec<Record> {
    policies
        .iter()
        .filter(|policy| is_active(policy, today))
        .cloned()
        .collect()
}

/// Same as [`filter_active`] against the local date.
pub fn filter_active_now(policies: &[Record]) -> Vec<Record> {
    filter_active(policies, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn policy(no: &str) -> Record {
        Record::new().with("plcyNo", no)
    }

    #[test]
    fn test_business_end_date() {
        let today = day(2025, 6, 1);
        assert!(!is_active(&policy("a").with(BUSINESS_END_FIELD, "20250101"), today));
        assert!(is_active(&policy("b").with(BUSINESS_END_FIELD, "20260101"), today));
        assert!(is_active(&policy("c").with(BUSINESS_END_FIELD, "20250601"), today));
    }

    #[test]
    fn test_apply_period_boundary_is_inclusive() {
        let p = policy("a").with(APPLY_PERIOD_FIELD, "20250101 ~ 20250601");
        assert!(!is_active(&p, day(2025, 6, 2)));
        assert!(is_active(&p, day(2025, 6, 1)));
    }

    #[test]
    fn test_bare_apply_date() {
        let p = policy("a").with(APPLY_PERIOD_FIELD, "20240131");
        assert!(!is_active(&p, day(2025, 6, 1)));
    }

    #[test]
    fn test_malformed_dates_are_treated_as_open() {
        let today = day(2025, 6, 1);
        for value in ["2024-01-01", "2024011", "상시", "", "20240101 ~ ", "20240101~20240201"] {
            let p = policy("a").with(APPLY_PERIOD_FIELD, value);
            assert!(is_active(&p, today), "{:?} should be active", value);
        }
        assert!(is_active(&policy("b").with(BUSINESS_END_FIELD, "2024010"), today));
        assert!(is_active(&policy("c"), today));
    }

    #[test]
    fn test_filter_active_preserves_order_and_is_idempotent() {
        let today = day(2025, 6, 1);
        let policies = vec![
            policy("1"),
            policy("2").with(BUSINESS_END_FIELD, "20240101"),
            policy("3").with(APPLY_PERIOD_FIELD, "20250501 ~ 20250701"),
            policy("4").with(APPLY_PERIOD_FIELD, "20250101 ~ 20250301"),
        ];

        let once = filter_active(&policies, today);
        let ids: Vec<_> = once.iter().map(|p| p.text("plcyNo").into_owned()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(filter_active(&once, today), once);
        assert_eq!(policies.len(), 4);
    }
}
