use chrono::NaiveDate;
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DateRangeError {
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("start date {start} is after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
}

/// Calendar days from `start` to `end`, both inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::StartAfterEnd { start, end });
        }
        Ok(DateRange { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, DateRangeError> {
        DateRange::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    pub fn num_days(&self) -> u64 {
        (self.end - self.start).num_days() as u64 + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate, DateRangeError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| DateRangeError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_days_are_inclusive() {
        let range = DateRange::parse("2024-02-28", "2024-03-01").unwrap();
        let days: Vec<NaiveDate> = range.days().collect();
        assert_eq!(
            days,
            vec![date("2024-02-28"), date("2024-02-29"), date("2024-03-01")]
        );
        assert_eq!(range.num_days(), 3);
    }

    #[test]
    fn test_single_day() {
        let range = DateRange::parse("2024-01-01", " 2024-01-01 ").unwrap();
        assert_eq!(range.days().count(), 1);
        assert_eq!(range.to_string(), "2024-01-01..=2024-01-01");
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(
            DateRange::parse("2024-13-01", "2024-01-02").unwrap_err(),
            DateRangeError::InvalidDate("2024-13-01".into())
        );
        assert!(matches!(
            DateRange::parse("01/02/2024", "2024-01-02"),
            Err(DateRangeError::InvalidDate(_))
        ));
        assert!(matches!(
            DateRange::parse("2024-01-03", "2024-01-02"),
            Err(DateRangeError::StartAfterEnd { .. })
        ));
    }
}
