//! Business-day adjustment of payment dates.
//!
//! A [`BusinessDayAdjustment`] pairs a [`BusinessDayConvention`] with a
//! [`HolidayCalendar`]. The calendar only knows which days are holidays; the
//! convention decides where a non-business day moves to.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Longest run of consecutive non-business days an adjustment will step over.
pub const MAX_SEARCH_DAYS: u32 = 31;

/// Errors raised while adjusting a date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdjustmentError {
    #[error("date {date} is outside the data range of calendar {calendar}")]
    OutsideCalendarRange { calendar: String, date: NaiveDate },
    #[error("no business day within 31 days of {date} in calendar {calendar}")]
    NoBusinessDay { calendar: String, date: NaiveDate },
}

/// A holiday calendar: weekend days plus an explicit set of holidays.
///
/// A calendar may declare the range its holiday data covers. Asking about a
/// date outside that range is an error rather than a silent guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCalendar {
    name: String,
    weekend: Vec<Weekday>,
    holidays: BTreeSet<NaiveDate>,
    valid_range: Option<(NaiveDate, NaiveDate)>,
}

impl HolidayCalendar {
    /// A calendar with no weekend and no holidays, no range limit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weekend: Vec::new(),
            holidays: BTreeSet::new(),
            valid_range: None,
        }
    }

    /// Every day is a business day.
    pub fn no_holidays() -> Self {
        Self::new("NoHolidays")
    }

    /// Saturday and Sunday are holidays.
    pub fn weekends() -> Self {
        Self::new("SatSun").with_weekend([Weekday::Sat, Weekday::Sun])
    }

    pub fn with_weekend(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.weekend = days.into_iter().collect();
        self
    }

    pub fn with_holidays(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.holidays.extend(dates);
        self
    }

    /// Restrict the calendar to `[first, last]`, the span its holiday data covers.
    pub fn with_valid_range(mut self, first: NaiveDate, last: NaiveDate) -> Self {
        self.valid_range = Some((first, last));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_business_day(&self, date: NaiveDate) -> Result<bool, AdjustmentError> {
        if let Some((first, last)) = self.valid_range {
            if date < first || date > last {
                return Err(AdjustmentError::OutsideCalendarRange {
                    calendar: self.name.clone(),
                    date,
                });
            }
        }
        Ok(!self.weekend.contains(&date.weekday()) && !self.holidays.contains(&date))
    }

    /// The first business day on or after `date`.
    pub fn next_or_same(&self, date: NaiveDate) -> Result<NaiveDate, AdjustmentError> {
        self.search(date, NaiveDate::succ_opt)
    }

    /// The first business day on or before `date`.
    pub fn previous_or_same(&self, date: NaiveDate) -> Result<NaiveDate, AdjustmentError> {
        self.search(date, NaiveDate::pred_opt)
    }

    fn search(
        &self,
        date: NaiveDate,
        step: fn(&NaiveDate) -> Option<NaiveDate>,
    ) -> Result<NaiveDate, AdjustmentError> {
        let mut current = date;
        for _ in 0..=MAX_SEARCH_DAYS {
            if self.is_business_day(current)? {
                return Ok(current);
            }
            current = match step(&current) {
                Some(next) => next,
                None => break,
            };
        }
        Err(AdjustmentError::NoBusinessDay {
            calendar: self.name.clone(),
            date,
        })
    }
}

impl fmt::Display for HolidayCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// How to move a date that falls on a non-business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessDayConvention {
    /// Leave the date alone, whatever the calendar says.
    NoAdjust,
    /// First business day after the holiday.
    Following,
    /// As `Following`, unless that crosses into the next month, then `Preceding`.
    ModifiedFollowing,
    /// First business day before the holiday.
    Preceding,
    /// As `Preceding`, unless that crosses into the previous month, then `Following`.
    ModifiedPreceding,
    /// Closest business day; ties go forward.
    Nearest,
}

impl BusinessDayConvention {
    pub fn adjust(
        self,
        date: NaiveDate,
        calendar: &HolidayCalendar,
    ) -> Result<NaiveDate, AdjustmentError> {
        match self {
            BusinessDayConvention::NoAdjust => Ok(date),
            BusinessDayConvention::Following => calendar.next_or_same(date),
            BusinessDayConvention::ModifiedFollowing => {
                let adjusted = calendar.next_or_same(date)?;
                if adjusted.month() != date.month() {
                    calendar.previous_or_same(date)
                } else {
                    Ok(adjusted)
                }
            }
            BusinessDayConvention::Preceding => calendar.previous_or_same(date),
            BusinessDayConvention::ModifiedPreceding => {
                let adjusted = calendar.previous_or_same(date)?;
                if adjusted.month() != date.month() {
                    calendar.next_or_same(date)
                } else {
                    Ok(adjusted)
                }
            }
            BusinessDayConvention::Nearest => {
                if calendar.is_business_day(date)? {
                    return Ok(date);
                }
                // either direction may run out of calendar data; use the one that didn't
                match (calendar.next_or_same(date), calendar.previous_or_same(date)) {
                    (Ok(forward), Ok(backward)) if date - backward < forward - date => Ok(backward),
                    (Ok(forward), _) => Ok(forward),
                    (Err(_), Ok(backward)) => Ok(backward),
                    (Err(err), Err(_)) => Err(err),
                }
            }
        }
    }
}

impl fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BusinessDayConvention::NoAdjust => "NoAdjust",
            BusinessDayConvention::Following => "Following",
            BusinessDayConvention::ModifiedFollowing => "ModifiedFollowing",
            BusinessDayConvention::Preceding => "Preceding",
            BusinessDayConvention::ModifiedPreceding => "ModifiedPreceding",
            BusinessDayConvention::Nearest => "Nearest",
        };
        write!(f, "{s}")
    }
}

/// A convention applied against a calendar.
///
/// [`BusinessDayAdjustment::none`] is the no-op rule and the [`Default`]; it never
/// consults the calendar and so can never fail.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use swap_leg_engine::core::adjustment::{BusinessDayAdjustment, BusinessDayConvention, HolidayCalendar};
///
/// let adj = BusinessDayAdjustment::new(BusinessDayConvention::Following, HolidayCalendar::weekends());
/// let saturday = NaiveDate::from_ymd_opt(2015, 3, 7).unwrap();
/// assert_eq!(adj.adjust(saturday).unwrap(), NaiveDate::from_ymd_opt(2015, 3, 9).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDayAdjustment {
    convention: BusinessDayConvention,
    calendar: HolidayCalendar,
}

impl BusinessDayAdjustment {
    pub fn new(convention: BusinessDayConvention, calendar: HolidayCalendar) -> Self {
        Self {
            convention,
            calendar,
        }
    }

    pub fn none() -> Self {
        Self::new(BusinessDayConvention::NoAdjust, HolidayCalendar::no_holidays())
    }

    pub fn convention(&self) -> BusinessDayConvention {
        self.convention
    }

    pub fn calendar(&self) -> &HolidayCalendar {
        &self.calendar
    }

    pub fn is_none(&self) -> bool {
        self.convention == BusinessDayConvention::NoAdjust
    }

    pub fn adjust(&self, date: NaiveDate) -> Result<NaiveDate, AdjustmentError> {
        self.convention.adjust(date, &self.calendar)
    }
}

impl Default for BusinessDayAdjustment {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for BusinessDayAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} using calendar {}", self.convention, self.calendar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_none_is_identity() {
        let adj = BusinessDayAdjustment::none();
        assert!(adj.is_none());
        assert_eq!(adj.adjust(date(2015, 3, 7)).unwrap(), date(2015, 3, 7));
        assert_eq!(BusinessDayAdjustment::default(), adj);
    }

    #[test]
    fn test_following_and_preceding() {
        let cal = HolidayCalendar::weekends();
        // 2015-03-07 is a Saturday
        assert_eq!(
            BusinessDayConvention::Following.adjust(date(2015, 3, 7), &cal).unwrap(),
            date(2015, 3, 9)
        );
        assert_eq!(
            BusinessDayConvention::Preceding.adjust(date(2015, 3, 7), &cal).unwrap(),
            date(2015, 3, 6)
        );
    }

    #[test]
    fn test_modified_following_stays_in_month() {
        let cal = HolidayCalendar::weekends();
        // 2015-05-30 is a Saturday, following Monday is June 1st
        assert_eq!(
            BusinessDayConvention::ModifiedFollowing
                .adjust(date(2015, 5, 30), &cal)
                .unwrap(),
            date(2015, 5, 29)
        );
    }

    #[test]
    fn test_modified_preceding_stays_in_month() {
        let cal = HolidayCalendar::weekends();
        // 2015-08-01 is a Saturday, preceding Friday is July 31st
        assert_eq!(
            BusinessDayConvention::ModifiedPreceding
                .adjust(date(2015, 8, 1), &cal)
                .unwrap(),
            date(2015, 8, 3)
        );
    }

    #[test]
    fn test_nearest() {
        let cal = HolidayCalendar::weekends();
        // Saturday goes back to Friday, Sunday forward to Monday
        assert_eq!(
            BusinessDayConvention::Nearest.adjust(date(2015, 3, 7), &cal).unwrap(),
            date(2015, 3, 6)
        );
        assert_eq!(
            BusinessDayConvention::Nearest.adjust(date(2015, 3, 8), &cal).unwrap(),
            date(2015, 3, 9)
        );
    }

    #[test]
    fn test_nearest_falls_back_when_one_direction_leaves_range() {
        // data ends on Sunday 2015-03-08, so the forward search from Sunday fails
        let cal = HolidayCalendar::weekends().with_valid_range(date(2015, 3, 1), date(2015, 3, 8));
        assert_eq!(
            BusinessDayConvention::Nearest.adjust(date(2015, 3, 8), &cal).unwrap(),
            date(2015, 3, 6)
        );
        // data starts on Saturday 2015-03-07, so the backward search fails
        let cal = HolidayCalendar::weekends().with_valid_range(date(2015, 3, 7), date(2015, 3, 31));
        assert_eq!(
            BusinessDayConvention::Nearest.adjust(date(2015, 3, 7), &cal).unwrap(),
            date(2015, 3, 9)
        );
        // both directions fail
        let cal = HolidayCalendar::weekends().with_valid_range(date(2015, 3, 7), date(2015, 3, 8));
        let err = BusinessDayConvention::Nearest.adjust(date(2015, 3, 7), &cal).unwrap_err();
        assert!(matches!(err, AdjustmentError::OutsideCalendarRange { .. }));
    }

    #[test]
    fn test_explicit_holiday() {
        let cal = HolidayCalendar::weekends().with_holidays([date(2015, 12, 25), date(2015, 12, 28)]);
        assert_eq!(
            BusinessDayConvention::Following.adjust(date(2015, 12, 25), &cal).unwrap(),
            date(2015, 12, 29)
        );
    }

    #[test]
    fn test_outside_calendar_range() {
        let cal = HolidayCalendar::weekends()
            .with_valid_range(date(2015, 1, 1), date(2015, 12, 31));
        let adj = BusinessDayAdjustment::new(BusinessDayConvention::Following, cal);
        let err = adj.adjust(date(2016, 1, 4)).unwrap_err();
        assert!(matches!(err, AdjustmentError::OutsideCalendarRange { .. }));
    }

    #[test]
    fn test_no_business_day_found() {
        let all_week = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        let cal = HolidayCalendar::new("Closed").with_weekend(all_week);
        let err = BusinessDayConvention::Following
            .adjust(date(2015, 3, 9), &cal)
            .unwrap_err();
        assert_eq!(
            err,
            AdjustmentError::NoBusinessDay {
                calendar: "Closed".to_string(),
                date: date(2015, 3, 9),
            }
        );
    }
}
