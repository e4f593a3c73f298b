//! Holiday calendar models.
//!
//! A holiday either falls on a fixed date or recurs every year on the same
//! month and day. The holiday type selects the pay rule for the day.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// The pay treatment of a holiday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayType {
    /// Paid the full day rate even without attendance; work on the day is paid on top.
    #[default]
    NonWorking,
    /// Paid only when the employee works, at a premium rate.
    SpecialNonWorking,
}

/// A holiday definition from the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    /// Name of the holiday (e.g. "New Year's Day").
    pub name: String,
    /// The fixed date. For recurring holidays this may supply the month and day.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Whether the holiday recurs annually.
    #[serde(default)]
    pub is_recurring: bool,
    /// Recurring month (1-12).
    #[serde(default)]
    pub month: Option<u32>,
    /// Recurring day of month.
    #[serde(default)]
    pub day: Option<u32>,
    /// Pay treatment.
    #[serde(default)]
    pub holiday_type: HolidayType,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Holiday {
    /// Returns the (month, day) a recurring holiday falls on.
    ///
    /// Explicit `month`/`day` win over the month and day of `date`.
    pub fn recurrence(&self) -> Option<(u32, u32)> {
        if !self.is_recurring {
            return None;
        }
        match (self.month, self.day, self.date) {
            (Some(month), Some(day), _) => Some((month, day)),
            (None, None, Some(date)) => Some((date.month(), date.day())),
            _ => None,
        }
    }

    /// Returns true if this recurring holiday falls on `date`.
    pub fn matches_recurring(&self, date: NaiveDate) -> bool {
        self.recurrence() == Some((date.month(), date.day()))
    }

    /// Returns true if this non-recurring holiday falls on `date`.
    pub fn matches_fixed(&self, date: NaiveDate) -> bool {
        !self.is_recurring && self.date == Some(date)
    }

    /// Rejects malformed definitions.
    ///
    /// A fixed holiday needs a date. A recurring one needs a month and day
    /// that exist in some year (29 February is allowed), either given
    /// explicitly or taken from `date`.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::validation("holiday.name", "must not be empty"));
        }

        if !self.is_recurring {
            if self.date.is_none() {
                return Err(LedgerError::validation(
                    "holiday.date",
                    format!("non-recurring holiday '{}' has no date", self.name),
                ));
            }
            return Ok(());
        }

        if self.month.is_some() != self.day.is_some() {
            return Err(LedgerError::validation(
                "holiday.month",
                format!(
                    "recurring holiday '{}' needs both month and day",
                    self.name
                ),
            ));
        }

        match self.recurrence() {
            // 2000 is a leap year, so every real month/day pair resolves.
            Some((month, day)) if NaiveDate::from_ymd_opt(2000, month, day).is_some() => Ok(()),
            Some((month, day)) => Err(LedgerError::validation(
                "holiday.day",
                format!(
                    "recurring holiday '{}' falls on invalid date {}-{}",
                    self.name, month, day
                ),
            )),
            None => Err(LedgerError::validation(
                "holiday.month",
                format!(
                    "recurring holiday '{}' needs a month and day or a date",
                    self.name
                ),
            )),
        }
    }
}

/// A resolved holiday attached to an attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRef {
    /// Name of the holiday.
    pub name: String,
    /// The calendar date it was resolved for.
    pub date: NaiveDate,
    /// Pay treatment.
    pub holiday_type: HolidayType,
}

/// The set of known holidays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HolidayCalendar {
    /// All holiday definitions, in declaration order.
    #[serde(default)]
    pub holidays: Vec<Holiday>,
}

impl HolidayCalendar {
    /// Creates a calendar from holiday definitions.
    pub fn new(holidays: Vec<Holiday>) -> Self {
        Self { holidays }
    }

    /// Finds the holiday for a date.
    ///
    /// Recurring holidays are searched first; the first recurring match wins,
    /// otherwise the first fixed-date match.
    ///
    /// ```
    /// use attendance_ledger::models::{Holiday, HolidayCalendar, HolidayType};
    /// use chrono::NaiveDate;
    ///
    /// let calendar = HolidayCalendar::new(vec![Holiday {
    ///     name: "New Year".to_string(),
    ///     date: None,
    ///     is_recurring: true,
    ///     month: Some(1),
    ///     day: Some(1),
    ///     holiday_type: HolidayType::NonWorking,
    ///     description: None,
    /// }]);
    ///
    /// let date = NaiveDate::from_ymd_opt(2031, 1, 1).unwrap();
    /// assert_eq!(calendar.resolve(date).unwrap().name, "New Year");
    /// ```
    pub fn resolve(&self, date: NaiveDate) -> Option<HolidayRef> {
        self.holidays
            .iter()
            .find(|h| h.matches_recurring(date))
            .or_else(|| self.holidays.iter().find(|h| h.matches_fixed(date)))
            .map(|h| HolidayRef {
                name: h.name.clone(),
                date,
                holiday_type: h.holiday_type,
            })
    }

    /// Validates every holiday and rejects duplicate names.
    pub fn validate(&self) -> LedgerResult<()> {
        for (index, holiday) in self.holidays.iter().enumerate() {
            holiday.validate()?;
            if self.holidays[..index].iter().any(|h| h.name == holiday.name) {
                return Err(LedgerError::validation(
                    "holiday.name",
                    format!("duplicate holiday '{}'", holiday.name),
                ));
            }
        }
        Ok(())
    }
}
