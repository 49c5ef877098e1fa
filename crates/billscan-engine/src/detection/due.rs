use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{EngineError, EngineResult};
use crate::types::BillFrequency;

/// Roll a bill's last payment forward to its next strictly-future occurrence.
///
/// The loop is iteration-bounded: corrupt or far-past dates must surface as
/// an error instead of spinning.
pub fn next_due_date(
    last_payment: NaiveDate,
    frequency: BillFrequency,
    day_of_month: Option<u32>,
    today: NaiveDate,
    roll_limit: u32,
) -> EngineResult<NaiveDate> {
    let mut candidate = advance(last_payment, frequency, day_of_month);
    let mut steps = 1u32;
    while candidate <= today {
        if steps >= roll_limit {
            return Err(EngineError::DueDateUnreachable {
                last_payment,
                limit: roll_limit,
            });
        }
        candidate = advance(candidate, frequency, day_of_month);
        steps += 1;
    }
    Ok(candidate)
}

fn advance(date: NaiveDate, frequency: BillFrequency, day_of_month: Option<u32>) -> NaiveDate {
    match frequency {
        BillFrequency::Weekly => date + Duration::days(7),
        BillFrequency::Monthly => align_day(add_months_clamped(date, 1), day_of_month),
        BillFrequency::Quarterly => add_months_clamped(date, 3),
        BillFrequency::Yearly => add_months_clamped(date, 12),
    }
}

fn align_day(date: NaiveDate, day_of_month: Option<u32>) -> NaiveDate {
    let Some(day) = day_of_month else {
        return date;
    };
    let clamped = day.clamp(1, days_in_month(date.year(), date.month()));
    NaiveDate::from_ymd_opt(date.year(), date.month(), clamped).unwrap_or(date)
}

pub fn add_months_clamped(date: NaiveDate, months: i32) -> NaiveDate {
    let current_month = i32::try_from(date.month()).unwrap_or(1);
    let mut raw_month = current_month + months;
    let mut year = date.year();

    while raw_month > 12 {
        raw_month -= 12;
        year += 1;
    }
    while raw_month < 1 {
        raw_month += 12;
        year -= 1;
    }

    let month = u32::try_from(raw_month).unwrap_or(1);
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
