//! # roozkar-calendar
//!
//! Jalali (Persian) calendar conversion and formatting.
//!
//! Converts Gregorian dates to the Jalali calendar using the standard
//! jalaali arithmetic (33-year break cycle), and provides the Persian
//! month/weekday name tables plus the formatting used on the wire.

#![deny(unsafe_code)]

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Persian month names, Farvardin (1) through Esfand (12).
pub const MONTH_NAMES: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Persian weekday names, Saturday (start of the Persian week) through Friday.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "شنبه",
    "یکشنبه",
    "دوشنبه",
    "سه‌شنبه",
    "چهارشنبه",
    "پنج‌شنبه",
    "جمعه",
];

/// A date in the Jalali (Persian) calendar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JalaliDate {
    /// Jalali year.
    pub year: i32,
    /// Month, 1 (Farvardin) through 12 (Esfand).
    pub month: u32,
    /// Day of month, 1-based.
    pub day: u32,
}

impl JalaliDate {
    /// Convert a Gregorian calendar date to its Jalali equivalent.
    ///
    /// Valid for Jalali years -61 through 3177 (Gregorian 560–3798);
    /// every date this service handles is comfortably inside that range.
    #[must_use]
    pub fn from_gregorian(date: NaiveDate) -> Self {
        let (jy, jm, jd) = d2j(g2d(date.year(), date.month() as i32, date.day() as i32));
        Self {
            year: jy,
            month: jm as u32,
            day: jd as u32,
        }
    }

    /// Persian name of this date's month.
    #[must_use]
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month.saturating_sub(1) as usize).min(11)]
    }

    /// `YYYY/MM/DD` with zero-padded month and day, e.g. `1405/05/15`.
    #[must_use]
    pub fn format_slash(&self) -> String {
        format!("{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }

    /// Long form: `{weekday}، {DD} {month name} {YYYY}`.
    #[must_use]
    pub fn format_long(&self, weekday: Weekday) -> String {
        format!(
            "{}، {:02} {} {}",
            weekday_name(weekday),
            self.day,
            self.month_name(),
            self.year
        )
    }
}

/// Persian name for a weekday.
#[must_use]
pub fn weekday_name(weekday: Weekday) -> &'static str {
    let index = match weekday {
        Weekday::Sat => 0,
        Weekday::Sun => 1,
        Weekday::Mon => 2,
        Weekday::Tue => 3,
        Weekday::Wed => 4,
        Weekday::Thu => 5,
        Weekday::Fri => 6,
    };
    WEEKDAY_NAMES[index]
}

/// Replace ASCII digits with Persian (Extended Arabic-Indic) digits.
///
/// Presentation helper for clock times and counters; the wire format
/// itself stays ASCII.
#[must_use]
pub fn to_persian_digits(s: &str) -> String {
    const DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];
    s.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => DIGITS[d as usize],
            None => c,
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Jalaali arithmetic
// ─────────────────────────────────────────────────────────────────────────────

/// Jalali years in which the length of the leap cycle changes.
const BREAKS: [i32; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

/// Leap-year data for a Jalali year: (leap offset, Gregorian year,
/// March day of Farvardin 1).
fn jal_cal(jy: i32) -> (i32, i32, i32) {
    let gy = jy + 621;
    let mut leap_j = -14;
    let mut jp = BREAKS[0];
    let mut jump = 0;

    for &jm in &BREAKS[1..] {
        jump = jm - jp;
        if jy < jm {
            break;
        }
        leap_j += (jump / 33) * 8 + (jump % 33) / 4;
        jp = jm;
    }

    let mut n = jy - jp;
    leap_j += (n / 33) * 8 + ((n % 33) + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gy / 4 - ((gy / 100 + 1) * 3) / 4 - 150;
    let march = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + ((jump + 4) / 33) * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    (leap, gy, march)
}

/// Gregorian calendar date to Julian day number.
fn g2d(gy: i32, gm: i32, gd: i32) -> i32 {
    let d = ((gy + (gm - 8) / 6 + 100_100) * 1461) / 4 + (153 * ((gm + 9) % 12) + 2) / 5 + gd
        - 34_840_408;
    d - ((gy + 100_100 + (gm - 8) / 6) / 100 * 3) / 4 + 752
}

/// Julian day number to Gregorian year.
fn d2g_year(jdn: i32) -> i32 {
    let mut j = 4 * jdn + 139_361_631;
    j += ((4 * jdn + 183_187_720) / 146_097) * 3 / 4 * 4 - 3908;
    let i = (j % 1461) / 4 * 5 + 308;
    let gm = (i / 153) % 12 + 1;
    j / 1461 - 100_100 + (8 - gm) / 6
}

/// Julian day number to Jalali (year, month, day).
fn d2j(jdn: i32) -> (i32, i32, i32) {
    let gy = d2g_year(jdn);
    let mut jy = gy - 621;
    let (leap, _, march) = jal_cal(jy);
    let jdn1f = g2d(gy, 3, march);

    let mut k = jdn - jdn1f;
    if k >= 0 {
        if k <= 185 {
            return (jy, 1 + k / 31, k % 31 + 1);
        }
        k -= 186;
    } else {
        jy -= 1;
        k += 179;
        if leap == 1 {
            k += 1;
        }
    }
    (jy, 7 + k / 30, k % 30 + 1)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
