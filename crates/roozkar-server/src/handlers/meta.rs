//! Liveness and Persian-date endpoints.

use axum::Json;
use chrono::{Datelike, Utc};
use serde::Serialize;

use roozkar_calendar::{JalaliDate, weekday_name};

/// Liveness/version body.
#[derive(Debug, Serialize)]
pub struct RootInfo {
    /// Static liveness message.
    pub message: &'static str,
    /// Crate version.
    pub version: &'static str,
}

/// GET /api/
pub async fn root() -> Json<RootInfo> {
    Json(RootInfo {
        message: "roozkar API is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Current date in the Jalali calendar, plus the Gregorian equivalent.
#[derive(Debug, Serialize)]
pub struct PersianDateInfo {
    /// `YYYY/MM/DD` in the Jalali calendar.
    pub persian_date: String,
    /// `{weekday}، {DD} {month} {YYYY}`.
    pub persian_date_long: String,
    /// Current UTC clock time, `HH:MM`.
    pub persian_time: String,
    /// ISO Gregorian date.
    pub gregorian_date: String,
    /// Persian weekday name.
    pub day_name: String,
    /// Persian month name.
    pub month_name: String,
    /// Jalali year.
    pub year: i32,
    /// Jalali month (1–12).
    pub month: u32,
    /// Jalali day of month.
    pub day: u32,
}

/// GET /api/persian-date
pub async fn persian_date() -> Json<PersianDateInfo> {
    let now = Utc::now();
    let date = now.date_naive();
    let jalali = JalaliDate::from_gregorian(date);

    Json(PersianDateInfo {
        persian_date: jalali.format_slash(),
        persian_date_long: jalali.format_long(date.weekday()),
        persian_time: now.format("%H:%M").to_string(),
        gregorian_date: date.to_string(),
        day_name: weekday_name(date.weekday()).to_string(),
        month_name: jalali.month_name().to_string(),
        year: jalali.year,
        month: jalali.month,
        day: jalali.day,
    })
}
