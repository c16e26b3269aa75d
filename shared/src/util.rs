/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Today's date in the device-local timezone, formatted `YYYY-MM-DD`.
///
/// Attendance keys must use the local calendar day, not UTC — a 05:00
/// check-in near the date line must not land on yesterday's record.
pub fn today_local() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// The local calendar day before `date` (`YYYY-MM-DD`), if `date` parses.
pub fn previous_date(date: &str) -> Option<String> {
    let parsed = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some((parsed - chrono::Duration::days(1)).format("%Y-%m-%d").to_string())
}

/// Current hour of the device-local day (0-23).
pub fn local_hour() -> u32 {
    use chrono::Timelike;
    chrono::Local::now().hour()
}

/// Fresh client-side record ID.
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
