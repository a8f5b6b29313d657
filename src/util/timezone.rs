use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use time::{Date, Month, OffsetDateTime, UtcOffset};

/// Calendar date of `time` as observed in `tz`.
pub fn localized_date(time: OffsetDateTime, tz: Tz) -> Option<Date> {
    let utc = time.to_offset(UtcOffset::UTC);
    let datetime = DateTime::<Utc>::from_timestamp(utc.unix_timestamp(), utc.nanosecond())?;
    let local = datetime.with_timezone(&tz);
    let month = Month::try_from(u8::try_from(local.month()).ok()?).ok()?;
    let day = u8::try_from(local.day()).ok()?;
    Date::from_calendar_date(local.year(), month, day).ok()
}
