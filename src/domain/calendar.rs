use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};

/// Age at which a child's savings account matures and after which no new child may be registered.
pub const ISA_MATURITY_YEARS: u32 = 18;
/// Furthest an event may be scheduled ahead of creation.
pub const MAX_EVENT_HORIZON_YEARS: u32 = 2;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("Invalid date format. Use YYYY-MM-DD (e.g., 2017-07-15)")]
    BadFormat,
    #[error("Date of birth cannot be in the future")]
    FutureBirthDate,
    #[error("Child must be under 18 years old")]
    TooOld,
    #[error("Expiry date must be in the future")]
    NotFuture,
    #[error("Expiry date cannot be more than 2 years in the future")]
    TooFarOut,
}

/// Strict `YYYY-MM-DD`: zero-padded, nothing before or after.
pub fn parse_date(raw: &str) -> Result<NaiveDate, DateError> {
    if raw.len() != 10 {
        return Err(DateError::BadFormat);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| DateError::BadFormat)
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn years(n: u32) -> Months {
    Months::new(n * 12)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthDate {
    pub dob: NaiveDate,
    pub isa_expiry: NaiveDate,
}

/// Validates a child's date of birth against `now` and derives the ISA expiry date.
pub fn validate_birth_date(raw: &str, now: DateTime<Utc>) -> Result<BirthDate, DateError> {
    let dob = parse_date(raw)?;

    if start_of_day(dob) > now {
        return Err(DateError::FutureBirthDate);
    }

    let oldest_allowed = now
        .checked_sub_months(years(ISA_MATURITY_YEARS))
        .ok_or(DateError::BadFormat)?;
    if start_of_day(dob) < oldest_allowed {
        return Err(DateError::TooOld);
    }

    Ok(BirthDate {
        dob,
        isa_expiry: isa_expiry(dob).ok_or(DateError::BadFormat)?,
    })
}

/// The 18th birthday. A 29 February birth date rolls over to 1 March when
/// the target year has no leap day.
pub fn isa_expiry(dob: NaiveDate) -> Option<NaiveDate> {
    let year = dob.year() + ISA_MATURITY_YEARS as i32;
    NaiveDate::from_ymd_opt(year, dob.month(), dob.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// Validates an event expiry date; the event closes at midnight UTC on that date.
pub fn validate_event_expiry(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, DateError> {
    let expires_at = start_of_day(parse_date(raw)?);

    if expires_at <= now {
        return Err(DateError::NotFuture);
    }

    let horizon = now
        .checked_add_months(years(MAX_EVENT_HORIZON_YEARS))
        .ok_or(DateError::BadFormat)?;
    if expires_at > horizon {
        return Err(DateError::TooFarOut);
    }

    Ok(expires_at)
}

pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > expires_at
}

/// Whole days left before expiry, truncated; zero once expired.
pub fn days_remaining(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    if is_expired(expires_at, now) {
        0
    } else {
        (expires_at - now).num_days()
    }
}
