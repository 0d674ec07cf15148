use crate::error::Error;
use crate::types::TimestampBucket;

const SECONDS_PER_DAY: u64 = 86_400;

/// 9999-12-31T23:59:59Z, the last instant with a four-digit year.
pub const MAX_BUCKET_SECONDS: u64 = 253_402_300_799;

/// Build the UTC bucket keys for a unix timestamp.
///
/// Example: 1_710_460_800 (2024-03-15) maps to year 2024, quarter 20241,
/// month 202403, week 202411 and day 20240315.
///
/// # Errors
/// - `InvalidTimestamp`: Timestamp after `MAX_BUCKET_SECONDS`
pub fn bucket_for(unix_seconds: u64) -> Result<TimestampBucket, Error> {
    if unix_seconds > MAX_BUCKET_SECONDS {
        return Err(Error::InvalidTimestamp);
    }

    let days = (unix_seconds / SECONDS_PER_DAY) as i64;
    let (year, month, day) = civil_from_days(days);
    let (week_year, week) = iso_week(days, year);

    let year_key = u32::try_from(year).map_err(|_| Error::InvalidTimestamp)?;
    let week_year_key = u32::try_from(week_year).map_err(|_| Error::InvalidTimestamp)?;

    Ok(TimestampBucket {
        unix_seconds,
        year: year_key,
        quarter: compose(year_key, 10, (month - 1) / 3 + 1)?,
        month: compose(year_key, 100, month)?,
        week: compose(week_year_key, 100, week)?,
        day: compose(year_key, 10_000, month * 100 + day)?,
    })
}

/// Reject buckets whose keys were not derived from their own timestamp.
pub fn validate_bucket(bucket: &TimestampBucket) -> Result<(), Error> {
    if *bucket != bucket_for(bucket.unix_seconds)? {
        return Err(Error::InvalidTimestamp);
    }
    Ok(())
}

/// `prefix * scale + suffix`, e.g. 2024 * 100 + 3 = 202403.
fn compose(prefix: u32, scale: u32, suffix: u32) -> Result<u32, Error> {
    prefix
        .checked_mul(scale)
        .and_then(|shifted| shifted.checked_add(suffix))
        .ok_or(Error::InvalidTimestamp)
}

/// Days since 1970-01-01 to (year, month, day), proleptic Gregorian.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe as i64 + era * 400 + (if month <= 2 { 1 } else { 0 });

    (year, month, day)
}

fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = (if y >= 0 { y } else { y - 399 }) / 400;
    let yoe = (y - era * 400) as u64;
    let mp = (if month > 2 { month - 3 } else { month + 9 }) as u64;
    let doy = (153 * mp + 2) / 5 + day as u64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;

    era * 146_097 + doe as i64 - 719_468
}

/// ISO-8601 (week-year, week) for a day; weeks start on Monday.
fn iso_week(days: i64, year: i64) -> (i64, u32) {
    let weekday = (days + 3).rem_euclid(7) + 1; // Monday = 1
    let ordinal = days - days_from_civil(year, 1, 1) + 1;
    let week = (ordinal - weekday + 10) / 7;

    if week < 1 {
        (year - 1, weeks_in_year(year - 1))
    } else if week > weeks_in_year(year) as i64 {
        (year + 1, 1)
    } else {
        (year, week as u32)
    }
}

fn weeks_in_year(year: i64) -> u32 {
    let p = |y: i64| (y + y / 4 - y / 100 + y / 400).rem_euclid(7);
    if p(year) == 4 || p(year - 1) == 3 {
        53
    } else {
        52
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch() {
        let bucket = bucket_for(0).unwrap();
        assert_eq!(bucket.year, 1970);
        assert_eq!(bucket.quarter, 19701);
        assert_eq!(bucket.month, 197001);
        assert_eq!(bucket.week, 197001);
        assert_eq!(bucket.day, 19700101);
    }

    #[test]
    fn test_mid_march_leap_year() {
        let bucket = bucket_for(1_710_460_800 + 13 * 3_600).unwrap(); // 2024-03-15 13:00
        assert_eq!(bucket.year, 2024);
        assert_eq!(bucket.quarter, 20241);
        assert_eq!(bucket.month, 202403);
        assert_eq!(bucket.week, 202411);
        assert_eq!(bucket.day, 20240315);
    }

    #[test]
    fn test_new_year_belongs_to_previous_iso_year() {
        let bucket = bucket_for(1_609_459_200).unwrap(); // 2021-01-01, a Friday
        assert_eq!(bucket.year, 2021);
        assert_eq!(bucket.day, 20210101);
        assert_eq!(bucket.week, 202053);
    }

    #[test]
    fn test_late_december_belongs_to_next_iso_year() {
        let bucket = bucket_for(1_735_516_800).unwrap(); // 2024-12-30, a Monday
        assert_eq!(bucket.quarter, 20244);
        assert_eq!(bucket.month, 202412);
        assert_eq!(bucket.week, 202501);
    }

    #[test]
    fn test_validate_rejects_forged_keys() {
        let mut bucket = bucket_for(1_710_460_800).unwrap();
        assert_eq!(validate_bucket(&bucket), Ok(()));

        bucket.month = 202404;
        assert_eq!(validate_bucket(&bucket), Err(Error::InvalidTimestamp));
    }

    #[test]
    fn test_far_future_is_rejected() {
        let last = bucket_for(MAX_BUCKET_SECONDS).unwrap();
        assert_eq!(last.day, 99991231);
        assert_eq!(last.week, 999952);

        assert_eq!(bucket_for(MAX_BUCKET_SECONDS + 1), Err(Error::InvalidTimestamp));
        assert_eq!(bucket_for(u64::MAX), Err(Error::InvalidTimestamp));

        let forged = TimestampBucket {
            unix_seconds: 20_000_000_000_000,
            year: 0,
            quarter: 0,
            month: 0,
            week: 0,
            day: 0,
        };
        assert_eq!(validate_bucket(&forged), Err(Error::InvalidTimestamp));
    }
}
