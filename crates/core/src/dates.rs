//! Spreadsheet date-serial conversion.
//!
//! Ticket extracts carry dates as spreadsheet serial numbers: whole days since
//! 1899-12-30, with the fractional part holding the time of day. Output
//! records use `dd/mm/yyyy`.

use crate::error::{Error, Result};
use chrono::{Days, NaiveDate};

/// Maturity date emitted for open-ended repo trades.
pub const OPEN_ENDED_MATURITY: &str = "31/12/2049";

/// Largest serial accepted (31/12/9999).
pub const MAX_DATE_SERIAL: f64 = 2_958_465.0;

const OUTPUT_FORMAT: &str = "%d/%m/%Y";

fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// Convert a date serial to a calendar date. Time of day is dropped.
pub fn date_from_serial(serial: f64) -> Result<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_DATE_SERIAL).contains(&serial) {
        return Err(Error::invalid_field(
            "date",
            format!("date serial out of range: {}", serial),
        ));
    }

    serial_epoch()
        .checked_add_days(Days::new(serial.floor() as u64))
        .ok_or_else(|| Error::invalid_field("date", format!("date serial overflow: {}", serial)))
}

/// Convert a calendar date back to its whole-day serial.
pub fn date_to_serial(date: NaiveDate) -> f64 {
    (date - serial_epoch()).num_days() as f64
}

/// Format a date serial as `dd/mm/yyyy`.
pub fn format_date_serial(serial: f64) -> Result<String> {
    Ok(date_from_serial(serial)?.format(OUTPUT_FORMAT).to_string())
}

/// Format a date serial, reporting failures against the source column.
pub fn format_date_field(serial: f64, field: &str) -> Result<String> {
    format_date_serial(serial).map_err(|e| match e {
        Error::InvalidField { reason, .. } => Error::invalid_field(field, reason),
        other => other,
    })
}

/// Re-format a `dd/mm/yy` text date as `dd/mm/yyyy`.
pub fn format_short_date(text: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(text.trim(), "%d/%m/%y")
        .map_err(|e| Error::invalid_field("date", format!("{}: {}", text, e)))?;
    Ok(date.format(OUTPUT_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_known_serials() {
        assert_eq!(format_date_serial(44133.0).unwrap(), "29/10/2020");
        assert_eq!(format_date_serial(44200.0).unwrap(), "04/01/2021");
        assert_eq!(format_date_serial(54788.0).unwrap(), OPEN_ENDED_MATURITY);
    }

    #[test]
    fn test_time_of_day_ignored() {
        assert_eq!(format_date_serial(44133.75).unwrap(), "29/10/2020");
    }

    #[test]
    fn test_serial_round_trip() {
        for serial in [367.0, 43894.0, 44020.0, 44134.0, 54788.0] {
            let date = date_from_serial(serial).unwrap();
            assert_eq!(date_to_serial(date), serial);
        }
    }

    #[test]
    fn test_distinct_serials_format_differently() {
        let a = format_date_serial(44133.0).unwrap();
        let b = format_date_serial(44134.0).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_serials() {
        assert!(format_date_serial(f64::NAN).is_err());
        assert!(format_date_serial(-3.0).is_err());
        assert!(format_date_serial(MAX_DATE_SERIAL + 1.0).is_err());
    }

    #[test]
    fn test_field_name_in_error() {
        match format_date_field(-1.0, "Stl Date") {
            Err(Error::InvalidField { field, .. }) => assert_eq!(field, "Stl Date"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_short_date() {
        assert_eq!(format_short_date("07/10/20").unwrap(), "07/10/2020");
        assert!(format_short_date("2020-10-07").is_err());
    }
}
