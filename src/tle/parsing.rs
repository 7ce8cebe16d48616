use std::ops::Range;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::tle::error::ParseError;
use crate::tle::types::OrbitalElementSet;

pub const TLE_LINE_LEN: usize = 69;

/// Decode a TLE record, verifying the mod-10 checksum on both lines.
pub fn parse(line1: &str, line2: &str) -> Result<OrbitalElementSet, ParseError> {
    parse_lines(line1, line2, true)
}

/// Decode a TLE record without checksum verification. Archive feeds carry
/// occasional checksum rot; file ingestion uses this form and logs.
pub fn parse_lenient(line1: &str, line2: &str) -> Result<OrbitalElementSet, ParseError> {
    parse_lines(line1, line2, false)
}

/// Mod-10 sum over all but the final column: digits count as themselves,
/// minus signs count as 1.
pub fn compute_checksum(line: &str) -> u32 {
    line[..line.len().saturating_sub(1)]
        .chars()
        .map(|c| match c {
            '-' => 1,
            d => d.to_digit(10).unwrap_or(0),
        })
        .sum::<u32>()
        % 10
}

fn parse_lines(line1: &str, line2: &str, verify: bool) -> Result<OrbitalElementSet, ParseError> {
    let line1 = line1.trim_end_matches(['\r', '\n']);
    let line2 = line2.trim_end_matches(['\r', '\n']);

    check_line_shape(1, line1, "1 ")?;
    check_line_shape(2, line2, "2 ")?;
    if verify {
        check_checksum(1, line1)?;
        check_checksum(2, line2)?;
    }

    let catalog_number: u32 = line1[2..7]
        .trim()
        .parse()
        .map_err(|_| ParseError::malformed(1, "unparseable catalog number"))?;
    if line1[2..7].trim() != line2[2..7].trim() {
        return Err(ParseError::malformed(
            2,
            "catalog number differs from line 1",
        ));
    }

    let epoch_year: i32 = line1[18..20]
        .trim()
        .parse()
        .map_err(|_| ParseError::malformed(1, "unparseable epoch year"))?;
    let epoch_day = field_f64(line1, 1, 20..32, "epoch day")?;
    let epoch = epoch_to_datetime(epoch_year, epoch_day)?;
    let bstar = implied_decimal(line1, 1, 53..61, "drag term")?;

    let inclination_deg = field_f64(line2, 2, 8..16, "inclination")?;
    let raan_deg = field_f64(line2, 2, 17..25, "RAAN")?;
    let eccentricity: f64 = format!("0.{}", line2[26..33].replace(' ', "0"))
        .parse()
        .map_err(|_| ParseError::malformed(2, "unparseable eccentricity"))?;
    let arg_perigee_deg = field_f64(line2, 2, 34..42, "argument of perigee")?;
    let mean_anomaly_deg = field_f64(line2, 2, 43..51, "mean anomaly")?;
    let mean_motion_rev_day = field_f64(line2, 2, 52..63, "mean motion")?;

    if !(0.0..1.0).contains(&eccentricity) {
        return Err(ParseError::OutOfRange {
            field: "eccentricity",
            value: eccentricity,
        });
    }
    if mean_motion_rev_day <= 0.0 {
        return Err(ParseError::OutOfRange {
            field: "mean motion",
            value: mean_motion_rev_day,
        });
    }

    Ok(OrbitalElementSet {
        catalog_number,
        epoch,
        mean_motion_rev_day,
        eccentricity,
        inclination_deg,
        raan_deg,
        arg_perigee_deg,
        mean_anomaly_deg,
        bstar,
    })
}

fn check_line_shape(lineno: u8, line: &str, prefix: &str) -> Result<(), ParseError> {
    if !line.starts_with(prefix) {
        return Err(ParseError::malformed(
            lineno,
            format!("line must start with \"{prefix}\""),
        ));
    }
    if !line.is_ascii() {
        return Err(ParseError::malformed(lineno, "non-ASCII characters"));
    }
    if line.len() != TLE_LINE_LEN {
        return Err(ParseError::malformed(
            lineno,
            format!("expected {TLE_LINE_LEN} columns, got {}", line.len()),
        ));
    }
    Ok(())
}

fn check_checksum(lineno: u8, line: &str) -> Result<(), ParseError> {
    let expected = line
        .chars()
        .next_back()
        .and_then(|c| c.to_digit(10))
        .ok_or_else(|| ParseError::malformed(lineno, "checksum column is not a digit"))?;
    let computed = compute_checksum(line);
    if computed != expected {
        return Err(ParseError::ChecksumMismatch {
            line: lineno,
            expected,
            computed,
        });
    }
    Ok(())
}

fn field_f64(
    line: &str,
    lineno: u8,
    range: Range<usize>,
    name: &str,
) -> Result<f64, ParseError> {
    line[range]
        .trim()
        .parse()
        .map_err(|_| ParseError::malformed(lineno, format!("unparseable {name}")))
}

/// Fields like the B* term are stored as "±MMMMM±E" with an implied
/// leading "0." on the mantissa.
fn implied_decimal(
    line: &str,
    lineno: u8,
    range: Range<usize>,
    name: &str,
) -> Result<f64, ParseError> {
    let field = &line[range];
    let sign = if field.starts_with('-') { -1.0 } else { 1.0 };
    let mantissa: f64 = format!("0.{}", field[1..6].replace(' ', "0"))
        .parse()
        .map_err(|_| ParseError::malformed(lineno, format!("unparseable {name}")))?;
    let exponent: i32 = field[6..8]
        .trim()
        .parse()
        .map_err(|_| ParseError::malformed(lineno, format!("unparseable {name} exponent")))?;
    Ok(sign * mantissa * 10f64.powi(exponent))
}

/// TLE epochs carry a two-digit year: 57-99 map to the 1900s, 00-56 to the
/// 2000s. The day field counts from 1.0 at Jan 1 00:00 UTC.
fn epoch_to_datetime(two_digit_year: i32, epoch_day: f64) -> Result<DateTime<Utc>, ParseError> {
    let year = if two_digit_year >= 57 {
        1900 + two_digit_year
    } else {
        2000 + two_digit_year
    };
    let day_of_year = epoch_day.trunc() as u32;
    let date = NaiveDate::from_yo_opt(year, day_of_year)
        .ok_or_else(|| ParseError::malformed(1, "epoch day outside the year"))?;
    let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let micros = (epoch_day.fract() * 86_400.0 * 1e6).round() as i64;
    Ok(midnight + Duration::microseconds(micros))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Datelike, Timelike};

    const ISS_L1: &str = "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991";
    const ISS_L2: &str = "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482";

    const VANGUARD_L1: &str =
        "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753";
    const VANGUARD_L2: &str =
        "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667";

    #[test]
    fn iss_elements_decode() {
        let e = parse(ISS_L1, ISS_L2).unwrap();
        assert_eq!(e.catalog_number, 25544);
        assert_relative_eq!(e.inclination_deg, 51.6439);
        assert_relative_eq!(e.raan_deg, 211.2001);
        assert_relative_eq!(e.eccentricity, 0.0007417);
        assert_relative_eq!(e.arg_perigee_deg, 17.6667);
        assert_relative_eq!(e.mean_anomaly_deg, 85.6398);
        assert_relative_eq!(e.mean_motion_rev_day, 15.50103472);
        assert_relative_eq!(e.bstar, 3.8792e-5, epsilon = 1e-12);
        assert!(!e.is_deep_space());
    }

    #[test]
    fn epoch_decodes_to_utc() {
        let e = parse(ISS_L1, ISS_L2).unwrap();
        assert_eq!(e.epoch.year(), 2019);
        assert_eq!(e.epoch.ordinal(), 343);
        // 0.69339541 of a day past midnight
        assert_eq!(e.epoch.hour(), 16);
        assert_eq!(e.epoch.minute(), 38);
    }

    #[test]
    fn two_digit_year_pivot() {
        let e = parse(VANGUARD_L1, VANGUARD_L2).unwrap();
        assert_eq!(e.epoch.year(), 2000);

        let old = VANGUARD_L1.replace("00179", "65179");
        let e = parse_lenient(&old, VANGUARD_L2).unwrap();
        assert_eq!(e.epoch.year(), 1965);
    }

    #[test]
    fn implied_decimal_drag_term() {
        let e = parse(VANGUARD_L1, VANGUARD_L2).unwrap();
        assert_relative_eq!(e.bstar, 2.8098e-5, epsilon = 1e-12);
        assert_relative_eq!(e.eccentricity, 0.1859667);
    }

    #[test]
    fn wrong_prefix_is_malformed() {
        // A line2 swapped into line1's position
        let err = parse(ISS_L2, ISS_L2).unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { line: 1, .. }));

        let err = parse("", ISS_L2).unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn truncated_line_is_malformed() {
        let err = parse(&ISS_L1[..40], ISS_L2).unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn corrupted_checksum_detected() {
        let mut bad = ISS_L1.to_string();
        bad.replace_range(68..69, "2");
        let err = parse(&bad, ISS_L2).unwrap_err();
        assert!(matches!(
            err,
            ParseError::ChecksumMismatch {
                line: 1,
                expected: 2,
                ..
            }
        ));
        // The lenient form accepts the same record
        assert!(parse_lenient(&bad, ISS_L2).is_ok());
    }

    #[test]
    fn mismatched_catalog_numbers_rejected() {
        let swapped = VANGUARD_L2.replace("2 00005", "2 00007");
        let err = parse_lenient(VANGUARD_L1, &swapped).unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn zero_mean_motion_out_of_range() {
        let stuck = ISS_L2.replace("15.50103472", "00.00000000");
        let err = parse_lenient(ISS_L1, &stuck).unwrap_err();
        assert!(matches!(
            err,
            ParseError::OutOfRange {
                field: "mean motion",
                ..
            }
        ));
    }

    #[test]
    fn checksum_counts_minus_signs() {
        assert_eq!(
            compute_checksum(ISS_L1),
            ISS_L1.chars().last().unwrap().to_digit(10).unwrap()
        );
        assert_eq!(
            compute_checksum(ISS_L2),
            ISS_L2.chars().last().unwrap().to_digit(10).unwrap()
        );
    }
}
