use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::Error;

/// A leaf type that can be read from and written to a single wire token.
///
/// Implemented for the handful of concrete leaf types the codec supports
/// (spec §3 "Data Model"); user-defined enums get it via
/// [`wire_scalar_enum!`] rather than directly.
pub trait WireScalar: Sized {
    fn decode_token(token: &str, longdate: bool) -> Result<Self, Error>;
    fn encode_token(&self, longdate: bool) -> String;
}

impl WireScalar for String {
    fn decode_token(token: &str, _longdate: bool) -> Result<Self, Error> {
        Ok(token.to_string())
    }

    fn encode_token(&self, _longdate: bool) -> String {
        self.clone()
    }
}

impl WireScalar for i64 {
    fn decode_token(token: &str, _longdate: bool) -> Result<Self, Error> {
        token
            .parse()
            .map_err(|_| Error::DataParsingError(token.to_string()))
    }

    fn encode_token(&self, _longdate: bool) -> String {
        self.to_string()
    }
}

impl WireScalar for f64 {
    fn decode_token(token: &str, _longdate: bool) -> Result<Self, Error> {
        token
            .parse()
            .map_err(|_| Error::DataParsingError(token.to_string()))
    }

    fn encode_token(&self, _longdate: bool) -> String {
        self.to_string()
    }
}

const SHORT_DATE_FMT: &str = "%Y%m%d";
const LONG_DATE_FMT: &str = "%Y%m%d%H%M%S";

fn parse_naive(token: &str, longdate: bool) -> Result<NaiveDateTime, Error> {
    let fmt = if longdate || token.len() > 8 {
        LONG_DATE_FMT
    } else {
        SHORT_DATE_FMT
    };
    NaiveDateTime::parse_from_str(token, fmt)
        .or_else(|_| {
            // Tolerate a short token even when `longdate` was set, and
            // vice versa: the source data does not always agree with
            // its own annotation.
            let other = if fmt == LONG_DATE_FMT { SHORT_DATE_FMT } else { LONG_DATE_FMT };
            NaiveDateTime::parse_from_str(token, other)
        })
        .map_err(|_| Error::InvalidDateFormat(token.to_string()))
}

impl WireScalar for DateTime<Utc> {
    /// Treats the token as a UTC wall-clock time. Used when no configured
    /// zone is available; the derive-generated code for a `Timestamp` leaf
    /// calls [`decode_timestamp`]/[`encode_timestamp`] instead, which
    /// resolve against `Config::time_zone` (spec §6, §8 scenario 1).
    fn decode_token(token: &str, longdate: bool) -> Result<Self, Error> {
        let naive = parse_naive(token, longdate)?;
        Ok(DateTime::from_naive_utc_and_offset(naive, Utc))
    }

    fn encode_token(&self, longdate: bool) -> String {
        let fmt = if longdate { LONG_DATE_FMT } else { SHORT_DATE_FMT };
        self.format(fmt).to_string()
    }
}

/// Decode a wire timestamp token as wall-clock time in `tz`, normalized to
/// UTC (spec §8 scenario 1: a `20220315194227` token under `Europe/Berlin`
/// decodes to 2022-03-15 19:42:27 Berlin time, projected to its UTC
/// instant).
pub fn decode_timestamp(token: &str, longdate: bool, tz: Tz) -> Result<DateTime<Utc>, Error> {
    let naive = parse_naive(token, longdate)?;
    let local = tz
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| Error::InvalidDateFormat(token.to_string()))?;
    Ok(local.with_timezone(&Utc))
}

/// Encode a UTC instant as a wire timestamp token in `tz` (the inverse of
/// [`decode_timestamp`]).
pub fn encode_timestamp(value: &DateTime<Utc>, longdate: bool, tz: Tz) -> String {
    let fmt = if longdate { LONG_DATE_FMT } else { SHORT_DATE_FMT };
    value.with_timezone(&tz).format(fmt).to_string()
}

/// Implements [`WireScalar`] for a plain C-like enum by delegating to
/// `FromStr`/`Display`-style conversions supplied by the caller, matching
/// the way the source treats string-convertible custom types.
#[macro_export]
macro_rules! wire_scalar_enum {
    ($ty:ty, decode: $decode:expr, encode: $encode:expr) => {
        impl $crate::value::WireScalar for $ty {
            fn decode_token(token: &str, _longdate: bool) -> Result<Self, $crate::error::Error> {
                let f: fn(&str) -> Result<$ty, $crate::error::Error> = $decode;
                f(token)
            }

            fn encode_token(&self, _longdate: bool) -> String {
                let f: fn(&$ty) -> String = $encode;
                f(self)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_short_date() {
        let token = "20240102";
        let dt = DateTime::<Utc>::decode_token(token, false).unwrap();
        assert_eq!(dt.encode_token(false), token);
    }

    #[test]
    fn roundtrips_long_date() {
        let token = "20240102153000";
        let dt = DateTime::<Utc>::decode_token(token, true).unwrap();
        assert_eq!(dt.encode_token(true), token);
    }

    #[test]
    fn parses_integer() {
        assert_eq!(i64::decode_token("42", false).unwrap(), 42);
    }

    #[test]
    fn parses_float() {
        assert_eq!(f64::decode_token("1.5", false).unwrap(), 1.5);
    }

    #[test]
    fn decode_timestamp_resolves_against_zone() {
        // 2022-03-15 19:42:27 in Europe/Berlin (CET, UTC+1 before the
        // spring DST change) is 18:42:27 UTC.
        let dt = decode_timestamp("20220315194227", true, chrono_tz::Europe::Berlin).unwrap();
        assert_eq!(dt.to_rfc3339(), "2022-03-15T18:42:27+00:00");
    }

    #[test]
    fn encode_timestamp_round_trips_through_zone() {
        let dt = decode_timestamp("20220315194227", true, chrono_tz::Europe::Berlin).unwrap();
        assert_eq!(encode_timestamp(&dt, true, chrono_tz::Europe::Berlin), "20220315194227");
    }

    #[test]
    fn decode_timestamp_under_utc_matches_zoneless_decode() {
        let a = decode_timestamp("20240102153000", true, chrono_tz::UTC).unwrap();
        let b = DateTime::<Utc>::decode_token("20240102153000", true).unwrap();
        assert_eq!(a, b);
    }
}
