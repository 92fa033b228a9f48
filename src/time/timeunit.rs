use crate::time::error::Error;
use core::str::FromStr;
use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;

lazy_static! {
    static ref DURATION_REGEX: Regex =
        Regex::new(r"^\s*(?P<value>\d+)\s*(?P<unit>[a-z]+)?\s*$").expect("Regex compilation error");
}

/// A duration written as `<value><unit>`, e.g. `"1500ms"` or `"2m"`.
/// A bare number counts milliseconds, matching the fixture convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationUnit {
    value: u64,
    unit: TimeUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
}

impl TimeUnit {
    fn millis(self) -> u64 {
        match self {
            TimeUnit::Millisecond => 1,
            TimeUnit::Second => 1_000,
            TimeUnit::Minute => 60 * 1_000,
            TimeUnit::Hour => 60 * 60 * 1_000,
        }
    }
}

impl DurationUnit {
    pub fn as_millis(&self) -> u64 {
        self.value.saturating_mul(self.unit.millis())
    }
}

impl FromStr for DurationUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = DURATION_REGEX
            .captures(s)
            .ok_or_else(|| Error::Syntax(s.to_owned()))?;
        let value = caps["value"]
            .parse()
            .map_err(|_| Error::Syntax(s.to_owned()))?;
        let unit = match caps.name("unit") {
            Some(unit) => unit.as_str().parse()?,
            None => TimeUnit::Millisecond,
        };
        Ok(Self { value, unit })
    }
}

impl From<DurationUnit> for Duration {
    fn from(unit: DurationUnit) -> Self {
        Duration::from_millis(unit.as_millis())
    }
}

impl FromStr for TimeUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ms" | "millisecond" | "millis" | "milliseconds" => Ok(TimeUnit::Millisecond),
            "s" | "second" | "secs" | "seconds" => Ok(TimeUnit::Second),
            "m" | "minute" | "mins" | "minutes" => Ok(TimeUnit::Minute),
            "h" | "hour" | "hours" => Ok(TimeUnit::Hour),
            _ => Err(Error::UnitNotSupported(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_building_time_unit_from_string() {
        assert_eq!("ms".parse::<TimeUnit>(), Ok(TimeUnit::Millisecond));
        assert_eq!("secs".parse::<TimeUnit>(), Ok(TimeUnit::Second));
        assert_eq!("m".parse::<TimeUnit>(), Ok(TimeUnit::Minute));
        assert_eq!("hours".parse::<TimeUnit>(), Ok(TimeUnit::Hour));
        assert_eq!(
            "d".parse::<TimeUnit>(),
            Err(Error::UnitNotSupported("d".to_owned()))
        );
    }

    #[test]
    fn test_conversion_duration_unit_to_duration() {
        let unit = "200ms".parse::<DurationUnit>().unwrap();
        let result: Duration = unit.into();

        assert_eq!(result, Duration::from_millis(200));
    }

    #[test]
    fn test_bare_number_is_milliseconds() {
        let unit = "1500".parse::<DurationUnit>().unwrap();

        assert_eq!(unit.as_millis(), 1500);
    }

    #[test]
    fn test_minutes_scale_to_milliseconds() {
        let unit = " 2m ".parse::<DurationUnit>().unwrap();

        assert_eq!(unit.as_millis(), 120_000);
    }

    #[test]
    fn test_garbage_is_a_syntax_error() {
        assert_eq!(
            "soon".parse::<DurationUnit>(),
            Err(Error::Syntax("soon".to_owned()))
        );
    }
}
