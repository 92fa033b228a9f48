use crate::time::timeunit::DurationUnit;
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_derive::Deserialize;
use std::time::Duration;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Millis(u64),
    Text(String),
}

impl RawDuration {
    fn into_duration<E: Error>(self) -> Result<Duration, E> {
        match self {
            RawDuration::Millis(ms) => Ok(Duration::from_millis(ms)),
            RawDuration::Text(text) => text
                .parse::<DurationUnit>()
                .map(Duration::from)
                .map_err(|err| E::custom(err.to_string())),
        }
    }
}

/// Whole milliseconds, written either as a number or as a duration string.
pub mod millis {
    use super::RawDuration;
    use serde::{Deserialize, Deserializer};
    use std::convert::TryFrom;
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let duration: Duration =
            RawDuration::deserialize(deserializer)?.into_duration::<D::Error>()?;
        u64::try_from(duration.as_millis()).map_err(serde::de::Error::custom)
    }
}

pub mod optional_duration {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawDuration>::deserialize(deserializer)? {
            Some(raw) => raw.into_duration().map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_derive::Deserialize;
    use serde_json::json;
    use std::time::Duration;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(with = "crate::configuration::deserialize::millis")]
        delay: u64,
        #[serde(default, with = "crate::configuration::deserialize::optional_duration")]
        timeout: Option<Duration>,
    }

    #[test]
    fn test_duration_from_text_and_number() {
        let holder: Holder = serde_json::from_value(json!({"delay": "2s", "timeout": 250})).unwrap();

        assert_eq!(holder.delay, 2000);
        assert_eq!(holder.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_missing_optional_duration() {
        let holder: Holder = serde_json::from_value(json!({"delay": 10})).unwrap();

        assert_eq!(holder.timeout, None);
    }

    #[test]
    fn test_bad_unit_is_rejected() {
        let result = serde_json::from_value::<Holder>(json!({"delay": "3 fortnights"}));

        assert!(result.is_err());
    }
}
