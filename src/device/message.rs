use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Penalty attached to a solve, written in fixtures as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Penalty {
    None,
    PlusTwo,
    Dnf,
    Dns,
    /// Any other value, kept as written.
    Other(i64),
}

impl Penalty {
    /// Order the penalty button walks through.
    pub fn cycle(self) -> Self {
        match self {
            Penalty::None => Penalty::PlusTwo,
            Penalty::PlusTwo => Penalty::Dnf,
            Penalty::Dnf | Penalty::Dns | Penalty::Other(_) => Penalty::None,
        }
    }
}

impl Default for Penalty {
    fn default() -> Self {
        Penalty::None
    }
}

impl From<i64> for Penalty {
    fn from(value: i64) -> Self {
        match value {
            0 => Penalty::None,
            2 => Penalty::PlusTwo,
            -1 => Penalty::Dnf,
            -2 => Penalty::Dns,
            other => Penalty::Other(other),
        }
    }
}

impl From<Penalty> for i64 {
    fn from(penalty: Penalty) -> Self {
        match penalty {
            Penalty::None => 0,
            Penalty::PlusTwo => 2,
            Penalty::Dnf => -1,
            Penalty::Dns => -2,
            Penalty::Other(value) => value,
        }
    }
}

impl fmt::Display for Penalty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Penalty::None => f.write_str("none"),
            Penalty::PlusTwo => f.write_str("+2"),
            Penalty::Dnf => f.write_str("DNF"),
            Penalty::Dns => f.write_str("DNS"),
            Penalty::Other(value) if value > 0 => write!(f, "+{}", value),
            Penalty::Other(value) => write!(f, "{}", value),
        }
    }
}

/// Result message the station sends upstream. A delegate may resolve a
/// call before any time was recorded, so `time` is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveMessage {
    pub time: Option<u64>,
    pub penalty: Penalty,
    pub delegate: bool,
}

impl fmt::Display for SolveMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.time {
            Some(time) => write!(f, "{} ms", time)?,
            None => f.write_str("no time")?,
        }
        write!(
            f,
            ", penalty {}{}",
            self.penalty,
            if self.delegate { ", delegate" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_penalty_wire_values() {
        assert_eq!(serde_json::to_value(Penalty::Dnf).unwrap(), json!(-1));
        assert_eq!(
            serde_json::from_value::<Penalty>(json!(2)).unwrap(),
            Penalty::PlusTwo
        );
    }

    #[test]
    fn test_unlisted_penalty_is_kept() {
        let penalty = serde_json::from_value::<Penalty>(json!(4)).unwrap();

        assert_eq!(penalty, Penalty::Other(4));
        assert_eq!(serde_json::to_value(penalty).unwrap(), json!(4));
        assert_eq!(penalty.to_string(), "+4");
        assert_eq!(penalty.cycle(), Penalty::None);
    }

    #[test]
    fn test_penalty_cycle_returns_to_none() {
        let cycled = Penalty::None.cycle().cycle().cycle();

        assert_eq!(cycled, Penalty::None);
        assert_eq!(Penalty::Dns.cycle(), Penalty::None);
    }

    #[test]
    fn test_message_display() {
        let message = SolveMessage {
            time: Some(2000),
            penalty: Penalty::PlusTwo,
            delegate: true,
        };
        let untimed = SolveMessage {
            time: None,
            penalty: Penalty::Dnf,
            delegate: false,
        };

        assert_eq!(message.to_string(), "2000 ms, penalty +2, delegate");
        assert_eq!(untimed.to_string(), "no time, penalty DNF");
    }
}
