use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A lifecycle phase of a space project.
///
/// Phases gate which review milestones, and therefore which supporting
/// documents, are currently applicable. Each phase serializes as its short
/// code (`0`, `A` ... `F`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Mission analysis and needs identification.
    #[serde(rename = "0")]
    Zero,
    /// Feasibility.
    A,
    /// Preliminary definition.
    B,
    /// Detailed definition.
    C,
    /// Qualification and production.
    D,
    /// Utilization.
    E,
    /// Disposal.
    F,
}

impl Phase {
    /// Every phase, in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::Zero,
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
    ];

    /// The short code of the phase.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a string is not the code of any [`Phase`].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Unknown phase '{0}': expected one of 0, A, B, C, D, E, F")]
pub struct UnknownPhaseError(String);

impl FromStr for Phase {
    type Err = UnknownPhaseError;

    /// Parses a phase from its code, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|phase| phase.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| UnknownPhaseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("0", Phase::Zero; "zero")]
    #[test_case("A", Phase::A; "upper case")]
    #[test_case("b", Phase::B; "lower case")]
    #[test_case(" F ", Phase::F; "surrounding whitespace")]
    fn parse_valid(code: &str, expected: Phase) {
        assert_eq!(code.parse::<Phase>().unwrap(), expected);
    }

    #[test_case("G"; "out of range")]
    #[test_case(""; "empty")]
    #[test_case("AB"; "several codes")]
    fn parse_invalid(code: &str) {
        assert_eq!(
            code.parse::<Phase>(),
            Err(UnknownPhaseError(code.to_string()))
        );
    }

    #[test]
    fn code_round_trips_through_display() {
        for phase in Phase::ALL {
            assert_eq!(phase.to_string().parse::<Phase>().unwrap(), phase);
        }
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(serde_json::to_string(&Phase::Zero).unwrap(), "\"0\"");
        assert_eq!(
            serde_json::from_str::<Vec<Phase>>(r#"["A", "0"]"#).unwrap(),
            vec![Phase::A, Phase::Zero]
        );
    }

    #[test]
    fn phases_are_ordered_by_lifecycle() {
        let mut phases = vec![Phase::E, Phase::Zero, Phase::B];
        phases.sort();
        assert_eq!(phases, vec![Phase::Zero, Phase::B, Phase::E]);
    }
}
