use std::{
    collections::{BTreeMap, BTreeSet},
    io,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::domain::{phase::UnknownPhaseError, Phase};

/// Configuration for DRD resolution.
///
/// Holds the table of review milestones that are native to each project
/// phase. A document is due in a phase if its delivery milestone is one of
/// that phase's milestones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Versions", into = "Versions")]
pub struct Config {
    milestones: BTreeMap<Phase, BTreeSet<String>>,
}

impl Default for Config {
    /// The ECSS-M-ST-10 project review table.
    fn default() -> Self {
        Self::from_table([
            (Phase::Zero, vec!["MDR"]),
            (Phase::A, vec!["PRR"]),
            (Phase::B, vec!["SRR", "PDR"]),
            (Phase::C, vec!["CDR"]),
            (Phase::D, vec!["QR", "AR", "ORR"]),
            (Phase::E, vec!["FRR", "LRR", "CRR", "ELR"]),
            (Phase::F, vec!["MCR"]),
        ])
    }
}

/// Errors that can occur when loading or saving a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file: {0}")]
    Read(#[source] io::Error),

    /// The configuration file is not valid.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The configuration file could not be written.
    #[error("Failed to write config file: {0}")]
    Write(#[source] io::Error),
}

impl Config {
    /// Builds a configuration from a phase → milestone table.
    ///
    /// Milestone codes are normalized to trimmed upper case. Phases that are
    /// not listed have no milestones.
    pub fn from_table<I, M, S>(table: I) -> Self
    where
        I: IntoIterator<Item = (Phase, M)>,
        M: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let milestones = table
            .into_iter()
            .map(|(phase, codes)| {
                (
                    phase,
                    codes.into_iter().map(|code| normalize(code.as_ref())).collect(),
                )
            })
            .collect();
        Self { milestones }
    }

    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Ok(toml::from_str(&content)?)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }

    /// The milestones native to a phase.
    pub fn milestones(&self, phase: Phase) -> impl Iterator<Item = &str> + '_ {
        self.milestones
            .get(&phase)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// The full phase → milestone table.
    #[must_use]
    pub const fn milestone_table(&self) -> &BTreeMap<Phase, BTreeSet<String>> {
        &self.milestones
    }
}

pub(crate) fn normalize(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        /// Milestone codes keyed by phase code. When absent, the default
        /// ECSS table is used.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        milestones: Option<BTreeMap<String, Vec<String>>>,
    },
}

impl TryFrom<Versions> for Config {
    type Error = UnknownPhaseError;

    fn try_from(versions: Versions) -> Result<Self, Self::Error> {
        match versions {
            Versions::V1 { milestones: None } => Ok(Self::default()),
            Versions::V1 {
                milestones: Some(table),
            } => {
                let milestones: BTreeMap<Phase, BTreeSet<String>> = table
                    .into_iter()
                    .map(|(phase, codes)| {
                        Ok::<_, UnknownPhaseError>((
                            phase.parse::<Phase>()?,
                            codes.iter().map(|code| normalize(code)).collect(),
                        ))
                    })
                    .collect::<Result<_, _>>()?;
                Ok(Self { milestones })
            }
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            milestones: Some(
                config
                    .milestones
                    .into_iter()
                    .map(|(phase, codes)| (phase.code().to_string(), codes.into_iter().collect()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_table_covers_every_phase() {
        let config = Config::default();
        for phase in Phase::ALL {
            assert!(config.milestones(phase).next().is_some(), "{phase} has no milestones");
        }
        assert_eq!(config.milestones(Phase::B).collect::<Vec<_>>(), vec!["PDR", "SRR"]);
    }

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\n\n[milestones]\n0 = [\"mdr\"]\nA = [\"SRR\", \" PRR \"]\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.milestones(Phase::Zero).collect::<Vec<_>>(), vec!["MDR"]);
        assert_eq!(config.milestones(Phase::A).collect::<Vec<_>>(), vec!["PRR", "SRR"]);
        assert_eq!(config.milestones(Phase::B).count(), 0);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(matches!(error, ConfigError::Read(_)));
        assert!(error.to_string().starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_unknown_phase_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\n\n[milestones]\nZ = [\"PDR\"]\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.to_string().starts_with("Failed to parse config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nmilestones = \"three\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_preserves_table() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let config = Config::from_table([(Phase::A, vec!["SRR"]), (Phase::C, vec!["CDR", "QR"])]);
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
