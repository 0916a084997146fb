use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use vm8_core::{Quirks, DEFAULT_SCALE};

/// Named `Quirks` profiles selectable from the command line or config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Overwriting sprites, Fx33 stores nothing, Fx65 fills only Vx
    Legacy,
    /// XOR sprites, Fx33 stores BCD digits, Fx65 fills V0..=Vx
    Conventional,
}

impl From<Profile> for Quirks {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::Legacy => Quirks::LEGACY,
            Profile::Conventional => Quirks::CONVENTIONAL,
        }
    }
}

/// The `quirks` key names a profile or spells out each flag.
/// Flags left out of a table keep their legacy value.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum QuirksSetting {
    Profile(Profile),
    Flags(Quirks),
}

impl From<QuirksSetting> for Quirks {
    fn from(setting: QuirksSetting) -> Self {
        match setting {
            QuirksSetting::Profile(profile) => profile.into(),
            QuirksSetting::Flags(quirks) => quirks,
        }
    }
}

/// Everything a YAML config file may set; missing keys fall back to defaults.
/// ```yaml
/// scale: 12
/// quirks: conventional
/// ```
/// or
/// ```yaml
/// quirks:
///   xor_sprites: true
///   bcd_stores: true
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub scale: Option<u32>,
    pub quirks: Option<QuirksSetting>,
}

/// The settings a run actually uses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub scale: u32,
    pub quirks: Quirks,
}

impl FileConfig {
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("invalid config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("unable to read config {}", path.display()))?;
        Self::parse(&yaml).with_context(|| format!("in {}", path.display()))
    }

    /// Command line values win over the file, the file over defaults.
    pub fn merge(self, scale: Option<u32>, quirks: Option<Profile>) -> Config {
        Config {
            scale: scale.or(self.scale).unwrap_or(DEFAULT_SCALE),
            quirks: quirks
                .map(Quirks::from)
                .or(self.quirks.map(Quirks::from))
                .unwrap_or_default(),
        }
    }
}
