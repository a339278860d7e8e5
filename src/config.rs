use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use h264nal::structs::nal_header::{NalConfig, StartCode};
use h264nal::structs::pps::{PicParameterSet, PpsConfig};
use h264nal::structs::sps::{SeqParameterSet, SpsConfig};

use crate::cli::command::StreamArgs;

/// Settings for one SPS/PPS pair, as read from YAML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub nal: NalConfig,
    pub sps: SpsConfig,
    pub pps: PpsConfig,
}

impl StreamConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        Self::from_yaml(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(text)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Loads `--config` if given and applies the command line overrides.
    pub fn from_args(args: &StreamArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(width) = args.width {
            config.sps.width = width;
        }
        if let Some(height) = args.height {
            config.sps.height = height;
        }
        if let Some(profile) = args.profile {
            config.sps.profile_idc = profile;
        }
        if let Some(level) = args.level {
            config.sps.level_idc = level;
        }
        if args.short_start_code {
            config.nal.start_code = StartCode::Short;
        }
        if args.emulation_prevention {
            config.nal.emulation_prevention = true;
        }

        Ok(config)
    }

    pub fn parameter_sets(
        &self,
        fail_level: log::Level,
    ) -> Result<(SeqParameterSet, PicParameterSet)> {
        let mut sps = SeqParameterSet::with_config(self.nal.clone(), self.sps.clone())
            .context("Invalid SPS settings")?;
        let mut pps = PicParameterSet::with_config(self.nal.clone(), self.pps.clone())
            .context("Invalid PPS settings")?;

        sps.set_fail_level(fail_level);
        pps.set_fail_level(fail_level);

        Ok((sps, pps))
    }
}
