use anyhow::Result;

use crate::config::StreamConfig;

pub fn cmd_config() -> Result<()> {
    print!("{}", StreamConfig::default().to_yaml()?);
    Ok(())
}
