use anyhow::Result;
use clap::Parser as ClapParser;

use cli::command::{Cli, Commands, LogFormat};
use cli::config::cmd_config;
use cli::inspect::cmd_inspect;
use cli::write::cmd_write;

mod cli;
mod config;
mod output;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut env_builder = env_logger::Builder::from_default_env();
    env_builder.filter_level(cli.loglevel.to_level_filter());
    match cli.log_format {
        LogFormat::Plain => {
            env_builder.format_timestamp_secs();
        }
        LogFormat::Json => {
            env_builder.format(|buf, record| {
                use std::io::Write;
                writeln!(
                    buf,
                    "{}",
                    json_record(
                        &buf.timestamp().to_string(),
                        record.level(),
                        record.target(),
                        &record.args().to_string()
                    )
                )
            });
        }
    }
    env_builder.try_init()?;

    match cli.command {
        Commands::Write(ref args) => cmd_write(args, &cli)?,
        Commands::Inspect(ref args) => cmd_inspect(args, &cli)?,
        Commands::Config => cmd_config()?,
    }

    Ok(())
}

fn json_record(ts: &str, level: log::Level, target: &str, msg: &str) -> String {
    serde_json::json!({
        "ts": ts,
        "lvl": level.as_str(),
        "target": target,
        "msg": msg,
    })
    .to_string()
}
