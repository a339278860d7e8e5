use anyhow::{Context, Result};
use log::info;

use h264nal::process::export::WriteRbsp;

use super::command::{Cli, WriteArgs};
use crate::config::StreamConfig;
use crate::output::OutputWriter;

pub fn cmd_write(args: &WriteArgs, cli: &Cli) -> Result<()> {
    let config = StreamConfig::from_args(&args.stream)?;
    let (sps, pps) = config.parameter_sets(cli.fail_level())?;

    // Both units are built before the output file is created
    let mut units = [sps.build()?, pps.build()?];

    let mut output = OutputWriter::new(&args.output)?;
    let mut written = 0;
    for unit in &mut units {
        written += unit
            .flush(output.sink())
            .with_context(|| format!("Failed to write {}", args.output.display()))?;
    }

    let is_pipe = output.is_pipe();
    output.finish()?;

    if !is_pipe {
        info!(
            "Wrote {written} bytes ({}x{}, profile_idc {}, level_idc {}) to {}",
            config.sps.width,
            config.sps.height,
            config.sps.profile_idc,
            config.sps.level_idc,
            args.output.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser as ClapParser;
    use h264nal::process::EXAMPLE_PPS;

    use super::*;
    use crate::cli::command::Commands;

    fn run(name: &str, yaml: &str) -> (Result<()>, std::path::PathBuf) {
        let dir_name = format!("h264nal-{name}-{}", std::process::id());
        let dir = std::env::temp_dir().join(dir_name);
        fs::create_dir_all(&dir).unwrap();

        let config = dir.join("stream.yaml");
        let output = dir.join("out.264");
        fs::write(&config, yaml).unwrap();
        let _ = fs::remove_file(&output);

        let cli = Cli::try_parse_from([
            "h264nal",
            "write",
            "--config",
            config.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();
        let Commands::Write(ref args) = cli.command else {
            panic!("expected write");
        };

        (cmd_write(args, &cli), output)
    }

    #[test]
    fn writes_sps_and_pps() {
        let (result, output) = run("ok", "sps:\n  width: 64\n  height: 64\n");
        result.unwrap();

        let bytes = fs::read(&output).unwrap();
        assert_eq!(&bytes[..5], &[0x00, 0x00, 0x00, 0x01, 0x67]);
        assert!(bytes.ends_with(EXAMPLE_PPS));
    }

    #[test]
    fn rejected_pps_creates_no_output() {
        let (result, output) = run("slice-groups", "pps:\n  num_slice_groups_minus1: 1\n");

        assert!(result.is_err());
        assert!(!output.exists());
    }
}
