use anyhow::Result;

use h264nal::process::export::WriteRbsp;
use h264nal::process::write::NalUnitWriter;

use super::command::{Cli, InspectArgs};
use crate::config::StreamConfig;

pub fn cmd_inspect(args: &InspectArgs, cli: &Cli) -> Result<()> {
    let config = StreamConfig::from_args(&args.stream)?;
    let (sps, pps) = config.parameter_sets(cli.fail_level())?;

    print_unit(sps.build()?)?;
    println!();
    print_unit(pps.build()?)?;

    Ok(())
}

fn print_unit(writer: NalUnitWriter) -> Result<()> {
    println!("{}", writer.header().nal_unit_type());
    println!(
        "{:<42} {:<6} {:>8} {:<6} {}",
        "field", "coding", "value", "offset", "bits"
    );

    for field in writer.trace() {
        println!("{field}");
    }

    let bytes = writer.into_bytes()?;
    println!("bytes ({}): {}", bytes.len(), hex_string(&bytes));

    Ok(())
}

pub(crate) fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn hex_formatting() {
    assert_eq!(hex_string(&[0x00, 0x01, 0x67, 0xAB]), "00 01 67 AB");
    assert_eq!(hex_string(&[]), "");
}
