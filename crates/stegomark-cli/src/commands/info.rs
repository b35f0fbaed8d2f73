use stegomark_core::media::{readable_extensions, writable_extensions};
use stegomark_core::{Registry, StegoPlugin};

use crate::CliResult;

pub fn algorithms(registry: &Registry) -> CliResult<()> {
    for line in algorithm_lines(registry) {
        println!("{line}");
    }
    Ok(())
}

pub fn read_formats() -> CliResult<()> {
    println!("{}", readable_extensions().join(", "));
    Ok(())
}

pub fn write_formats() -> CliResult<()> {
    println!("{}", writable_extensions().join(", "));
    Ok(())
}

fn algorithm_lines(registry: &Registry) -> Vec<String> {
    registry
        .plugins()
        .iter()
        .map(|plugin| plugin.descriptor().to_string())
        .collect()
}
