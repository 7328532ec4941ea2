//! Codes command - build and dump the reference indices.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use colored::Colorize;

use super::{build_reference, load_config, reference_source};

pub fn run(
    reference: Option<PathBuf>,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    locations: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config.as_deref())?;
    let source = reference_source(&config, reference)?;

    let locations = if locations.is_empty() {
        config.reference.locations.clone()
    } else {
        locations
    };
    let codes = build_reference(&source, &locations)?;

    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &codes)?;
            writer.flush()?;
            eprintln!(
                "{} {} codes and {} mis-code variants to {}",
                "Wrote".green(),
                codes.codes.len(),
                codes.miscodes.len(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, &codes)?;
            writeln!(handle)?;
        }
    }

    Ok(())
}
