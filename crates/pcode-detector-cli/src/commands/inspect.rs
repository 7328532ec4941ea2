//! Inspect command - show how one local file is normalized and matched.

use std::path::PathBuf;

use colored::Colorize;
use pcode_detector::classify::TableFindings;
use pcode_detector::normalize::HeaderLayout;
use pcode_detector::{Classifier, FileFormat, FragmentReader, ReferenceCodes};

use super::{build_reference, load_config, reference_source};

pub fn run(
    file: PathBuf,
    format: Option<String>,
    locations: Vec<String>,
    reference: Option<PathBuf>,
    config: Option<PathBuf>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config.as_deref())?;

    let format = match format {
        Some(format) => FileFormat::from_filetype(&format),
        None => {
            let extension = file
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .ok_or_else(|| format!("Cannot infer file type of {}; pass --format", file.display()))?;
            FileFormat::from_filetype(&extension)
        }
    };

    let codes = if reference.is_some() || config.reference.path.is_some() {
        let source = reference_source(&config, reference)?;
        build_reference(&source, &locations)?
    } else {
        eprintln!(
            "{} no reference table given; P-code matching is disabled",
            "Warning:".yellow().bold()
        );
        ReferenceCodes::default()
    };

    let reader = FragmentReader::with_sample_rows(config.sample_rows);
    let fragments = reader.read_path(&file, &format)?;
    let classifier = Classifier::new(&config, &codes);
    let findings: Vec<TableFindings> = fragments
        .into_iter()
        .map(|fragment| classifier.examine(fragment, &locations))
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&findings)?);
        return Ok(());
    }

    println!(
        "{} {} ({}, {} fragment{})",
        "Inspecting".cyan().bold(),
        file.display().to_string().white(),
        format,
        findings.len(),
        if findings.len() == 1 { "" } else { "s" }
    );

    for findings in &findings {
        println!();
        println!("{} {}", "Fragment:".yellow().bold(), findings.fragment.white());
        println!("  Header:  {}", describe_layout(&findings.layout));
        println!("  Rows:    {}", findings.rows);
        println!("  Columns:");
        for column in &findings.columns {
            println!("    {}", column.dimmed());
        }

        match &findings.pcode {
            Some(hit) => println!(
                "  P-coded:     {} ({}: {}/{})",
                "yes".green().bold(),
                hit.column,
                hit.matched,
                hit.total
            ),
            None => println!("  P-coded:     {}", "no".white()),
        }
        match &findings.miscode {
            Some(hit) => println!(
                "  Mis-pcoded:  {} ({}: {}/{})",
                "yes".yellow().bold(),
                hit.column,
                hit.matched,
                hit.total
            ),
            None => println!("  Mis-pcoded:  {}", "no".white()),
        }
        match &findings.latlong {
            Some(pair) => println!(
                "  Lat/long:    {} ({}, {})",
                "yes".green().bold(),
                pair.latitude.column,
                pair.longitude.column
            ),
            None => println!("  Lat/long:    {}", "no".white()),
        }
    }

    Ok(())
}

fn describe_layout(layout: &HeaderLayout) -> String {
    match layout {
        HeaderLayout::AsRead => "header row as read".to_string(),
        HeaderLayout::BailedOut { reason } => format!("kept as read ({:?})", reason),
        HeaderLayout::TagRow { row } => format!("tag row at data row {}", row),
        HeaderLayout::FixedDepth { depth } => format!("first {} rows folded into keys", depth),
    }
}
