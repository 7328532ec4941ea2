//! Run command - classify every resource in a dataset manifest.

use std::path::PathBuf;

use colored::Colorize;
use pcode_detector::{
    CsvReportSink, Dataset, Detector, FileAcquirer, FragmentReader, HttpSizeProbe, SecondaryCheck,
};

use super::{load_config, reference_source};

pub struct RunArgs {
    pub manifest: PathBuf,
    pub config: Option<PathBuf>,
    pub reference: Option<PathBuf>,
    pub output: PathBuf,
    pub secondary: Option<SecondaryCheck>,
    pub sample_rows: Option<usize>,
    pub max_size: Option<u64>,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(secondary) = args.secondary {
        config.secondary = secondary;
    }
    if let Some(sample_rows) = args.sample_rows {
        config.sample_rows = sample_rows;
    }
    if let Some(max_size) = args.max_size {
        config.resource_size = max_size;
    }
    config.validate()?;

    let datasets = Dataset::load_manifest(&args.manifest)?;
    let resource_count: usize = datasets.iter().map(|d| d.resources.len()).sum();
    println!(
        "{} {} datasets, {} resources",
        "Checking".cyan().bold(),
        datasets.len().to_string().white().bold(),
        resource_count.to_string().white().bold()
    );

    let source = reference_source(&config, args.reference)?;
    println!("{} {}", "Reference codes:".cyan(), source.path().display());

    let secondary = config.secondary;
    let reader = FragmentReader::with_sample_rows(config.sample_rows);
    let detector = Detector::new(config, &source)?;
    println!(
        "  {} codes, {} mis-code variants",
        detector.reference().codes.len(),
        detector.reference().miscodes.len()
    );

    // Relative resource paths in the manifest resolve against its directory
    let mut acquirer = FileAcquirer::new(reader);
    if let Some(parent) = args.manifest.parent() {
        acquirer = acquirer.with_base_dir(parent);
    }

    let mut sink = CsvReportSink::create(&args.output, secondary)?;
    let summary = detector.run(&datasets, &acquirer, &HttpSizeProbe::new(), &mut sink)?;

    println!();
    println!("{}", "Summary:".yellow().bold());
    println!("  Resources:     {}", summary.resources.to_string().white());
    println!("  P-coded:       {}", summary.pcoded.to_string().green());
    println!(
        "  {:<14} {}",
        format!("{}:", secondary.label()),
        summary.secondary.to_string().yellow()
    );
    println!("  Not detected:  {}", summary.not_detected.to_string().white());
    println!("  Skipped:       {}", summary.skipped.to_string().white());
    println!("  Unknown:       {}", summary.unknown.to_string().red());
    println!("  Errors:        {}", summary.errors.to_string().red());
    println!(
        "  Elapsed:       {:.1}s",
        summary.elapsed().num_milliseconds() as f64 / 1000.0
    );
    println!();
    println!("{} {}", "Report written to".green(), args.output.display());

    Ok(())
}
