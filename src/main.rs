use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::Path;
use vcf_subsample::{output, selection, subsample::SubsampleParams, types::SkipCounts, vcf_parser};

#[derive(Parser)]
#[command(name = "vcf-subsample")]
#[command(version)]
#[command(about = "Subsample VCF samples per site to a target minor-allele frequency", long_about = None)]
struct Args {
    /// Input VCF/BCF file (can be gzipped)
    #[arg(short, long)]
    input: String,

    /// Output CSV report, one row per site
    #[arg(short, long)]
    output: String,

    /// Also write the selected sample names per subsampled site to this CSV
    #[arg(long)]
    sample_lists: Option<String>,

    /// Target minor-allele frequency, in (0, 0.5]
    #[arg(long, default_value = "0.1")]
    target_maf: f64,

    /// Accepted distance from the target MAF, in [0, 0.5]
    #[arg(long, default_value = "0.01")]
    margin: f64,

    /// Maximum share of samples in any one genotype class, in (0, 1]
    #[arg(long, default_value = "1.0")]
    max_mgf: f64,

    /// Minimum number of samples to keep per site
    #[arg(long, default_value = "1")]
    min_samples: u32,

    /// Keep subsampling until exactly --min-samples samples remain
    #[arg(long)]
    exact_samples: bool,

    /// SNPs only (exclude INDELs)
    #[arg(long)]
    snps_only: bool,

    /// Number of threads for parallel processing
    #[arg(long, default_value_t = num_cpus())]
    threads: usize,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

macro_rules! progress {
    ($quiet:expr) => {
        if !$quiet {
            eprintln!();
        }
    };
    ($quiet:expr, $($arg:tt)*) => {
        if !$quiet {
            eprintln!($($arg)*);
        }
    };
}

fn make_progress_bar(quiet: bool, len: u64) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template("  [{elapsed_precise}/{eta_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );
    Ok(pb)
}

fn make_spinner(quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("  {spinner} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

fn validate(args: &Args) -> Result<SubsampleParams> {
    if !(args.target_maf > 0.0 && args.target_maf <= 0.5) {
        anyhow::bail!("Invalid --target-maf {}. Must be in (0, 0.5]", args.target_maf);
    }
    if !(0.0..=0.5).contains(&args.margin) {
        anyhow::bail!("Invalid --margin {}. Must be in [0, 0.5]", args.margin);
    }
    if !(args.max_mgf > 0.0 && args.max_mgf <= 1.0) {
        anyhow::bail!("Invalid --max-mgf {}. Must be in (0, 1]", args.max_mgf);
    }
    if args.min_samples == 0 {
        anyhow::bail!("--min-samples must be at least 1");
    }
    if args.threads == 0 {
        anyhow::bail!("--threads must be at least 1");
    }

    Ok(
        SubsampleParams::new(args.target_maf, args.margin, args.max_mgf, args.min_samples)
            .with_exact_samples(args.exact_samples),
    )
}

fn main() -> Result<()> {
    let args = Args::parse();
    let params = validate(&args)?;

    if !Path::new(&args.input).exists() {
        anyhow::bail!("Input file not found: {}", args.input);
    }

    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()?;

    progress!(args.quiet, "VCF Subsampler");
    progress!(args.quiet, "=========================================");
    progress!(args.quiet, "Input VCF: {}", args.input);
    progress!(args.quiet, "Output CSV: {}", args.output);
    if let Some(ref lists) = args.sample_lists {
        progress!(args.quiet, "Sample lists: {}", lists);
    }
    progress!(args.quiet, "Target MAF: {} ± {}", params.target_maf, params.margin);
    progress!(args.quiet, "Max MGF: {}", params.max_mgf);
    progress!(
        args.quiet,
        "Min samples: {}{}",
        params.min_samples,
        if params.exact_samples { " (exact)" } else { "" }
    );
    progress!(args.quiet, "SNPs only: {}", args.snps_only);
    progress!(args.quiet, "Threads: {}", args.threads);
    progress!(args.quiet);

    // Step 1: Parse VCF
    progress!(args.quiet, "Step 1: Parsing VCF and tallying genotypes...");
    let pb_vcf = make_spinner(args.quiet)?;
    pb_vcf.set_message("reading records");
    let parsed = vcf_parser::parse_vcf(Path::new(&args.input), args.snps_only, args.quiet)?;
    pb_vcf.finish_and_clear();

    if parsed.sites.is_empty() {
        anyhow::bail!("No biallelic sites found!");
    }

    // Step 2: Subsample each site (parallelized)
    progress!(args.quiet);
    progress!(args.quiet, "Step 2: Subsampling sites...");
    let pb_sub = make_progress_bar(args.quiet, parsed.sites.len() as u64)?;
    let results = parsed
        .sites
        .into_par_iter()
        .map(|site| {
            pb_sub.inc(1);
            selection::process_site(site, &params)
        })
        .collect::<Result<Vec<_>>>()?;
    pb_sub.finish_and_clear();

    let mut summary = SkipCounts::default();
    for r in &results {
        summary.record(&r.outcome);
    }

    progress!(args.quiet, "  Sites processed: {}", summary.total);
    progress!(
        args.quiet,
        "  Subsampled: {} ({:.1}%)",
        summary.subsampled,
        100.0 * summary.subsampled as f64 / summary.total.max(1) as f64
    );
    progress!(args.quiet, "  Skipped: {}", summary.skipped());
    progress!(args.quiet, "    Excessive genotype frequency: {}", summary.excessive_mgf);
    progress!(args.quiet, "    Insufficient samples: {}", summary.insufficient_samples);
    progress!(args.quiet, "    No feasible reduction: {}", summary.no_feasible_reduction);

    // Step 3: Write outputs
    progress!(args.quiet);
    progress!(args.quiet, "Step 3: Writing results to CSV...");
    output::write_report(&results, Path::new(&args.output))?;

    if let Some(ref lists) = args.sample_lists {
        output::write_sample_lists(&results, &parsed.sample_names, Path::new(lists))?;
        progress!(args.quiet, "  Sample lists written to: {}", lists);
    }

    progress!(args.quiet);
    progress!(args.quiet, "Done! Results written to: {}", args.output);

    Ok(())
}
