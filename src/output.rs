use crate::statistics::FrequencyStatistics;
use crate::types::SiteResult;
use anyhow::{Context, Result};
use csv::Writer;
use std::io;
use std::path::Path;

const REPORT_HEADER: [&str; 15] = [
    "chrom",
    "pos",
    "ref",
    "alt",
    "n_samples",
    "maf",
    "mgf",
    "status",
    "orientation",
    "hom_major",
    "hom_minor",
    "het",
    "n_subsampled",
    "subsampled_maf",
    "subsampled_mgf",
];

/// Frequencies are undefined for sites where every call was excluded.
fn format_freq(n_samples: u64, freq: impl FnOnce() -> f64) -> String {
    if n_samples == 0 {
        String::new()
    } else {
        format!("{:.6}", freq())
    }
}

pub fn write_report(results: &[SiteResult], path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("Failed to create report: {}", path.display()))?;
    write_report_to(&mut wtr, results)
}

/// One row per site: pre-subsampling frequencies from the ref/alt tally,
/// post-subsampling ones from the reduced oriented tally.
pub fn write_report_to<W: io::Write>(wtr: &mut Writer<W>, results: &[SiteResult]) -> Result<()> {
    wtr.write_record(REPORT_HEADER)?;

    for result in results {
        let site = &result.site;
        let n = result.counts.n_samples();

        let mut row = vec![
            site.chrom.clone(),
            site.pos.to_string(),
            site.ref_allele.clone(),
            site.alt_allele.clone(),
            n.to_string(),
            format_freq(n, || result.counts.maf()),
            format_freq(n, || result.counts.mgf()),
        ];

        match &result.outcome {
            Ok(sub) => {
                let m = sub.counts.n_samples();
                row.extend([
                    "ok".to_string(),
                    sub.orientation.label().to_string(),
                    sub.counts.hom_major.to_string(),
                    sub.counts.hom_minor.to_string(),
                    sub.counts.het.to_string(),
                    m.to_string(),
                    format_freq(m, || sub.counts.maf()),
                    format_freq(m, || sub.counts.mgf()),
                ]);
            }
            Err(e) => {
                row.push(e.label().to_string());
                row.extend(std::iter::repeat(String::new()).take(7));
            }
        }

        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_sample_lists(results: &[SiteResult], sample_names: &[String], path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("Failed to create sample list file: {}", path.display()))?;
    write_sample_lists_to(&mut wtr, results, sample_names)
}

/// One row per subsampled site with the kept sample names joined by `;`.
pub fn write_sample_lists_to<W: io::Write>(
    wtr: &mut Writer<W>,
    results: &[SiteResult],
    sample_names: &[String],
) -> Result<()> {
    wtr.write_record(["chrom", "pos", "samples"])?;

    for result in results {
        let Ok(sub) = &result.outcome else {
            continue;
        };

        let names = sub
            .selected
            .iter()
            .map(|&idx| {
                sample_names
                    .get(idx)
                    .map(String::as_str)
                    .with_context(|| format!("Sample index {} out of range", idx))
            })
            .collect::<Result<Vec<_>>>()?;

        let pos = result.site.pos.to_string();
        let joined = names.join(";");
        wtr.write_record([result.site.chrom.as_str(), pos.as_str(), joined.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}
