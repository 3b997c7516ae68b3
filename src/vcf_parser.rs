use crate::types::{Site, SiteSamples};
use anyhow::{Context, Result};
use rust_htslib::bcf::record::GenotypeAllele;
use rust_htslib::{bcf, bcf::Read};
use std::path::Path;

macro_rules! progress {
    ($quiet:expr, $($arg:tt)*) => {
        if !$quiet {
            eprintln!($($arg)*);
        }
    };
}

/// Diploid biallelic genotype class of one sample call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenotypeClass {
    HomRef,
    HomAlt,
    Het,
}

/// Parsed VCF: header sample names plus one entry per retained site.
pub struct ParsedVcf {
    pub sample_names: Vec<String>,
    pub sites: Vec<Site>,
    pub filtered: RecordFilterStats,
}

/// Counts of records dropped before subsampling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilterStats {
    pub not_biallelic: u64,
    pub not_snp: u64,
    pub no_genotypes: u64,
}

impl RecordFilterStats {
    pub fn total(&self) -> u64 {
        self.not_biallelic + self.not_snp + self.no_genotypes
    }
}

fn allele_index(allele: &GenotypeAllele) -> Option<i32> {
    match allele {
        GenotypeAllele::Unphased(n) | GenotypeAllele::Phased(n) => Some(*n),
        GenotypeAllele::UnphasedMissing | GenotypeAllele::PhasedMissing => None,
    }
}

/// Classify allele indices of a call. Phase is ignored; missing alleles,
/// non-diploid calls and allele indices other than 0/1 yield `None`.
pub fn classify_alleles(alleles: &[GenotypeAllele]) -> Option<GenotypeClass> {
    if alleles.len() != 2 {
        return None;
    }
    match (allele_index(&alleles[0])?, allele_index(&alleles[1])?) {
        (0, 0) => Some(GenotypeClass::HomRef),
        (1, 1) => Some(GenotypeClass::HomAlt),
        (0, 1) | (1, 0) => Some(GenotypeClass::Het),
        _ => None,
    }
}

/// Group sample indices by genotype class, skipping unclassifiable calls.
pub fn tally_classes<I>(classes: I) -> SiteSamples
where
    I: IntoIterator<Item = Option<GenotypeClass>>,
{
    let mut samples = SiteSamples::default();
    for (idx, class) in classes.into_iter().enumerate() {
        match class {
            Some(GenotypeClass::HomRef) => samples.hom_ref.push(idx),
            Some(GenotypeClass::HomAlt) => samples.hom_alt.push(idx),
            Some(GenotypeClass::Het) => samples.het.push(idx),
            None => {}
        }
    }
    samples
}

pub fn parse_vcf(path: &Path, snps_only: bool, quiet: bool) -> Result<ParsedVcf> {
    let mut reader = bcf::Reader::from_path(path).context("Failed to open VCF file")?;

    let header = reader.header().clone();
    let sample_count = header.sample_count() as usize;

    let sample_names: Vec<String> = header
        .samples()
        .iter()
        .map(|s| String::from_utf8_lossy(s).to_string())
        .collect();

    if sample_count == 0 {
        anyhow::bail!("VCF has no samples");
    }
    progress!(quiet, "File {} contains {} samples", path.display(), sample_count);

    let mut sites = Vec::new();
    let mut total_count: u64 = 0;
    let mut stats = RecordFilterStats::default();

    for result in reader.records() {
        total_count += 1;
        if total_count % 100_000 == 0 {
            progress!(quiet, "Processed {} variants...", total_count);
        }

        let record = result.context("Failed to read VCF record")?;

        let rid = record.rid().context("No reference ID")?;
        let chrom = String::from_utf8_lossy(header.rid2name(rid)?).to_string();
        let pos = record.pos() as u64 + 1; // BCF is 0-based, we want 1-based

        let alleles = record.alleles();
        if alleles.len() != 2 {
            stats.not_biallelic += 1;
            continue;
        }

        let ref_allele = String::from_utf8_lossy(alleles[0]).to_string();
        let alt_allele = String::from_utf8_lossy(alleles[1]).to_string();

        if snps_only && (ref_allele.len() != 1 || alt_allele.len() != 1) {
            stats.not_snp += 1;
            continue;
        }

        let genotypes = match record.genotypes() {
            Ok(g) => g,
            Err(_) => {
                stats.no_genotypes += 1;
                continue;
            }
        };

        let samples = tally_classes((0..sample_count).map(|i| classify_alleles(&genotypes.get(i))));

        sites.push(Site {
            chrom,
            pos,
            ref_allele,
            alt_allele,
            samples,
        });
    }

    progress!(quiet, "Total variants: {}", total_count);
    progress!(quiet, "  Not biallelic: {}", stats.not_biallelic);
    if snps_only {
        progress!(quiet, "  Not SNP: {}", stats.not_snp);
    }
    progress!(quiet, "  Missing GT field: {}", stats.no_genotypes);
    progress!(quiet, "  Total filtered: {}", stats.total());
    progress!(
        quiet,
        "Retained variants: {} ({:.1}%)",
        sites.len(),
        100.0 * sites.len() as f64 / total_count.max(1) as f64
    );

    Ok(ParsedVcf {
        sample_names,
        sites,
        filtered: stats,
    })
}
