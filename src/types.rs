use crate::genotype::{GenotypeCounts, Orientation, OrientedGenotypeCounts};
use crate::subsample::SubsampleError;
use anyhow::{Context, Result};

fn class_count(indices: &[usize], class: &str) -> Result<u32> {
    u32::try_from(indices.len())
        .with_context(|| format!("{} {} samples exceed the supported count", indices.len(), class))
}

/// Sample column indices of one site, grouped by genotype class in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteSamples {
    pub hom_ref: Vec<usize>,
    pub hom_alt: Vec<usize>,
    pub het: Vec<usize>,
}

impl SiteSamples {
    pub fn counts(&self) -> Result<GenotypeCounts> {
        Ok(GenotypeCounts::new(
            class_count(&self.hom_ref, "hom-ref")?,
            class_count(&self.hom_alt, "hom-alt")?,
            class_count(&self.het, "het")?,
        ))
    }
}

/// A single biallelic variant site with its called samples
#[derive(Debug, Clone)]
pub struct Site {
    pub chrom: String,
    pub pos: u64,
    pub ref_allele: String,
    pub alt_allele: String,
    pub samples: SiteSamples,
}

impl Site {
    pub fn counts(&self) -> Result<GenotypeCounts> {
        self.samples.counts()
    }
}

/// A successfully reduced site.
#[derive(Debug, Clone, PartialEq)]
pub struct Subsampled {
    pub orientation: Orientation,
    pub counts: OrientedGenotypeCounts,
    /// Sample column indices kept, ascending
    pub selected: Vec<usize>,
}

/// Subsampling outcome for one site
#[derive(Debug, Clone)]
pub struct SiteResult {
    pub site: Site,
    pub counts: GenotypeCounts,
    pub outcome: std::result::Result<Subsampled, SubsampleError>,
}

/// Per-run tally of subsampled and skipped sites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub total: u64,
    pub subsampled: u64,
    pub excessive_mgf: u64,
    pub insufficient_samples: u64,
    pub no_feasible_reduction: u64,
}

impl SkipCounts {
    pub fn record<T>(&mut self, outcome: &std::result::Result<T, SubsampleError>) {
        self.total += 1;
        match outcome {
            Ok(_) => self.subsampled += 1,
            Err(SubsampleError::ExcessiveGenotypeFrequency) => self.excessive_mgf += 1,
            Err(SubsampleError::InsufficientSamples) => self.insufficient_samples += 1,
            Err(SubsampleError::NoFeasibleReduction) => self.no_feasible_reduction += 1,
        }
    }

    pub fn skipped(&self) -> u64 {
        self.excessive_mgf + self.insufficient_samples + self.no_feasible_reduction
    }
}
