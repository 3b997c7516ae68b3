use crate::genotype::{GenotypeCounts, OrientedGenotypeCounts};

/// Allele and genotype frequencies of a genotype tally.
///
/// Both frequencies are undefined for a tally with zero samples; callers
/// must rule that case out before asking.
pub trait FrequencyStatistics {
    /// Minor-allele frequency.
    fn maf(&self) -> f64;

    /// Maximum genotype frequency: share of samples in the largest class.
    fn mgf(&self) -> f64;
}

impl FrequencyStatistics for GenotypeCounts {
    /// ref_freq = (2·hom_ref + het) / 2n, MAF = min(ref_freq, 1 - ref_freq)
    fn maf(&self) -> f64 {
        let n = self.n_samples();
        debug_assert!(n > 0, "MAF is undefined for a site with no samples");

        let ref_freq = (2.0 * self.hom_ref as f64 + self.het as f64) / (2.0 * n as f64);
        ref_freq.min(1.0 - ref_freq)
    }

    fn mgf(&self) -> f64 {
        let n = self.n_samples();
        debug_assert!(n > 0, "MGF is undefined for a site with no samples");

        self.hom_ref.max(self.het).max(self.hom_alt) as f64 / n as f64
    }
}

impl FrequencyStatistics for OrientedGenotypeCounts {
    /// MAF = (2·hom_minor + het) / 2n
    ///
    /// Not symmetrised. Orientation guarantees hom_minor <= hom_major, so the
    /// value never exceeds 0.5.
    fn maf(&self) -> f64 {
        let n = self.n_samples();
        debug_assert!(n > 0, "MAF is undefined for a site with no samples");

        (2.0 * self.hom_minor as f64 + self.het as f64) / (2.0 * n as f64)
    }

    fn mgf(&self) -> f64 {
        let n = self.n_samples();
        debug_assert!(n > 0, "MGF is undefined for a site with no samples");

        self.hom_major.max(self.het).max(self.hom_minor) as f64 / n as f64
    }
}
