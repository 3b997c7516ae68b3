use crate::genotype::OrientedGenotypeCounts;
use crate::statistics::FrequencyStatistics;
use thiserror::Error;

/// Target and constraints for subsampling a single site.
///
/// Values are expected to be validated by the caller:
/// `target_maf` in (0, 0.5], `margin` in [0, 0.5], `max_mgf` in (0, 1],
/// `min_samples` >= 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubsampleParams {
    pub target_maf: f64,
    pub margin: f64,
    pub max_mgf: f64,
    pub min_samples: u32,
    /// Only accept a result with exactly `min_samples` samples
    pub exact_samples: bool,
}

impl SubsampleParams {
    pub fn new(target_maf: f64, margin: f64, max_mgf: f64, min_samples: u32) -> Self {
        Self {
            target_maf,
            margin,
            max_mgf,
            min_samples,
            exact_samples: false,
        }
    }

    pub fn with_exact_samples(mut self, exact_samples: bool) -> Self {
        self.exact_samples = exact_samples;
        self
    }

    /// Open interval (target - margin, target + margin).
    fn in_window(&self, maf: f64) -> bool {
        maf > self.target_maf - self.margin && maf < self.target_maf + self.margin
    }
}

/// Reasons a site could not be subsampled to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SubsampleError {
    #[error("maximum genotype frequency exceeded")]
    ExcessiveGenotypeFrequency,
    #[error("too few samples remaining")]
    InsufficientSamples,
    #[error("no genotype class can be reduced towards the target")]
    NoFeasibleReduction,
}

impl SubsampleError {
    pub fn label(&self) -> &'static str {
        match self {
            SubsampleError::ExcessiveGenotypeFrequency => "excessive_mgf",
            SubsampleError::InsufficientSamples => "insufficient_samples",
            SubsampleError::NoFeasibleReduction => "no_feasible_reduction",
        }
    }
}

/// Remove samples one at a time until the oriented MAF falls inside the
/// target window, returning the reduced tally.
pub fn subsample(
    mut ogt: OrientedGenotypeCounts,
    params: &SubsampleParams,
) -> Result<OrientedGenotypeCounts, SubsampleError> {
    subsample_in_place(&mut ogt, params)?;
    Ok(ogt)
}

/// Same search as [`subsample`], mutating `ogt` directly.
///
/// On `NoFeasibleReduction` the tally is left in its partially reduced
/// state; the other failures may also fire after some removals.
///
/// Each pass either returns or removes exactly one sample, checking in
/// order: MGF ceiling, sample floor, target window, then one removal
/// (hom_major when MAF is low; hom_minor, else het, when MAF is high).
pub fn subsample_in_place(
    ogt: &mut OrientedGenotypeCounts,
    params: &SubsampleParams,
) -> Result<(), SubsampleError> {
    loop {
        let n_samples = ogt.n_samples();

        // Frequencies are undefined here. With a positive floor the sample
        // check below is the first one that could fire.
        if n_samples == 0 {
            return Err(if params.min_samples > 0 {
                SubsampleError::InsufficientSamples
            } else {
                SubsampleError::NoFeasibleReduction
            });
        }

        let maf = ogt.maf();
        let mgf = ogt.mgf();

        if mgf > params.max_mgf {
            return Err(SubsampleError::ExcessiveGenotypeFrequency);
        }

        if n_samples < u64::from(params.min_samples) {
            return Err(SubsampleError::InsufficientSamples);
        }

        if params.in_window(maf) && (!params.exact_samples || n_samples == u64::from(params.min_samples)) {
            return Ok(());
        }

        if maf < params.target_maf && ogt.hom_major > 0 {
            ogt.hom_major -= 1;
        } else if maf > params.target_maf && ogt.hom_minor > 0 {
            ogt.hom_minor -= 1;
        } else if maf > params.target_maf && ogt.het > 0 {
            ogt.het -= 1;
        } else if params.exact_samples && maf == params.target_maf && ogt.hom_major > 0 {
            ogt.hom_major -= 1;
        } else {
            return Err(SubsampleError::NoFeasibleReduction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(target_maf: f64, margin: f64, max_mgf: f64, min_samples: u32) -> SubsampleParams {
        SubsampleParams::new(target_maf, margin, max_mgf, min_samples)
    }

    #[test]
    fn test_reduces_major_to_raise_maf() {
        let ogt = OrientedGenotypeCounts::new(10, 2, 0);
        let result = subsample(ogt, &params(0.3, 0.05, 1.0, 1)).unwrap();
        assert_eq!(result, OrientedGenotypeCounts::new(5, 2, 0));
    }

    #[test]
    fn test_excessive_mgf_short_circuits() {
        let mut ogt = OrientedGenotypeCounts::new(1, 1, 8);
        let err = subsample_in_place(&mut ogt, &params(0.3, 0.05, 0.5, 1)).unwrap_err();
        assert_eq!(err, SubsampleError::ExcessiveGenotypeFrequency);
        assert_eq!(ogt, OrientedGenotypeCounts::new(1, 1, 8));
    }

    #[test]
    fn test_insufficient_samples() {
        let mut ogt = OrientedGenotypeCounts::new(2, 1, 0);
        let err = subsample_in_place(&mut ogt, &params(0.3, 0.05, 1.0, 5)).unwrap_err();
        assert_eq!(err, SubsampleError::InsufficientSamples);
        assert_eq!(ogt.n_samples(), 3);
    }

    #[test]
    fn test_empty_site() {
        let ogt = OrientedGenotypeCounts::new(0, 0, 0);
        assert_eq!(
            subsample(ogt, &params(0.2, 0.05, 1.0, 1)),
            Err(SubsampleError::InsufficientSamples)
        );
        assert_eq!(
            subsample(ogt, &params(0.2, 0.05, 1.0, 0)),
            Err(SubsampleError::NoFeasibleReduction)
        );
    }

    #[test]
    fn test_already_in_window_is_unchanged() {
        // maf = 8 / 40 = 0.2
        let ogt = OrientedGenotypeCounts::new(14, 2, 4);
        let result = subsample(ogt, &params(0.2, 0.01, 1.0, 1)).unwrap();
        assert_eq!(result, ogt);
    }

    #[test]
    fn test_reduces_minor_before_het() {
        // maf = (2·5 + 4) / 40 = 0.35
        let ogt = OrientedGenotypeCounts::new(11, 5, 4);
        let result = subsample(ogt, &params(0.2, 0.02, 1.0, 1)).unwrap();
        assert_eq!(result.hom_major, 11);
        assert_eq!(result.het, 4);
        assert!(result.hom_minor < 5);
    }

    #[test]
    fn test_reduces_het_once_minor_exhausted() {
        // maf = 6 / 20 = 0.3, no hom_minor to remove
        let ogt = OrientedGenotypeCounts::new(4, 0, 6);
        let result = subsample(ogt, &params(0.2, 0.02, 1.0, 1)).unwrap();
        assert_eq!(result.hom_major, 4);
        assert_eq!(result.hom_minor, 0);
        assert!(result.het < 6);
        assert!(result.maf() > 0.18 && result.maf() < 0.22);
    }

    #[test]
    fn test_monomorphic_site_runs_into_floor() {
        let mut ogt = OrientedGenotypeCounts::new(3, 0, 0);
        let err = subsample_in_place(&mut ogt, &params(0.3, 0.05, 1.0, 1)).unwrap_err();
        // every hom_major is removed before the floor stops the search
        assert_eq!(err, SubsampleError::InsufficientSamples);
        assert_eq!(ogt, OrientedGenotypeCounts::new(0, 0, 0));
    }

    #[test]
    fn test_no_feasible_reduction_on_exact_target_with_zero_margin() {
        // maf = 2 / 8 = 0.25 exactly, margin 0 leaves an empty window
        let mut ogt = OrientedGenotypeCounts::new(2, 0, 2);
        let err = subsample_in_place(&mut ogt, &params(0.25, 0.0, 1.0, 1)).unwrap_err();
        assert_eq!(err, SubsampleError::NoFeasibleReduction);
        assert_eq!(ogt, OrientedGenotypeCounts::new(2, 0, 2));
    }

    #[test]
    fn test_mgf_checked_after_reduction() {
        // dropping hom_minor and then het leaves hom_major dominant
        let ogt = OrientedGenotypeCounts::new(4, 3, 5);
        let err = subsample(ogt, &params(0.1, 0.02, 0.6, 1)).unwrap_err();
        assert_eq!(err, SubsampleError::ExcessiveGenotypeFrequency);
    }

    #[test]
    fn test_exact_samples_stops_at_floor() {
        // in window at n = 20 already, keep going until n = 10
        let ogt = OrientedGenotypeCounts::new(14, 2, 4);
        let p = params(0.2, 0.1, 1.0, 10).with_exact_samples(true);
        let result = subsample(ogt, &p).unwrap();
        assert_eq!(result.n_samples(), 10);
        assert!(result.maf() > 0.1 && result.maf() < 0.3);
    }

    #[test]
    fn test_exact_samples_drops_major_on_exact_target() {
        // maf = 4 / 16 = 0.25 == target
        let ogt = OrientedGenotypeCounts::new(6, 2, 0);
        let p = params(0.25, 0.2, 1.0, 7).with_exact_samples(true);
        let result = subsample(ogt, &p).unwrap();
        assert_eq!(result, OrientedGenotypeCounts::new(5, 2, 0));
    }

    #[test]
    fn test_error_labels() {
        assert_eq!(SubsampleError::ExcessiveGenotypeFrequency.label(), "excessive_mgf");
        assert_eq!(SubsampleError::InsufficientSamples.label(), "insufficient_samples");
        assert_eq!(SubsampleError::NoFeasibleReduction.label(), "no_feasible_reduction");
    }
}
