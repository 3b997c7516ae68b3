/// Genotype tally for one biallelic site, labelled by reference/alternate allele.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenotypeCounts {
    pub hom_ref: u32,
    pub hom_alt: u32,
    pub het: u32,
}

/// The same tally relabelled so that `hom_major` is the larger homozygous class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrientedGenotypeCounts {
    pub hom_major: u32,
    pub hom_minor: u32,
    pub het: u32,
}

/// Which reference/alternate class became `hom_major` during orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// `hom_major` is `hom_ref`
    Same,
    /// `hom_major` is `hom_alt`
    Switched,
}

impl Orientation {
    pub fn label(&self) -> &'static str {
        match self {
            Orientation::Same => "same",
            Orientation::Switched => "switched",
        }
    }
}

impl GenotypeCounts {
    pub fn new(hom_ref: u32, hom_alt: u32, het: u32) -> Self {
        Self { hom_ref, hom_alt, het }
    }

    pub fn n_samples(&self) -> u64 {
        u64::from(self.hom_ref) + u64::from(self.hom_alt) + u64::from(self.het)
    }

    /// Relabel the tally by major/minor homozygous class.
    ///
    /// Only a strictly larger `hom_ref` keeps the reference labelling; a tie
    /// is reported as `Switched` with `hom_major = hom_alt`.
    pub fn orient(&self) -> (OrientedGenotypeCounts, Orientation) {
        if self.hom_ref > self.hom_alt {
            (
                OrientedGenotypeCounts {
                    hom_major: self.hom_ref,
                    hom_minor: self.hom_alt,
                    het: self.het,
                },
                Orientation::Same,
            )
        } else {
            (
                OrientedGenotypeCounts {
                    hom_major: self.hom_alt,
                    hom_minor: self.hom_ref,
                    het: self.het,
                },
                Orientation::Switched,
            )
        }
    }
}

impl OrientedGenotypeCounts {
    pub fn new(hom_major: u32, hom_minor: u32, het: u32) -> Self {
        Self { hom_major, hom_minor, het }
    }

    pub fn n_samples(&self) -> u64 {
        u64::from(self.hom_major) + u64::from(self.hom_minor) + u64::from(self.het)
    }

    /// Map the oriented tally back onto reference/alternate labels.
    pub fn to_genotype_counts(&self, orientation: Orientation) -> GenotypeCounts {
        match orientation {
            Orientation::Same => GenotypeCounts::new(self.hom_major, self.hom_minor, self.het),
            Orientation::Switched => GenotypeCounts::new(self.hom_minor, self.hom_major, self.het),
        }
    }
}
