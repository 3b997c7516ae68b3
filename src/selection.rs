use crate::genotype::{Orientation, OrientedGenotypeCounts};
use crate::subsample::{subsample, SubsampleParams};
use crate::types::{Site, SiteResult, SiteSamples, Subsampled};
use anyhow::{ensure, Result};

fn take_first(indices: &[usize], n: u32, class: &str) -> Result<Vec<usize>> {
    let n = n as usize;
    ensure!(
        n <= indices.len(),
        "requested {} {} samples but only {} are available",
        n,
        class,
        indices.len()
    );
    Ok(indices[..n].to_vec())
}

/// Pick concrete samples matching a reduced oriented tally.
///
/// The first samples of each class in header order are kept. `orientation`
/// decides whether `hom_major` draws from the hom-ref or hom-alt samples.
pub fn select_samples(
    samples: &SiteSamples,
    ogt: &OrientedGenotypeCounts,
    orientation: Orientation,
) -> Result<Vec<usize>> {
    let kept = ogt.to_genotype_counts(orientation);

    let mut selected = take_first(&samples.hom_ref, kept.hom_ref, "hom-ref")?;
    selected.extend(take_first(&samples.hom_alt, kept.hom_alt, "hom-alt")?);
    selected.extend(take_first(&samples.het, kept.het, "het")?);
    selected.sort_unstable();
    Ok(selected)
}

/// Orient, subsample and select samples for one site.
pub fn process_site(site: Site, params: &SubsampleParams) -> Result<SiteResult> {
    let counts = site.counts()?;
    let (ogt, orientation) = counts.orient();

    let outcome = match subsample(ogt, params) {
        Ok(reduced) => {
            let selected = select_samples(&site.samples, &reduced, orientation)?;
            Ok(Subsampled {
                orientation,
                counts: reduced,
                selected,
            })
        }
        Err(e) => Err(e),
    };

    Ok(SiteResult {
        site,
        counts,
        outcome,
    })
}
