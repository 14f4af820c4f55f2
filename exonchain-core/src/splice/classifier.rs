use std::fmt;

use crate::types::ChainError;

/// Log-likelihood model scoring fixed-length windows around a splice site.
pub trait SiteClassifier: Send + Sync + fmt::Debug {
    /// Window length in bases
    fn window(&self) -> usize;

    /// Position of the exon boundary within the window
    fn site_offset(&self) -> usize;

    /// Minimum score of a reported site
    fn threshold(&self) -> f64;

    /// Score of a window of exactly [`SiteClassifier::window`] bases
    fn score(&self, window: &[u8]) -> f64;
}

const fn nucleotide_index(base: u8) -> Option<usize> {
    match base {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' | b'U' | b'u' => Some(3),
        _ => None,
    }
}

/// Position weight matrix of log-odds scores against a uniform background.
///
/// # Examples
///
/// ```rust
/// use exonchain_core::splice::{PositionWeightMatrix, SiteClassifier};
///
/// let sites: [&[u8]; 3] = [b"AGGTAAGT", b"CAGTAAGA", b"AGGTGAGT"];
/// let pwm = PositionWeightMatrix::from_sites(&sites, 2, 0.0, 0.5)?;
/// assert!(pwm.score(b"AGGTAAGT") > pwm.score(b"TTCCTTCC"));
/// # Ok::<(), exonchain_core::types::ChainError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PositionWeightMatrix {
    weights: Vec<[f64; 4]>,
    site_offset: usize,
    threshold: f64,
}

impl PositionWeightMatrix {
    /// # Errors
    ///
    /// Returns [`ChainError::InvalidConfig`] for an empty matrix or a site
    /// offset outside the window.
    pub fn new(
        weights: Vec<[f64; 4]>,
        site_offset: usize,
        threshold: f64,
    ) -> Result<Self, ChainError> {
        if weights.is_empty() || site_offset > weights.len() {
            return Err(ChainError::InvalidConfig(format!(
                "site offset {site_offset} outside a window of {}",
                weights.len()
            )));
        }
        Ok(Self {
            weights,
            site_offset,
            threshold,
        })
    }

    /// Estimate log2-odds weights from aligned example sites.
    ///
    /// # Errors
    ///
    /// Fails when no sites are given or they differ in length.
    pub fn from_sites(
        sites: &[&[u8]],
        site_offset: usize,
        threshold: f64,
        pseudocount: f64,
    ) -> Result<Self, ChainError> {
        let width = sites.first().map_or(0, |s| s.len());
        if width == 0 || sites.iter().any(|s| s.len() != width) {
            return Err(ChainError::InvalidConfig(
                "training sites must be non-empty and of equal length".to_string(),
            ));
        }
        let mut counts = vec![[pseudocount; 4]; width];
        for site in sites {
            for (position, &base) in site.iter().enumerate() {
                if let Some(index) = nucleotide_index(base) {
                    counts[position][index] += 1.0;
                }
            }
        }
        let weights = counts
            .into_iter()
            .map(|row| {
                let total: f64 = row.iter().sum();
                row.map(|c| {
                    if total > 0.0 && c > 0.0 {
                        (4.0 * c / total).log2()
                    } else {
                        f64::NEG_INFINITY
                    }
                })
            })
            .collect();
        Self::new(weights, site_offset, threshold)
    }
}

impl SiteClassifier for PositionWeightMatrix {
    fn window(&self) -> usize {
        self.weights.len()
    }

    fn site_offset(&self) -> usize {
        self.site_offset
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn score(&self, window: &[u8]) -> f64 {
        self.weights
            .iter()
            .zip(window)
            .map(|(row, &base)| match nucleotide_index(base) {
                Some(index) => row[index],
                None => row.iter().copied().fold(f64::INFINITY, f64::min),
            })
            .sum()
    }
}
