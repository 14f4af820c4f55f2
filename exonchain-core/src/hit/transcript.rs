use crate::constants::{START_RESIDUE, STOP_RESIDUE};
use crate::hit::Hit;
use crate::types::ChainError;

/// One ordered fragment (exon) of a reference transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub id: String,
    /// Reference amino-acid sequence, upper case
    pub protein: String,
    /// Leading bases of the part completing a codon begun in the previous part
    pub phase: Option<u8>,
}

impl Part {
    #[must_use]
    pub fn new(id: impl Into<String>, protein: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            protein: protein.into().to_ascii_uppercase(),
            phase: None,
        }
    }

    #[must_use]
    pub fn with_phase(mut self, phase: u8) -> Self {
        self.phase = Some(phase);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.protein.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.protein.is_empty()
    }
}

/// Reference transcript: an ordered list of parts.
///
/// # Examples
///
/// ```rust
/// use exonchain_core::hit::{Part, Transcript};
///
/// let transcript = Transcript::new(
///     "t1",
///     vec![Part::new("e1", "MKV"), Part::new("e2", "LLW"), Part::new("e3", "PA*")],
/// )?;
/// assert_eq!(transcript.cumulative_length(2), 6);
/// assert_eq!(transcript.remaining_length(0), 6);
/// assert!(transcript.requires_start_codon());
/// # Ok::<(), exonchain_core::types::ChainError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    id: String,
    parts: Vec<Part>,
    cumulative: Vec<usize>,
    remaining: Vec<usize>,
    protein: Option<String>,
}

impl Transcript {
    /// Create a transcript from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InvalidTranscript`] when there are no parts, a
    /// part is empty or a protein contains non-ASCII characters.
    pub fn new(id: impl Into<String>, parts: Vec<Part>) -> Result<Self, ChainError> {
        let id = id.into();
        if parts.is_empty() {
            return Err(ChainError::InvalidTranscript(format!("{id} has no parts")));
        }
        for part in &parts {
            if part.is_empty() || !part.protein.is_ascii() {
                return Err(ChainError::InvalidTranscript(format!(
                    "{id}: part {} has an empty or non-ASCII protein",
                    part.id
                )));
            }
            if part.phase.is_some_and(|p| p > 2) {
                return Err(ChainError::InvalidTranscript(format!(
                    "{id}: part {} has phase outside 0..=2",
                    part.id
                )));
            }
        }

        let mut cumulative = Vec::with_capacity(parts.len());
        let mut total = 0;
        for part in &parts {
            cumulative.push(total);
            total += part.len();
        }
        let remaining = parts
            .iter()
            .zip(&cumulative)
            .map(|(part, before)| total - before - part.len())
            .collect();

        Ok(Self {
            id,
            parts,
            cumulative,
            remaining,
            protein: None,
        })
    }

    /// Attach the full reference protein, used for quality metrics and
    /// start/stop decisions.
    #[must_use]
    pub fn with_protein(mut self, protein: impl Into<String>) -> Self {
        self.protein = Some(protein.into().to_ascii_uppercase());
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    #[must_use]
    pub fn part(&self, index: usize) -> &Part {
        &self.parts[index]
    }

    /// Number of parts
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    #[must_use]
    pub fn protein(&self) -> Option<&str> {
        self.protein.as_deref()
    }

    /// Concatenated part proteins, or the attached full protein
    #[must_use]
    pub fn reference_protein(&self) -> String {
        self.protein
            .clone()
            .unwrap_or_else(|| self.parts.iter().map(|p| p.protein.as_str()).collect())
    }

    #[must_use]
    pub fn part_length(&self, index: usize) -> usize {
        self.parts[index].len()
    }

    /// Summed length of all parts before `index`
    #[must_use]
    pub fn cumulative_length(&self, index: usize) -> usize {
        self.cumulative[index]
    }

    /// Summed length of all parts after `index`
    #[must_use]
    pub fn remaining_length(&self, index: usize) -> usize {
        self.remaining[index]
    }

    /// Summed length of the parts strictly between `first` and `second`
    #[must_use]
    pub fn skipped_length(&self, first: usize, second: usize) -> usize {
        if second <= first + 1 {
            0
        } else {
            self.cumulative[second] - self.cumulative[first + 1]
        }
    }

    /// Whether hits of the first part are constrained to a start codon
    #[must_use]
    pub fn first_part_starts_with_methionine(&self) -> bool {
        self.parts[0].protein.as_bytes().first() == Some(&START_RESIDUE)
    }

    /// Whether hits of the last part are constrained to a stop codon
    #[must_use]
    pub fn last_part_ends_with_stop(&self) -> bool {
        self.parts[self.parts.len() - 1].protein.as_bytes().last() == Some(&STOP_RESIDUE)
    }

    /// Whether refined predictions are extended to a start codon
    #[must_use]
    pub fn requires_start_codon(&self) -> bool {
        match &self.protein {
            Some(protein) => protein.as_bytes().first() == Some(&START_RESIDUE),
            None => self.first_part_starts_with_methionine(),
        }
    }

    /// Whether refined predictions are extended to a stop codon
    #[must_use]
    pub fn requires_stop_codon(&self) -> bool {
        match &self.protein {
            Some(protein) => protein.as_bytes().last() == Some(&STOP_RESIDUE),
            None => self.last_part_ends_with_stop(),
        }
    }

    /// Reference residues spanned by two hits of a chain, from the first
    /// query residue of `first` through the last query residue of `second`.
    #[must_use]
    pub fn protein_between(&self, first: &Hit, second: &Hit) -> Vec<u8> {
        let upstream = self.parts[first.part].protein.as_bytes();
        if first.part == second.part {
            let end = second.query_end.min(upstream.len());
            let start = (first.query_start - 1).min(end);
            return upstream[start..end].to_vec();
        }

        let mut protein = upstream[(first.query_start - 1).min(upstream.len())..].to_vec();
        for part in &self.parts[first.part + 1..second.part] {
            protein.extend_from_slice(part.protein.as_bytes());
        }
        let downstream = self.parts[second.part].protein.as_bytes();
        protein.extend_from_slice(&downstream[..second.query_end.min(downstream.len())]);
        protein
    }
}
