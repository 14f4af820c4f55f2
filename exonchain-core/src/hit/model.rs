use bio::bio_types::strand::Strand;

use crate::constants::{CODON_LENGTH, GAP, UNKNOWN_RESIDUE};
use crate::types::ChainError;

/// Raw local alignment of a reference part against the genome, as reported
/// by the upstream aligner.
///
/// `target_start > target_end` denotes the reverse strand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitRecord {
    pub part: usize,
    pub contig: String,
    pub target_start: i64,
    pub target_end: i64,
    pub query_start: usize,
    pub query_end: usize,
    pub query_length: usize,
    pub score: i64,
    pub aligned_query: String,
    pub aligned_target: String,
}

/// Candidate alignment between one reference part and a genomic interval.
///
/// Genomic coordinates are 1-based inclusive with `target_start <=
/// target_end`; query coordinates are 1-based inclusive into the part's
/// protein. The aligned target spans exactly three bases per residue at
/// construction time. Refinement may later move the boundaries beyond the
/// aligned region, see [`Hit::apply_donor`].
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub part: usize,
    pub contig: String,
    pub strand: Strand,
    pub target_start: i64,
    pub target_end: i64,
    pub query_start: usize,
    pub query_end: usize,
    pub query_length: usize,
    pub score: i64,
    pub aligned_query: Vec<u8>,
    pub aligned_target: Vec<u8>,
    /// Evidence trail: provenance, splits and refinement steps
    pub notes: Vec<String>,
}

fn residues(aligned: &[u8]) -> usize {
    aligned.iter().filter(|&&c| c != GAP).count()
}

impl Hit {
    /// Build a hit from an aligner record, normalizing the strand.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InvalidHit`] when the aligned strings differ in
    /// length, the target span is not three bases per aligned residue or the
    /// query interval is inconsistent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bio::bio_types::strand::Strand;
    /// use exonchain_core::hit::{Hit, HitRecord};
    ///
    /// let hit = Hit::from_record(HitRecord {
    ///     part: 0,
    ///     contig: "chr1".to_string(),
    ///     target_start: 9,
    ///     target_end: 1,
    ///     query_start: 1,
    ///     query_end: 3,
    ///     query_length: 3,
    ///     score: 20,
    ///     aligned_query: "MKB".to_string(),
    ///     aligned_target: "MKB".to_string(),
    /// })?;
    /// assert_eq!(hit.strand, Strand::Reverse);
    /// assert_eq!((hit.target_start, hit.target_end), (1, 9));
    /// assert_eq!(hit.aligned_target, b"MKX".to_vec());
    /// # Ok::<(), exonchain_core::types::ChainError>(())
    /// ```
    pub fn from_record(record: HitRecord) -> Result<Self, ChainError> {
        let (strand, target_start, target_end) = if record.target_start <= record.target_end {
            (Strand::Forward, record.target_start, record.target_end)
        } else {
            (Strand::Reverse, record.target_end, record.target_start)
        };

        let aligned_query = record.aligned_query.to_ascii_uppercase().into_bytes();
        let aligned_target: Vec<u8> = record
            .aligned_target
            .to_ascii_uppercase()
            .bytes()
            .map(|c| match c {
                b'B' | b'J' | b'Z' => UNKNOWN_RESIDUE,
                other => other,
            })
            .collect();

        let invalid = |reason: String| {
            ChainError::InvalidHit(format!(
                "{}:{}-{} (part {}): {reason}",
                record.contig, target_start, target_end, record.part
            ))
        };

        if target_start < 1 {
            return Err(invalid("target start below 1".to_string()));
        }
        if aligned_query.is_empty() || aligned_query.len() != aligned_target.len() {
            return Err(invalid(format!(
                "aligned strings of length {} and {}",
                aligned_query.len(),
                aligned_target.len()
            )));
        }
        let target_residues = residues(&aligned_target) as i64;
        if target_end - target_start + 1 != CODON_LENGTH * target_residues {
            return Err(invalid(format!(
                "span of {} bp for {target_residues} aligned residues",
                target_end - target_start + 1
            )));
        }
        if record.query_start == 0
            || record.query_start > record.query_end
            || record.query_end > record.query_length
        {
            return Err(invalid(format!(
                "query interval {}-{} of {}",
                record.query_start, record.query_end, record.query_length
            )));
        }
        if residues(&aligned_query) != record.query_end - record.query_start + 1 {
            return Err(invalid("aligned query does not match the query interval".to_string()));
        }

        Ok(Self {
            part: record.part,
            contig: record.contig,
            strand,
            target_start,
            target_end,
            query_start: record.query_start,
            query_end: record.query_end,
            query_length: record.query_length,
            score: record.score,
            aligned_query,
            aligned_target,
            notes: Vec::new(),
        })
    }

    #[must_use]
    pub const fn is_forward(&self) -> bool {
        !matches!(self.strand, Strand::Reverse)
    }

    /// Genomic length in base pairs
    #[must_use]
    pub const fn target_length(&self) -> i64 {
        self.target_end - self.target_start + 1
    }

    /// Number of query residues covered
    #[must_use]
    pub const fn query_span(&self) -> usize {
        self.query_end + 1 - self.query_start
    }

    /// Genomic coordinate of the 5' end on the transcribed strand
    #[must_use]
    pub const fn five_prime(&self) -> i64 {
        if self.is_forward() {
            self.target_start
        } else {
            self.target_end
        }
    }

    /// Aligned target residues without gaps
    #[must_use]
    pub fn target_residues(&self) -> Vec<u8> {
        self.aligned_target
            .iter()
            .copied()
            .filter(|&c| c != GAP)
            .collect()
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Sub-hit starting `offset` bases after the 5' end and spanning `length`
    /// bases on the transcribed strand.
    pub(crate) fn sub_hit(
        &self,
        offset: i64,
        length: i64,
        query: (usize, usize),
        score: i64,
        aligned_query: Vec<u8>,
        aligned_target: Vec<u8>,
    ) -> Self {
        let (target_start, target_end) = if self.is_forward() {
            let start = self.target_start + offset;
            (start, start + length - 1)
        } else {
            let end = self.target_end - offset;
            (end - length + 1, end)
        };
        Self {
            part: self.part,
            contig: self.contig.clone(),
            strand: self.strand,
            target_start,
            target_end,
            query_start: query.0,
            query_end: query.1,
            query_length: self.query_length,
            score,
            aligned_query,
            aligned_target,
            notes: self.notes.clone(),
        }
    }

    /// Move the 3' boundary by `offset` bases (positive extends).
    ///
    /// A negative offset also trims `ceil(-offset / 3)` target residues from
    /// the end of the alignment and shortens the query interval by the query
    /// residues removed with them.
    pub fn apply_donor(&mut self, offset: i64) {
        if self.is_forward() {
            self.target_end += offset;
        } else {
            self.target_start -= offset;
        }
        if offset < 0 {
            let removed = self.trim_alignment((-offset + 2) / 3, false);
            self.query_end = self.query_end.saturating_sub(removed).max(self.query_start);
        }
    }

    /// Move the 5' boundary upstream by `offset` bases (positive extends).
    ///
    /// A negative offset trims the alignment start, see [`Hit::apply_donor`].
    pub fn apply_acceptor(&mut self, offset: i64) {
        if self.is_forward() {
            self.target_start -= offset;
        } else {
            self.target_end += offset;
        }
        if offset < 0 {
            let removed = self.trim_alignment((-offset + 2) / 3, true);
            self.query_start = (self.query_start + removed).min(self.query_end);
        }
    }

    /// Remove columns until `target_residues` target residues are gone;
    /// returns the number of query residues removed with them.
    fn trim_alignment(&mut self, target_residues: i64, from_front: bool) -> usize {
        let mut seen = 0;
        let mut columns = 0;
        let mut query_removed = 0;
        let len = self.aligned_target.len();
        while columns < len && seen < target_residues {
            let index = if from_front { columns } else { len - 1 - columns };
            if self.aligned_target[index] != GAP {
                seen += 1;
            }
            if self.aligned_query[index] != GAP {
                query_removed += 1;
            }
            columns += 1;
        }
        if from_front {
            self.aligned_target.drain(..columns);
            self.aligned_query.drain(..columns);
        } else {
            self.aligned_target.truncate(len - columns);
            self.aligned_query.truncate(len - columns);
        }
        query_removed
    }
}
