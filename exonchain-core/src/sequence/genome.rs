use std::collections::HashMap;
use std::sync::Arc;

use bio::alphabets::dna;
use bio::bio_types::strand::Strand;

use crate::types::OrientedSpan;

/// Read access to genomic sequence by contig id.
///
/// Implementations must be shareable across the worker threads of the
/// predictor.
pub trait GenomeSource: Send + Sync {
    /// Forward-strand sequence of `contig`, or `None` if it is unknown.
    fn sequence(&self, contig: &str) -> Option<&[u8]>;
}

impl<T: GenomeSource + ?Sized> GenomeSource for &T {
    fn sequence(&self, contig: &str) -> Option<&[u8]> {
        (**self).sequence(contig)
    }
}

impl<T: GenomeSource + ?Sized> GenomeSource for Arc<T> {
    fn sequence(&self, contig: &str) -> Option<&[u8]> {
        (**self).sequence(contig)
    }
}

/// Genome held in memory, contig id to upper-case sequence.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGenome {
    contigs: HashMap<String, Vec<u8>>,
}

impl InMemoryGenome {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a contig. The sequence is converted to upper case.
    pub fn insert(&mut self, id: impl Into<String>, mut sequence: Vec<u8>) {
        sequence.make_ascii_uppercase();
        self.contigs.insert(id.into(), sequence);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    #[must_use]
    pub fn contains(&self, contig: &str) -> bool {
        self.contigs.contains_key(contig)
    }

    /// Contig ids in arbitrary order
    pub fn contig_ids(&self) -> impl Iterator<Item = &str> {
        self.contigs.keys().map(String::as_str)
    }
}

impl GenomeSource for InMemoryGenome {
    fn sequence(&self, contig: &str) -> Option<&[u8]> {
        self.contigs.get(contig).map(Vec::as_slice)
    }
}

/// Strand-aware view of one contig.
///
/// Positions are oriented: 0-based, half-open and increasing in transcription
/// direction. On the reverse strand, oriented position `p` corresponds to the
/// complement of genomic base `len - p` (1-based). Nothing is copied until a
/// window is fetched.
#[derive(Debug, Clone, Copy)]
pub struct OrientedContig<'g> {
    id: &'g str,
    sequence: &'g [u8],
    strand: Strand,
}

impl<'g> OrientedContig<'g> {
    #[must_use]
    pub const fn new(id: &'g str, sequence: &'g [u8], strand: Strand) -> Self {
        Self {
            id,
            sequence,
            strand,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &'g str {
        self.id
    }

    #[must_use]
    pub const fn strand(&self) -> Strand {
        self.strand
    }

    #[must_use]
    pub const fn is_forward(&self) -> bool {
        !matches!(self.strand, Strand::Reverse)
    }

    #[must_use]
    pub const fn len(&self) -> i64 {
        self.sequence.len() as i64
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Oriented bases `[start, end)`, clamped to the contig and upper-cased.
    #[must_use]
    pub fn fetch(&self, start: i64, end: i64) -> Vec<u8> {
        let start = start.clamp(0, self.len());
        let end = end.clamp(start, self.len());
        let mut window = if self.is_forward() {
            self.sequence[start as usize..end as usize].to_vec()
        } else {
            let lo = (self.len() - end) as usize;
            let hi = (self.len() - start) as usize;
            dna::revcomp(&self.sequence[lo..hi])
        };
        window.make_ascii_uppercase();
        window
    }

    /// Convert 1-based inclusive genomic coordinates to an oriented span.
    #[must_use]
    pub const fn to_oriented(&self, genomic_start: i64, genomic_end: i64) -> OrientedSpan {
        if self.is_forward() {
            OrientedSpan::new(genomic_start - 1, genomic_end)
        } else {
            OrientedSpan::new(self.len() - genomic_end, self.len() - genomic_start + 1)
        }
    }

    /// Convert an oriented span back to 1-based inclusive genomic
    /// coordinates `(start, end)` with `start <= end`.
    #[must_use]
    pub const fn to_genomic(&self, span: OrientedSpan) -> (i64, i64) {
        if self.is_forward() {
            (span.start + 1, span.end)
        } else {
            (self.len() - span.end + 1, self.len() - span.start)
        }
    }

    /// Start positions of `motif` lying completely inside `[start, end)`.
    #[must_use]
    pub fn find_motif(&self, start: i64, end: i64, motif: &[u8]) -> Vec<i64> {
        let start = start.max(0);
        let window = self.fetch(start, end);
        window
            .windows(motif.len())
            .enumerate()
            .filter(|(_, w)| *w == motif)
            .map(|(offset, _)| start + offset as i64)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_genome() -> InMemoryGenome {
        let mut genome = InMemoryGenome::new();
        genome.insert("chr1", b"aacgtTTGCA".to_vec());
        genome
    }

    #[test]
    fn test_insert_uppercases() {
        let genome = create_test_genome();
        assert_eq!(genome.sequence("chr1"), Some(&b"AACGTTTGCA"[..]));
        assert!(genome.sequence("chr2").is_none());
        assert_eq!(genome.len(), 1);
    }

    #[test]
    fn test_forward_fetch_and_coordinates() {
        let genome = create_test_genome();
        let seq = genome.sequence("chr1").unwrap();
        let contig = OrientedContig::new("chr1", seq, Strand::Forward);
        assert_eq!(contig.fetch(2, 5), b"CGT".to_vec());
        assert_eq!(contig.fetch(-3, 2), b"AA".to_vec());

        let span = contig.to_oriented(3, 5);
        assert_eq!(span, OrientedSpan::new(2, 5));
        assert_eq!(contig.to_genomic(span), (3, 5));
    }

    #[test]
    fn test_reverse_fetch_and_coordinates() {
        let genome = create_test_genome();
        let seq = genome.sequence("chr1").unwrap();
        let contig = OrientedContig::new("chr1", seq, Strand::Reverse);
        // reverse complement of AACGTTTGCA is TGCAAACGTT
        assert_eq!(contig.fetch(0, 10), b"TGCAAACGTT".to_vec());

        // genomic 8..10 (GCA) is oriented 0..3 (TGC)
        let span = contig.to_oriented(8, 10);
        assert_eq!(span, OrientedSpan::new(0, 3));
        assert_eq!(contig.fetch(span.start, span.end), b"TGC".to_vec());
        assert_eq!(contig.to_genomic(span), (8, 10));
    }

    #[test]
    fn test_find_motif() {
        let genome = create_test_genome();
        let seq = genome.sequence("chr1").unwrap();
        let contig = OrientedContig::new("chr1", seq, Strand::Forward);
        assert_eq!(contig.find_motif(0, 10, b"GT"), vec![3]);
        assert!(contig.find_motif(0, 4, b"GT").is_empty());
    }
}
