use std::collections::BTreeMap;

use bio::bio_types::strand::Strand;

use crate::hit::Hit;
use crate::types::ChainError;

/// Hits of one contig and strand, grouped by part.
#[derive(Debug, Clone, Default, PartialEq)]
struct StrandedHits {
    forward: Vec<Vec<Hit>>,
    reverse: Vec<Vec<Hit>>,
}

/// User-selected part of the genome to search.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRegion {
    pub contig: String,
    /// Restrict to one strand
    pub strand: Option<Strand>,
    /// First genomic position (1-based, inclusive)
    pub start: Option<i64>,
    /// Last genomic position (1-based, inclusive)
    pub end: Option<i64>,
}

impl TargetRegion {
    /// Whole contig, both strands
    #[must_use]
    pub fn contig(contig: impl Into<String>) -> Self {
        Self {
            contig: contig.into(),
            strand: None,
            start: None,
            end: None,
        }
    }

    #[must_use]
    pub fn with_strand(mut self, strand: Strand) -> Self {
        self.strand = Some(strand);
        self
    }

    #[must_use]
    pub fn with_range(mut self, start: i64, end: i64) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    fn admits(&self, hit: &Hit) -> bool {
        hit.contig == self.contig
            && self.strand.map_or(true, |s| s == hit.strand)
            && self.start.map_or(true, |s| hit.target_end >= s)
            && self.end.map_or(true, |e| hit.target_start <= e)
    }
}

/// All hits of one contig and strand, indexed by part and sorted in
/// transcription order.
#[derive(Debug, Clone, Copy)]
pub struct Partition<'a> {
    pub contig: &'a str,
    pub strand: Strand,
    pub hits: &'a [Vec<Hit>],
}

impl Partition<'_> {
    /// Total number of hits
    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.iter().all(Vec::is_empty)
    }
}

/// Hits of one transcript partitioned by contig, strand and part.
///
/// Within a partition each part's list is sorted by genomic start on the
/// forward strand and by descending end on the reverse strand, so it is
/// monotone in transcription direction.
///
/// # Examples
///
/// ```rust
/// use exonchain_core::hit::{Hit, HitCollection, HitRecord};
///
/// let mut hits = HitCollection::new(2);
/// hits.insert(Hit::from_record(HitRecord {
///     part: 1,
///     contig: "chr1".to_string(),
///     target_start: 10,
///     target_end: 15,
///     query_start: 1,
///     query_end: 2,
///     query_length: 2,
///     score: 12,
///     aligned_query: "WW".to_string(),
///     aligned_target: "WW".to_string(),
/// })?)?;
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits.partitions().len(), 1);
/// # Ok::<(), exonchain_core::types::ChainError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitCollection {
    parts: usize,
    contigs: BTreeMap<String, StrandedHits>,
}

impl HitCollection {
    /// Empty collection for a transcript with `parts` parts
    #[must_use]
    pub fn new(parts: usize) -> Self {
        Self {
            parts,
            contigs: BTreeMap::new(),
        }
    }

    /// Build a collection from hits in any order.
    ///
    /// # Errors
    ///
    /// Fails on the first hit whose part is out of range.
    pub fn from_hits<I>(parts: usize, hits: I) -> Result<Self, ChainError>
    where
        I: IntoIterator<Item = Hit>,
    {
        let mut collection = Self::new(parts);
        for hit in hits {
            collection.insert(hit)?;
        }
        Ok(collection)
    }

    /// Number of parts of the transcript
    #[must_use]
    pub const fn parts(&self) -> usize {
        self.parts
    }

    /// Insert a hit at its sorted position.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InvalidHit`] if the hit's part is out of range.
    pub fn insert(&mut self, hit: Hit) -> Result<(), ChainError> {
        if hit.part >= self.parts {
            return Err(ChainError::InvalidHit(format!(
                "part {} out of range for {} parts",
                hit.part, self.parts
            )));
        }
        let parts = self.parts;
        let stranded = self.contigs.entry(hit.contig.clone()).or_default();
        let lists = if hit.is_forward() {
            &mut stranded.forward
        } else {
            &mut stranded.reverse
        };
        if lists.is_empty() {
            lists.resize_with(parts, Vec::new);
        }
        let list = &mut lists[hit.part];
        let position = if hit.is_forward() {
            list.partition_point(|h| h.target_start <= hit.target_start)
        } else {
            list.partition_point(|h| h.target_end >= hit.target_end)
        };
        list.insert(position, hit);
        Ok(())
    }

    /// Total number of hits
    #[must_use]
    pub fn len(&self) -> usize {
        self.contigs
            .values()
            .flat_map(|s| s.forward.iter().chain(&s.reverse))
            .map(Vec::len)
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-empty contig/strand partitions, ordered by contig id with the
    /// forward strand first.
    #[must_use]
    pub fn partitions(&self) -> Vec<Partition<'_>> {
        let mut partitions = Vec::new();
        for (contig, stranded) in &self.contigs {
            for (strand, hits) in [
                (Strand::Forward, &stranded.forward),
                (Strand::Reverse, &stranded.reverse),
            ] {
                let partition = Partition {
                    contig: contig.as_str(),
                    strand,
                    hits: hits.as_slice(),
                };
                if !hits.is_empty() && !partition.is_empty() {
                    partitions.push(partition);
                }
            }
        }
        partitions
    }

    /// Hits overlapping `region`; the result keeps the sort order.
    #[must_use]
    pub fn restrict(&self, region: &TargetRegion) -> Self {
        let mut restricted = Self::new(self.parts);
        if let Some(stranded) = self.contigs.get(&region.contig) {
            let filter = |lists: &Vec<Vec<Hit>>| -> Vec<Vec<Hit>> {
                lists
                    .iter()
                    .map(|list| list.iter().filter(|h| region.admits(h)).cloned().collect())
                    .collect()
            };
            restricted.contigs.insert(
                region.contig.clone(),
                StrandedHits {
                    forward: filter(&stranded.forward),
                    reverse: filter(&stranded.reverse),
                },
            );
        }
        restricted
    }
}
