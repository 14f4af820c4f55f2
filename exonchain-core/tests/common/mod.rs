#![allow(dead_code)]

use bio::alphabets::dna;
use exonchain_core::align::{PairwiseAligner, SubstitutionAligner};
use exonchain_core::hit::{Hit, HitCollection, HitRecord, Part, Transcript};
use exonchain_core::sequence::InMemoryGenome;

/// Contig id used by all fixtures
pub const CONTIG: &str = "chr1";

/// First part, starts with a methionine
pub const PART_0: &str = "MKWFEG";
/// Middle part; none of its residues scores positively against the
/// translated introns and flanks
pub const PART_1: &str = "WCYFGP";
/// Last part, without a stop
pub const PART_2: &str = "PEGWFA";

/// One fixed codon per residue.
pub fn codon(residue: u8) -> &'static [u8] {
    match residue {
        b'A' => b"GCT",
        b'C' => b"TGC",
        b'D' => b"GAC",
        b'E' => b"GAA",
        b'F' => b"TTC",
        b'G' => b"GGC",
        b'H' => b"CAC",
        b'I' => b"ATC",
        b'K' => b"AAA",
        b'L' => b"CTG",
        b'M' => b"ATG",
        b'N' => b"AAC",
        b'P' => b"CCA",
        b'Q' => b"CAA",
        b'R' => b"CGC",
        b'S' => b"TCC",
        b'T' => b"ACC",
        b'V' => b"GTC",
        b'W' => b"TGG",
        b'Y' => b"TAC",
        b'*' => b"TAA",
        other => panic!("no codon for residue {}", other as char),
    }
}

/// Coding sequence of `protein`.
pub fn encode(protein: &str) -> Vec<u8> {
    protein.bytes().flat_map(|r| codon(r).iter().copied()).collect()
}

/// 100 bp intron with consensus `GT...AG` ends. Its translations hold only
/// `L`, `T`, `N`, `V`, `Q` and stops.
pub fn create_test_intron() -> Vec<u8> {
    let mut intron = b"GT".to_vec();
    intron.extend(b"TAAC".repeat(24));
    intron.extend_from_slice(b"AG");
    intron
}

/// Intergenic filler with a stop every fourth codon in every frame.
pub fn create_test_flank(repeats: usize) -> Vec<u8> {
    b"TAAC".repeat(repeats)
}

/// Forward-strand contig with known exon positions.
#[derive(Debug, Clone)]
pub struct GeneLayout {
    pub sequence: Vec<u8>,
    /// Genomic `(start, end)` of every exon, 1-based inclusive
    pub exons: Vec<(i64, i64)>,
}

impl GeneLayout {
    pub fn len(&self) -> i64 {
        self.sequence.len() as i64
    }

    /// The same gene on the reverse strand of the reverse complement.
    pub fn reverse_complement(&self) -> Self {
        let len = self.len();
        Self {
            sequence: dna::revcomp(&self.sequence),
            exons: self.exons.iter().map(|&exon| mirror(len, exon)).collect(),
        }
    }

    pub fn genome(&self) -> InMemoryGenome {
        let mut genome = InMemoryGenome::new();
        genome.insert(CONTIG, self.sequence.clone());
        genome
    }
}

/// Assembles a [`GeneLayout`]: flank, then exons and introns, then flank.
#[derive(Debug, Clone)]
pub struct GeneBuilder {
    sequence: Vec<u8>,
    exons: Vec<(i64, i64)>,
}

impl Default for GeneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneBuilder {
    pub fn new() -> Self {
        Self {
            sequence: create_test_flank(10),
            exons: Vec::new(),
        }
    }

    pub fn exon(mut self, protein: &str) -> Self {
        let start = self.sequence.len() as i64 + 1;
        self.sequence.extend(encode(protein));
        self.exons.push((start, self.sequence.len() as i64));
        self
    }

    pub fn intron(mut self) -> Self {
        self.sequence.extend(create_test_intron());
        self
    }

    /// Raw bases that are not recorded as an exon
    pub fn bases(mut self, bases: &[u8]) -> Self {
        self.sequence.extend_from_slice(bases);
        self
    }

    pub fn build(mut self) -> GeneLayout {
        self.sequence.extend(create_test_flank(10));
        GeneLayout {
            sequence: self.sequence,
            exons: self.exons,
        }
    }
}

/// Three exons coding [`PART_0`], [`PART_1`] and [`PART_2`].
pub fn create_three_exon_gene() -> GeneLayout {
    GeneBuilder::new()
        .exon(PART_0)
        .intron()
        .exon(PART_1)
        .intron()
        .exon(PART_2)
        .build()
}

/// Genomic interval of the same bases on the opposite strand.
pub fn mirror(len: i64, (start, end): (i64, i64)) -> (i64, i64) {
    (len - end + 1, len - start + 1)
}

pub fn create_test_transcript(parts: &[&str]) -> Transcript {
    let parts = parts
        .iter()
        .enumerate()
        .map(|(index, protein)| Part::new(format!("e{}", index + 1), *protein))
        .collect();
    Transcript::new("t1", parts).unwrap()
}

/// BLOSUM62 score of `residues` against themselves.
pub fn self_score(residues: &str) -> i64 {
    SubstitutionAligner::default().global_score(residues.as_bytes(), residues.as_bytes())
}

/// Gap-free hit of `residues` starting at `target_start`. Pass a
/// `target_start` above `target_end` for the reverse strand.
pub fn create_test_hit(
    part: usize,
    target_start: i64,
    target_end: i64,
    query: (usize, usize),
    query_length: usize,
    residues: &str,
) -> Hit {
    Hit::from_record(HitRecord {
        part,
        contig: CONTIG.to_string(),
        target_start,
        target_end,
        query_start: query.0,
        query_end: query.1,
        query_length,
        score: self_score(residues),
        aligned_query: residues.to_string(),
        aligned_target: residues.to_string(),
    })
    .unwrap()
}

/// Hit covering all of part `part` of `parts` at the forward exon `exon`.
pub fn create_exon_hit(parts: &[&str], part: usize, exon: (i64, i64)) -> Hit {
    let protein = parts[part];
    create_test_hit(part, exon.0, exon.1, (1, protein.len()), protein.len(), protein)
}

/// Same as [`create_exon_hit`] for an exon on the reverse strand.
pub fn create_reverse_exon_hit(parts: &[&str], part: usize, exon: (i64, i64)) -> Hit {
    let protein = parts[part];
    create_test_hit(part, exon.1, exon.0, (1, protein.len()), protein.len(), protein)
}

pub fn create_test_collection(parts: usize, hits: Vec<Hit>) -> HitCollection {
    HitCollection::from_hits(parts, hits).unwrap()
}
