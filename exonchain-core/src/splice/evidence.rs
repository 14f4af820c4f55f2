use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use bio::bio_types::strand::Strand;
use log::debug;

use crate::sequence::OrientedContig;
use crate::types::{ChainError, OrientedSpan};

/// Intron observed in transcript data, e.g. from split RNA-seq reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intron {
    pub strand: Strand,
    /// First intron base (1-based, inclusive)
    pub start: i64,
    /// Last intron base (1-based, inclusive)
    pub end: i64,
    /// Number of supporting reads
    pub reads: u32,
}

/// Known introns per contig.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnownIntrons {
    by_contig: HashMap<String, Vec<Intron>>,
}

impl KnownIntrons {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, contig: impl Into<String>, intron: Intron) {
        self.by_contig.entry(contig.into()).or_default().push(intron);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_contig.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read introns from a GFF file.
    ///
    /// Only features of type `intron` are used; the score column holds the
    /// number of supporting reads (`.` counts as one read).
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Io`] on read failures and [`ChainError::Parse`]
    /// for malformed intron lines.
    pub fn read_gff<P: AsRef<Path>>(path: P) -> Result<Self, ChainError> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let mut introns = Self::new();
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 7 || fields[2] != "intron" {
                continue;
            }
            let parse_error =
                |what: &str| ChainError::Parse(format!("line {}: invalid {what}", number + 1));
            let start = fields[3].parse().map_err(|_| parse_error("start"))?;
            let end = fields[4].parse().map_err(|_| parse_error("end"))?;
            let reads = match fields[5] {
                "." => 1,
                value => value
                    .parse::<f64>()
                    .map_err(|_| parse_error("score"))?
                    .max(0.0)
                    .round() as u32,
            };
            let strand = match fields[6] {
                "+" => Strand::Forward,
                "-" => Strand::Reverse,
                _ => return Err(parse_error("strand")),
            };
            introns.insert(
                fields[0],
                Intron {
                    strand,
                    start,
                    end,
                    reads,
                },
            );
        }
        debug!(
            "Read {} introns from {}",
            introns.len(),
            path.as_ref().display()
        );
        Ok(introns)
    }

    /// Oriented spans of the introns on `contig` with at least `min_reads`
    /// supporting reads.
    #[must_use]
    pub fn oriented(&self, contig: &OrientedContig<'_>, min_reads: u32) -> Vec<OrientedSpan> {
        self.by_contig
            .get(contig.id())
            .map(|introns| {
                introns
                    .iter()
                    .filter(|i| i.reads >= min_reads && i.strand == contig.strand())
                    .map(|i| contig.to_oriented(i.start, i.end))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_read_gff() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "##gff-version 3").unwrap();
        writeln!(file, "chr1\trna\tintron\t101\t200\t12\t+\t.\t.").unwrap();
        writeln!(file, "chr1\trna\texon\t1\t100\t.\t+\t.\t.").unwrap();
        writeln!(file, "chr1\trna\tintron\t301\t400\t.\t-\t.\t.").unwrap();

        let introns = KnownIntrons::read_gff(file.path()).unwrap();
        assert_eq!(introns.len(), 2);

        let sequence = vec![b'A'; 1000];
        let forward = OrientedContig::new("chr1", &sequence, Strand::Forward);
        assert_eq!(introns.oriented(&forward, 1), vec![OrientedSpan::new(100, 200)]);
        assert!(introns.oriented(&forward, 20).is_empty());

        let reverse = OrientedContig::new("chr1", &sequence, Strand::Reverse);
        assert_eq!(introns.oriented(&reverse, 1), vec![OrientedSpan::new(600, 700)]);
    }

    #[test]
    fn test_read_gff_invalid_strand() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chr1\trna\tintron\t101\t200\t1\t?\t.\t.").unwrap();
        assert!(matches!(
            KnownIntrons::read_gff(file.path()),
            Err(ChainError::Parse(_))
        ));
    }
}
