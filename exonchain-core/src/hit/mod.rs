//! Reference transcripts and their alignment hits.
//!
//! A [`Transcript`] is split into [`Part`]s (reference exons). A [`Hit`] is a
//! local alignment of one part against the genome; hits are grouped by
//! contig, strand and part in a [`HitCollection`].

mod collection;
mod model;
mod split;
mod transcript;

pub use collection::{HitCollection, Partition, TargetRegion};
pub use model::{Hit, HitRecord};
pub use split::split_at_stops;
pub use transcript::{Part, Transcript};

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_hit(part: usize, query_start: usize, query_end: usize) -> Hit {
        let residues = query_end - query_start + 1;
        let aligned = "W".repeat(residues);
        Hit::from_record(HitRecord {
            part,
            contig: "chr1".to_string(),
            target_start: 1,
            target_end: 3 * residues as i64,
            query_start,
            query_end,
            query_length: 6,
            score: 10,
            aligned_query: aligned.clone(),
            aligned_target: aligned,
        })
        .unwrap()
    }

    #[test]
    fn test_protein_between_parts() {
        let transcript = Transcript::new(
            "t1",
            vec![
                Part::new("e1", "ABCDEF"),
                Part::new("e2", "GHI"),
                Part::new("e3", "KLMNPQ"),
            ],
        )
        .unwrap();
        let first = create_test_hit(0, 3, 6);
        let second = create_test_hit(2, 1, 2);
        assert_eq!(transcript.protein_between(&first, &second), b"CDEFGHIKL".to_vec());
    }

    #[test]
    fn test_protein_between_same_part() {
        let transcript = Transcript::new("t1", vec![Part::new("e1", "ABCDEF")]).unwrap();
        let first = create_test_hit(0, 1, 2);
        let second = create_test_hit(0, 4, 5);
        assert_eq!(transcript.protein_between(&first, &second), b"ABCDE".to_vec());
    }
}
