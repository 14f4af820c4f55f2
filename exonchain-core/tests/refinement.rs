mod common;

use exonchain_core::config::PredictorConfig;
use exonchain_core::TranscriptPredictor;

use crate::common::{create_test_collection, create_test_hit, create_test_transcript, GeneBuilder, PART_0};

/// Second part of a two-part transcript that ends with a stop
const LAST_PART: &str = "WCYFGP*";

#[test]
fn boundaries_move_to_splice_sites_start_and_stop() {
    // flank | ATG AAA TGG TTC GAA GGC | intron | TGG TGC TAC TTC GGC CCA | TAA | flank
    let layout = GeneBuilder::new()
        .exon(PART_0)
        .intron()
        .exon("WCYFGP")
        .bases(b"TAA")
        .build();
    let (first, second) = (layout.exons[0], layout.exons[1]);

    // WFE of MKWFEG: two residues short of the start, one short of the donor
    let upstream_hit = create_test_hit(0, first.0 + 6, first.1 - 3, (3, 5), 6, "WFE");
    // CYFGP of WCYFGP*: one residue short of the acceptor and the stop
    let downstream_hit = create_test_hit(1, second.0 + 3, second.1, (2, 6), 7, "CYFGP");

    let transcript = create_test_transcript(&[PART_0, LAST_PART]);
    let predictor = TranscriptPredictor::new(layout.genome(), PredictorConfig::default()).unwrap();
    let result = predictor
        .predict(
            &transcript,
            &create_test_collection(2, vec![upstream_hit, downstream_hit]),
        )
        .unwrap();

    assert_eq!(result.predictions.len(), 1);
    let prediction = &result.predictions[0];
    assert!(prediction.problems.is_empty());

    let exons: Vec<(i64, i64)> = prediction.exons.iter().map(|e| (e.start, e.end)).collect();
    assert_eq!(exons, vec![first, (second.0, second.1 + 3)]);
    assert_eq!(prediction.protein, b"MKWFEGWCYFGP*".to_vec());
    assert!(prediction.metrics.start);
    assert!(prediction.metrics.stop);
    assert!((prediction.metrics.identity - 1.0).abs() < 1e-9);

    let upstream_notes = &prediction.exons[0].notes;
    assert!(upstream_notes.iter().any(|n| n == "donor +3 (phase 0)"));
    assert!(upstream_notes.iter().any(|n| n == "start codon +2 residues"));
    let downstream_notes = &prediction.exons[1].notes;
    assert!(downstream_notes.iter().any(|n| n == "acceptor +3 (phase 0)"));
    assert!(downstream_notes.iter().any(|n| n == "stop codon +1 residues"));
}

#[test]
fn unrefined_transcript_keeps_hit_boundaries() {
    let layout = GeneBuilder::new().exon(PART_0).intron().exon("WCYFGP").build();
    let hits = vec![
        create_test_hit(0, layout.exons[0].0, layout.exons[0].1, (1, 6), 6, PART_0),
        create_test_hit(1, layout.exons[1].0, layout.exons[1].1, (1, 6), 6, "WCYFGP"),
    ];
    let transcript = create_test_transcript(&[PART_0, "WCYFGP"]);
    let predictor = TranscriptPredictor::new(layout.genome(), PredictorConfig::default()).unwrap();

    let result = predictor
        .predict(&transcript, &create_test_collection(2, hits))
        .unwrap();

    let prediction = &result.predictions[0];
    let exons: Vec<(i64, i64)> = prediction.exons.iter().map(|e| (e.start, e.end)).collect();
    assert_eq!(exons, layout.exons);
    assert!(prediction.exons[0]
        .notes
        .iter()
        .all(|n| !n.starts_with("start codon")));
    assert!(!prediction.metrics.stop);
}
