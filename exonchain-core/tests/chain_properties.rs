use bio::bio_types::strand::Strand;
use exonchain_core::algorithms::context::{sort_candidates, Candidate, ChainContext, PartCandidates};
use exonchain_core::algorithms::dynamic_programming::{DpPass, PassMode};
use exonchain_core::align::SubstitutionAligner;
use exonchain_core::config::ScoringConfig;
use exonchain_core::hit::{Hit, HitRecord, Part, Transcript};
use exonchain_core::sequence::{GeneticCode, OrientedContig};
use exonchain_core::solution::{Solution, SolutionQueue};
use exonchain_core::splice::SpliceSiteModel;
use proptest::prelude::*;

const PARTS: usize = 4;
const CONTIG_LENGTH: usize = 20_000;
const SPLICED_CONTIG_LENGTH: usize = 6_000;

/// `(part, start, residues, score)` of a generated hit
type HitSpec = (usize, i64, usize, i64);

fn hit_spec() -> impl Strategy<Value = HitSpec> {
    (0..PARTS, 1_i64..19_000, 1_usize..10, 1_i64..200)
}

fn spliced_hit_spec() -> impl Strategy<Value = HitSpec> {
    (0..PARTS, 1_i64..5_900, 1_usize..10, 1_i64..200)
}

/// Pseudo-random bases, so reading frames close at stop codons
fn create_test_contig(seed: u64, length: usize) -> Vec<u8> {
    let mut state = seed | 1;
    (0..length)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            b"ACGT"[(state >> 32) as usize % 4]
        })
        .collect()
}

fn create_test_hit((part, start, residues, score): HitSpec) -> Hit {
    let aligned = "A".repeat(residues);
    Hit::from_record(HitRecord {
        part,
        contig: "chr1".to_string(),
        target_start: start,
        target_end: start + 3 * residues as i64 - 1,
        query_start: 1,
        query_end: residues,
        query_length: 10,
        score,
        aligned_query: aligned.clone(),
        aligned_target: aligned,
    })
    .unwrap()
}

fn with_context<R>(f: impl FnOnce(&ChainContext<'_>) -> R) -> R {
    with_sequence(&vec![b'G'; CONTIG_LENGTH], f)
}

fn with_sequence<R>(sequence: &[u8], f: impl FnOnce(&ChainContext<'_>) -> R) -> R {
    let parts = (0..PARTS)
        .map(|p| Part::new(format!("e{p}"), "A".repeat(10)))
        .collect();
    let transcript = Transcript::new("t1", parts).unwrap();
    let contig = OrientedContig::new("chr1", sequence, Strand::Forward);
    let scoring = ScoringConfig::default();
    let aligner = SubstitutionAligner::default();
    let code = GeneticCode::standard();
    let model = SpliceSiteModel::Consensus;
    let ctx = ChainContext {
        transcript: &transcript,
        scoring: &scoring,
        contig: &contig,
        aligner: &aligner,
        code: &code,
        splice_model: &model,
    };
    f(&ctx)
}

fn candidates(ctx: &ChainContext<'_>, specs: &[HitSpec]) -> PartCandidates {
    let mut hits: PartCandidates = vec![Vec::new(); PARTS];
    for &spec in specs {
        hits[spec.0].push(Candidate::new(create_test_hit(spec), ctx.contig).unwrap());
    }
    sort_candidates(&mut hits);
    hits
}

fn create_test_solution(score: i64, start: i64) -> Solution {
    let sequence = vec![b'G'; CONTIG_LENGTH];
    let contig = OrientedContig::new("chr1", &sequence, Strand::Forward);
    let hit = create_test_hit((0, start, 3, 10));
    let chain = vec![Candidate::new(hit, &contig).unwrap()];
    Solution::from_chain(&contig, chain, score, false, false)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn chain_sums_cover_hit_scores(specs in prop::collection::vec(hit_spec(), 1..30)) {
        with_context(|ctx| {
            let mut pass = DpPass::new(ctx, candidates(ctx, &specs), PassMode::Coarse);
            let best = pass.run();
            let max_score = specs.iter().map(|s| s.3).max();
            prop_assert!(best >= max_score);
            for (part, row) in pass.table().iter().enumerate() {
                for (index, entry) in row.iter().enumerate() {
                    prop_assert!(entry.sum >= pass.hits()[part][index].hit.score);
                }
            }
            Ok(())
        })?;
    }

    #[test]
    fn adding_a_hit_never_lowers_the_best(
        specs in prop::collection::vec(hit_spec(), 1..20),
        extra in hit_spec(),
    ) {
        with_context(|ctx| {
            let before = DpPass::new(ctx, candidates(ctx, &specs), PassMode::Coarse).run();
            let mut extended = specs.clone();
            extended.push(extra);
            let after = DpPass::new(ctx, candidates(ctx, &extended), PassMode::Coarse).run();
            prop_assert!(after >= before);
            Ok(())
        })?;
    }

    #[test]
    fn reduction_is_idempotent(
        specs in prop::collection::vec(hit_spec(), 1..30),
        fraction in 0.0_f64..=1.0,
    ) {
        with_context(|ctx| {
            let mut pass = DpPass::new(ctx, candidates(ctx, &specs), PassMode::Coarse);
            let best = pass.run().unwrap();
            let threshold = best as f64 * fraction;
            let first = pass.reduce(threshold);
            prop_assert!(first.after >= 1);
            let second = pass.reduce(threshold);
            prop_assert_eq!(second.before, first.after);
            prop_assert_eq!(second.after, first.after);
            prop_assert_eq!(pass.best(), Some(best));
            Ok(())
        })?;
    }

    #[test]
    fn traced_chains_attain_the_best(specs in prop::collection::vec(hit_spec(), 1..30)) {
        with_context(|ctx| {
            let mut pass = DpPass::new(ctx, candidates(ctx, &specs), PassMode::Coarse);
            let best = pass.run();
            let chains = pass.best_chains();
            prop_assert!(!chains.is_empty());
            for chain in chains {
                prop_assert_eq!(Some(chain.value), best);
                prop_assert_eq!(pass.chain_value(&chain.steps), best);
                for pair in chain.steps.windows(2) {
                    let ((i, j), (k, m)) = (pair[0], pair[1]);
                    prop_assert!(k >= i);
                    prop_assert!(pass.is_reachable(i, j, k, m));
                }
            }
            Ok(())
        })?;
    }

    #[test]
    fn spliced_chains_include_junction_and_terminal_costs(
        seed in any::<u64>(),
        specs in prop::collection::vec(spliced_hit_spec(), 1..24),
    ) {
        let sequence = create_test_contig(seed, SPLICED_CONTIG_LENGTH);
        with_sequence(&sequence, |ctx| {
            let mut hits = candidates(ctx, &specs);
            for candidate in hits.iter_mut().flatten() {
                candidate.prepare(ctx);
            }
            let mut pass = DpPass::new(ctx, hits, PassMode::Spliced);
            let best = pass.run().unwrap();
            for (part, row) in pass.table().iter().enumerate() {
                for (index, entry) in row.iter().enumerate() {
                    let floor = pass.hits()[part][index].hit.score + pass.end_cost(part, index);
                    prop_assert!(entry.sum >= floor);
                }
            }
            let chains = pass.best_chains();
            prop_assert!(!chains.is_empty());
            for chain in &chains {
                prop_assert_eq!(pass.chain_value(&chain.steps), Some(best));
            }

            let first = pass.reduce(best as f64);
            let second = pass.reduce(best as f64);
            prop_assert_eq!(second.before, first.after);
            prop_assert_eq!(second.after, first.after);
            prop_assert_eq!(pass.best(), Some(best));
            for chain in pass.best_chains() {
                prop_assert_eq!(pass.chain_value(&chain.steps), Some(best));
            }
            Ok(())
        })?;
    }

    #[test]
    fn queue_keeps_the_top_scores(
        scores in prop::collection::vec(-100_i64..100, 0..40),
        capacity in 1_usize..6,
    ) {
        let mut queue = SolutionQueue::new(capacity);
        for (index, &score) in scores.iter().enumerate() {
            queue.push(create_test_solution(score, 1 + 30 * index as i64));
        }
        let kept: Vec<i64> = queue.into_sorted_vec().iter().map(|s| s.score).collect();

        let mut expected = scores.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        expected.truncate(capacity);
        prop_assert_eq!(kept, expected);
    }
}
