//! # exonchain
//!
//! Homology-based gene prediction: builds spliced gene models in a target
//! genome by chaining local protein-to-genome alignment hits of a reference
//! transcript.
//!
//! ## Overview
//!
//! Each reference transcript is split into parts (its coding exons). An
//! external translated aligner reports hits, local alignments of single parts
//! against the genome. The chainer finds the best-scoring ordered chain of
//! hits that respects part order, reading-frame continuity, intron lengths
//! and plausible splice sites, recovers parts the aligner missed and reports
//! the refined chain as a gene model.
//!
//! ## Features
//!
//! - **Dynamic programming** over all hits of a contig/strand with memoized
//!   splice-junction scores
//! - **Splice sites** from consensus motifs, trained classifiers or known
//!   introns
//! - **Gap recovery** of parts without hits by local realignment
//! - **Ranked predictions** with exact donor, acceptor, start and stop
//!   boundaries
//! - **Parallel processing** of strands and transcripts using Rayon
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use exonchain_core::TranscriptPredictor;
//! use exonchain_core::config::PredictorConfig;
//! use exonchain_core::hit::{Hit, HitCollection, HitRecord, Part, Transcript};
//! use exonchain_core::sequence::io::read_genome;
//!
//! let genome = read_genome("genome.fasta")?;
//! let predictor = TranscriptPredictor::new(genome, PredictorConfig::default())?;
//!
//! let transcript = Transcript::new(
//!     "t1",
//!     vec![Part::new("e1", "MKWF"), Part::new("e2", "DEWH*")],
//! )?;
//! let mut hits = HitCollection::new(transcript.len());
//! hits.insert(Hit::from_record(HitRecord {
//!     part: 0,
//!     contig: "chr1".to_string(),
//!     target_start: 1001,
//!     target_end: 1012,
//!     query_start: 1,
//!     query_end: 4,
//!     query_length: 4,
//!     score: 32,
//!     aligned_query: "MKWF".to_string(),
//!     aligned_target: "MKWF".to_string(),
//! })?)?;
//!
//! let result = predictor.predict(&transcript, &hits)?;
//! for prediction in &result.predictions {
//!     println!("{} exons, score {}", prediction.exons.len(), prediction.score);
//! }
//! # Ok::<(), exonchain_core::types::ChainError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: Scoring parameters and predictor settings
//! - [`engine`]: Per-transcript orchestration and batch prediction
//! - [`types`]: Core data types and errors
//! - [`results`]: Predictions and search statistics
//! - [`hit`]: Reference transcripts and alignment hits
//! - [`sequence`]: Genome access and translation
//! - [`splice`]: Splice-site detection around hits
//! - [`align`]: Pairwise protein alignment
//! - [`algorithms`]: Chaining, reduction and gap recovery
//! - [`solution`]: Ranking and refinement of chains
//!
//! ## Logging
//!
//! The library logs through the `log` facade and installs no logger.

pub mod algorithms;
pub mod align;
pub mod config;
pub mod constants;
pub mod engine;
pub mod hit;
pub mod results;
pub mod sequence;
pub mod solution;
pub mod splice;
pub mod types;

pub use engine::{PredictionJob, TranscriptPredictor};
