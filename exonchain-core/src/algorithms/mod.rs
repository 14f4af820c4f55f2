//! Core chaining algorithms.
//!
//! ## Modules
//!
//! - [`context`]: Per-pass context and prepared candidates
//! - [`dynamic_programming`]: Forward DP, junction scoring, reduction and backtracking
//! - [`recovery`]: Region segmentation and recovery of missing parts
//!
//! ## Algorithm Overview
//!
//! One transcript is predicted in stages:
//!
//! 1. **Coarse pass**: chain the raw hits of every contig/strand without
//!    junction or terminal costs and keep the competitive partitions
//! 2. **Reduction**: drop hits that take part in no near-optimal chain
//! 3. **Segmentation**: split the surviving hits into candidate regions
//! 4. **Recovery**: realign the reference parts without a hit against the
//!    genome between and around the present hits
//! 5. **Spliced pass**: chain again with splice-aware junction scores and
//!    start/stop terminal costs, then backtrack the best chains
//!
//! Junctions are scored as
//!
//! ```text
//! junction(j, m) = max(
//!     donor(j, b) + acceptor(m, a) + gap_cost(skipped, d - 1),   // intron
//!     align(fused translation) - score(j) - score(m) - d * GL    // intron loss
//! )
//! ```
//!
//! over donor offsets `b` and acceptor offsets `a` of matching phase.

pub mod context;
pub mod dynamic_programming;
pub mod recovery;
