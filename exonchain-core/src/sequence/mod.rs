//! Genomic sequence access and translation.
//!
//! ## Modules
//!
//! - [`code`]: Genetic code with IUPAC ambiguity resolution
//! - [`genome`]: Genome sources and strand-aware contig views
//! - [`io`]: FASTA loading
//!
//! ## Examples
//!
//! ```rust
//! use bio::bio_types::strand::Strand;
//! use exonchain_core::sequence::{GeneticCode, OrientedContig};
//!
//! let contig = OrientedContig::new("chr1", b"TTACATGG", Strand::Reverse);
//! // CCATGTAA read on the reverse strand
//! let code = GeneticCode::standard();
//! assert_eq!(code.translate(&contig.fetch(2, 8))?, b"M*".to_vec());
//! # Ok::<(), exonchain_core::types::ChainError>(())
//! ```

pub mod code;
pub mod genome;
pub mod io;

pub use code::GeneticCode;
pub use genome::{GenomeSource, InMemoryGenome, OrientedContig};
