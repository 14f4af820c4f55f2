// =============================================================================
// Splice sites
// =============================================================================

/// Minimum intron length in base pairs accepted between two fused hits
pub const MIN_INTRON_LENGTH: i64 = 30;

/// Acceptor consensus dinucleotide (last two intron bases)
pub const ACCEPTOR_MOTIF: &[u8; 2] = b"AG";

/// Donor consensus dinucleotides in priority order
pub const DONOR_MOTIFS: [&[u8; 2]; 2] = [b"GT", b"GC"];

/// Dinucleotide recorded in the primary donor list when it directly follows a hit
pub const ADJACENT_DONOR_MOTIF: &[u8; 2] = b"GC";

/// Maximum number of aligned residues searched for splice sites inside a hit
pub const MAX_INNER_RESIDUES: usize = 30;

/// Consecutive untranslatable codons that end an extension
pub const MAX_UNTRANSLATABLE_CODONS: usize = 3;

// =============================================================================
// Sequence
// =============================================================================

/// Length of a codon in base pairs
pub const CODON_LENGTH: i64 = 3;

/// Number of reading frames searched per strand
pub const READING_FRAMES: usize = 3;

/// Residue emitted for codons that cannot be translated
pub const UNKNOWN_RESIDUE: u8 = b'X';

/// Residue emitted for stop codons
pub const STOP_RESIDUE: u8 = b'*';

/// Start residue
pub const START_RESIDUE: u8 = b'M';

/// Gap character used in aligned sequences
pub const GAP: u8 = b'-';

// =============================================================================
// Region segmentation and gap recovery
// =============================================================================

/// Number of leading query residues a first-part hit may miss without a start codon
pub const MISSING_AA: usize = 10;

/// Minimum query length used when judging whether a hit is informative
pub const MIN_INFORMATIVE_LENGTH: usize = 20;

/// Fraction of a part a hit must cover to be informative
pub const INFORMATIVE_COVERAGE: f64 = 0.9;

/// Maximum number of recovered candidates kept for one part
pub const MAX_RECOVERED_PER_PART: usize = 20_000;

/// Maximum number of co-optimal chains traced for one region
pub const MAX_TRACED_CHAINS: usize = 1_000;

/// Divisor of the maximum intron length giving the flank window per skipped part
pub const FLANK_WINDOW_DIVISOR: i64 = 10;

/// Share of the shorter query interval two same-part hits may overlap in the coarse pass
pub const MAX_SAME_PART_OVERLAP: f64 = 0.5;

// =============================================================================
// Defaults
// =============================================================================

/// Default maximum intron length in base pairs
pub const DEFAULT_MAX_INTRON_LENGTH: i64 = 15_000;

/// Default upper bound (exclusive) on the part distance of one DP jump
pub const DEFAULT_MAX_GAP: usize = 5;

/// Default affine gap opening cost
pub const DEFAULT_GAP_OPENING: i64 = 11;

/// Default affine gap extension cost
pub const DEFAULT_GAP_EXTENSION: i64 = 1;

/// Default penalty per unrealized or additional intron
pub const DEFAULT_INTRON_GAIN_LOSS: i64 = 25;

/// Default fraction of the best coarse score a contig/strand needs
pub const DEFAULT_CONTIG_THRESHOLD: f64 = 0.9;

/// Default fraction of the best coarse score a region needs
pub const DEFAULT_REGION_THRESHOLD: f64 = 0.9;

/// Default fraction of the best score a hit or recovered candidate needs
pub const DEFAULT_HIT_THRESHOLD: f64 = 0.9;

/// Default number of predictions per transcript
pub const DEFAULT_PREDICTIONS: usize = 1;

/// Default per-transcript timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 3600;
