use std::fs::File;
use std::path::Path;

use bio::io::fasta;
use log::debug;

use crate::sequence::genome::InMemoryGenome;
use crate::types::ChainError;

/// Load every record of a FASTA file into an [`InMemoryGenome`].
///
/// Record ids become contig ids; descriptions are ignored.
///
/// # Errors
///
/// Returns [`ChainError::Io`] if the file cannot be opened and
/// [`ChainError::Parse`] for malformed records or duplicate ids.
pub fn read_genome<P: AsRef<Path>>(path: P) -> Result<InMemoryGenome, ChainError> {
    let file = File::open(path.as_ref())?;
    let reader = fasta::Reader::new(file);
    let mut genome = InMemoryGenome::new();

    for result in reader.records() {
        let record = result.map_err(|e| ChainError::Parse(e.to_string()))?;
        let id = record.id().to_string();
        if genome.contains(&id) {
            return Err(ChainError::Parse(format!("duplicate contig id '{id}'")));
        }
        genome.insert(id, record.seq().to_vec());
    }

    debug!(
        "Loaded {} contigs from {}",
        genome.len(),
        path.as_ref().display()
    );
    Ok(genome)
}
