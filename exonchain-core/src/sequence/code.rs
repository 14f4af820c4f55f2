use crate::constants::{STOP_RESIDUE, UNKNOWN_RESIDUE};
use crate::types::ChainError;

/// Standard genetic code, codons ordered `TCAG` x `TCAG` x `TCAG`.
const STANDARD_TABLE: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

/// Index of a concrete base in the `TCAG` ordering.
const fn base_index(base: u8) -> Option<usize> {
    match base {
        b'T' | b'U' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

/// Concrete bases an IUPAC code stands for.
const fn expand(base: u8) -> &'static [u8] {
    match base {
        b'A' => b"A",
        b'C' => b"C",
        b'G' => b"G",
        b'T' | b'U' => b"T",
        b'R' => b"AG",
        b'Y' => b"CT",
        b'S' => b"CG",
        b'W' => b"AT",
        b'K' => b"GT",
        b'M' => b"AC",
        b'B' => b"CGT",
        b'D' => b"AGT",
        b'H' => b"ACT",
        b'V' => b"ACG",
        b'N' => b"ACGT",
        _ => b"",
    }
}

/// Codon to amino-acid translation table.
///
/// Ambiguous IUPAC bases are accepted when every concrete codon they stand
/// for encodes the same residue (e.g. `GCN` is alanine); otherwise the codon
/// is a translation error.
///
/// # Examples
///
/// ```rust
/// use exonchain_core::sequence::GeneticCode;
///
/// let code = GeneticCode::standard();
/// assert_eq!(code.translate(b"ATGGCNTAA")?, b"MA*".to_vec());
/// assert!(code.translate_codon(b"NNN").is_err());
/// # Ok::<(), exonchain_core::types::ChainError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneticCode {
    table: [u8; 64],
}

impl Default for GeneticCode {
    fn default() -> Self {
        Self::standard()
    }
}

impl GeneticCode {
    /// The standard nuclear genetic code
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            table: *STANDARD_TABLE,
        }
    }

    /// Build a code from `(codon, residue)` assignments on top of the
    /// standard code.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Parse`] when a codon is not three concrete bases.
    pub fn with_assignments<'a, I>(assignments: I) -> Result<Self, ChainError>
    where
        I: IntoIterator<Item = (&'a str, char)>,
    {
        let mut code = Self::standard();
        for (codon, residue) in assignments {
            let index = Self::codon_index(codon.to_ascii_uppercase().as_bytes())
                .ok_or_else(|| ChainError::Parse(format!("invalid codon '{codon}'")))?;
            if !residue.is_ascii() {
                return Err(ChainError::Parse(format!("invalid residue '{residue}'")));
            }
            code.table[index] = residue.to_ascii_uppercase() as u8;
        }
        Ok(code)
    }

    fn codon_index(codon: &[u8]) -> Option<usize> {
        if codon.len() != 3 {
            return None;
        }
        let first = base_index(codon[0])?;
        let second = base_index(codon[1])?;
        let third = base_index(codon[2])?;
        Some(first * 16 + second * 4 + third)
    }

    /// Translate a single codon.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Translation`] for codons with unknown characters
    /// or ambiguity codes that do not resolve to a single residue.
    pub fn translate_codon(&self, codon: &[u8]) -> Result<u8, ChainError> {
        let upper = [
            codon.first().copied().unwrap_or(0).to_ascii_uppercase(),
            codon.get(1).copied().unwrap_or(0).to_ascii_uppercase(),
            codon.get(2).copied().unwrap_or(0).to_ascii_uppercase(),
        ];
        if codon.len() == 3 {
            if let Some(index) = Self::codon_index(&upper) {
                return Ok(self.table[index]);
            }
        }

        let mut resolved = None;
        let options = upper.map(expand);
        if codon.len() != 3 || options.iter().any(|o| o.is_empty()) {
            return Err(self.untranslatable(codon));
        }
        for &a in options[0] {
            for &b in options[1] {
                for &c in options[2] {
                    let residue = Self::codon_index(&[a, b, c])
                        .map(|index| self.table[index])
                        .ok_or_else(|| self.untranslatable(codon))?;
                    match resolved {
                        None => resolved = Some(residue),
                        Some(previous) if previous != residue => {
                            return Err(self.untranslatable(codon));
                        }
                        Some(_) => {}
                    }
                }
            }
        }
        resolved.ok_or_else(|| self.untranslatable(codon))
    }

    fn untranslatable(&self, codon: &[u8]) -> ChainError {
        ChainError::Translation(format!(
            "codon '{}' has no unambiguous translation",
            String::from_utf8_lossy(codon)
        ))
    }

    /// Translate all complete codons of `dna`.
    ///
    /// # Errors
    ///
    /// Fails on the first codon that cannot be translated.
    pub fn translate(&self, dna: &[u8]) -> Result<Vec<u8>, ChainError> {
        dna.chunks_exact(3)
            .map(|codon| self.translate_codon(codon))
            .collect()
    }

    /// Translate all complete codons of `dna`, using `X` for codons that
    /// cannot be translated.
    #[must_use]
    pub fn translate_lenient(&self, dna: &[u8]) -> Vec<u8> {
        dna.chunks_exact(3)
            .map(|codon| self.translate_codon(codon).unwrap_or(UNKNOWN_RESIDUE))
            .collect()
    }

    /// Whether `codon` is a stop codon
    #[must_use]
    pub fn is_stop(&self, codon: &[u8]) -> bool {
        matches!(self.translate_codon(codon), Ok(STOP_RESIDUE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_translation() {
        let code = GeneticCode::standard();
        assert_eq!(code.translate(b"ATGTGGTAA").unwrap(), b"MW*".to_vec());
        assert_eq!(code.translate(b"atgaaa").unwrap(), b"MK".to_vec());
        // trailing partial codon is ignored
        assert_eq!(code.translate(b"ATGAA").unwrap(), b"M".to_vec());
    }

    #[test]
    fn test_ambiguous_codons() {
        let code = GeneticCode::standard();
        assert_eq!(code.translate_codon(b"GCN").unwrap(), b'A');
        assert_eq!(code.translate_codon(b"TAR").unwrap(), b'*');
        assert!(code.translate_codon(b"ANG").is_err());
        assert!(code.translate_codon(b"A-G").is_err());
    }

    #[test]
    fn test_lenient_translation() {
        let code = GeneticCode::standard();
        assert_eq!(code.translate_lenient(b"ATGNNNTGG"), b"MXW".to_vec());
    }

    #[test]
    fn test_custom_assignments() {
        let code = GeneticCode::with_assignments([("TGA", 'W')]).unwrap();
        assert_eq!(code.translate_codon(b"TGA").unwrap(), b'W');
        assert!(!code.is_stop(b"TGA"));
        assert!(code.is_stop(b"TAA"));
        assert!(GeneticCode::with_assignments([("TG", 'W')]).is_err());
    }
}
