use crate::constants::*;
use crate::seq::{Codon, Nucleotide, Peptide, Residue};

#[inline]
fn tcag_index(x: Nucleotide) -> Option<usize> {
    match x {
        b'T' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

/// Translate a single codon; `None` if it contains a non-ACGT symbol.
pub fn translate_codon(codon: &Codon) -> Option<Residue> {
    let i = tcag_index(codon[0])?;
    let j = tcag_index(codon[1])?;
    let k = tcag_index(codon[2])?;
    Some(STANDARD_CODE[16 * i + 4 * j + k])
}

/// Translate a coding sequence codon by codon.
/// Stops are rendered as `*`, unknown codons as `X`; a trailing partial codon is dropped.
pub fn translate(seq: &[Nucleotide]) -> Peptide {
    seq.chunks_exact(CODON_SIZE)
        .map(|c| translate_codon(&[c[0], c[1], c[2]]).unwrap_or(b'X'))
        .collect()
}

/// Canonical start codon for a residue that may open a reading frame.
pub fn start_codon(residue: Residue) -> Option<Codon> {
    START_CODONS.iter()
        .find(|&&(aa, _)| aa == residue)
        .map(|&(_, codon)| codon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate() {
        assert_eq!(translate(b"ATGGCCTAA"), b"MA*".to_vec());
        assert_eq!(translate(b"TTTTGGNNNGG"), b"FWX".to_vec());
        assert_eq!(translate_codon(b"TGA"), Some(b'*'));
        assert_eq!(translate_codon(b"GTG"), Some(b'V'));
        assert_eq!(translate_codon(b"TTG"), Some(b'L'));
    }

    #[test]
    fn test_start_codon() {
        assert_eq!(start_codon(b'M'), Some(*b"ATG"));
        assert_eq!(start_codon(b'V'), Some(*b"GTG"));
        assert_eq!(start_codon(b'K'), None);
    }
}
