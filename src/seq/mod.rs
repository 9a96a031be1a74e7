pub mod code;
pub mod genomic;

use std::str;

use crate::constants::*;
use crate::error::{Error, Result};

pub type Nucleotide = u8;
pub type Residue = u8;

pub type Codon = [Nucleotide; 3];

pub type DnaSeq = Vec<Nucleotide>;
pub type Peptide = Vec<Residue>;

pub fn complement(x: Nucleotide) -> Nucleotide {
    match x {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        b'N' => b'N',
        b'a' => b't',
        b'c' => b'g',
        b'g' => b'c',
        b't' => b'a',
        b'n' => b'n',
        _ => b'.',
    }
}

/// Reverse complement sequence in place.
pub fn reverse_complement(seq: &mut [Nucleotide]) {
    let n = seq.len();
    for i in 0 .. (n / 2) {
        let j = n - 1 - i;
        let x = complement(seq[i]);
        seq[i] = complement(seq[j]);
        seq[j] = x;
    }
    if n % 2 == 1 {
        // lone middle element has not been touched
        let j = n / 2;
        seq[j] = complement(seq[j]);
    }
}

/// Reverse complement into a new sequence.
pub fn reverse_complemented(seq: &[Nucleotide]) -> DnaSeq {
    let mut rc = seq.to_vec();
    reverse_complement(&mut rc);
    rc
}

/// Check that a sequence is non-empty and strictly upper-case A, C, G, T.
pub fn validate_dna(seq: &[Nucleotide]) -> Result<()> {
    if seq.is_empty() {
        return Err(Error::InvalidSequence(String::from("empty sequence")));
    }
    if let Some(pos) = seq.iter().position(|x| !NUCLEOTIDES.contains(x)) {
        return Err(Error::InvalidSequence(format!(
            "unexpected symbol '{}' at position {}",
            seq[pos] as char, pos
        )));
    }
    Ok(())
}

/// Concatenate codons into a contiguous DNA sequence.
pub fn join_codons(codons: &[Codon]) -> DnaSeq {
    let mut seq = Vec::with_capacity(codons.len() * CODON_SIZE);
    for codon in codons {
        seq.extend_from_slice(codon);
    }
    seq
}

/// Split a DNA sequence into codons, ignoring an incomplete trailing codon.
pub fn split_codons(seq: &[Nucleotide]) -> Vec<Codon> {
    seq.chunks_exact(CODON_SIZE)
        .map(|c| [c[0], c[1], c[2]])
        .collect()
}

pub fn codon_str(codon: &Codon) -> &str {
    str::from_utf8(codon).unwrap_or("???")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_complement() {
        let mut odd = b"ATGCA".to_vec();
        reverse_complement(&mut odd);
        assert_eq!(odd, b"TGCAT".to_vec());

        let mut even = b"AACG".to_vec();
        reverse_complement(&mut even);
        assert_eq!(even, b"CGTT".to_vec());

        assert_eq!(reverse_complemented(b"GAATTC"), b"GAATTC".to_vec());
    }

    #[test]
    fn test_validate_dna() {
        assert!(validate_dna(b"ACGT").is_ok());
        assert!(validate_dna(b"").is_err());
        assert!(validate_dna(b"ACGN").is_err());
        assert!(validate_dna(b"acgt").is_err());
    }

    #[test]
    fn test_codons() {
        let codons = split_codons(b"ATGAAATA");
        assert_eq!(codons, vec![*b"ATG", *b"AAA"]);
        assert_eq!(join_codons(&codons), b"ATGAAA".to_vec());
        assert_eq!(codon_str(&codons[1]), "AAA");
    }
}
