use crate::seq::{Codon, Residue};

pub const NUCLEOTIDES: [u8; 4] = [b'A', b'C', b'G', b'T'];

pub const CODON_SIZE: usize = 3;

/// Standard amino acids, one-letter codes.
pub const AMINO_ACIDS: [Residue; 20] = [
    b'A', b'R', b'N', b'D', b'C', b'Q', b'E', b'G', b'H', b'I',
    b'L', b'K', b'M', b'F', b'P', b'S', b'T', b'W', b'Y', b'V',
];
pub const N_AMINO_ACIDS: usize = 20;

pub const STOP: Residue = b'*';

/// Residues that may open a bacterial reading frame, with their canonical start codon.
pub const START_CODONS: [(Residue, Codon); 3] = [
    (b'V', *b"GTG"),
    (b'L', *b"TTG"),
    (b'M', *b"ATG"),
];

/// Standard genetic code in TCAG order: index = 16 * i + 4 * j + k.
pub const STANDARD_CODE: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

/// Frequency assigned to codons missing from the usage table when computing CAI.
pub const CAI_FLOOR: f64 = 0.01;

/// Number of sense codons used as the ceiling when normalizing codon diversity.
pub const DIVERSITY_CEILING: usize = 62;

/// Maximum allowed deviation of per-residue codon frequencies from 1.
pub const FREQUENCY_SUM_TOLERANCE: f64 = 0.02;
