use std::io;
use std::num;
use std::result;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Peptide is empty, cannot start translation, or carries an internal stop.
    #[error("invalid peptide: {0}")]
    InvalidPeptide(String),

    /// Residue is not covered by the codon usage table.
    #[error("invalid residue '{}'", *residue as char)]
    InvalidResidue { residue: u8 },

    /// Nucleotide string is empty or contains symbols outside of A, C, G, T.
    #[error("invalid nucleotide sequence: {0}")]
    InvalidSequence(String),

    /// Every donor in the RBS pool has been excluded.
    #[error("no RBS options available ({ignored} of {total} ignored)")]
    NoRbsOptionsAvailable { ignored: usize, total: usize },

    #[error("invalid codon usage table: {0}")]
    InvalidUsageTable(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("could not parse number: {0}")]
    ParseFloat(#[from] num::ParseFloatError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = Error::InvalidResidue { residue: b'X' };
        assert_eq!(e.to_string(), "invalid residue 'X'");

        let e = Error::NoRbsOptionsAvailable { ignored: 2, total: 2 };
        assert_eq!(e.to_string(), "no RBS options available (2 of 2 ignored)");
    }
}
