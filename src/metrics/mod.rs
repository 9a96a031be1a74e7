pub mod hairpin;
pub mod motif;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{Error, Result};
use crate::seq::{self, Codon, Nucleotide};
use crate::stats;
use crate::usage::CodonUsageTable;

pub use self::hairpin::{hairpin_count, hairpin_sites, Hairpin};
pub use self::motif::{forbidden_site_hits, promoter_hits, MotifHit, ReferenceMotifs};

/// Per-codon value entering the codon adaptation index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaiWeighting {
    /// Raw usage frequency among synonymous codons
    Frequency,
    /// Frequency relative to the most frequent synonymous codon
    RelativeAdaptiveness,
}

impl Default for CaiWeighting {
    fn default() -> CaiWeighting {
        CaiWeighting::Frequency
    }
}

fn validate_codons(codons: &[Codon]) -> Result<()> {
    if codons.is_empty() {
        return Err(Error::InvalidSequence(String::from("no codons")));
    }
    for codon in codons {
        seq::validate_dna(codon)?;
    }
    Ok(())
}

/// Codon adaptation index: geometric mean of per-codon weights.
/// Codons missing from the table contribute `CAI_FLOOR`.
pub fn cai(codons: &[Codon], table: &CodonUsageTable, weighting: CaiWeighting) -> Result<f64> {
    validate_codons(codons)?;
    let ws: Vec<f64> = codons.iter()
        .map(|c| {
            let w = match weighting {
                CaiWeighting::Frequency => table.frequency(c),
                CaiWeighting::RelativeAdaptiveness => table.weight(c),
            };
            match w {
                Some(w) if w > 0.0 => w,
                _ => CAI_FLOOR,
            }
        })
        .collect();
    Ok(stats::geometric_mean(&ws))
}

/// Number of distinct codons.
pub fn unique_codon_count(codons: &[Codon]) -> usize {
    codons.iter().collect::<HashSet<_>>().len()
}

/// Distinct codons over total codons.
pub fn codon_diversity(codons: &[Codon]) -> Result<f64> {
    validate_codons(codons)?;
    Ok(stats::fraction(unique_codon_count(codons), codons.len()))
}

/// Number of codons in the table's rare set.
pub fn rare_codon_count(codons: &[Codon], table: &CodonUsageTable) -> Result<usize> {
    validate_codons(codons)?;
    Ok(codons.iter().filter(|c| table.is_rare(c)).count())
}

/// Fraction of G and C.
pub fn gc_content(x: &[Nucleotide]) -> Result<f64> {
    seq::validate_dna(x)?;
    let gc = x.iter().filter(|&&b| b == b'G' || b == b'C').count();
    Ok(stats::fraction(gc, x.len()))
}
