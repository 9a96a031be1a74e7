use std::collections::{BTreeMap, HashMap, HashSet};

use crate::constants::*;
use crate::error::{Error, Result};
use crate::seq::{self, Codon, Residue};

/// One row of a codon usage table.
#[derive(Debug, Clone, PartialEq)]
pub struct CodonUsage {
    pub codon: Codon,
    pub amino_acid: Residue,
    /// Relative frequency among the synonymous codons of `amino_acid`
    pub frequency: f64,
}

/// Immutable codon usage table covering the 20 amino acids and stop.
#[derive(Debug, Clone)]
pub struct CodonUsageTable {
    by_residue: BTreeMap<Residue, Vec<(Codon, f64)>>,
    by_codon: HashMap<Codon, (Residue, f64)>,
    max_frequency: HashMap<Residue, f64>,
    rare: HashSet<Codon>,
    rare_threshold: f64,
}

impl CodonUsageTable {
    /// Build a table from usage rows.
    ///
    /// Codons with a frequency below `rare_threshold` form the rare-codon set.
    pub fn new<I>(entries: I, rare_threshold: f64) -> Result<CodonUsageTable>
    where
        I: IntoIterator<Item = CodonUsage>,
    {
        let mut by_residue: BTreeMap<Residue, Vec<(Codon, f64)>> = BTreeMap::new();
        let mut by_codon = HashMap::new();

        for entry in entries {
            seq::validate_dna(&entry.codon)?;
            if !entry.frequency.is_finite() || entry.frequency < 0.0 {
                return Err(Error::InvalidUsageTable(format!(
                    "codon {} has invalid frequency {}",
                    seq::codon_str(&entry.codon), entry.frequency
                )));
            }
            if let Some(&(aa, _)) = by_codon.get(&entry.codon) {
                return Err(Error::InvalidUsageTable(format!(
                    "codon {} assigned to both {} and {}",
                    seq::codon_str(&entry.codon), aa as char, entry.amino_acid as char
                )));
            }
            by_codon.insert(entry.codon, (entry.amino_acid, entry.frequency));
            by_residue.entry(entry.amino_acid)
                .or_insert_with(Vec::new)
                .push((entry.codon, entry.frequency));
        }

        for &aa in AMINO_ACIDS.iter().chain([STOP].iter()) {
            let codons = by_residue.get(&aa).ok_or_else(|| Error::InvalidUsageTable(
                format!("no codons for residue {}", aa as char)
            ))?;
            let total: f64 = codons.iter().map(|&(_, f)| f).sum();
            if (total - 1.0).abs() > FREQUENCY_SUM_TOLERANCE {
                return Err(Error::InvalidUsageTable(format!(
                    "frequencies for residue {} sum to {:.3}", aa as char, total
                )));
            }
        }
        if by_residue.len() != N_AMINO_ACIDS + 1 {
            let extra: String = by_residue.keys()
                .filter(|aa| **aa != STOP && !AMINO_ACIDS.contains(aa))
                .map(|&aa| aa as char)
                .collect();
            return Err(Error::InvalidUsageTable(format!("unknown residues: {}", extra)));
        }

        let max_frequency = by_residue.iter()
            .map(|(&aa, codons)| {
                (aa, codons.iter().map(|&(_, f)| f).fold(0.0, f64::max))
            })
            .collect();

        let rare = by_codon.iter()
            .filter(|&(_, &(_, f))| f < rare_threshold)
            .map(|(&c, _)| c)
            .collect();

        Ok(CodonUsageTable { by_residue, by_codon, max_frequency, rare, rare_threshold })
    }

    /// Synonymous codons and their frequencies for a residue.
    pub fn codons_for(&self, residue: Residue) -> Result<&[(Codon, f64)]> {
        self.by_residue.get(&residue)
            .map(|v| v.as_slice())
            .ok_or(Error::InvalidResidue { residue })
    }

    /// Residues covered by the table, stop included.
    pub fn residues(&self) -> impl Iterator<Item = Residue> + '_ {
        self.by_residue.keys().cloned()
    }

    pub fn amino_acid(&self, codon: &Codon) -> Option<Residue> {
        self.by_codon.get(codon).map(|&(aa, _)| aa)
    }

    pub fn frequency(&self, codon: &Codon) -> Option<f64> {
        self.by_codon.get(codon).map(|&(_, f)| f)
    }

    /// Relative adaptiveness: frequency divided by the residue's most frequent codon.
    pub fn weight(&self, codon: &Codon) -> Option<f64> {
        let &(aa, f) = self.by_codon.get(codon)?;
        let max = *self.max_frequency.get(&aa)?;
        if max > 0.0 {
            Some(f / max)
        } else {
            None
        }
    }

    pub fn is_rare(&self, codon: &Codon) -> bool {
        self.rare.contains(codon)
    }

    pub fn rare_codons(&self) -> &HashSet<Codon> {
        &self.rare
    }

    pub fn rare_threshold(&self) -> f64 {
        self.rare_threshold
    }
}
