use std::collections::HashMap;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::{Error, Result};
use crate::seq::{Codon, Residue};
use crate::usage::CodonUsageTable;

/// Draws synonymous codons in proportion to their usage frequency.
#[derive(Debug, Clone)]
pub struct CodonSampler {
    dists: HashMap<Residue, (Vec<Codon>, WeightedIndex<f64>)>,
}

impl CodonSampler {
    /// Build one weighted distribution per residue of the table.
    pub fn new(table: &CodonUsageTable) -> Result<CodonSampler> {
        let mut dists = HashMap::new();
        for aa in table.residues() {
            let entries = table.codons_for(aa)?;
            let codons: Vec<Codon> = entries.iter().map(|&(c, _)| c).collect();
            let dist = WeightedIndex::new(entries.iter().map(|&(_, f)| f))
                .map_err(|e| Error::InvalidUsageTable(format!(
                    "cannot sample codons for {}: {}", aa as char, e
                )))?;
            dists.insert(aa, (codons, dist));
        }
        Ok(CodonSampler { dists })
    }

    /// Sample a codon for `residue`.
    pub fn sample<R: Rng + ?Sized>(&self, residue: Residue, rng: &mut R) -> Result<Codon> {
        let (codons, dist) = self.dists.get(&residue)
            .ok_or(Error::InvalidResidue { residue })?;
        Ok(codons[dist.sample(rng)])
    }
}
