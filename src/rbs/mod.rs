pub mod pool;

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str;

use bio::alignment::distance::levenshtein;
use log::debug;

use crate::config::RbsConfig;
use crate::constants::CODON_SIZE;
use crate::error::{Error, Result};
use crate::metrics;
use crate::seq::{self, code, DnaSeq, Nucleotide, Peptide};

/// Natural RBS donor: a 5' UTR and the coding sequence it drives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RbsOption {
    pub utr: DnaSeq,
    pub cds: DnaSeq,
    pub gene: String,
    /// Leading residues encoded by `cds`
    pub first_six: Peptide,
}

impl RbsOption {
    /// Create a donor, translating the first `prefix_len` residues of `cds`.
    pub fn new(utr: DnaSeq, cds: DnaSeq, gene: String, prefix_len: usize) -> Result<RbsOption> {
        if !utr.is_empty() {
            seq::validate_dna(&utr)?;
        }
        seq::validate_dna(&cds)?;
        let first_six = prefix_peptide(&cds, prefix_len);
        Ok(RbsOption { utr, cds, gene, first_six })
    }

    /// The last `n` nucleotides of the UTR.
    pub fn utr_tail(&self, n: usize) -> &[Nucleotide] {
        &self.utr[self.utr.len().saturating_sub(n) ..]
    }
}

impl fmt::Display for RbsOption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "{} utr={} first_aas={}",
            self.gene,
            str::from_utf8(&self.utr).unwrap_or("?"),
            str::from_utf8(&self.first_six).unwrap_or("?")
        )
    }
}

fn prefix_peptide(cds: &[Nucleotide], n: usize) -> Peptide {
    let end = (n * CODON_SIZE).min(cds.len());
    code::translate(&cds[..end])
}

/// Picks the donor whose UTR folds least with a CDS and whose leading
/// residues best resemble those of the CDS.
#[derive(Debug, Clone)]
pub struct RbsChooser {
    options: Vec<RbsOption>,
    config: RbsConfig,
}

impl RbsChooser {
    pub fn new(options: Vec<RbsOption>, config: RbsConfig) -> RbsChooser {
        RbsChooser { options, config }
    }

    pub fn options(&self) -> &[RbsOption] {
        &self.options
    }

    /// Weighted hairpin and prefix-distance score of a donor; lower is better.
    pub fn score(&self, option: &RbsOption, cds: &[Nucleotide], peptide: &[u8]) -> Result<f64> {
        let c = &self.config;
        let mut x = option.utr.clone();
        x.extend_from_slice(cds);
        let hairpins = metrics::hairpin_count(&x, c.min_stem, c.min_loop, c.max_loop)?;
        let distance = levenshtein(peptide, &option.first_six);
        Ok(c.hairpin_weight * hairpins as f64 + c.prefix_weight * distance as f64)
    }

    /// Best donor for `cds` outside of `ignores`. Ties keep the earlier pool entry.
    pub fn choose(&self, cds: &[Nucleotide], ignores: &HashSet<RbsOption>) -> Result<&RbsOption> {
        seq::validate_dna(cds)?;
        let peptide = prefix_peptide(cds, self.config.prefix_len);

        let mut best: Option<(&RbsOption, f64)> = None;
        let mut ignored = 0;
        for option in self.options.iter() {
            if ignores.contains(option) {
                ignored += 1;
                continue;
            }
            let s = self.score(option, cds, &peptide)?;
            let better = match best {
                None => true,
                Some((_, b)) => s.partial_cmp(&b) == Some(Ordering::Less),
            };
            if better {
                best = Some((option, s));
            }
        }

        match best {
            Some((option, s)) => {
                debug!("chose RBS from {} (score {:.2})", option.gene, s);
                Ok(option)
            },
            None => Err(Error::NoRbsOptionsAvailable { ignored, total: self.options.len() }),
        }
    }
}
