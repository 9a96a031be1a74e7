use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::DIVERSITY_CEILING;
use crate::error::{Error, Result};
use crate::metrics::CaiWeighting;

/// Sliding window and search budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Residues in the initial block, generated before the RBS is chosen
    pub first_block: usize,
    /// Codons judged together with the committed prefix
    pub in_scope: usize,
    /// Extra codons sampled past the in-scope codons and then discarded
    pub lookahead: usize,
    /// Codons committed per window; at least 1 and at most `in_scope`
    pub step: usize,
    /// Attempts per window before falling back to the best-scoring one
    pub max_attempts: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            first_block: 6,
            in_scope: 3,
            lookahead: 6,
            step: 3,
            max_attempts: 100,
        }
    }
}

/// Codon bias constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodonConfig {
    /// Codons below this usage frequency are rare
    pub rare_threshold: f64,
    /// Rare codons allowed over the whole peptide
    pub rare_limit: usize,
    pub min_diversity: f64,
    pub diversity_ceiling: usize,
    pub min_cai: f64,
    pub cai_weighting: CaiWeighting,
}

impl Default for CodonConfig {
    fn default() -> Self {
        Self {
            rare_threshold: 0.1,
            rare_limit: 3,
            min_diversity: 0.5,
            diversity_ceiling: DIVERSITY_CEILING,
            min_cai: 0.2,
            cai_weighting: CaiWeighting::Frequency,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcConfig {
    pub min: f64,
    pub max: f64,
    /// Nucleotides that must accumulate before GC content is re-measured
    pub window: usize,
}

impl Default for GcConfig {
    fn default() -> Self {
        Self { min: 0.4, max: 0.6, window: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HairpinConfig {
    pub min_stem: usize,
    pub min_loop: usize,
    pub max_loop: usize,
    /// Length of the chunks hairpins are counted in
    pub chunk: usize,
    pub chunk_step: usize,
    /// Hairpins tolerated per chunk
    pub max_per_chunk: usize,
}

impl Default for HairpinConfig {
    fn default() -> Self {
        Self {
            min_stem: 3,
            min_loop: 4,
            max_loop: 9,
            chunk: 50,
            chunk_step: 25,
            max_per_chunk: 1,
        }
    }
}

/// RBS donor selection and pool construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RbsConfig {
    /// Length of the UTR taken upstream of each donor CDS
    pub utr_len: u64,
    /// Trailing UTR nucleotides prepended to the CDS for constraint checks
    pub utr_context: usize,
    /// Fraction of loci, by abundance, kept as donors
    pub top_fraction: f64,
    /// Residues compared between donor and design
    pub prefix_len: usize,
    pub min_stem: usize,
    pub min_loop: usize,
    pub max_loop: usize,
    pub hairpin_weight: f64,
    pub prefix_weight: f64,
}

impl Default for RbsConfig {
    fn default() -> Self {
        Self {
            utr_len: 50,
            utr_context: 25,
            top_fraction: 0.05,
            prefix_len: 6,
            min_stem: 4,
            min_loop: 3,
            max_loop: 8,
            hairpin_weight: 0.5,
            prefix_weight: 0.5,
        }
    }
}

/// Configuration for transcript design.
///
/// Sections missing from a JSON file take their default values:
///
/// ```json
/// { "window": { "max_attempts": 200 }, "gc": { "min": 0.35 } }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    pub window: WindowConfig,
    pub codons: CodonConfig,
    pub gc: GcConfig,
    pub hairpin: HairpinConfig,
    pub rbs: RbsConfig,
}

fn check(ok: bool, msg: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidConfig(msg.to_owned()))
    }
}

fn is_unit(x: f64) -> bool {
    (0.0 ..= 1.0).contains(&x)
}

impl DesignConfig {
    /// Read a configuration from a JSON file and validate it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<DesignConfig> {
        let text = fs::read_to_string(path)?;
        let config: DesignConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let w = &self.window;
        check(w.first_block >= 1, "window.first_block must be at least 1")?;
        check(w.in_scope >= 1, "window.in_scope must be at least 1")?;
        check(w.step >= 1 && w.step <= w.in_scope, "window.step must lie in 1..=window.in_scope")?;
        check(w.max_attempts >= 1, "window.max_attempts must be at least 1")?;

        let c = &self.codons;
        check(is_unit(c.rare_threshold), "codons.rare_threshold must lie in [0, 1]")?;
        check(c.rare_limit >= 1, "codons.rare_limit must be at least 1")?;
        check(is_unit(c.min_diversity), "codons.min_diversity must lie in [0, 1]")?;
        check(c.diversity_ceiling >= 1, "codons.diversity_ceiling must be at least 1")?;
        check(is_unit(c.min_cai), "codons.min_cai must lie in [0, 1]")?;

        let g = &self.gc;
        check(is_unit(g.min) && is_unit(g.max) && g.min <= g.max, "gc bounds must satisfy 0 <= min <= max <= 1")?;
        check(g.window >= 1, "gc.window must be at least 1")?;

        let h = &self.hairpin;
        check(h.min_stem >= 1, "hairpin.min_stem must be at least 1")?;
        check(h.min_loop <= h.max_loop, "hairpin.min_loop must not exceed hairpin.max_loop")?;
        check(h.chunk >= 1 && h.chunk_step >= 1, "hairpin.chunk and hairpin.chunk_step must be at least 1")?;

        let r = &self.rbs;
        check(r.top_fraction > 0.0 && r.top_fraction <= 1.0, "rbs.top_fraction must lie in (0, 1]")?;
        check(r.prefix_len >= 1, "rbs.prefix_len must be at least 1")?;
        check(r.min_stem >= 1, "rbs.min_stem must be at least 1")?;
        check(r.min_loop <= r.max_loop, "rbs.min_loop must not exceed rbs.max_loop")?;
        check(r.hairpin_weight >= 0.0 && r.prefix_weight >= 0.0, "rbs weights must be non-negative")?;

        Ok(())
    }
}
