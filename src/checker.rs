use std::fmt;

use crate::config::DesignConfig;
use crate::constants::CODON_SIZE;
use crate::error::Result;
use crate::metrics::{self, ReferenceMotifs};
use crate::seq::{self, Codon, DnaSeq, Nucleotide};
use crate::stats;
use crate::usage::CodonUsageTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintClass {
    Codons,
    Forbidden,
    Promoter,
    Hairpin,
    Gc,
}

/// Constraint classes judged on a sequence window, in evaluation order.
pub const INCREMENTAL_CLASSES: [ConstraintClass; 4] = [
    ConstraintClass::Forbidden,
    ConstraintClass::Promoter,
    ConstraintClass::Hairpin,
    ConstraintClass::Gc,
];

impl ConstraintClass {
    fn slot(&self) -> Option<usize> {
        match *self {
            ConstraintClass::Codons => None,
            ConstraintClass::Forbidden => Some(0),
            ConstraintClass::Promoter => Some(1),
            ConstraintClass::Hairpin => Some(2),
            ConstraintClass::Gc => Some(3),
        }
    }
}

impl fmt::Display for ConstraintClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match *self {
            ConstraintClass::Codons => "codons",
            ConstraintClass::Forbidden => "forbidden",
            ConstraintClass::Promoter => "promoter",
            ConstraintClass::Hairpin => "hairpin",
            ConstraintClass::Gc => "gc",
        };
        f.write_str(s)
    }
}

/// Aggregate verdict of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintVerdict {
    pub passed: bool,
    /// Fraction of evaluated classes that passed, plus CAI
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassVerdict {
    pub class: ConstraintClass,
    pub passed: bool,
}

/// Outcome of evaluating a proposal. Holds what is needed to advance the
/// checkpoints should the proposal be committed.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub verdict: ConstraintVerdict,
    /// Classes evaluated this round; skipped classes are absent
    pub classes: Vec<ClassVerdict>,
    pub cai: f64,
}

impl Evaluation {
    #[inline]
    pub fn passed(&self) -> bool {
        self.verdict.passed
    }

    #[inline]
    pub fn score(&self) -> f64 {
        self.verdict.score
    }

    pub fn failed(&self) -> impl Iterator<Item = ConstraintClass> + '_ {
        self.classes.iter().filter(|v| !v.passed).map(|v| v.class)
    }

    fn scanned(&self) -> impl Iterator<Item = ConstraintClass> + '_ {
        self.classes.iter().map(|v| v.class).filter(|c| c.slot().is_some())
    }
}

/// Rare codons allowed once `len` codons of a `peptide_len` peptide are placed.
///
/// The peptide is split into `k` sections; one more rare codon is allowed per
/// section reached, up to `k`.
pub fn rare_codon_limit(peptide_len: usize, len: usize, k: usize) -> usize {
    if k == 0 {
        return 0;
    }
    let section_len = (peptide_len / k).max(1);
    let section = (len / section_len).min(k - 1);
    (section + 1).min(k)
}

/// Start offsets, relative to a region of length `n`, of the chunks hairpins
/// are counted in. The final chunk is aligned to the end of the region.
fn chunk_starts(n: usize, chunk: usize, step: usize) -> Vec<usize> {
    if n <= chunk {
        return vec![0];
    }
    let mut starts: Vec<usize> = (0 .. n - chunk).step_by(step).collect();
    starts.push(n - chunk);
    starts
}

/// Judges a growing coding sequence.
///
/// Sequence classes keep a checkpoint, the CDS offset up to which they have
/// been scanned. Each evaluation re-scans the grown suffix plus `W - 1`
/// nucleotides, `W` being the longest structure the class detects, and only
/// structures ending past the checkpoint count. Codon constraints are judged
/// on the whole codon list every time.
#[derive(Debug, Clone)]
pub struct IncrementalChecker<'a> {
    table: &'a CodonUsageTable,
    motifs: &'a ReferenceMotifs,
    config: &'a DesignConfig,
    /// Scanned CDS nucleotides per incremental class
    last: [usize; 4],
}

impl<'a> IncrementalChecker<'a> {
    pub fn new(table: &'a CodonUsageTable, motifs: &'a ReferenceMotifs, config: &'a DesignConfig) -> IncrementalChecker<'a> {
        IncrementalChecker { table, motifs, config, last: [0; 4] }
    }

    /// CDS offset already scanned for a class; always 0 for `Codons`.
    pub fn checkpoint(&self, class: ConstraintClass) -> usize {
        class.slot().map(|i| self.last[i]).unwrap_or(0)
    }

    /// Longest structure a class can detect.
    pub fn lookback(&self, class: ConstraintClass) -> usize {
        let w = match class {
            ConstraintClass::Codons => 0,
            ConstraintClass::Forbidden => self.motifs.max_forbidden_len(),
            ConstraintClass::Promoter => self.motifs.max_promoter_span(),
            ConstraintClass::Hairpin => self.config.hairpin.chunk,
            ConstraintClass::Gc => self.config.gc.window,
        };
        w.max(1)
    }

    /// Judge `committed + new` in the context of `utr_tail`.
    ///
    /// Checkpoints are not touched; call `advance` with the evaluation of the
    /// proposal that gets committed.
    pub fn evaluate(&self, committed: &[Codon], new: &[Codon], utr_tail: &[Nucleotide], peptide_len: usize) -> Result<Evaluation> {
        let mut codons = Vec::with_capacity(committed.len() + new.len());
        codons.extend_from_slice(committed);
        codons.extend_from_slice(new);

        let (codons_passed, cai) = self.check_codons(&codons, peptide_len)?;
        let mut classes = vec![ClassVerdict { class: ConstraintClass::Codons, passed: codons_passed }];

        let end = codons.len() * CODON_SIZE;
        let complete = codons.len() >= peptide_len;
        let offset = utr_tail.len();
        let mut x: DnaSeq = Vec::with_capacity(offset + end);
        x.extend_from_slice(utr_tail);
        x.extend(seq::join_codons(&codons));

        for &class in INCREMENTAL_CLASSES.iter() {
            let last = self.checkpoint(class).min(end);
            let grown = end - last;
            let w = self.lookback(class);
            if grown == 0 || (grown < w && !complete) {
                continue;
            }
            // scan positions in utr + cds coordinates
            let last = offset + last;
            let start = last.saturating_sub(w - 1);
            let passed = self.check_region(class, &x[start ..], last - start)?;
            classes.push(ClassVerdict { class, passed });
        }

        let n_passed = classes.iter().filter(|v| v.passed).count();
        let verdict = ConstraintVerdict {
            passed: n_passed == classes.len(),
            score: stats::fraction(n_passed, classes.len()) + cai,
        };
        Ok(Evaluation { verdict, classes, cai })
    }

    /// Move the checkpoints of the classes scanned in `evaluation` to
    /// `committed_len` codons.
    pub fn advance(&mut self, evaluation: &Evaluation, committed_len: usize) {
        let end = committed_len * CODON_SIZE;
        for class in evaluation.scanned() {
            if let Some(i) = class.slot() {
                if end > self.last[i] {
                    self.last[i] = end;
                }
            }
        }
    }

    /// Forget every checkpoint; the next evaluation re-scans the whole CDS.
    pub fn rewind(&mut self) {
        self.last = [0; 4];
    }

    /// Whether `utr_tail + cds` is free of forbidden sites and promoters that
    /// span the UTR/CDS junction.
    pub fn junction_clear(&self, utr_tail: &[Nucleotide], cds: &[Nucleotide]) -> Result<bool> {
        let offset = utr_tail.len();
        if offset == 0 || cds.is_empty() {
            return Ok(true);
        }
        let mut x: DnaSeq = Vec::with_capacity(offset + cds.len());
        x.extend_from_slice(utr_tail);
        x.extend_from_slice(cds);
        let spans = |start: usize, end: usize| start < offset && end > offset;
        let forbidden = metrics::forbidden_site_hits(&x, self.motifs)?;
        if forbidden.iter().any(|h| spans(h.start, h.end)) {
            return Ok(false);
        }
        let promoters = metrics::promoter_hits(&x, self.motifs)?;
        Ok(!promoters.iter().any(|h| spans(h.start, h.end)))
    }

    fn check_codons(&self, codons: &[Codon], peptide_len: usize) -> Result<(bool, f64)> {
        let c = &self.config.codons;
        let cai = metrics::cai(codons, self.table, c.cai_weighting)?;
        let diversity = stats::fraction(
            metrics::unique_codon_count(codons),
            codons.len().min(c.diversity_ceiling),
        );
        let rare = metrics::rare_codon_count(codons, self.table)?;
        let limit = rare_codon_limit(peptide_len, codons.len(), c.rare_limit);
        Ok((diversity >= c.min_diversity && cai >= c.min_cai && rare <= limit, cai))
    }

    /// Judge one class on `x`; only structures ending after `last` are new.
    fn check_region(&self, class: ConstraintClass, x: &[Nucleotide], last: usize) -> Result<bool> {
        let passed = match class {
            ConstraintClass::Codons => true,
            ConstraintClass::Forbidden => {
                !metrics::forbidden_site_hits(x, self.motifs)?.iter().any(|h| h.end > last)
            },
            ConstraintClass::Promoter => {
                !metrics::promoter_hits(x, self.motifs)?.iter().any(|h| h.end > last)
            },
            ConstraintClass::Hairpin => {
                let h = &self.config.hairpin;
                let mut ok = true;
                for start in chunk_starts(x.len(), h.chunk, h.chunk_step) {
                    let stop = (start + h.chunk).min(x.len());
                    let n = metrics::hairpin_sites(&x[start .. stop], h.min_stem, h.min_loop, h.max_loop)?
                        .iter()
                        .filter(|s| start + s.end() > last)
                        .count();
                    if n > h.max_per_chunk {
                        ok = false;
                        break;
                    }
                }
                ok
            },
            ConstraintClass::Gc => {
                let gc = metrics::gc_content(x)?;
                gc >= self.config.gc.min && gc <= self.config.gc.max
            },
        };
        Ok(passed)
    }
}
