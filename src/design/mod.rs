pub mod window;

use std::collections::HashSet;
use std::fmt;
use std::str;

use crc::{Crc, CRC_32_ISO_HDLC};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::checker::{ConstraintClass, Evaluation, IncrementalChecker};
use crate::config::DesignConfig;
use crate::constants::*;
use crate::error::{Error, Result};
use crate::metrics::{hairpin_sites, ReferenceMotifs};
use crate::rbs::{RbsChooser, RbsOption};
use crate::sample::CodonSampler;
use crate::seq::{self, code, Codon, DnaSeq, Nucleotide, Peptide, Residue};
use crate::usage::CodonUsageTable;

use self::window::Windows;

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Designed transcript: donor RBS and the codons encoding the peptide and a stop.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub rbs: RbsOption,
    pub peptide: Peptide,
    pub codons: Vec<Codon>,
}

impl Transcript {
    pub fn cds(&self) -> DnaSeq {
        seq::join_codons(&self.codons)
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "rbs={} utr={} peptide={} cds={}",
            self.rbs.gene,
            str::from_utf8(&self.rbs.utr).unwrap_or("?"),
            str::from_utf8(&self.peptide).unwrap_or("?"),
            str::from_utf8(&self.cds()).unwrap_or("?")
        )
    }
}

/// Result of the search for one window.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// A proposal satisfied every evaluated constraint
    Passed { codons: Vec<Codon>, evaluation: Evaluation, attempts: usize },
    /// Attempts ran out; the best-scoring proposal
    BestEffort { codons: Vec<Codon>, evaluation: Evaluation, attempts: usize },
}

impl SearchOutcome {
    pub fn passed(&self) -> bool {
        matches!(*self, SearchOutcome::Passed { .. })
    }

    pub fn codons(&self) -> &[Codon] {
        match *self {
            SearchOutcome::Passed { ref codons, .. } => codons,
            SearchOutcome::BestEffort { ref codons, .. } => codons,
        }
    }

    pub fn evaluation(&self) -> &Evaluation {
        match *self {
            SearchOutcome::Passed { ref evaluation, .. } => evaluation,
            SearchOutcome::BestEffort { ref evaluation, .. } => evaluation,
        }
    }
}

/// Per-run design state. Committed codons are only ever appended.
#[derive(Debug, Clone)]
pub struct DesignState<'a> {
    codons: Vec<Codon>,
    rbs: Option<RbsOption>,
    checker: IncrementalChecker<'a>,
}

impl<'a> DesignState<'a> {
    pub fn new(checker: IncrementalChecker<'a>) -> DesignState<'a> {
        DesignState { codons: Vec::new(), rbs: None, checker }
    }

    pub fn codons(&self) -> &[Codon] {
        &self.codons
    }

    /// UTR context for constraint checks; empty until a donor is chosen.
    pub fn utr_tail(&self, n: usize) -> &[Nucleotide] {
        match self.rbs {
            Some(ref rbs) => rbs.utr_tail(n),
            None => &[],
        }
    }

    /// Append the first `n` codons of the searched proposal and advance the checkpoints.
    pub fn commit(&mut self, outcome: &SearchOutcome, n: usize) {
        let codons = outcome.codons();
        self.codons.extend_from_slice(&codons[.. n.min(codons.len())]);
        self.checker.advance(outcome.evaluation(), self.codons.len());
    }
}

/// Upper-case a peptide, check it can be designed and append a stop.
pub fn prepare_peptide(peptide: &[u8]) -> Result<Peptide> {
    if peptide.is_empty() {
        return Err(Error::InvalidPeptide(String::from("peptide is empty")));
    }
    let mut full = peptide.to_ascii_uppercase();
    if code::start_codon(full[0]).is_none() {
        return Err(Error::InvalidPeptide(format!(
            "first residue '{}' cannot start translation", full[0] as char
        )));
    }
    for (i, &aa) in full.iter().enumerate() {
        if aa == STOP {
            return Err(Error::InvalidPeptide(format!("stop at position {}", i)));
        }
        if !AMINO_ACIDS.contains(&aa) {
            return Err(Error::InvalidResidue { residue: aa });
        }
    }
    full.push(STOP);
    Ok(full)
}

/// Seed of a peptide's random stream within a batch.
pub fn peptide_seed(base_seed: u64, peptide: &[u8]) -> u64 {
    base_seed ^ u64::from(CRC32.checksum(peptide))
}

/// Designs transcripts against a fixed codon usage table, motif sets and donor pool.
#[derive(Debug, Clone)]
pub struct TranscriptDesigner {
    table: CodonUsageTable,
    sampler: CodonSampler,
    motifs: ReferenceMotifs,
    chooser: RbsChooser,
    config: DesignConfig,
}

impl TranscriptDesigner {
    pub fn new(table: CodonUsageTable, motifs: ReferenceMotifs, chooser: RbsChooser, config: DesignConfig) -> Result<TranscriptDesigner> {
        config.validate()?;
        let sampler = CodonSampler::new(&table)?;
        Ok(TranscriptDesigner { table, sampler, motifs, chooser, config })
    }

    pub fn config(&self) -> &DesignConfig {
        &self.config
    }

    pub fn chooser(&self) -> &RbsChooser {
        &self.chooser
    }

    /// Design a transcript for `peptide`, choosing a donor outside of `ignores`.
    ///
    /// The first block is sampled on its own and picks the donor. The rest is
    /// designed window by window, committing `step` codons of each accepted
    /// proposal.
    pub fn design<R: Rng + ?Sized>(&self, peptide: &[u8], ignores: &HashSet<RbsOption>, rng: &mut R) -> Result<Transcript> {
        let full = prepare_peptide(peptide)?;
        let n = full.len();
        let w = &self.config.window;

        let checker = IncrementalChecker::new(&self.table, &self.motifs, &self.config);
        let mut state = DesignState::new(checker);

        let first = w.first_block.min(n);
        let outcome = self.search(&state, &full[.. first], n, rng)?;
        self.log_outcome(0, first, &outcome);
        state.commit(&outcome, first);

        let rbs = self.choose_rbs(&state, ignores)?;
        state.rbs = Some(rbs.clone());
        // the first block was checked without a UTR
        state.checker.rewind();

        for window in Windows::new(first, n, w.in_scope, w.lookahead, w.step) {
            debug!("window {}..{}, lookahead to {}", window.start, window.scope_end, window.end);
            let outcome = self.search(&state, &full[window.start .. window.end], n, rng)?;
            self.log_outcome(window.start, window.end, &outcome);
            state.commit(&outcome, window.commit);
        }

        Ok(Transcript { rbs, peptide: full[.. n - 1].to_vec(), codons: state.codons })
    }

    /// Choose a donor for the committed first block, passing over donors whose
    /// UTR forms a forbidden site or promoter with it. If every remaining donor
    /// does, the chooser's first pick is kept.
    fn choose_rbs(&self, state: &DesignState, ignores: &HashSet<RbsOption>) -> Result<RbsOption> {
        let cds = seq::join_codons(&state.codons);
        let context = self.config.rbs.utr_context;
        let mut skipped = ignores.clone();
        let mut fallback: Option<RbsOption> = None;
        loop {
            let rbs = match self.chooser.choose(&cds, &skipped) {
                Ok(rbs) => rbs.clone(),
                Err(e) => {
                    return match fallback {
                        Some(rbs) => {
                            warn!("every donor forms a site across the UTR junction; keeping {}", rbs.gene);
                            Ok(rbs)
                        },
                        None => Err(e),
                    };
                },
            };
            if state.checker.junction_clear(rbs.utr_tail(context), &cds)? {
                return Ok(rbs);
            }
            debug!("donor {} forms a site across the UTR junction", rbs.gene);
            if fallback.is_none() {
                fallback = Some(rbs.clone());
            }
            skipped.insert(rbs);
        }
    }

    /// Design many peptides in parallel; peptide `p` draws from a stream
    /// seeded with `peptide_seed(base_seed, p)`.
    pub fn design_batch(&self, peptides: &[Peptide], ignores: &HashSet<RbsOption>, base_seed: u64) -> Vec<Result<Transcript>> {
        peptides.par_iter()
            .map(|p| {
                let mut rng = StdRng::seed_from_u64(peptide_seed(base_seed, p));
                self.design(p, ignores, &mut rng)
            })
            .collect()
    }

    /// Sample codons for `residues`; the first codon of the transcript is
    /// the canonical start codon of its residue.
    fn propose<R: Rng + ?Sized>(&self, residues: &[Residue], at_start: bool, rng: &mut R) -> Result<Vec<Codon>> {
        let mut codons = Vec::with_capacity(residues.len());
        for (i, &aa) in residues.iter().enumerate() {
            let forced = if at_start && i == 0 { code::start_codon(aa) } else { None };
            let codon = match forced {
                Some(codon) => codon,
                None => self.sampler.sample(aa, rng)?,
            };
            codons.push(codon);
        }
        Ok(codons)
    }

    /// Rejection-sample proposals for `residues` until one passes or the
    /// attempt budget is spent.
    pub fn search<R: Rng + ?Sized>(&self, state: &DesignState, residues: &[Residue], peptide_len: usize, rng: &mut R) -> Result<SearchOutcome> {
        let at_start = state.codons.is_empty();
        let utr = state.utr_tail(self.config.rbs.utr_context);
        let mut best: Option<(Vec<Codon>, Evaluation)> = None;

        let max_attempts = self.config.window.max_attempts;
        for attempt in 1 ..= max_attempts {
            let codons = self.propose(residues, at_start, rng)?;
            let evaluation = state.checker.evaluate(&state.codons, &codons, utr, peptide_len)?;
            if evaluation.passed() {
                return Ok(SearchOutcome::Passed { codons, evaluation, attempts: attempt });
            }
            let better = match best {
                Some((_, ref b)) => evaluation.score() > b.score(),
                None => true,
            };
            if better {
                best = Some((codons, evaluation));
            }
        }

        match best {
            Some((codons, evaluation)) => Ok(SearchOutcome::BestEffort { codons, evaluation, attempts: max_attempts }),
            None => Err(Error::InvalidConfig(String::from("window.max_attempts must be at least 1"))),
        }
    }

    fn log_outcome(&self, start: usize, end: usize, outcome: &SearchOutcome) {
        match *outcome {
            SearchOutcome::Passed { attempts, .. } => {
                debug!("residues {}..{}: passed after {} attempts", start, end, attempts);
            },
            SearchOutcome::BestEffort { ref codons, ref evaluation, attempts } => {
                let failed: Vec<String> = evaluation.failed().map(|c| c.to_string()).collect();
                warn!(
                    "residues {}..{}: no passing proposal in {} attempts; keeping best (score {:.3}, failing {})",
                    start, end, attempts, evaluation.score(), failed.join(",")
                );
                if evaluation.failed().any(|c| c == ConstraintClass::Hairpin) {
                    let x = seq::join_codons(codons);
                    let h = &self.config.hairpin;
                    if let Ok(sites) = hairpin_sites(&x, h.min_stem, h.min_loop, h.max_loop) {
                        let rendered: Vec<String> = sites.iter().map(|s| s.render(&x)).collect();
                        debug!("residues {}..{}: proposal hairpins {}", start, end, rendered.join(" "));
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RbsConfig;
    use crate::rbs::tests::donors;
    use crate::usage::tests::ecoli;

    fn designer() -> TranscriptDesigner {
        let chooser = RbsChooser::new(donors(), RbsConfig::default());
        TranscriptDesigner::new(ecoli(), ReferenceMotifs::default(), chooser, DesignConfig::default()).unwrap()
    }

    #[test]
    fn test_prepare_peptide() {
        assert_eq!(prepare_peptide(b"mkv").unwrap(), b"MKV*".to_vec());
        assert!(matches!(prepare_peptide(b""), Err(Error::InvalidPeptide(_))));
        assert!(matches!(prepare_peptide(b"KMV"), Err(Error::InvalidPeptide(_))));
        assert!(matches!(prepare_peptide(b"MK*V"), Err(Error::InvalidPeptide(_))));
        assert!(matches!(prepare_peptide(b"MKBV"), Err(Error::InvalidResidue { residue: b'B' })));
    }

    #[test]
    fn test_round_trip() {
        let d = designer();
        let mut rng = StdRng::seed_from_u64(11);
        let peptide = b"MYPFIRTARMTVSKGEELFTGVVPILVELDGDVNGHKFSVSG";
        let t = d.design(peptide, &HashSet::new(), &mut rng).unwrap();
        assert_eq!(t.codons.len(), peptide.len() + 1);
        let mut expected = peptide.to_vec();
        expected.push(STOP);
        assert_eq!(code::translate(&t.cds()), expected);
        assert_eq!(t.codons[0], *b"ATG");
        assert_eq!(t.peptide, peptide.to_vec());
    }

    #[test]
    fn test_start_codons() {
        let d = designer();
        let mut rng = StdRng::seed_from_u64(3);
        for &(p, start) in [(&b"VKLAE"[..], b"GTG"), (&b"LKLAE"[..], b"TTG"), (&b"MKLAE"[..], b"ATG")].iter() {
            let t = d.design(p, &HashSet::new(), &mut rng).unwrap();
            assert_eq!(&t.codons[0], start);
        }
    }

    #[test]
    fn test_deterministic() {
        let d = designer();
        let peptide = b"MSKGEELFTGVVPILVELDGDVNG";
        let a = d.design(peptide, &HashSet::new(), &mut StdRng::seed_from_u64(5)).unwrap();
        let b = d.design(peptide, &HashSet::new(), &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ignored_donor() {
        let d = designer();
        let peptide = b"MSKGEELFTGVVPILVELDG";
        let first = d.design(peptide, &HashSet::new(), &mut StdRng::seed_from_u64(9)).unwrap();
        let mut ignores = HashSet::new();
        ignores.insert(first.rbs.clone());
        let second = d.design(peptide, &ignores, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_ne!(first.rbs, second.rbs);

        let all: HashSet<RbsOption> = d.chooser().options().iter().cloned().collect();
        assert!(matches!(
            d.design(peptide, &all, &mut StdRng::seed_from_u64(9)),
            Err(Error::NoRbsOptionsAvailable { .. })
        ));
    }

    #[test]
    fn test_donor_forming_junction_site_passed_over() {
        let ompa = donors().remove(2);
        let mut utr = ompa.utr.clone();
        let n = utr.len();
        // TTCTAG + the A of ATG is XbaI
        utr[n - 6 ..].copy_from_slice(b"TTCTAG");
        let blocked = RbsOption::new(utr, ompa.cds.clone(), String::from("blocked"), 6).unwrap();
        let peptide = b"MKKTAIAIAVALAGFATVAQA";

        let chooser = RbsChooser::new(vec![blocked.clone(), ompa], RbsConfig::default());
        let d = TranscriptDesigner::new(ecoli(), ReferenceMotifs::default(), chooser, DesignConfig::default()).unwrap();
        for seed in 0 .. 3 {
            let t = d.design(peptide, &HashSet::new(), &mut StdRng::seed_from_u64(seed)).unwrap();
            assert_eq!(t.rbs.gene, "ompA");
        }

        // with no alternative the blocked donor is still used
        let chooser = RbsChooser::new(vec![blocked], RbsConfig::default());
        let d = TranscriptDesigner::new(ecoli(), ReferenceMotifs::default(), chooser, DesignConfig::default()).unwrap();
        let t = d.design(peptide, &HashSet::new(), &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(t.rbs.gene, "blocked");
    }

    #[test]
    fn test_short_peptide() {
        let d = designer();
        let t = d.design(b"M", &HashSet::new(), &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(t.codons.len(), 2);
        assert_eq!(t.codons[0], *b"ATG");
        assert_eq!(code::translate_codon(&t.codons[1]), Some(STOP));
    }

    #[test]
    fn test_best_effort() {
        let mut config = DesignConfig::default();
        // unreachable CAI forces every window onto the fallback
        config.codons.min_cai = 1.0;
        config.window.max_attempts = 3;
        let chooser = RbsChooser::new(donors(), RbsConfig::default());
        let d = TranscriptDesigner::new(ecoli(), ReferenceMotifs::default(), chooser, config).unwrap();

        let checker = IncrementalChecker::new(&d.table, &d.motifs, &d.config);
        let state = DesignState::new(checker);
        let mut rng = StdRng::seed_from_u64(2);
        let outcome = d.search(&state, b"MKLAEF", 40, &mut rng).unwrap();
        assert!(!outcome.passed());
        assert_eq!(outcome.codons().len(), 6);

        let t = d.design(b"MKLAEFGHIK", &HashSet::new(), &mut rng).unwrap();
        assert_eq!(code::translate(&t.cds()), b"MKLAEFGHIK*".to_vec());
    }

    #[test]
    fn test_commit_appends() {
        let d = designer();
        let checker = IncrementalChecker::new(&d.table, &d.motifs, &d.config);
        let mut state = DesignState::new(checker);
        let mut rng = StdRng::seed_from_u64(4);

        let outcome = d.search(&state, b"MKLAEFGHI", 40, &mut rng).unwrap();
        state.commit(&outcome, 3);
        assert_eq!(state.codons(), &outcome.codons()[..3]);

        let before = state.codons().to_vec();
        let outcome = d.search(&state, b"AEFGHI", 40, &mut rng).unwrap();
        state.commit(&outcome, 3);
        assert_eq!(&state.codons()[..3], &before[..]);
        assert_eq!(state.codons().len(), 6);
    }

    #[test]
    fn test_batch() {
        let d = designer();
        let peptides = vec![b"MKLAEFGHIK".to_vec(), b"VSKGEELFTG".to_vec(), b"QQQ".to_vec()];
        let results = d.design_batch(&peptides, &HashSet::new(), 17);
        assert_eq!(results.len(), 3);
        for (p, r) in peptides.iter().zip(results.iter()).take(2) {
            let t = r.as_ref().unwrap();
            assert_eq!(&t.peptide, p);
        }
        assert!(matches!(results[2], Err(Error::InvalidPeptide(_))));

        // reproducible per peptide
        let again = d.design_batch(&peptides[..1], &HashSet::new(), 17);
        assert_eq!(again[0].as_ref().unwrap(), results[0].as_ref().unwrap());
    }

    #[test]
    fn test_peptide_seed() {
        assert_eq!(peptide_seed(0, b"MKV"), u64::from(CRC32.checksum(b"MKV")));
        assert_ne!(peptide_seed(1, b"MKV"), peptide_seed(1, b"MKA"));
    }
}
