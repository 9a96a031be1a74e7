//! Property-based tests for sequence metrics and transcript design.

use std::collections::HashSet;
use std::sync::OnceLock;

use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;

use genedesign::checker::rare_codon_limit;
use genedesign::io::codon_usage;
use genedesign::metrics::{gc_content, hairpin_count};
use genedesign::rbs::pool;
use genedesign::seq::{self, code};
use genedesign::{CodonUsageTable, DesignConfig, RbsChooser, ReferenceMotifs, TranscriptDesigner};

const DATA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data");

fn designer() -> &'static TranscriptDesigner {
    static DESIGNER: OnceLock<TranscriptDesigner> = OnceLock::new();
    DESIGNER.get_or_init(|| {
        let config = DesignConfig::default();
        let entries = codon_usage::Reader::from_file(format!("{}/codon_usage.txt", DATA))
            .expect("Error opening codon usage table")
            .entries()
            .expect("Error reading codon usage table");
        let table = CodonUsageTable::new(entries, config.codons.rare_threshold).expect("Error building table");
        let donors = pool::load_pool(
            format!("{}/genome.fa", DATA),
            format!("{}/genome.gff", DATA),
            format!("{}/abundance.txt", DATA),
            &config.rbs,
        ).expect("Error loading RBS pool");
        let chooser = RbsChooser::new(donors, config.rbs.clone());
        TranscriptDesigner::new(table, ReferenceMotifs::default(), chooser, config).expect("Error building designer")
    })
}

// =============================================================================
// Strategies
// =============================================================================

fn nucleotide() -> impl Strategy<Value = u8> {
    prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T'),]
}

fn dna(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(nucleotide(), 1..=max_len)
}

fn residue() -> impl Strategy<Value = u8> {
    prop::sample::select(b"ACDEFGHIKLMNPQRSTVWY".to_vec())
}

/// Peptides that open with a residue that has a start codon.
fn peptide() -> impl Strategy<Value = Vec<u8>> {
    (prop::sample::select(b"MVL".to_vec()), prop::collection::vec(residue(), 0..30))
        .prop_map(|(first, rest)| {
            let mut p = vec![first];
            p.extend(rest);
            p
        })
}

// =============================================================================
// Metrics
// =============================================================================

proptest! {
    #[test]
    fn hairpins_symmetric_under_reverse_complement(x in dna(80)) {
        let rc = seq::reverse_complemented(&x);
        prop_assert_eq!(hairpin_count(&x, 3, 4, 9).unwrap(), hairpin_count(&rc, 3, 4, 9).unwrap());
        prop_assert_eq!(hairpin_count(&x, 4, 3, 8).unwrap(), hairpin_count(&rc, 4, 3, 8).unwrap());
    }

    #[test]
    fn short_homopolymers_have_no_hairpins(base in nucleotide(), n in 1usize..10) {
        let x = vec![base; n];
        prop_assert_eq!(hairpin_count(&x, 3, 4, 9).unwrap(), 0);
    }

    #[test]
    fn gc_content_is_a_fraction(x in dna(200)) {
        let gc = gc_content(&x).unwrap();
        prop_assert!((0.0..=1.0).contains(&gc));
        let rc = seq::reverse_complemented(&x);
        prop_assert!((gc_content(&rc).unwrap() - gc).abs() < 1e-12);
    }

    #[test]
    fn rare_codon_limit_grows_with_length(peptide_len in 1usize..500, k in 1usize..6) {
        let mut prev = 0;
        for len in 0 ..= peptide_len {
            let limit = rare_codon_limit(peptide_len, len, k);
            prop_assert!(limit >= prev);
            prop_assert!(limit >= 1 && limit <= k);
            prev = limit;
        }
    }
}

// =============================================================================
// Design
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn design_round_trips(p in peptide(), seed in any::<u64>()) {
        let d = designer();
        let t = d.design(&p, &HashSet::new(), &mut StdRng::seed_from_u64(seed)).unwrap();
        let mut expected = p.clone();
        expected.push(b'*');
        prop_assert_eq!(code::translate(&t.cds()), expected);
        prop_assert_eq!(Some(t.codons[0]), code::start_codon(p[0]));
    }
}
