use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use genedesign::config::RbsConfig;
use genedesign::io::codon_usage;
use genedesign::rbs::pool;
use genedesign::seq::code;
use genedesign::{CodonUsageTable, DesignConfig, Error, RbsChooser, ReferenceMotifs, TranscriptDesigner};

const DATA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data");

fn table() -> CodonUsageTable {
    let entries = codon_usage::Reader::from_file(format!("{}/codon_usage.txt", DATA))
        .expect("Error opening codon usage table")
        .entries()
        .expect("Error reading codon usage table");
    CodonUsageTable::new(entries, 0.1).expect("Error building codon usage table")
}

fn chooser(config: &RbsConfig) -> RbsChooser {
    let donors = pool::load_pool(
        format!("{}/genome.fa", DATA),
        format!("{}/genome.gff", DATA),
        format!("{}/abundance.txt", DATA),
        config,
    ).expect("Error loading RBS pool");
    RbsChooser::new(donors, config.clone())
}

fn designer() -> TranscriptDesigner {
    let config = DesignConfig::default();
    TranscriptDesigner::new(table(), ReferenceMotifs::default(), chooser(&config.rbs), config)
        .expect("Error building designer")
}

const GFP: &[u8] = b"MSKGEELFTGVVPILVELDGDVNGHKFSVSGEGEGDATYGKLTLKFICTTGKLPVPWPTLVTTFSYGVQCFSRYPDHMKQHDFFKSAMPEGYVQERTIFFKDDGNYKTRAEVKFEGDTLVNRIELKGIDFKEDGNILGHKLEYNYNSHNVYIMADKQKNGIKVNFKIRHNIEDGSVQLADHYQQNTPIGDGPVLLPDNHYLSTQSALSKDPNEKRDHMVLLEFVTAAGITHGMDELYK";

#[test]
fn test_pool_from_files() {
    let c = chooser(&RbsConfig::default());
    let genes: Vec<&str> = c.options().iter().map(|o| o.gene.as_str()).collect();
    assert_eq!(genes, vec!["tufA", "ompA", "rpsA"]);

    let ompa = &c.options()[1];
    assert_eq!(ompa.utr, b"GCCTCGTGTTACCATTAACTGCTATACCTAATCGTAAGGAGCTAAAGCCT".to_vec());
    assert_eq!(ompa.first_six, b"MKKTAI".to_vec());
    assert_eq!(c.options()[0].first_six, b"VSKEKF".to_vec());
}

#[test]
fn test_design_gfp() {
    let d = designer();
    let mut rng = StdRng::seed_from_u64(2024);
    let t = d.design(GFP, &HashSet::new(), &mut rng).expect("Error designing GFP");

    let mut expected = GFP.to_vec();
    expected.push(b'*');
    assert_eq!(code::translate(&t.cds()), expected);
    assert_eq!(t.codons[0], *b"ATG");
    assert!(d.chooser().options().contains(&t.rbs));
}

#[test]
fn test_rejects_bad_peptides() {
    let d = designer();
    let mut rng = StdRng::seed_from_u64(1);
    assert!(matches!(d.design(b"", &HashSet::new(), &mut rng), Err(Error::InvalidPeptide(_))));
    assert!(matches!(d.design(b"KMSKG", &HashSet::new(), &mut rng), Err(Error::InvalidPeptide(_))));
    assert!(matches!(d.design(b"MSK*G", &HashSet::new(), &mut rng), Err(Error::InvalidPeptide(_))));
    assert!(matches!(d.design(b"MSKJG", &HashSet::new(), &mut rng), Err(Error::InvalidResidue { residue: b'J' })));
}

#[test]
fn test_choose_never_repeats() {
    let c = chooser(&RbsConfig::default());
    let cds = b"ATGAGCAAAGGCGAAGAA";
    let mut ignores = HashSet::new();
    for _ in 0 .. c.options().len() {
        let chosen = c.choose(cds, &ignores).unwrap().clone();
        assert!(ignores.insert(chosen));
    }
    assert!(matches!(c.choose(cds, &ignores), Err(Error::NoRbsOptionsAvailable { .. })));
}

#[test]
fn test_config_file_overrides() {
    let dir = std::env::temp_dir().join(format!("genedesign-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.json");
    std::fs::write(&path, r#"{ "window": { "in_scope": 4, "step": 2, "max_attempts": 20 } }"#).unwrap();

    let config = DesignConfig::from_json_file(&path).unwrap();
    assert_eq!(config.window.in_scope, 4);
    assert_eq!(config.window.step, 2);
    assert_eq!(config.window.lookahead, 6);

    let d = TranscriptDesigner::new(table(), ReferenceMotifs::default(), chooser(&config.rbs), config).unwrap();
    let t = d.design(&GFP[..60], &HashSet::new(), &mut StdRng::seed_from_u64(8)).unwrap();
    assert_eq!(t.codons.len(), 61);

    std::fs::write(&path, r#"{ "window": { "step": 9 } }"#).unwrap();
    assert!(matches!(DesignConfig::from_json_file(&path), Err(Error::InvalidConfig(_))));
    std::fs::remove_dir_all(&dir).unwrap();
}
