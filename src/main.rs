use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::str;

use bio::io::fasta;
use clap::Parser;
use log::{error, info, LevelFilter};

use genedesign::io::codon_usage;
use genedesign::rbs::pool;
use genedesign::{CodonUsageTable, DesignConfig, RbsChooser, ReferenceMotifs, Result, TranscriptDesigner};

#[derive(Parser)]
#[command(name = "genedesign")]
#[command(version, about = "Design bacterial coding sequences and RBS donors for peptides")]
struct Cli {
    /// Peptides to design (one-letter codes)
    peptides: Vec<String>,

    /// Protein FASTA with further peptides to design
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Codon usage table (codon, amino acid, frequency; tab-delimited)
    #[arg(long)]
    codon_usage: PathBuf,

    /// Genome FASTA of the donor organism
    #[arg(long)]
    fasta: PathBuf,

    /// GFF3 annotation of the donor genome
    #[arg(long)]
    gff: PathBuf,

    /// Locus abundances (tag, abundance; tab-delimited)
    #[arg(long)]
    abundance: PathBuf,

    /// Design configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the random stream of each design
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Log progress; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn read_peptides(cli: &Cli) -> Result<Vec<(String, Vec<u8>)>> {
    let mut peptides: Vec<(String, Vec<u8>)> = cli.peptides.iter()
        .enumerate()
        .map(|(i, p)| (format!("peptide{}", i + 1), p.as_bytes().to_vec()))
        .collect();
    if let Some(ref path) = cli.input {
        let reader = fasta::Reader::new(File::open(path)?);
        for r in reader.records() {
            let record = r?;
            peptides.push((record.id().to_owned(), record.seq().to_vec()));
        }
    }
    Ok(peptides)
}

fn run(cli: &Cli) -> Result<bool> {
    let config = match cli.config {
        Some(ref path) => DesignConfig::from_json_file(path)?,
        None => DesignConfig::default(),
    };

    let entries = codon_usage::Reader::from_file(&cli.codon_usage)?.entries()?;
    let table = CodonUsageTable::new(entries, config.codons.rare_threshold)?;
    info!("codon usage: {} rare codons", table.rare_codons().len());

    let donors = pool::load_pool(&cli.fasta, &cli.gff, &cli.abundance, &config.rbs)?;
    let chooser = RbsChooser::new(donors, config.rbs.clone());
    let designer = TranscriptDesigner::new(table, ReferenceMotifs::default(), chooser, config)?;

    let peptides = read_peptides(cli)?;
    let sequences: Vec<Vec<u8>> = peptides.iter().map(|(_, p)| p.clone()).collect();
    let results = designer.design_batch(&sequences, &HashSet::new(), cli.seed);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "name\tgene\tutr\tcds")?;
    let mut ok = true;
    for ((name, _), result) in peptides.iter().zip(results) {
        match result {
            Ok(t) => {
                writeln!(
                    out, "{}\t{}\t{}\t{}",
                    name,
                    t.rbs.gene,
                    str::from_utf8(&t.rbs.utr).unwrap_or("?"),
                    str::from_utf8(&t.cds()).unwrap_or("?")
                )?;
            },
            Err(e) => {
                error!("{}: {}", name, e);
                ok = false;
            },
        }
    }
    Ok(ok)
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(true) => {},
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        },
    }
}
