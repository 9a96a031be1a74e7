use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

use bio::io::{fasta, gff};
use log::{debug, info};

use crate::config::RbsConfig;
use crate::error::Result;
use crate::gene::{Locus, Loci, Region, Strand};
use crate::io::abundance;
use crate::rbs::RbsOption;
use crate::seq::genomic::Sequence;

/// Contigs keyed by FASTA id.
pub type Genome = HashMap<String, Sequence>;

pub fn read_genome<B: io::BufRead>(reader: fasta::Reader<B>) -> Result<Genome> {
    let mut genome = Genome::new();
    for r in reader.records() {
        let record = r?;
        genome.insert(record.id().to_owned(), Sequence::new(record.seq().to_vec()));
    }
    Ok(genome)
}

/// Construct loci from the CDS features of a GFF reader.
///
/// Features are keyed by `locus_tag`; only the first CDS of a tag is kept.
/// GFF coordinates are 1-based, closed. Convert the coordinates to 0-based, half-open.
pub fn read_loci<R: io::Read>(reader: &mut gff::Reader<R>) -> Result<Loci> {
    let mut loci = Loci::new();

    for r in reader.records() {
        let record = r?;
        if record.feature_type() != "CDS" {
            continue;
        }
        let attrs = record.attributes();
        let tag = match attrs.get("locus_tag") {
            Some(tag) => tag.clone(),
            None => continue,
        };
        if loci.contains_key(&tag) {
            continue;
        }
        let name = attrs.get("gene")
            .or_else(|| attrs.get("Name"))
            .cloned()
            .unwrap_or_else(|| tag.clone());
        let cds = Region { start: record.start().saturating_sub(1), end: *record.end() };
        if cds.is_empty() {
            debug!("skipping {}: empty or inverted CDS {}..{}", tag, record.start(), record.end());
            continue;
        }
        let strand = match record.strand() {
            Some(Strand::Reverse) => Strand::Reverse,
            _ => Strand::Forward,
        };
        loci.insert(tag.clone(), Locus {
            tag,
            name,
            chrom: record.seqname().to_owned(),
            cds,
            strand,
        });
    }

    Ok(loci)
}

/// Tags of the `fraction` most abundant loci, most abundant first.
///
/// At least one tag is kept from a non-empty list.
pub fn top_tags(mut records: Vec<abundance::Record>, fraction: f64) -> Vec<String> {
    records.sort_by(|a, b| b.abundance.partial_cmp(&a.abundance).unwrap_or(Ordering::Equal));
    let n = ((records.len() as f64 * fraction) as usize).max(1).min(records.len());
    records.into_iter().take(n).map(|r| r.tag).collect()
}

/// Assemble donors for `tags`, in order, skipping tags without a usable locus.
pub fn build_pool(genome: &Genome, loci: &Loci, tags: &[String], config: &RbsConfig) -> Vec<RbsOption> {
    let mut pool = Vec::new();
    for tag in tags {
        let locus = match loci.get(tag) {
            Some(locus) => locus,
            None => continue,
        };
        let contig = match genome.get(&locus.chrom) {
            Some(contig) => contig,
            None => {
                debug!("skipping {}: no sequence for {}", tag, locus.chrom);
                continue;
            },
        };
        let cds = contig.extract(&locus.cds, locus.strand);
        let utr = contig.upstream(&locus.cds, locus.strand, config.utr_len);
        if let (Some(cds), Some(utr)) = (cds, utr) {
            match RbsOption::new(utr, cds, locus.name.clone(), config.prefix_len) {
                Ok(option) => pool.push(option),
                Err(e) => debug!("skipping {}: {}", tag, e),
            }
        } else {
            debug!("skipping {}: region out of bounds", tag);
        }
    }
    pool
}

/// Load the donor pool from FASTA, GFF3 and abundance files.
pub fn load_pool<P, Q, S>(fasta_path: P, gff_path: Q, abundance_path: S, config: &RbsConfig) -> Result<Vec<RbsOption>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    S: AsRef<Path>,
{
    let genome = read_genome(fasta::Reader::new(File::open(fasta_path)?))?;
    let mut gff = gff::Reader::new(File::open(gff_path)?, gff::GffType::GFF3);
    let loci = read_loci(&mut gff)?;

    let records = abundance::Reader::from_file(abundance_path)?
        .records()
        .collect::<Result<Vec<_>>>()?;
    let n_records = records.len();
    let tags = top_tags(records, config.top_fraction);

    let pool = build_pool(&genome, &loci, &tags, config);
    info!(
        "RBS pool: {} donors from {} abundant of {} loci ({} annotated, {} contigs)",
        pool.len(), tags.len(), n_records, loci.len(), genome.len()
    );
    Ok(pool)
}
