use crate::error::{Error, Result};
use crate::seq::{self, DnaSeq, Nucleotide};

/// Sequence that must not occur on either strand of a design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForbiddenSite {
    pub name: String,
    pub site: DnaSeq,
}

/// Two-box bacterial promoter, matched with a mismatch budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoterMotif {
    pub name: String,
    /// -35 box
    pub minus35: DnaSeq,
    /// -10 box
    pub minus10: DnaSeq,
    pub min_spacer: usize,
    pub max_spacer: usize,
    /// Mismatches tolerated over both boxes combined
    pub max_mismatches: usize,
}

impl PromoterMotif {
    /// Longest placement of the motif.
    pub fn max_span(&self) -> usize {
        self.minus35.len() + self.max_spacer + self.minus10.len()
    }
}

/// Motif occurrence in forward-strand coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotifHit<'m> {
    pub name: &'m str,
    pub start: usize,
    pub end: usize,
    pub forward: bool,
}

/// Reference motif sets, loaded once and shared by every design run.
#[derive(Debug, Clone)]
pub struct ReferenceMotifs {
    forbidden: Vec<ForbiddenSite>,
    promoters: Vec<PromoterMotif>,
}

impl ReferenceMotifs {
    pub fn new(forbidden: Vec<ForbiddenSite>, promoters: Vec<PromoterMotif>) -> Result<ReferenceMotifs> {
        for f in forbidden.iter() {
            seq::validate_dna(&f.site)
                .map_err(|e| Error::InvalidConfig(format!("forbidden site {}: {}", f.name, e)))?;
        }
        for p in promoters.iter() {
            seq::validate_dna(&p.minus35)
                .and_then(|_| seq::validate_dna(&p.minus10))
                .map_err(|e| Error::InvalidConfig(format!("promoter {}: {}", p.name, e)))?;
            if p.min_spacer > p.max_spacer {
                return Err(Error::InvalidConfig(format!(
                    "promoter {}: spacer range {}..{} is empty", p.name, p.min_spacer, p.max_spacer
                )));
            }
        }
        Ok(ReferenceMotifs { forbidden, promoters })
    }

    pub fn forbidden(&self) -> &[ForbiddenSite] {
        &self.forbidden
    }

    pub fn promoters(&self) -> &[PromoterMotif] {
        &self.promoters
    }

    /// Length of the longest forbidden site.
    pub fn max_forbidden_len(&self) -> usize {
        self.forbidden.iter().map(|f| f.site.len()).max().unwrap_or(0)
    }

    /// Span of the longest promoter placement.
    pub fn max_promoter_span(&self) -> usize {
        self.promoters.iter().map(|p| p.max_span()).max().unwrap_or(0)
    }
}

impl Default for ReferenceMotifs {
    /// Homopolymer and dinucleotide repeats, common cloning sites, and the
    /// sigma-70 consensus promoter.
    fn default() -> ReferenceMotifs {
        let sites = [
            ("poly-A", "AAAAAAAA"),
            ("poly-T", "TTTTTTTT"),
            ("poly-C", "CCCCCCCC"),
            ("poly-G", "GGGGGGGG"),
            ("AT-repeat", "ATATATAT"),
            ("EcoRI", "GAATTC"),
            ("BamHI", "GGATCC"),
            ("BglII", "AGATCT"),
            ("XbaI", "TCTAGA"),
            ("SpeI", "ACTAGT"),
            ("PstI", "CTGCAG"),
            ("XhoI", "CTCGAG"),
            ("NotI", "GCGGCCGC"),
            ("HindIII", "AAGCTT"),
            ("MfeI", "CAATTG"),
            ("BsaI", "GGTCTC"),
            ("BsmBI", "CGTCTC"),
            ("BspMI", "CACCTGC"),
        ];
        let forbidden = sites.iter()
            .map(|&(name, site)| ForbiddenSite { name: name.to_owned(), site: site.as_bytes().to_vec() })
            .collect();
        let promoters = vec![PromoterMotif {
            name: String::from("sigma70"),
            minus35: b"TTGACA".to_vec(),
            minus10: b"TATAAT".to_vec(),
            min_spacer: 16,
            max_spacer: 18,
            max_mismatches: 2,
        }];
        ReferenceMotifs { forbidden, promoters }
    }
}

#[inline]
fn mismatches(a: &[Nucleotide], b: &[Nucleotide]) -> usize {
    a.iter().zip(b.iter()).filter(|(x, y)| x != y).count()
}

/// Start positions of exact occurrences of `pat` in `x` (overlapping).
fn find_all(x: &[Nucleotide], pat: &[Nucleotide]) -> Vec<usize> {
    if pat.is_empty() || pat.len() > x.len() {
        return Vec::new();
    }
    x.windows(pat.len())
        .enumerate()
        .filter(|&(_, w)| w == pat)
        .map(|(i, _)| i)
        .collect()
}

/// Forbidden-site occurrences on both strands, sorted by start.
pub fn forbidden_site_hits<'m>(x: &[Nucleotide], motifs: &'m ReferenceMotifs) -> Result<Vec<MotifHit<'m>>> {
    seq::validate_dna(x)?;

    let mut hits = Vec::new();
    for f in motifs.forbidden.iter() {
        let k = f.site.len();
        for i in find_all(x, &f.site) {
            hits.push(MotifHit { name: &f.name, start: i, end: i + k, forward: true });
        }
        let rc = seq::reverse_complemented(&f.site);
        if rc != f.site {
            for i in find_all(x, &rc) {
                hits.push(MotifHit { name: &f.name, start: i, end: i + k, forward: false });
            }
        }
    }
    hits.sort_by_key(|h| (h.start, h.end));
    Ok(hits)
}

/// Placements of a promoter on one strand: (start, end) in that strand's coordinates.
fn promoter_placements(x: &[Nucleotide], p: &PromoterMotif) -> Vec<(usize, usize)> {
    let a = p.minus35.len();
    let b = p.minus10.len();
    let mut found = Vec::new();
    for spacer in p.min_spacer ..= p.max_spacer {
        let span = a + spacer + b;
        if span > x.len() {
            break;
        }
        for i in 0 ..= (x.len() - span) {
            let m35 = mismatches(&x[i .. i + a], &p.minus35);
            if m35 > p.max_mismatches {
                continue;
            }
            let j = i + a + spacer;
            if m35 + mismatches(&x[j .. j + b], &p.minus10) <= p.max_mismatches {
                found.push((i, i + span));
            }
        }
    }
    found
}

/// Internal promoter placements on both strands, sorted by start.
pub fn promoter_hits<'m>(x: &[Nucleotide], motifs: &'m ReferenceMotifs) -> Result<Vec<MotifHit<'m>>> {
    seq::validate_dna(x)?;

    let n = x.len();
    let rc = seq::reverse_complemented(x);
    let mut hits = Vec::new();
    for p in motifs.promoters.iter() {
        for (start, end) in promoter_placements(x, p) {
            hits.push(MotifHit { name: &p.name, start, end, forward: true });
        }
        for (start, end) in promoter_placements(&rc, p) {
            hits.push(MotifHit { name: &p.name, start: n - end, end: n - start, forward: false });
        }
    }
    hits.sort_by_key(|h| (h.start, h.end));
    Ok(hits)
}
