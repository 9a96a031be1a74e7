pub use linked_hash_map::LinkedHashMap;
pub use bio_types::strand::Strand;

pub type Pos = u64;

/// Annotated protein-coding locus.
/// All positions are 0-based.
#[derive(Debug, Clone)]
pub struct Locus {
    /// Locus tag, the key shared with abundance tables
    pub tag: String,
    /// Gene name (falls back to the locus tag when unnamed)
    pub name: String,
    /// Chromosome or contig name
    pub chrom: String,
    /// Coding region of the locus
    pub cds: Region,
    /// Genomic strand
    pub strand: Strand,
}

/// Region.
/// All positions are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Genomic start position
    pub start: Pos,
    /// Genomic end position (exclusive)
    pub end: Pos,
}

impl Region {
    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Loci keyed by locus tag, in annotation order.
pub type Loci = LinkedHashMap<String, Locus>;
