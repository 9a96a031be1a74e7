use crate::gene::{Region, Strand};
use crate::seq::{self, DnaSeq, Nucleotide};

/// Contiguous genomic sequence.
pub struct Sequence {
    pub inner: DnaSeq,
}

impl Sequence {
    pub fn new(inner: DnaSeq) -> Sequence {
        Sequence { inner: inner.to_ascii_uppercase() }
    }

    /// Extract the coding region, reverse complemented for loci on the minus strand.
    /// Returns `None` if the region does not fit in the sequence.
    pub fn extract(&self, region: &Region, strand: Strand) -> Option<DnaSeq> {
        let n = self.inner.len() as u64;
        if region.is_empty() || region.end > n {
            return None;
        }
        let mut x = self.inner[region.start as usize .. region.end as usize].to_vec();
        if strand == Strand::Reverse {
            seq::reverse_complement(&mut x);
        }
        Some(x)
    }

    /// Extract up to `len` nucleotides immediately 5' of the coding region,
    /// oriented along the transcript. Truncated at contig ends.
    pub fn upstream(&self, region: &Region, strand: Strand, len: u64) -> Option<DnaSeq> {
        let n = self.inner.len() as u64;
        if region.is_empty() || region.end > n {
            return None;
        }
        let x: &[Nucleotide] = match strand {
            Strand::Reverse => {
                let end = (region.end + len).min(n);
                &self.inner[region.end as usize .. end as usize]
            },
            _ => {
                let start = region.start.saturating_sub(len);
                &self.inner[start as usize .. region.start as usize]
            },
        };
        let mut x = x.to_vec();
        if strand == Strand::Reverse {
            seq::reverse_complement(&mut x);
        }
        Some(x)
    }
}
