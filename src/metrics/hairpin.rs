use std::fmt;

use crate::error::Result;
use crate::seq::{self, Nucleotide};

/// Hairpin placement on a sequence; all positions are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hairpin {
    /// Start of the 5' stem
    pub start: usize,
    /// Start of the 3' stem; the loop spans `start + stem .. stem2`
    pub stem2: usize,
    /// Stem length
    pub stem: usize,
}

impl Hairpin {
    #[inline]
    pub fn loop_start(&self) -> usize {
        self.start + self.stem
    }

    #[inline]
    pub fn loop_len(&self) -> usize {
        self.stem2 - (self.start + self.stem)
    }

    /// End of the 3' stem (exclusive).
    #[inline]
    pub fn end(&self) -> usize {
        self.stem2 + self.stem
    }

    /// Render as `stem(loop)stem` over the sequence it was found on.
    pub fn render(&self, seq: &[Nucleotide]) -> String {
        let s = |a: usize, b: usize| String::from_utf8_lossy(&seq[a..b]).into_owned();
        format!(
            "{}({}){}",
            s(self.start, self.start + self.stem),
            s(self.start + self.stem, self.stem2),
            s(self.stem2, self.end())
        )
    }
}

impl fmt::Display for Hairpin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}..{} (loop {})", self.start, self.end(), self.loop_len())
    }
}

/// Visit every hairpin in `seq`.
///
/// The reverse complement of the whole sequence is computed once; the reverse
/// complement of the k-mer at `j` is then the slice `rc[n-j-k .. n-j]`, so the
/// search costs O(L * (max_loop - min_loop)) stem comparisons.
fn scan<F>(seq: &[Nucleotide], min_stem: usize, min_loop: usize, max_loop: usize, mut visit: F) -> Result<()>
where
    F: FnMut(Hairpin),
{
    seq::validate_dna(seq)?;

    let n = seq.len();
    let k = min_stem;
    if k == 0 || max_loop < min_loop || n < 2 * k + min_loop {
        return Ok(());
    }

    let rc = seq::reverse_complemented(seq);

    for i in 0 ..= (n - 2 * k - min_loop) {
        let stem1 = &seq[i .. i + k];
        let first = i + k + min_loop;
        let last = (i + k + max_loop).min(n - k);
        for j in first ..= last {
            if stem1 == &rc[n - j - k .. n - j] {
                visit(Hairpin { start: i, stem2: j, stem: k });
            }
        }
    }

    Ok(())
}

/// Count hairpins in `seq`: pairs of `min_stem` long stems, the second the
/// reverse complement of the first, around a loop of `min_loop ..= max_loop`.
pub fn hairpin_count(seq: &[Nucleotide], min_stem: usize, min_loop: usize, max_loop: usize) -> Result<usize> {
    let mut count = 0;
    scan(seq, min_stem, min_loop, max_loop, |_| count += 1)?;
    Ok(count)
}

/// List hairpins in `seq`, ordered by 5' stem then 3' stem position.
pub fn hairpin_sites(seq: &[Nucleotide], min_stem: usize, min_loop: usize, max_loop: usize) -> Result<Vec<Hairpin>> {
    let mut sites = Vec::new();
    scan(seq, min_stem, min_loop, max_loop, |h| sites.push(h))?;
    Ok(sites)
}
