use std::fs;
use std::io;
use std::path::Path;

use csv;

use crate::error::{Error, Result};
use crate::usage::CodonUsage;

/// A codon usage table reader.
///
/// Records are tab-delimited: codon, amino acid, frequency, and any number of
/// extra fields (such as usage per thousand), which are ignored.
pub struct Reader<R: io::Read> {
    inner: csv::Reader<R>,
}

impl Reader<fs::File> {
    /// Read from a given file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        fs::File::open(path).map(Reader::new)
    }
}

impl<R: io::Read> Reader<R> {
    /// Read from a given reader.
    pub fn new(reader: R) -> Self {
        Reader {
            inner: super::tsv_reader(reader),
        }
    }

    /// Iterate over records.
    pub fn records(&mut self) -> Records<R> {
        Records { inner: self.inner.records() }
    }

    /// Collect all records, stopping at the first problematic one.
    pub fn entries(&mut self) -> Result<Vec<CodonUsage>> {
        self.records().collect()
    }
}

pub struct Records<'r, R: 'r + io::Read> {
    inner: csv::StringRecordsIter<'r, R>,
}

impl<'r, R: io::Read> Iterator for Records<'r, R> {
    type Item = Result<CodonUsage>;

    fn next(&mut self) -> Option<Result<CodonUsage>> {
        self.inner.next().map(|res| {
            let record = res?;
            let codon = record.get(0)
                .ok_or_else(|| Error::MissingField("codon".to_owned()))?
                .to_ascii_uppercase();
            let codon = match codon.as_bytes() {
                &[a, b, c] => [a, b, c],
                _ => return Err(Error::InvalidSequence(format!("not a codon: {}", codon))),
            };
            let amino_acid = record.get(1)
                .and_then(|x| x.bytes().next())
                .ok_or_else(|| Error::MissingField("amino acid".to_owned()))?
                .to_ascii_uppercase();
            let frequency = record.get(2)
                .ok_or_else(|| Error::MissingField("frequency".to_owned()))?
                .parse::<f64>()?;
            Ok(CodonUsage { codon, amino_acid, frequency })
        })
    }
}
