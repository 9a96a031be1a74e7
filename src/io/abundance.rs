use std::fs;
use std::io;
use std::path::Path;

use csv;

use crate::error::{Error, Result};

/// A locus abundance reader.
///
/// Each record carries a locus tag and an abundance in its last two
/// tab-delimited fields; a leading numeric taxon prefix (`511145.b0001`)
/// is stripped from the tag.
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
}

pub struct Records<'r, R: 'r + io::Read> {
    inner: csv::StringRecordsIter<'r, R>,
}

/// A locus abundance record.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub tag: String,
    pub abundance: f64,
}

impl<'r, R: io::Read> Iterator for Records<'r, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Result<Record>> {
        self.inner.next().map(|res| {
            let record = res?;
            let n = record.len();
            if n < 2 {
                return Err(Error::MissingField("abundance".to_owned()));
            }
            let tag = record.get(n - 2)
                .map(strip_taxon)
                .ok_or_else(|| Error::MissingField("tag".to_owned()))?;
            let abundance = record.get(n - 1)
                .ok_or_else(|| Error::MissingField("abundance".to_owned()))?
                .parse::<f64>()?;
            Ok(Record { tag, abundance })
        })
    }
}

fn strip_taxon(tag: &str) -> String {
    match tag.find('.') {
        Some(i) if i > 0 && tag[..i].bytes().all(|x| x.is_ascii_digit()) => {
            tag[i + 1 ..].to_owned()
        },
        _ => tag.to_owned(),
    }
}
