use std::io;

pub mod abundance;
pub mod codon_usage;

/// Tab-delimited reader without headers; `#` lines are comments, fields are
/// trimmed and records may carry extra fields.
fn tsv_reader<R: io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tsv_reader() {
        let data: &[u8] = b"# comment\nATG\tM\t1.00\nb0001 \t 12.5\n";
        let records: Vec<csv::StringRecord> = tsv_reader(data).records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].len(), 3);
        assert_eq!(&records[1][0], "b0001");
        assert_eq!(&records[1][1], "12.5");
    }
}
