use anyhow::{bail, Context, Result};
use std::io::BufRead;

/// FASTA 记录。序列去掉了空白和换行，大小写保持原样（规范化交给调用方）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
}

/// 逐条读取 FASTA。
/// - 以 `;` 开头的行视为注释。
/// - 第一个 `>` 之前出现非空数据行时报错，附带行号。
pub struct FastaReader<R: BufRead> {
    reader: R,
    line: String,
    line_no: usize,
    pending: Option<String>,
    eof: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: String::new(), line_no: 0, pending: None, eof: false }
    }

    /// 读一行到 self.line；到达文件尾返回 false
    fn advance(&mut self) -> Result<bool> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            self.eof = true;
            return Ok(false);
        }
        self.line_no += 1;
        Ok(true)
    }

    fn first_header(&mut self) -> Result<Option<String>> {
        while self.advance()? {
            let t = self.line.trim();
            if let Some(h) = t.strip_prefix('>') {
                return Ok(Some(h.trim().to_string()));
            }
            if !t.is_empty() && !t.starts_with(';') {
                bail!("line {}: sequence data before the first '>' header", self.line_no);
            }
        }
        Ok(None)
    }

    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        let header = match self.pending.take() {
            Some(h) => h,
            None if self.eof => return Ok(None),
            None => match self.first_header()? {
                Some(h) => h,
                None => return Ok(None),
            },
        };

        let (id, desc) = match header.split_once(char::is_whitespace) {
            Some((id, rest)) => (id.to_string(), Some(rest.trim().to_string()).filter(|s| !s.is_empty())),
            None => (header.clone(), None),
        };

        let mut seq = Vec::new();
        while self.advance()? {
            if let Some(h) = self.line.strip_prefix('>') {
                self.pending = Some(h.trim().to_string());
                break;
            }
            if self.line.starts_with(';') {
                continue;
            }
            seq.extend(self.line.bytes().filter(|b| !b.is_ascii_whitespace()));
        }

        Ok(Some(FastaRecord { id, desc, seq }))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// 读取整个 FASTA 文件。
pub fn read_fasta(path: &str) -> Result<Vec<FastaRecord>> {
    let fh = std::fs::File::open(path).with_context(|| format!("cannot open FASTA '{}'", path))?;
    FastaReader::new(std::io::BufReader::new(fh))
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("malformed FASTA '{}'", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_simple_fasta() {
        let data = b">chr1 first\nACgTNN\n>chr2\nAAA\n";
        let mut r = FastaReader::new(Cursor::new(&data[..]));

        let r1 = r.next_record().unwrap().unwrap();
        assert_eq!(r1.id, "chr1");
        assert_eq!(r1.desc.as_deref(), Some("first"));
        assert_eq!(r1.seq, b"ACgTNN");

        let r2 = r.next_record().unwrap().unwrap();
        assert_eq!(r2.id, "chr2");
        assert_eq!(r2.desc, None);
        assert_eq!(r2.seq, b"AAA");

        assert!(r.next_record().unwrap().is_none());
    }

    #[test]
    fn parse_fasta_with_crlf_whitespace_and_comments() {
        let data = b"; comment\r\n>chr1 desc\r\nAC G T\r\n;skip me\r\n acgt\r\n>chr2 \r\n N N N \r\n";
        let records: Vec<FastaRecord> = FastaReader::new(Cursor::new(&data[..])).collect::<Result<_>>().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "chr1");
        assert_eq!(records[0].desc.as_deref(), Some("desc"));
        assert_eq!(records[0].seq, b"ACGTacgt");
        assert_eq!(records[1].id, "chr2");
        assert_eq!(records[1].desc, None);
        assert_eq!(records[1].seq, b"NNN");
    }

    #[test]
    fn data_before_header_is_an_error() {
        let data = b"\n\nACGT\n>chr1\nACGT\n";
        let mut r = FastaReader::new(Cursor::new(&data[..]));
        let err = r.next_record().unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn empty_record_is_kept() {
        let data = b">empty\n>full\nAC\n";
        let records: Vec<FastaRecord> = FastaReader::new(Cursor::new(&data[..])).collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].seq.is_empty());
        assert_eq!(records[1].seq, b"AC");
    }

    #[test]
    fn read_fasta_from_file() {
        let path = std::env::temp_dir().join(format!("bwt-rust-fasta-{}.fa", std::process::id()));
        std::fs::write(&path, b">seq1 demo\nGATT\nACA\n>seq2\nACGT\n").unwrap();
        let records = read_fasta(&path.to_string_lossy()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "seq1");
        assert_eq!(records[0].seq, b"GATTACA");
        assert_eq!(records[1].seq, b"ACGT");
    }

    #[test]
    fn read_fasta_missing_file_has_context() {
        let err = read_fasta("/nonexistent/bwt-rust.fa").unwrap_err();
        assert!(err.to_string().contains("cannot open FASTA"));
    }
}
