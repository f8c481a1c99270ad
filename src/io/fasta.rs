use anyhow::Result;
use std::io::BufRead;

use super::{RecordSource, SeqRecord};
use crate::util::dna;

/// 多行 FASTA 读取器；header 取 '>' 之后第一个空白前的部分。
pub struct FastaReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    peek_header: Option<String>,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            done: false,
            peek_header: None,
        }
    }

    fn header_id(line: &str) -> String {
        line[1..]
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_string()
    }
}

impl<R: BufRead> RecordSource for FastaReader<R> {
    fn next_record(&mut self) -> Result<Option<SeqRecord>> {
        if self.done {
            return Ok(None);
        }

        // skip anything before the first header
        let header = match self.peek_header.take() {
            Some(h) => h,
            None => loop {
                self.buf.clear();
                if self.reader.read_line(&mut self.buf)? == 0 {
                    self.done = true;
                    return Ok(None);
                }
                if self.buf.starts_with('>') {
                    break Self::header_id(&self.buf);
                }
            },
        };

        let mut raw: Vec<u8> = Vec::new();
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                self.done = true;
                break;
            }
            if self.buf.starts_with('>') {
                self.peek_header = Some(Self::header_id(&self.buf));
                break;
            }
            raw.extend(self.buf.bytes().filter(|b| !b.is_ascii_whitespace()));
        }

        Ok(Some(SeqRecord { header, seq: dna::normalize_seq(&raw) }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_multiline_fasta() {
        let data = b">chr1 first\nTTAg\nggNN\n>chr2\nccctaa\n";
        let mut r = FastaReader::new(Cursor::new(&data[..]));

        let r1 = r.next_record().unwrap().unwrap();
        assert_eq!(r1.header, "chr1");
        assert_eq!(r1.seq, b"TTAGGGNN");

        let r2 = r.next_record().unwrap().unwrap();
        assert_eq!(r2.header, "chr2");
        assert_eq!(r2.seq, b"CCCTAA");

        assert!(r.next_record().unwrap().is_none());
    }

    #[test]
    fn parse_fasta_with_crlf_and_leading_lines() {
        let data = b"\n\n>scaffold_1 desc\r\nAC g t\r\n u-\r\n>empty\r\n";
        let mut r = FastaReader::new(Cursor::new(&data[..]));

        let r1 = r.next_record().unwrap().unwrap();
        assert_eq!(r1.header, "scaffold_1");
        assert_eq!(r1.seq, b"ACGTTN");

        let r2 = r.next_record().unwrap().unwrap();
        assert_eq!(r2.header, "empty");
        assert!(r2.seq.is_empty());

        assert!(r.next_record().unwrap().is_none());
    }
}
