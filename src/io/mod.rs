//! 序列读取（FASTA / FASTQ 自动识别）与结果输出（BED 风格文本）。

pub mod bed;
pub mod fasta;
pub mod fastq;

use anyhow::{bail, Context, Result};
use std::io::{BufRead, BufReader};

pub use fasta::FastaReader;
pub use fastq::FastqReader;

/// 一条线性化后的序列，已大写归一化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    pub header: String,
    pub seq: Vec<u8>,
}

pub trait RecordSource {
    fn next_record(&mut self) -> Result<Option<SeqRecord>>;
}

/// 按首个非空白字符选择解析器：'>' 为 FASTA，'@' 为 FASTQ。空输入按 FASTA 处理。
pub fn detect_reader<R: BufRead + 'static>(mut reader: R) -> Result<Box<dyn RecordSource>> {
    let first = loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            break None;
        }
        match buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(i) => {
                let first = buf[i];
                reader.consume(i);
                break Some(first);
            }
            None => {
                let n = buf.len();
                reader.consume(n);
            }
        }
    };
    match first {
        Some(b'>') | None => Ok(Box::new(FastaReader::new(reader))),
        Some(b'@') => Ok(Box::new(FastqReader::new(reader))),
        Some(other) => bail!("unrecognised sequence format (first character '{}')", other as char),
    }
}

/// 打开序列文件，"-" 表示标准输入。
pub fn open_reader(path: &str) -> Result<Box<dyn RecordSource>> {
    if path == "-" {
        return detect_reader(BufReader::new(std::io::stdin()));
    }
    let fh = std::fs::File::open(path).with_context(|| format!("cannot open sequence file '{}'", path))?;
    detect_reader(BufReader::new(fh)).with_context(|| format!("cannot read '{}'", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn detects_fasta_and_fastq() {
        let mut r = detect_reader(Cursor::new(b"\n  >chr1\nACGT\n".to_vec())).unwrap();
        assert_eq!(r.next_record().unwrap().unwrap().header, "chr1");

        let mut r = detect_reader(Cursor::new(b"@read\nACGT\n+\nIIII\n".to_vec())).unwrap();
        assert_eq!(r.next_record().unwrap().unwrap().seq, b"ACGT");

        let mut r = detect_reader(Cursor::new(b"\n\t@read\nACGT\n+\nIIII\n".to_vec())).unwrap();
        assert_eq!(r.next_record().unwrap().unwrap().header, "read");

        let mut r = detect_reader(Cursor::new(Vec::new())).unwrap();
        assert!(r.next_record().unwrap().is_none());

        assert!(detect_reader(Cursor::new(b"ACGT\n".to_vec())).is_err());
    }

    #[test]
    fn leading_whitespace_keeps_all_records() {
        let mut r = detect_reader(Cursor::new(b"  \n >chr1\nTTAGGG\n>chr2\nCCCTAA\n".to_vec())).unwrap();
        let mut headers = Vec::new();
        while let Some(rec) = r.next_record().unwrap() {
            headers.push(rec.header);
        }
        assert_eq!(headers, vec!["chr1", "chr2"]);
    }
}
