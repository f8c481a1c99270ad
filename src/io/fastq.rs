use anyhow::{anyhow, Result};
use std::io::BufRead;

use super::{RecordSource, SeqRecord};
use crate::util::dna;

/// 四行一条的 FASTQ 读取器；质量值只用于校验长度，不保留。
pub struct FastqReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    line_no: usize,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: String::new(), done: false, line_no: 0 }
    }

    fn read_line(&mut self) -> Result<bool> {
        self.buf.clear();
        let n = self.reader.read_line(&mut self.buf)?;
        self.line_no += 1;
        Ok(n > 0)
    }
}

impl<R: BufRead> RecordSource for FastqReader<R> {
    fn next_record(&mut self) -> Result<Option<SeqRecord>> {
        if self.done {
            return Ok(None);
        }

        // header, skipping blank lines between records
        loop {
            if !self.read_line()? {
                self.done = true;
                return Ok(None);
            }
            if !self.buf.trim().is_empty() {
                break;
            }
        }
        if !self.buf.starts_with('@') {
            return Err(anyhow!("line {}: FASTQ header not starting with '@'", self.line_no));
        }
        let header = self.buf[1..].split_whitespace().next().unwrap_or("").to_string();

        if !self.read_line()? {
            return Err(anyhow!("line {}: unexpected EOF after header '{}'", self.line_no, header));
        }
        let seq = dna::normalize_seq(self.buf.trim_end().as_bytes());

        if !self.read_line()? || !self.buf.starts_with('+') {
            return Err(anyhow!("line {}: missing '+' line in record '{}'", self.line_no, header));
        }

        if !self.read_line()? {
            return Err(anyhow!("line {}: missing quality line in record '{}'", self.line_no, header));
        }
        if self.buf.trim_end().len() != seq.len() {
            return Err(anyhow!("line {}: seq/qual length mismatch in record '{}'", self.line_no, header));
        }

        Ok(Some(SeqRecord { header, seq }))
    }
}
