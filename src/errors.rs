use thiserror::Error;

/// Failure conditions that the pipeline stages need to tell apart.
/// Anything else (plain I/O, CSV framing) travels as anyhow context.
#[derive(Error, Debug)]
pub enum LintagError {
    #[error("Malformed record{}: {}", LintagError::format_line(.line), .msg)]
    MalformedRecord { msg: String, line: Option<u64> },

    #[error("CIGAR operation '{op}' is not supported (only M, I and D are handled)")]
    UnsupportedCigarOp { op: char },

    #[error(
        "Read stream ended while still looking for read '{read_id}'. \
         The barcode table and the FASTQ file are out of sync, or not derived from the same run."
    )]
    StreamDesync { read_id: String },

    #[error(
        "Read of length {read_len} cannot hold two non-overlapping UMIs of length {umi_length}"
    )]
    UmiWindowOverlap { read_len: usize, umi_length: usize },
}

impl LintagError {
    pub fn malformed<M: Into<String>>(msg: M, line: Option<u64>) -> Self {
        LintagError::MalformedRecord {
            msg: msg.into(),
            line,
        }
    }

    fn format_line(line: &Option<u64>) -> String {
        match line {
            Some(n) => format!(" at line {}", n),
            None => String::new(),
        }
    }
}
