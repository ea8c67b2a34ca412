use std::io::{BufRead, Write};

use anyhow::Result;
use log::warn;

use crate::barcode::cigar::{self, Cigar};
use crate::errors::LintagError;
use crate::fileformat::{AlignmentRecord, BarcodeRow};

///////////////////////////////
/// Where one barcode sits on the reference, and how long it should be.
/// Shared read-only across all records of a pass
#[derive(Debug, Clone, Copy)]
pub struct BarcodeWindow {
    pub ref_start: i64,
    pub length: usize,
}
impl BarcodeWindow {
    pub fn new(ref_start: i64, length: usize) -> BarcodeWindow {
        BarcodeWindow { ref_start, length }
    }

    /// Start/end of this window in read coordinates, before any CIGAR
    /// adjustment, for a read whose alignment begins at `pos` (1-based)
    fn in_read(&self, pos: i64) -> (i64, i64) {
        let start = self.ref_start - pos;
        (start, start + self.length as i64)
    }
}

///////////////////////////////
/// Counters for one extraction pass, handed back to the caller for the
/// final report
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractStats {
    pub unaligned: u64,
    pub wrong_size: u64,
    pub correct_size: u64,
    pub malformed: u64,
    pub unsupported: u64,
}

/// What came out of a single aligned record
#[derive(Debug, PartialEq, Eq)]
pub struct ExtractedBarcodes {
    pub row: BarcodeRow,
    pub bc1_size_ok: bool,
    pub bc2_size_ok: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Extraction {
    Unaligned,
    Barcodes(ExtractedBarcodes),
}

/// Slice [from, to) out of a read, clamped. A negative start or a start
/// at or past the end gives the empty string; an end past the end is
/// truncated. Indel-heavy alignments produce such windows routinely
pub fn slice_window(text: &str, from: i64, to: i64) -> &str {
    let len = text.len() as i64;
    if from < 0 || from >= len {
        return "";
    }
    let to = to.clamp(from, len);
    &text[from as usize..to as usize]
}

///////////////////////////////
/// Pull both barcodes out of one alignment record
pub fn extract_record(
    record: &AlignmentRecord,
    bc1: &BarcodeWindow,
    bc2: &BarcodeWindow,
) -> Result<Extraction, LintagError> {
    let ops = match Cigar::parse(&record.cigar)? {
        Cigar::Unaligned => return Ok(Extraction::Unaligned),
        Cigar::Aligned(ops) => ops,
    };

    let (bc1_start, bc1_end) = bc1.in_read(record.pos);
    let (bc2_start, bc2_end) = bc2.in_read(record.pos);
    let mut bounds = [bc1_start, bc1_end, bc2_start, bc2_end];
    cigar::project_boundaries(&ops, &mut bounds);

    let bc1_seq = slice_window(&record.sequence, bounds[0], bounds[1]);
    let bc1_qual = slice_window(&record.quality, bounds[0], bounds[1]);
    let bc2_seq = slice_window(&record.sequence, bounds[2], bounds[3]);
    let bc2_qual = slice_window(&record.quality, bounds[2], bounds[3]);

    Ok(Extraction::Barcodes(ExtractedBarcodes {
        bc1_size_ok: bc1_seq.len() == bc1.length,
        bc2_size_ok: bc2_seq.len() == bc2.length,
        row: BarcodeRow {
            read_id: record.read_id.clone(),
            bc1_seq: bc1_seq.to_string(),
            bc1_qual: bc1_qual.to_string(),
            bc2_seq: bc2_seq.to_string(),
            bc2_qual: bc2_qual.to_string(),
        },
    }))
}

///////////////////////////////
/// One pass over an alignment file: tokenize, map windows through the
/// CIGAR, slice, classify, write. Wrong-sized barcodes are still written;
/// the size check only feeds the counters
pub fn run_extraction<R: BufRead, W: Write>(
    input: R,
    out: &mut csv::Writer<W>,
    bc1: &BarcodeWindow,
    bc2: &BarcodeWindow,
) -> Result<ExtractStats> {
    let mut stats = ExtractStats::default();

    for (i, line) in input.lines().enumerate() {
        let line = line?;
        let line_no = i as u64 + 1;

        // header section of the alignment file
        if line.starts_with('@') {
            continue;
        }
        if line.is_empty() {
            continue;
        }

        let record = match AlignmentRecord::parse(&line, line_no) {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping record: {}", e);
                stats.malformed += 1;
                continue;
            }
        };

        match extract_record(&record, bc1, bc2) {
            Ok(Extraction::Unaligned) => {
                stats.unaligned += 1;
            }
            Ok(Extraction::Barcodes(found)) => {
                if found.bc1_size_ok && found.bc2_size_ok {
                    stats.correct_size += 1;
                } else {
                    stats.wrong_size += 1;
                }
                out.serialize(&found.row)?;
            }
            Err(e @ LintagError::UnsupportedCigarOp { .. }) => {
                warn!("Skipping read '{}' at line {}: {}", record.read_id, line_no, e);
                stats.unsupported += 1;
            }
            Err(e) => {
                warn!("Skipping record at line {}: {}", line_no, e);
                stats.malformed += 1;
            }
        }
    }

    out.flush()?;
    Ok(stats)
}
