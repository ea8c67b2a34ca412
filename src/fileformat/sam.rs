use crate::errors::LintagError;

// Column layout of the SAM fields we consume. Everything else on the
// line (flags, mapq, mate information, optional tags) is carried along
// by the aligner but never used here.
const COL_ID: usize = 0;
const COL_POS: usize = 3;
const COL_CIGAR: usize = 5;
const COL_SEQ: usize = 9;
const COL_QUAL: usize = 10;
const MIN_FIELDS: usize = 11;

///////////////////////////////
/// The slice of one SAM line that barcode extraction needs: who the
/// read is, where it landed on the reference, how it aligned, and the
/// bases with their qualities. Built per line and dropped after use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    pub read_id: String,
    /// 1-based leftmost reference position, as written by the aligner
    pub pos: i64,
    pub cigar: String,
    pub sequence: String,
    pub quality: String,
}

impl AlignmentRecord {
    /// Tokenize one alignment line. A line with too few columns is
    /// rejected outright; partial records must never leak stale fields
    /// from an earlier line into the output.
    pub fn parse(line: &str, line_no: u64) -> Result<AlignmentRecord, LintagError> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < MIN_FIELDS {
            return Err(LintagError::malformed(
                format!("expected at least {} fields, found {}", MIN_FIELDS, fields.len()),
                Some(line_no),
            ));
        }

        let pos: i64 = fields[COL_POS].parse().map_err(|_| {
            LintagError::malformed(
                format!("alignment position '{}' is not an integer", fields[COL_POS]),
                Some(line_no),
            )
        })?;

        let sequence = fields[COL_SEQ].to_string();
        let quality = fields[COL_QUAL].to_string();
        if sequence.len() != quality.len() {
            return Err(LintagError::malformed(
                format!(
                    "sequence length {} does not match quality length {}",
                    sequence.len(),
                    quality.len()
                ),
                Some(line_no),
            ));
        }

        Ok(AlignmentRecord {
            read_id: fields[COL_ID].to_string(),
            pos,
            cigar: fields[COL_CIGAR].to_string(),
            sequence,
            quality,
        })
    }
}
