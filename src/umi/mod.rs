use std::io::{Read, Write};

use anyhow::Result;
use seq_io::fastq::{Reader as FastqReader, Record};

use crate::errors::LintagError;
use crate::fileformat::{BarcodeRow, CombinedRow};

///////////////////////////////
/// The two UMIs flanking a read, with their qualities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UmiPair {
    pub fwd: String,
    pub fwd_qual: String,
    pub rev: String,
    pub rev_qual: String,
}

/// Slice the forward UMI off the head of the read and the reverse UMI
/// off its tail. The two windows must not overlap, so the read has to
/// hold at least two UMI lengths
pub fn slice_umis(seq: &[u8], qual: &[u8], umi_length: usize) -> Result<UmiPair, LintagError> {
    if seq.len() < 2 * umi_length {
        return Err(LintagError::UmiWindowOverlap {
            read_len: seq.len(),
            umi_length,
        });
    }
    if qual.len() != seq.len() {
        return Err(LintagError::malformed(
            format!(
                "read of length {} has quality of length {}",
                seq.len(),
                qual.len()
            ),
            None,
        ));
    }

    let rev_start = seq.len() - umi_length;
    Ok(UmiPair {
        fwd: String::from_utf8_lossy(&seq[..umi_length]).into_owned(),
        fwd_qual: String::from_utf8_lossy(&qual[..umi_length]).into_owned(),
        rev: String::from_utf8_lossy(&seq[rev_start..]).into_owned(),
        rev_qual: String::from_utf8_lossy(&qual[rev_start..]).into_owned(),
    })
}

///////////////////////////////
/// Counters for one merge pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    pub combined: u64,
    pub unmatched: u64,
}

///////////////////////////////
/// Reunite extracted barcodes with the UMIs still sitting in the reads.
///
/// The barcode table holds a subsequence of the FASTQ's reads, in the
/// same order, so a single forward cursor over the FASTQ is enough: for
/// each barcode row, reads are consumed until the identifiers meet.
/// The cursor never rewinds; if the FASTQ runs dry while a barcode row
/// is still waiting, the two inputs do not belong together and the merge
/// aborts rather than spinning.
///
/// FASTQ identifiers are compared after the usual normalization: the
/// leading marker is stripped and everything from the first whitespace
/// on is ignored. Table identifiers are used verbatim.
pub fn merge_streams<R, W>(
    mut fastq: FastqReader<R>,
    rows: impl Iterator<Item = std::result::Result<BarcodeRow, csv::Error>>,
    umi_length: usize,
    out: &mut csv::Writer<W>,
) -> Result<MergeStats>
where
    R: Read,
    W: Write,
{
    let mut stats = MergeStats::default();
    // each consumed record is four lines, so record n has its header on
    // line 4(n-1)+1
    let mut records_consumed: u64 = 0;

    for row in rows {
        let row = row?;

        loop {
            let record = match fastq.next() {
                Some(record) => record?,
                None => {
                    return Err(LintagError::StreamDesync {
                        read_id: row.read_id,
                    }
                    .into())
                }
            };
            records_consumed += 1;

            if record.id()? != row.read_id {
                // not there yet, keep walking forward
                stats.unmatched += 1;
                continue;
            }

            let umis = slice_umis(record.seq(), record.qual(), umi_length)?;
            out.serialize(&CombinedRow {
                line_offset: (records_consumed - 1) * 4 + 1,
                read_id: row.read_id.clone(),
                umi_f: umis.fwd,
                bc1: row.bc1_seq.clone(),
                bc2: row.bc2_seq.clone(),
                umi_r: umis.rev,
                umi_qual_f: umis.fwd_qual,
                bc1_qual: row.bc1_qual.clone(),
                bc2_qual: row.bc2_qual.clone(),
                umi_qual_r: umis.rev_qual,
            })?;
            stats.combined += 1;
            break;
        }
    }

    out.flush()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fileformat::table::{tsv_reader, tsv_writer};

    fn fastq_of(ids: &[&str]) -> String {
        ids.iter()
            .map(|id| {
                format!(
                    "@{} run=7 lane=2\nAACCGGTTAACCGGTTAACC\n+\nFFFFFFFFFFFFFFFFFFFF\n",
                    id
                )
            })
            .collect()
    }

    fn barcode_rows(ids: &[&str]) -> String {
        ids.iter()
            .map(|id| format!("{}\tAAAA\tFFFF\tCCCC\tFFFF\n", id))
            .collect()
    }

    #[test]
    fn umis_come_off_both_ends() {
        let umis = slice_umis(b"AACCGGTTAACCGGTTAACC", b"ABCDEFGHIJKLMNOPQRST", 8).unwrap();
        assert_eq!(umis.fwd, "AACCGGTT");
        assert_eq!(umis.fwd_qual, "ABCDEFGH");
        assert_eq!(umis.rev, "GGTTAACC");
        assert_eq!(umis.rev_qual, "MNOPQRST");
    }

    #[test]
    fn short_read_cannot_hold_two_umis() {
        let err = slice_umis(b"AACCGGTTAACCGGT", b"FFFFFFFFFFFFFFF", 8).unwrap_err();
        match err {
            LintagError::UmiWindowOverlap {
                read_len,
                umi_length,
            } => {
                assert_eq!(read_len, 15);
                assert_eq!(umi_length, 8);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn merge_skips_forward_and_counts() {
        let fastq = fastq_of(&["A", "B", "C", "D"]);
        let table = barcode_rows(&["B", "D"]);

        let mut out = tsv_writer(Vec::new());
        let mut rows = tsv_reader(table.as_bytes());
        let stats = merge_streams(
            FastqReader::new(fastq.as_bytes()),
            rows.deserialize(),
            8,
            &mut out,
        )
        .unwrap();

        assert_eq!(stats.combined, 2);
        assert_eq!(stats.unmatched, 2);

        let text = String::from_utf8(out.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        // B is the second record (header on line 5), D the fourth (line 13)
        assert!(lines[0].starts_with("5\tB\tAACCGGTT\tAAAA\tCCCC\t"));
        assert!(lines[1].starts_with("13\tD\tAACCGGTT\tAAAA\tCCCC\t"));
    }

    #[test]
    fn merge_desyncs_on_missing_read() {
        let fastq = fastq_of(&["A", "B"]);
        let table = barcode_rows(&["E"]);

        let mut out = tsv_writer(Vec::new());
        let mut rows = tsv_reader(table.as_bytes());
        let err = merge_streams(
            FastqReader::new(fastq.as_bytes()),
            rows.deserialize(),
            8,
            &mut out,
        )
        .unwrap_err();

        match err.downcast_ref::<LintagError>() {
            Some(LintagError::StreamDesync { read_id }) => assert_eq!(read_id, "E"),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
