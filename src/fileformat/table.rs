use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

///////////////////////////////
/// One row of the extracted-barcode table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeRow {
    pub read_id: String,
    pub bc1_seq: String,
    pub bc1_qual: String,
    pub bc2_seq: String,
    pub bc2_qual: String,
}

///////////////////////////////
/// One row of the combined UMI/barcode table. Column order is what the
/// downstream counting scripts expect; do not reorder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedRow {
    pub line_offset: u64,
    pub read_id: String,
    pub umi_f: String,
    pub bc1: String,
    pub bc2: String,
    pub umi_r: String,
    pub umi_qual_f: String,
    pub bc1_qual: String,
    pub bc2_qual: String,
    pub umi_qual_r: String,
}

pub fn tsv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_reader(rdr)
}

pub fn tsv_writer<W: Write>(w: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(w)
}
