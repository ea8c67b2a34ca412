use std::fs::File;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use log::info;
use seq_io::fastq::Reader as FastqReader;

use crate::fileformat;
use crate::fileformat::table::{tsv_reader, tsv_writer};
use crate::umi::merge_streams;

pub const DEFAULT_UMI_LENGTH: usize = 8;

#[derive(Args)]
pub struct CombineCMD {
    // Reads the barcodes were extracted from, FASTQ, optionally gzipped
    #[arg(short = 'f', long = "fastq", value_parser)]
    pub path_fastq: PathBuf,

    // Barcode table produced by the extract step
    #[arg(short = 'b', long = "barcodes", value_parser)]
    pub path_barcodes: PathBuf,

    // Output combined UMI/barcode table
    #[arg(short = 'o', long = "out", value_parser)]
    pub path_out: PathBuf,

    #[arg(long = "umi-length", value_parser, default_value_t = DEFAULT_UMI_LENGTH)]
    pub umi_length: usize,
}
impl CombineCMD {
    /// Run the commandline option.
    /// Walks the FASTQ alongside the barcode table and reunites each
    /// barcode row with the UMIs of its read
    pub fn try_execute(&mut self) -> Result<()> {
        fileformat::verify_input_file(&self.path_fastq)?;
        fileformat::verify_input_file(&self.path_barcodes)?;

        let fastq = FastqReader::new(fileformat::open_maybe_compressed(&self.path_fastq)?);
        let mut rows = tsv_reader(fileformat::open_maybe_compressed(&self.path_barcodes)?);
        let mut out = tsv_writer(File::create(&self.path_out)?);

        let stats = merge_streams(fastq, rows.deserialize(), self.umi_length, &mut out)?;

        info!("Combined rows written: {}", stats.combined);
        info!("Reads skipped without a barcode row: {}", stats.unmatched);
        Ok(())
    }
}
