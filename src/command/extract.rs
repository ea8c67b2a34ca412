use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use log::info;

use crate::barcode::extract::run_extraction;
use crate::barcode::BarcodeWindow;
use crate::fileformat;
use crate::fileformat::table::tsv_writer;

pub const DEFAULT_BC1_REF_START: i64 = 46;
pub const DEFAULT_BC2_REF_START: i64 = 161;
pub const DEFAULT_BC_LENGTH: usize = 26;

#[derive(Args)]
pub struct ExtractCMD {
    // Alignments of the amplicon reads, SAM format, optionally gzipped
    #[arg(short = 'i', long = "in-sam", value_parser)]
    pub path_in: PathBuf,

    // Output barcode table
    #[arg(short = 'o', long = "out", value_parser)]
    pub path_out: PathBuf,

    // Where the first (leftmost) barcode starts on the reference
    #[arg(long = "bc1-start", value_parser, default_value_t = DEFAULT_BC1_REF_START)]
    pub bc1_start: i64,

    // Where the second barcode starts on the reference
    #[arg(long = "bc2-start", value_parser, default_value_t = DEFAULT_BC2_REF_START)]
    pub bc2_start: i64,

    #[arg(long = "bc1-length", value_parser, default_value_t = DEFAULT_BC_LENGTH)]
    pub bc1_length: usize,

    #[arg(long = "bc2-length", value_parser, default_value_t = DEFAULT_BC_LENGTH)]
    pub bc2_length: usize,
}
impl ExtractCMD {
    /// Run the commandline option.
    /// Takes aligned reads and cuts both barcodes out of each one
    pub fn try_execute(&mut self) -> Result<()> {
        fileformat::verify_input_file(&self.path_in)?;

        let bc1 = BarcodeWindow::new(self.bc1_start, self.bc1_length);
        let bc2 = BarcodeWindow::new(self.bc2_start, self.bc2_length);

        let input = BufReader::new(fileformat::open_maybe_compressed(&self.path_in)?);
        let mut out = tsv_writer(File::create(&self.path_out)?);

        let stats = run_extraction(input, &mut out, &bc1, &bc2)?;

        info!("Unaligned reads: {}", stats.unaligned);
        info!(
            "Reads with at least one barcode of the wrong size: {}",
            stats.wrong_size
        );
        info!(
            "Reads with both barcodes of the correct size: {}",
            stats.correct_size
        );
        if stats.malformed > 0 {
            info!("Malformed lines skipped: {}", stats.malformed);
        }
        if stats.unsupported > 0 {
            info!(
                "Reads with unsupported CIGAR operations skipped: {}",
                stats.unsupported
            );
        }
        Ok(())
    }
}
