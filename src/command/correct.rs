use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use log::info;

use crate::barcode::correct::{read_known_pairs, run_correction};
use crate::fileformat;
use crate::fileformat::table::{tsv_reader, tsv_writer};

pub const DEFAULT_MAX_DISTANCE: u32 = 5;

#[derive(Args)]
pub struct CorrectCMD {
    // Mapping file with all known bc1_bc2 combinations in column two
    #[arg(short = 'k', long = "known", value_parser)]
    pub path_known: PathBuf,

    // Combined table produced by the combine step
    #[arg(short = 'i', long = "in-table", value_parser)]
    pub path_in: PathBuf,

    // Output table with corrected barcodes
    #[arg(short = 'o', long = "out", value_parser)]
    pub path_out: PathBuf,

    // Rows further than this from every known pair are dropped
    #[arg(long = "max-distance", value_parser, default_value_t = DEFAULT_MAX_DISTANCE)]
    pub max_distance: u32,
}
impl CorrectCMD {
    /// Run the commandline option.
    /// Replaces each extracted barcode pair with its nearest known pair
    pub fn try_execute(&mut self) -> Result<()> {
        fileformat::verify_input_file(&self.path_known)?;
        fileformat::verify_input_file(&self.path_in)?;

        let known = read_known_pairs(BufReader::new(fileformat::open_maybe_compressed(
            &self.path_known,
        )?))?;

        let mut rows = tsv_reader(fileformat::open_maybe_compressed(&self.path_in)?);
        let mut out = tsv_writer(File::create(&self.path_out)?);

        let stats = run_correction(&known, &mut rows, &mut out, self.max_distance)?;

        info!(
            "Corrected {} of {} rows ({} already exact), dropped {}",
            stats.rewritten + stats.exact,
            stats.candidates,
            stats.exact,
            stats.dropped
        );
        Ok(())
    }
}
