pub mod sam;
pub mod table;

pub use sam::AlignmentRecord;
pub use table::{BarcodeRow, CombinedRow};

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::debug;

/// Open a text input, transparently decompressing gzip and friends.
/// Plain files pass straight through.
pub fn open_maybe_compressed(path: &Path) -> Result<Box<dyn Read>> {
    let handle =
        File::open(path).with_context(|| format!("Could not open input file {}", path.display()))?;

    let (reader, compression) = niffler::get_reader(Box::new(handle))
        .with_context(|| format!("Could not read input file {}", path.display()))?;

    debug!(
        "Opened file {} with compression {:?}",
        path.display(),
        compression
    );
    Ok(reader)
}

/////// Check that an input file exists before we start a long pass
pub fn verify_input_file(path: &Path) -> Result<()> {
    if let Ok(file) = File::open(path) {
        if file.metadata()?.len() == 0 {
            println!("Warning: input file {} is empty", path.display());
        }
        Ok(())
    } else {
        bail!("Cannot open input file {}", path.display());
    }
}
