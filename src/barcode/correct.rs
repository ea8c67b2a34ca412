use std::io::{BufRead, Read, Write};

use anyhow::{Context, Result};
use bio::alignment::distance::levenshtein;
use log::info;

use crate::errors::LintagError;
use crate::fileformat::CombinedRow;

///////////////////////////////
/// One canonical barcode pair from the mapping file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownBarcodePair {
    pub bc1: String,
    pub bc2: String,
}

///////////////////////////////
/// Load the known pairs, keeping file order. The scan below resolves
/// ties by first occurrence, so order matters.
///
/// Format: one header line, then tab-delimited rows with the pair in
/// the second column as bc1_bc2
pub fn read_known_pairs<R: BufRead>(input: R) -> Result<Vec<KnownBarcodePair>> {
    let mut pairs = Vec::new();

    for (i, line) in input.lines().enumerate() {
        let line = line.context("Failed reading known barcode file")?;
        if i == 0 {
            // header
            continue;
        }
        if line.is_empty() {
            continue;
        }

        let line_no = i as u64 + 1;
        let fields: Vec<&str> = line.split('\t').collect();
        let joined = fields.get(1).ok_or_else(|| {
            LintagError::malformed("known barcode row has no second column", Some(line_no))
        })?;

        let parts: Vec<&str> = joined.split('_').collect();
        if parts.len() != 2 {
            return Err(LintagError::malformed(
                format!("'{}' is not two barcodes joined by '_'", joined),
                Some(line_no),
            )
            .into());
        }

        pairs.push(KnownBarcodePair {
            bc1: parts[0].to_string(),
            bc2: parts[1].to_string(),
        });
    }

    if pairs.is_empty() {
        println!("Warning: empty known barcode file");
    }
    info!("Loaded {} known barcode pairs", pairs.len());
    Ok(pairs)
}

/// The closest dictionary entry for one candidate pair
#[derive(Debug, PartialEq, Eq)]
pub struct PairMatch<'a> {
    pub pair: &'a KnownBarcodePair,
    pub distance: u32,
}

///////////////////////////////
/// Scan the dictionary for the nearest pair. The score of an entry is
/// the sum of the per-component Levenshtein distances; the two barcodes
/// are never concatenated into one string. The first entry reaching the
/// running minimum wins, and a score of zero ends the scan on the spot
/// since nothing can beat it
pub fn best_match<'a>(
    known: &'a [KnownBarcodePair],
    bc1: &str,
    bc2: &str,
) -> Option<PairMatch<'a>> {
    let mut best: Option<(usize, u32)> = None;

    for (i, pair) in known.iter().enumerate() {
        let score = levenshtein(bc1.as_bytes(), pair.bc1.as_bytes())
            + levenshtein(bc2.as_bytes(), pair.bc2.as_bytes());

        let improved = match best {
            None => true,
            Some((_, best_score)) => score < best_score,
        };
        if improved {
            best = Some((i, score));
            if score == 0 {
                break;
            }
        }
    }

    best.map(|(i, distance)| PairMatch {
        pair: &known[i],
        distance,
    })
}

///////////////////////////////
/// Counters for one correction pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CorrectStats {
    pub candidates: u64,
    pub exact: u64,
    pub rewritten: u64,
    pub dropped: u64,
}

///////////////////////////////
/// Rewrite each combined row with its nearest known pair, or drop it
/// when even the nearest pair is further than max_distance away. All
/// other columns pass through untouched
pub fn run_correction<R: Read, W: Write>(
    known: &[KnownBarcodePair],
    rows: &mut csv::Reader<R>,
    out: &mut csv::Writer<W>,
    max_distance: u32,
) -> Result<CorrectStats> {
    let mut stats = CorrectStats::default();

    for row in rows.deserialize::<CombinedRow>() {
        let mut row = row?;
        stats.candidates += 1;

        let found = match best_match(known, &row.bc1, &row.bc2) {
            Some(found) => found,
            None => {
                // empty dictionary, nothing can ever match
                stats.dropped += 1;
                continue;
            }
        };

        if found.distance > max_distance {
            stats.dropped += 1;
            continue;
        }

        if found.distance == 0 {
            stats.exact += 1;
        } else {
            stats.rewritten += 1;
        }
        row.bc1 = found.pair.bc1.clone();
        row.bc2 = found.pair.bc2.clone();
        out.serialize(&row)?;
    }

    out.flush()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fileformat::table::{tsv_reader, tsv_writer};

    fn known(pairs: &[(&str, &str)]) -> Vec<KnownBarcodePair> {
        pairs
            .iter()
            .map(|(bc1, bc2)| KnownBarcodePair {
                bc1: bc1.to_string(),
                bc2: bc2.to_string(),
            })
            .collect()
    }

    fn combined_line(bc1: &str, bc2: &str) -> String {
        format!(
            "1\tread1\tACGTACGT\t{}\t{}\tTGCATGCA\tFFFFFFFF\tFFFF\tFFFF\tFFFFFFFF\n",
            bc1, bc2
        )
    }

    #[test]
    fn loader_skips_header_and_splits_pairs() {
        let text = "name\tbarcode\ns1\tAAAA_CCCC\ns2\tGGGG_TTTT\n";
        let pairs = read_known_pairs(text.as_bytes()).unwrap();
        assert_eq!(
            pairs,
            known(&[("AAAA", "CCCC"), ("GGGG", "TTTT")])
        );
    }

    #[test]
    fn loader_rejects_unsplittable_pairs() {
        let text = "name\tbarcode\ns1\tAAAACCCC\n";
        assert!(read_known_pairs(text.as_bytes()).is_err());
        let text = "name\tbarcode\ns1\tAA_CC_GG\n";
        assert!(read_known_pairs(text.as_bytes()).is_err());
    }

    #[test]
    fn distances_add_up_per_component() {
        let dict = known(&[("AAAAAA", "CCCCCC")]);
        let found = best_match(&dict, "AATAAA", "CCCGGC").unwrap();
        assert_eq!(found.distance, 3);
    }

    #[test]
    fn exact_match_wins_even_when_listed_later() {
        // the first entry scores 2, the exact entry sits behind it
        let dict = known(&[("AAAATT", "CCCCCC"), ("AAAAAA", "CCCCCC")]);
        let found = best_match(&dict, "AAAAAA", "CCCCCC").unwrap();
        assert_eq!(found.distance, 0);
        assert_eq!(found.pair, &dict[1]);
    }

    #[test]
    fn ties_go_to_the_first_entry() {
        // both entries score 1; the scan keeps the first
        let dict = known(&[("AAAAAT", "CCCCCC"), ("TAAAAA", "CCCCCC")]);
        let found = best_match(&dict, "AAAAAA", "CCCCCC").unwrap();
        assert_eq!(found.distance, 1);
        assert_eq!(found.pair, &dict[0]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let dict = known(&[("AAAAAA", "CCCCCC")]);

        // three substitutions on one side, two on the other: distance 5
        let at_threshold = combined_line("TTTAAA", "GGCCCC");
        let mut out = tsv_writer(Vec::new());
        let stats =
            run_correction(&dict, &mut tsv_reader(at_threshold.as_bytes()), &mut out, 5).unwrap();
        assert_eq!(stats.rewritten, 1);
        assert_eq!(stats.dropped, 0);
        let text = String::from_utf8(out.into_inner().unwrap()).unwrap();
        assert!(text.contains("\tAAAAAA\tCCCCCC\t"));

        // one more substitution: distance 6, row disappears
        let past_threshold = combined_line("TTTAAA", "GGGCCC");
        let mut out = tsv_writer(Vec::new());
        let stats =
            run_correction(&dict, &mut tsv_reader(past_threshold.as_bytes()), &mut out, 5).unwrap();
        assert_eq!(stats.rewritten, 0);
        assert_eq!(stats.dropped, 1);
        assert!(out.into_inner().unwrap().is_empty());
    }
}
