use crate::errors::LintagError;

///////////////////////////////
/// One kind of CIGAR operation. Only the three kinds produced by our
/// amplicon alignments are handled; anything else is rejected upstream
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CigarKind {
    Match,
    Insertion,
    Deletion,
}
impl CigarKind {
    fn from_char(c: char) -> Result<CigarKind, LintagError> {
        match c {
            'M' => Ok(CigarKind::Match),
            'I' => Ok(CigarKind::Insertion),
            'D' => Ok(CigarKind::Deletion),
            other => Err(LintagError::UnsupportedCigarOp { op: other }),
        }
    }

    /// Signed direction an indel pushes downstream coordinates:
    /// inserted bases shift them right, deleted bases shift them left.
    /// Matches consume read and reference in lockstep and shift nothing.
    fn indel_shift(&self) -> i64 {
        match self {
            CigarKind::Match => 0,
            CigarKind::Insertion => 1,
            CigarKind::Deletion => -1,
        }
    }
}

///////////////////////////////
/// One run-length encoded operation, e.g. 12M or 3D
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CigarOp {
    pub len: i64,
    pub kind: CigarKind,
}

///////////////////////////////
/// A parsed CIGAR field. The aligner writes a literal * for reads it
/// could not place, which is a normal outcome and not an error
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cigar {
    Unaligned,
    Aligned(Vec<CigarOp>),
}

impl Cigar {
    pub fn parse(text: &str) -> Result<Cigar, LintagError> {
        if text == "*" {
            return Ok(Cigar::Unaligned);
        }
        if text.is_empty() {
            return Err(LintagError::malformed("empty CIGAR field", None));
        }

        let mut ops = Vec::new();
        let mut run_len: i64 = 0;
        let mut have_digits = false;
        for c in text.chars() {
            if let Some(d) = c.to_digit(10) {
                run_len = run_len * 10 + d as i64;
                have_digits = true;
            } else {
                if !have_digits {
                    return Err(LintagError::malformed(
                        format!("CIGAR operation '{}' has no length", c),
                        None,
                    ));
                }
                ops.push(CigarOp {
                    len: run_len,
                    kind: CigarKind::from_char(c)?,
                });
                run_len = 0;
                have_digits = false;
            }
        }
        if have_digits {
            return Err(LintagError::malformed(
                format!("CIGAR '{}' ends with a dangling length", text),
                None,
            ));
        }
        Ok(Cigar::Aligned(ops))
    }
}

///////////////////////////////
/// Walk the CIGAR operations and translate reference-relative boundary
/// offsets into read-relative ones, in place.
///
/// The cursor tracks how far into the read we have walked. Matches just
/// advance it. For an indel, every boundary strictly ahead of the cursor
/// is shifted by the signed run length; a boundary sitting exactly at the
/// cursor belongs to the already-consumed part of the read and stays put.
///
/// The cursor itself is shifted by the same signed amount as the
/// boundaries, so a deletion moves it backwards. Deleted bases are
/// reference bases, not read bases, but keeping cursor and boundaries in
/// the same frame is what the downstream tables were built on, and the
/// behaviour is pinned by a test below. Do not "fix" this.
///
/// Boundaries can end up negative or beyond the read when indels are
/// large; the caller clamps at slicing time, never here.
pub fn project_boundaries(ops: &[CigarOp], boundaries: &mut [i64]) {
    let mut pos: i64 = 0;
    for op in ops {
        match op.kind {
            CigarKind::Match => {
                pos += op.len;
            }
            CigarKind::Insertion | CigarKind::Deletion => {
                let shift = op.kind.indel_shift() * op.len;
                for b in boundaries.iter_mut() {
                    if pos < *b {
                        *b += shift;
                    }
                }
                pos += shift;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(text: &str) -> Vec<CigarOp> {
        match Cigar::parse(text).unwrap() {
            Cigar::Aligned(ops) => ops,
            Cigar::Unaligned => panic!("expected aligned cigar"),
        }
    }

    #[test]
    fn parse_star_is_unaligned() {
        assert_eq!(Cigar::parse("*").unwrap(), Cigar::Unaligned);
    }

    #[test]
    fn parse_simple_runs() {
        let got = ops("50M3I2D");
        assert_eq!(
            got,
            vec![
                CigarOp { len: 50, kind: CigarKind::Match },
                CigarOp { len: 3, kind: CigarKind::Insertion },
                CigarOp { len: 2, kind: CigarKind::Deletion },
            ]
        );
    }

    #[test]
    fn parse_rejects_soft_clip() {
        let err = Cigar::parse("10S40M").unwrap_err();
        match err {
            LintagError::UnsupportedCigarOp { op } => assert_eq!(op, 'S'),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn parse_rejects_missing_length() {
        assert!(Cigar::parse("M").is_err());
        assert!(Cigar::parse("10M5").is_err());
    }

    #[test]
    fn full_match_leaves_boundaries_alone() {
        let mut bounds = [45, 71, 160, 186];
        project_boundaries(&ops("200M"), &mut bounds);
        assert_eq!(bounds, [45, 71, 160, 186]);
    }

    #[test]
    fn insertion_before_boundary_adds() {
        let mut bounds = [45];
        project_boundaries(&ops("10M3I40M"), &mut bounds);
        assert_eq!(bounds, [48]);
    }

    #[test]
    fn insertion_at_boundary_is_strict() {
        // the insertion starts exactly at the boundary, so it stays put
        let mut bounds = [10];
        project_boundaries(&ops("10M3I40M"), &mut bounds);
        assert_eq!(bounds, [10]);
    }

    #[test]
    fn deletion_before_boundary_subtracts() {
        let mut bounds = [45];
        project_boundaries(&ops("10M3D40M"), &mut bounds);
        assert_eq!(bounds, [42]);
    }

    #[test]
    fn repeated_deletions_compound() {
        let mut bounds = [45];
        project_boundaries(&ops("5M2D5M2D40M"), &mut bounds);
        assert_eq!(bounds, [41]);
    }

    #[test]
    fn deletion_also_moves_the_cursor_backwards() {
        // Historical quirk, kept on purpose: the cursor retreats with each
        // deletion, so after 5M2D5M it sits at 8, not 10. The boundary
        // below starts at 11, the first deletion moves it to 9, and since
        // 8 < 9 the second deletion still sees it as ahead and moves it
        // again. With a non-retreating cursor it would stay at 9.
        let mut bounds = [11];
        project_boundaries(&ops("5M2D5M2D40M"), &mut bounds);
        assert_eq!(bounds, [7]);
    }

    #[test]
    fn boundaries_may_go_negative() {
        let mut bounds = [2];
        project_boundaries(&ops("1M10D40M"), &mut bounds);
        assert_eq!(bounds, [-8]);
    }
}
