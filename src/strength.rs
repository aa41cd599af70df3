//! Boundary strength derivation for a macroblock from the neighbour caches.
//!
//! Caches are 8 entries wide; the current macroblock occupies columns 4..7 of
//! rows 1..4, so block `(row, col)` lives at `12 + row * 8 + col`. Row 0 holds the
//! bottom line of the macroblock above and column 3 the right column of the
//! macroblock on the left.

/// Number of entries in each neighbour cache.
pub const STRENGTH_CACHE_SIZE: usize = 40;

const CACHE_STRIDE: usize = 8;
const CACHE_START: usize = 12;

/// Reference index marking a block with no prediction from the list.
const REF_NONE: i8 = -1;
/// Reference index marking a block outside the picture.
const REF_UNAVAILABLE: i8 = -2;

fn norm_ref(r: i8) -> i8 {
    if r == REF_UNAVAILABLE { REF_NONE } else { r }
}

fn mv_differs(a: [i16; 2], b: [i16; 2], ylimit: i32) -> bool {
    (i32::from(a[0]) - i32::from(b[0])).abs() >= 4 || (i32::from(a[1]) - i32::from(b[1])).abs() >= ylimit
}

/// Tests whether blocks `b` and `bn` are predicted differently enough to need bS 1.
fn check_mv(refs: &[[i8; STRENGTH_CACHE_SIZE]; 2], mv: &[[[i16; 2]; STRENGTH_CACHE_SIZE]; 2],
            b: usize, bn: usize, bidir: bool, ylimit: i32) -> bool {
    let r0  = norm_ref(refs[0][b]);
    let r0n = norm_ref(refs[0][bn]);
    let mut changed = r0 != r0n;
    if !changed && r0 != REF_NONE {
        changed = mv_differs(mv[0][b], mv[0][bn], ylimit);
    }
    if !bidir {
        return changed;
    }

    let r1  = norm_ref(refs[1][b]);
    let r1n = norm_ref(refs[1][bn]);
    if !changed {
        changed = r1 != r1n || mv_differs(mv[1][b], mv[1][bn], ylimit);
    }
    if !changed {
        return false;
    }
    // lists may be swapped between the two partitions
    if r0 != r1n || r1 != r0n {
        return true;
    }
    mv_differs(mv[0][b], mv[1][bn], ylimit) || mv_differs(mv[1][b], mv[0][bn], ylimit)
}

/// Computes boundary strengths for horizontal (`bs[1]`) and vertical (`bs[0]`) edges.
///
/// Horizontal edges are visited for `edge = 0, step, ..` below `edges`, vertical ones
/// for all four columns. The result is `bs[dir][edge][segment]` with values 0, 1 or 2;
/// intra strengths are assigned by the caller. Horizontal edges skipped by `step` are
/// left as they were.
///
/// `mask_mv1 & edge` marks horizontal edges inside a partition (no motion change),
/// `mask_mv0 & row` marks rows where the vertical edges repeat the motion flags of
/// the previous row. `field` halves the vertical vector threshold.
#[allow(clippy::too_many_arguments)]
pub fn loop_filter_strength(bs: &mut [[[i16; 4]; 4]; 2], nnz: &[u8; STRENGTH_CACHE_SIZE],
                            refs: &[[i8; STRENGTH_CACHE_SIZE]; 2],
                            mv: &[[[i16; 2]; STRENGTH_CACHE_SIZE]; 2],
                            bidir: bool, edges: usize, step: usize,
                            mask_mv0: usize, mask_mv1: usize, field: bool) {
    let ylimit = if field { 2 } else { 4 };
    let step = step.max(1);

    for edge in (0..edges.min(4)).step_by(step) {
        let base = CACHE_START + edge * CACHE_STRIDE;
        for (lane, dst) in bs[1][edge].iter_mut().enumerate() {
            let b = base + lane;
            let bn = b - CACHE_STRIDE;
            let moved = (mask_mv1 & edge) == 0 && check_mv(refs, mv, b, bn, bidir, ylimit);
            *dst = strength(nnz[b] | nnz[bn], moved);
        }
    }

    let mut moved = [false; 4];
    let mut rows = [[0i16; 4]; 4];
    for (row, dst) in rows.iter_mut().enumerate() {
        let base = CACHE_START + row * CACHE_STRIDE;
        if (mask_mv0 & row) == 0 {
            for (col, flag) in moved.iter_mut().enumerate() {
                let b = base + col;
                *flag = check_mv(refs, mv, b, b - 1, bidir, ylimit);
            }
        }
        for (col, (el, &flag)) in dst.iter_mut().zip(moved.iter()).enumerate() {
            let b = base + col;
            *el = strength(nnz[b] | nnz[b - 1], flag);
        }
    }
    for (row, line) in rows.iter().enumerate() {
        for (col, &val) in line.iter().enumerate() {
            bs[0][col][row] = val;
        }
    }
}

fn strength(coded: u8, moved: bool) -> i16 {
    if coded != 0 {
        2
    } else if moved {
        1
    } else {
        0
    }
}
