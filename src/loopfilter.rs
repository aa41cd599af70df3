//! In-loop deblocking kernels and the threshold tables that drive them.
//!
//! Naming follows the usual H.264 DSP convention: `v_*` kernels filter a horizontal edge
//! (samples are taken across rows), `h_*` kernels filter a vertical edge (samples are
//! taken across columns). `off` always points at the first `q0` sample of the edge.
//!
//! Inter kernels take one `tc0` per group of lines; a negative value skips the group.
//! Chroma inter kernels expect `tc0` with the extra one already added, so zero skips too.

pub const ALPHA: [i16; 52] = [
      0,   0,   0,   0,  0,  0,  0,  0,  0,  0,   0,   0,   0,   0,   0,   0,
      4,   4,   5,   6,  7,  8,  9, 10, 12, 13,  15,  17,  20,  22,  25,  28,
     32,  36,  40,  45, 50, 56, 63, 71, 80, 90, 101, 113, 127, 144, 162, 182,
    203, 226, 255, 255
];
pub const BETA: [i16; 52] = [
     0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
     2,  2,  2,  3,  3,  3,  3,  4,  4,  4,  6,  6,  7,  7,  8,  8,
     9,  9, 10, 10, 11, 11, 12, 12, 13, 13, 14, 14, 15, 15, 16, 16,
    17, 17, 18, 18
];

pub const TC0: [[u8; 3]; 52] = [
    [ 0,  0,  0], [ 0,  0,  0], [ 0,  0,  0], [ 0,  0,  0],
    [ 0,  0,  0], [ 0,  0,  0], [ 0,  0,  0], [ 0,  0,  0],
    [ 0,  0,  0], [ 0,  0,  0], [ 0,  0,  0], [ 0,  0,  0],
    [ 0,  0,  0], [ 0,  0,  0], [ 0,  0,  0], [ 0,  0,  0],
    [ 0,  0,  0], [ 0,  0,  1], [ 0,  0,  1], [ 0,  0,  1],
    [ 0,  0,  1], [ 0,  1,  1], [ 0,  1,  1], [ 1,  1,  1],
    [ 1,  1,  1], [ 1,  1,  1], [ 1,  1,  1], [ 1,  1,  2],
    [ 1,  1,  2], [ 1,  1,  2], [ 1,  1,  2], [ 1,  2,  3],
    [ 1,  2,  3], [ 2,  2,  3], [ 2,  2,  4], [ 2,  3,  4],
    [ 2,  3,  4], [ 3,  3,  5], [ 3,  4,  6], [ 3,  4,  6],
    [ 4,  5,  7], [ 4,  5,  8], [ 4,  6,  9], [ 5,  7, 10],
    [ 6,  8, 11], [ 6,  8, 13], [ 7, 10, 14], [ 8, 11, 16],
    [ 9, 12, 18], [10, 13, 20], [11, 15, 23], [13, 17, 25]
];

/// Returns the table index for the averaged quantiser of two neighbouring blocks.
pub fn get_lf_idx(qp0: u8, qp1: u8, off: i8) -> usize {
    ((i16::from(qp0) + i16::from(qp1) + 1) / 2 + i16::from(off)).max(0).min(51) as usize
}

/// Builds the per-segment `tc0` array for the inter kernels from a row of strengths.
///
/// Segments with `bS == 0` get the skip value. Chroma values carry the extra one the
/// chroma kernels expect.
pub fn tc0_from_bs(index_a: usize, bs: &[u8; 4], chroma: bool) -> [i8; 4] {
    let mut tc0 = [0i8; 4];
    for (tc, &strength) in tc0.iter_mut().zip(bs.iter()) {
        let val = if strength == 0 {
                -1
            } else {
                TC0[index_a][(strength.min(3) - 1) as usize] as i8
            };
        *tc = if chroma { val + 1 } else { val };
    }
    tc0
}

fn clip8(val: i16) -> u8 { val.max(0).min(255) as u8 }

macro_rules! loop_filter {
    (lumaedge; $buf: expr, $off: expr, $step: expr, $alpha: expr, $beta: expr) => {
        let p2 = i16::from($buf[$off - $step * 3]);
        let p1 = i16::from($buf[$off - $step * 2]);
        let p0 = i16::from($buf[$off - $step]);
        let q0 = i16::from($buf[$off]);
        let q1 = i16::from($buf[$off + $step]);
        let q2 = i16::from($buf[$off + $step * 2]);
        let strong = (p0 - q0).abs() < (($alpha >> 2) + 2);
        if strong && (p2 - p0).abs() < $beta {
            let p3 = i16::from($buf[$off - $step * 4]);
            $buf[$off - $step * 3] = ((2 * p3 + 3 * p2 + p1 + p0 + q0 + 4) >> 3) as u8;
            $buf[$off - $step * 2] = ((p2 + p1 + p0 + q0 + 2) >> 2) as u8;
            $buf[$off - $step]     = ((p2 + 2 * p1 + 2 * p0 + 2 * q0 + q1 + 4) >> 3) as u8;
        } else {
            $buf[$off - $step]     = ((2 * p1 + p0 + q1 + 2) >> 2) as u8;
        }
        if strong && (q2 - q0).abs() < $beta {
            let q3 = i16::from($buf[$off + $step * 3]);
            $buf[$off]             = ((p1 + 2 * p0 + 2 * q0 + 2 * q1 + q2 + 4) >> 3) as u8;
            $buf[$off + $step]     = ((p0 + q0 + q1 + q2 + 2) >> 2) as u8;
            $buf[$off + $step * 2] = ((2 * q3 + 3 * q2 + q1 + q0 + p0 + 4) >> 3) as u8;
        } else {
            $buf[$off]             = ((2 * q1 + q0 + p1 + 2) >> 2) as u8;
        }
    };
    (chromaedge; $buf: expr, $off: expr, $step: expr) => {
        let p1 = i16::from($buf[$off - $step * 2]);
        let p0 = i16::from($buf[$off - $step]);
        let q0 = i16::from($buf[$off]);
        let q1 = i16::from($buf[$off + $step]);
        $buf[$off - $step] = ((2 * p1 + p0 + q1 + 2) >> 2) as u8;
        $buf[$off]         = ((2 * q1 + q0 + p1 + 2) >> 2) as u8;
    };
    (lumanormal; $buf: expr, $off: expr, $step: expr, $tc0: expr, $beta: expr) => {
        let p2 = i16::from($buf[$off - $step * 3]);
        let p1 = i16::from($buf[$off - $step * 2]);
        let p0 = i16::from($buf[$off - $step]);
        let q0 = i16::from($buf[$off]);
        let q1 = i16::from($buf[$off + $step]);
        let q2 = i16::from($buf[$off + $step * 2]);
        let a_p = (p2 - p0).abs() < $beta;
        let a_q = (q2 - q0).abs() < $beta;
        let tc = $tc0 + (a_p as i16) + (a_q as i16);
        let delta = (((q0 - p0) * 4 + (p1 - q1) + 4) >> 3).max(-tc).min(tc);
        if a_p && ($tc0 > 0) {
            $buf[$off - $step * 2] = clip8(p1 + (((p2 + ((p0 + q0 + 1) >> 1)) >> 1) - p1).max(-$tc0).min($tc0));
        }
        $buf[$off - $step] = clip8(p0 + delta);
        $buf[$off]         = clip8(q0 - delta);
        if a_q && ($tc0 > 0) {
            $buf[$off + $step] = clip8(q1 + (((q2 + ((p0 + q0 + 1) >> 1)) >> 1) - q1).max(-$tc0).min($tc0));
        }
    };
    (chromanormal; $buf: expr, $off: expr, $step: expr, $tc: expr) => {
        let p1 = i16::from($buf[$off - $step * 2]);
        let p0 = i16::from($buf[$off - $step]);
        let q0 = i16::from($buf[$off]);
        let q1 = i16::from($buf[$off + $step]);
        let delta = (((q0 - p0) * 4 + (p1 - q1) + 4) >> 3).max(-$tc).min($tc);
        $buf[$off - $step] = clip8(p0 + delta);
        $buf[$off]         = clip8(q0 - delta);
    }
}

fn check_filter(buf: &[u8], off: usize, step: usize, alpha: i16, beta: i16) -> bool {
    let p1 = i16::from(buf[off - step * 2]);
    let p0 = i16::from(buf[off - step]);
    let q0 = i16::from(buf[off]);
    let q1 = i16::from(buf[off + step]);
    (p0 - q0).abs() < alpha && (p1 - p0).abs() < beta && (q1 - q0).abs() < beta
}

// `xstep` crosses the edge, `ystep` walks along it.
fn luma_normal(dst: &mut [u8], mut off: usize, xstep: usize, ystep: usize, inner: usize, alpha: i16, beta: i16, tc0: &[i8; 4]) {
    for &tc in tc0.iter() {
        if tc < 0 {
            off += ystep * inner;
            continue;
        }
        let tc = i16::from(tc);
        for _ in 0..inner {
            if check_filter(dst, off, xstep, alpha, beta) {
                loop_filter!(lumanormal; dst, off, xstep, tc, beta);
            }
            off += ystep;
        }
    }
}

fn luma_edge(dst: &mut [u8], mut off: usize, xstep: usize, ystep: usize, lines: usize, alpha: i16, beta: i16) {
    for _ in 0..lines {
        if check_filter(dst, off, xstep, alpha, beta) {
            loop_filter!(lumaedge; dst, off, xstep, alpha, beta);
        }
        off += ystep;
    }
}

fn chroma_normal(dst: &mut [u8], mut off: usize, xstep: usize, ystep: usize, inner: usize, alpha: i16, beta: i16, tc0: &[i8; 4]) {
    for &tc in tc0.iter() {
        if tc <= 0 {
            off += ystep * inner;
            continue;
        }
        let tc = i16::from(tc);
        for _ in 0..inner {
            if check_filter(dst, off, xstep, alpha, beta) {
                loop_filter!(chromanormal; dst, off, xstep, tc);
            }
            off += ystep;
        }
    }
}

fn chroma_edge(dst: &mut [u8], mut off: usize, xstep: usize, ystep: usize, lines: usize, alpha: i16, beta: i16) {
    for _ in 0..lines {
        if check_filter(dst, off, xstep, alpha, beta) {
            loop_filter!(chromaedge; dst, off, xstep);
        }
        off += ystep;
    }
}

/// Luma inter filter across a horizontal edge, 16 columns wide.
pub fn v_loop_filter_luma(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16, tc0: &[i8; 4]) {
    luma_normal(dst, off, stride, 1, 4, alpha, beta, tc0);
}
/// Luma inter filter across a vertical edge, 16 rows high.
pub fn h_loop_filter_luma(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16, tc0: &[i8; 4]) {
    luma_normal(dst, off, 1, stride, 4, alpha, beta, tc0);
}
/// Luma inter filter across a vertical edge of one MBAFF field macroblock, 8 rows high.
pub fn h_loop_filter_luma_mbaff(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16, tc0: &[i8; 4]) {
    luma_normal(dst, off, 1, stride, 2, alpha, beta, tc0);
}
pub fn v_loop_filter_luma_intra(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16) {
    luma_edge(dst, off, stride, 1, 16, alpha, beta);
}
pub fn h_loop_filter_luma_intra(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16) {
    luma_edge(dst, off, 1, stride, 16, alpha, beta);
}
pub fn h_loop_filter_luma_mbaff_intra(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16) {
    luma_edge(dst, off, 1, stride, 8, alpha, beta);
}

/// Chroma inter filter across a horizontal edge, 8 columns wide.
pub fn v_loop_filter_chroma(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16, tc0: &[i8; 4]) {
    chroma_normal(dst, off, stride, 1, 2, alpha, beta, tc0);
}
/// Chroma inter filter across a vertical edge, 8 rows high.
pub fn h_loop_filter_chroma(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16, tc0: &[i8; 4]) {
    chroma_normal(dst, off, 1, stride, 2, alpha, beta, tc0);
}
pub fn h_loop_filter_chroma_mbaff(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16, tc0: &[i8; 4]) {
    chroma_normal(dst, off, 1, stride, 1, alpha, beta, tc0);
}
/// 4:2:2 chroma inter filter across a vertical edge, 16 rows high.
pub fn h_loop_filter_chroma422(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16, tc0: &[i8; 4]) {
    chroma_normal(dst, off, 1, stride, 4, alpha, beta, tc0);
}
pub fn h_loop_filter_chroma422_mbaff(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16, tc0: &[i8; 4]) {
    chroma_normal(dst, off, 1, stride, 2, alpha, beta, tc0);
}
pub fn v_loop_filter_chroma_intra(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16) {
    chroma_edge(dst, off, stride, 1, 8, alpha, beta);
}
pub fn h_loop_filter_chroma_intra(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16) {
    chroma_edge(dst, off, 1, stride, 8, alpha, beta);
}
pub fn h_loop_filter_chroma_mbaff_intra(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16) {
    chroma_edge(dst, off, 1, stride, 4, alpha, beta);
}
pub fn h_loop_filter_chroma422_intra(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16) {
    chroma_edge(dst, off, 1, stride, 16, alpha, beta);
}
pub fn h_loop_filter_chroma422_mbaff_intra(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16) {
    chroma_edge(dst, off, 1, stride, 8, alpha, beta);
}

pub type LoopFilterFunc = fn(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16, tc0: &[i8; 4]);
pub type LoopFilterIntraFunc = fn(dst: &mut [u8], off: usize, stride: usize, alpha: i16, beta: i16);

macro_rules! filter_edge_func {
    ($(#[$attr:meta])* $funcname: ident, $edgefilter: ident, $normfilter: ident, $chroma: expr) => {
        $(#[$attr])*
        pub fn $funcname(dst: &mut [u8], off: usize, stride: usize, bs: &[u8; 4], quants: [u8; 2], alpha_off: i8, beta_off: i8) {
            let index_a = get_lf_idx(quants[0], quants[1], alpha_off);
            let alpha = ALPHA[index_a];
            let beta = BETA[get_lf_idx(quants[0], quants[1], beta_off)];
            if alpha == 0 || beta == 0 {
                return;
            }
            if bs[0] >= 4 {
                $edgefilter(dst, off, stride, alpha, beta);
            } else {
                let tc0 = tc0_from_bs(index_a, bs, $chroma);
                $normfilter(dst, off, stride, alpha, beta, &tc0);
            }
        }
    }
}

filter_edge_func!(
    /// Filters a vertical luma macroblock edge with strengths `bs` and quantisers `[cur, neighbour]`.
    filter_vertical_edge_luma, h_loop_filter_luma_intra, h_loop_filter_luma, false);
filter_edge_func!(
    /// Filters a horizontal luma macroblock edge.
    filter_horizontal_edge_luma, v_loop_filter_luma_intra, v_loop_filter_luma, false);
filter_edge_func!(filter_vertical_edge_chroma, h_loop_filter_chroma_intra, h_loop_filter_chroma, true);
filter_edge_func!(filter_horizontal_edge_chroma, v_loop_filter_chroma_intra, v_loop_filter_chroma, true);
