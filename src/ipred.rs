//! Intra prediction kernels.
//!
//! Predictors take the block origin inside the plane, the plane stride, the row
//! above the block (`top`) and the left neighbours where `left[0]` is the top-left
//! sample and `left[1..]` the column. 8x8 luma predictors work on the low-pass
//! filtered edges prepared by [`IPred8Context`].

/// 16x16 luma, 8x8/8x16 chroma and 4x4 predictor.
pub type IPredFunc = fn(buf: &mut [u8], stride: usize, top: &[u8], left: &[u8]);
/// 8x8 luma predictor working on filtered edges.
pub type IPred8LumaFunc = fn(buf: &mut [u8], stride: usize, ctx: &IPred8Context);

/// Index of the left-only DC fallback in [`IPRED_FUNCS16X16`] and [`IPRED_FUNCS_CHROMA`].
pub const IPRED_DC_LEFT: usize = 4;
/// Index of the top-only DC fallback in [`IPRED_FUNCS16X16`] and [`IPRED_FUNCS_CHROMA`].
pub const IPRED_DC_TOP: usize = 5;
/// Index of the flat 128 fallback in [`IPRED_FUNCS16X16`] and [`IPRED_FUNCS_CHROMA`].
pub const IPRED_DC128: usize = 6;

/// Index of the left-only DC fallback in [`IPRED_FUNCS4X4`] and [`IPRED_FUNCS8X8_LUMA`].
pub const IPRED4_DC_LEFT: usize = 3;
/// Index of the top-only DC fallback in [`IPRED_FUNCS4X4`] and [`IPRED_FUNCS8X8_LUMA`].
pub const IPRED4_DC_TOP: usize = 4;
/// Index of the flat 128 fallback in [`IPRED_FUNCS4X4`] and [`IPRED_FUNCS8X8_LUMA`].
pub const IPRED4_DC128: usize = 5;

fn clip8(val: i32) -> u8 { val.max(0).min(255) as u8 }

fn fill_block(buf: &mut [u8], stride: usize, w: usize, h: usize, val: u8) {
    for row in buf.chunks_mut(stride).take(h) {
        for el in row[..w].iter_mut() {
            *el = val;
        }
    }
}

fn copy_top(buf: &mut [u8], stride: usize, top: &[u8], w: usize, h: usize) {
    for row in buf.chunks_mut(stride).take(h) {
        row[..w].copy_from_slice(&top[..w]);
    }
}

fn copy_left(buf: &mut [u8], stride: usize, left: &[u8], w: usize, h: usize) {
    for (row, &val) in buf.chunks_mut(stride).zip(left[1..].iter()).take(h) {
        for el in row[..w].iter_mut() {
            *el = val;
        }
    }
}

fn sum(src: &[u8]) -> u32 {
    src.iter().fold(0, |acc, &el| acc + u32::from(el))
}

fn dc_val(sum: u32, shift: u8) -> u8 {
    ((sum + (1 << (shift - 1))) >> shift) as u8
}

pub fn pred16x16_vertical(buf: &mut [u8], stride: usize, top: &[u8], _left: &[u8]) {
    copy_top(buf, stride, top, 16, 16);
}
pub fn pred16x16_horizontal(buf: &mut [u8], stride: usize, _top: &[u8], left: &[u8]) {
    copy_left(buf, stride, left, 16, 16);
}
pub fn pred16x16_dc(buf: &mut [u8], stride: usize, top: &[u8], left: &[u8]) {
    let dc = dc_val(sum(&top[..16]) + sum(&left[1..17]), 5);
    fill_block(buf, stride, 16, 16, dc);
}
pub fn pred16x16_left_dc(buf: &mut [u8], stride: usize, _top: &[u8], left: &[u8]) {
    fill_block(buf, stride, 16, 16, dc_val(sum(&left[1..17]), 4));
}
pub fn pred16x16_top_dc(buf: &mut [u8], stride: usize, top: &[u8], _left: &[u8]) {
    fill_block(buf, stride, 16, 16, dc_val(sum(&top[..16]), 4));
}
pub fn pred16x16_dc128(buf: &mut [u8], stride: usize, _top: &[u8], _left: &[u8]) {
    fill_block(buf, stride, 16, 16, 128);
}

#[derive(Clone, Copy, PartialEq)]
enum PlaneRounding {
    H264,
    Svq3,
    Rv40,
}

fn plane16(buf: &mut [u8], stride: usize, top: &[u8], left: &[u8], rounding: PlaneRounding) {
    let tl = i32::from(left[0]);
    let mut h = 8 * (i32::from(top[15]) - tl);
    let mut v = 8 * (i32::from(left[16]) - tl);
    for k in 0..7 {
        let weight = (k as i32) + 1;
        h += weight * (i32::from(top[8 + k])  - i32::from(top[6 - k]));
        v += weight * (i32::from(left[9 + k]) - i32::from(left[7 - k]));
    }

    let (h, v) = match rounding {
            PlaneRounding::H264 => ((5 * h + 32) >> 6, (5 * v + 32) >> 6),
            PlaneRounding::Svq3 => ((5 * (v / 4)) / 16, (5 * (h / 4)) / 16),
            PlaneRounding::Rv40 => ((h + (h >> 2)) >> 4, (v + (v >> 2)) >> 4),
        };

    let mut a = 16 * (i32::from(left[16]) + i32::from(top[15]) + 1) - 7 * (v + h);
    for row in buf.chunks_mut(stride).take(16) {
        let mut b = a;
        for el in row[..16].iter_mut() {
            *el = clip8(b >> 5);
            b += h;
        }
        a += v;
    }
}

pub fn pred16x16_plane(buf: &mut [u8], stride: usize, top: &[u8], left: &[u8]) {
    plane16(buf, stride, top, left, PlaneRounding::H264);
}
/// Plane prediction with SVQ3 gradient rounding (gradients are also transposed).
pub fn pred16x16_plane_svq3(buf: &mut [u8], stride: usize, top: &[u8], left: &[u8]) {
    plane16(buf, stride, top, left, PlaneRounding::Svq3);
}
/// Plane prediction with RV40 gradient rounding.
pub fn pred16x16_plane_rv40(buf: &mut [u8], stride: usize, top: &[u8], left: &[u8]) {
    plane16(buf, stride, top, left, PlaneRounding::Rv40);
}

pub fn pred8x8_vertical(buf: &mut [u8], stride: usize, top: &[u8], _left: &[u8]) {
    copy_top(buf, stride, top, 8, 8);
}
pub fn pred8x8_horizontal(buf: &mut [u8], stride: usize, _top: &[u8], left: &[u8]) {
    copy_left(buf, stride, left, 8, 8);
}
/// Chroma DC: each 4x4 quadrant gets its own average.
pub fn pred8x8_dc(buf: &mut [u8], stride: usize, top: &[u8], left: &[u8]) {
    let t0 = sum(&top[..4]);
    let t1 = sum(&top[4..8]);
    let l0 = sum(&left[1..5]);
    let l1 = sum(&left[5..9]);

    let dc = [[dc_val(t0 + l0, 3), dc_val(t1, 2)],
              [dc_val(l1, 2),      dc_val(t1 + l1, 3)]];
    for (y, row) in buf.chunks_mut(stride).take(8).enumerate() {
        let quad = &dc[y >> 2];
        row[..4].copy_from_slice(&[quad[0]; 4]);
        row[4..8].copy_from_slice(&[quad[1]; 4]);
    }
}
pub fn pred8x8_left_dc(buf: &mut [u8], stride: usize, _top: &[u8], left: &[u8]) {
    let dc = [dc_val(sum(&left[1..5]), 2), dc_val(sum(&left[5..9]), 2)];
    for (y, row) in buf.chunks_mut(stride).take(8).enumerate() {
        row[..8].copy_from_slice(&[dc[y >> 2]; 8]);
    }
}
/// Chroma top DC: left and right halves average their own four top samples.
pub fn pred8x8_top_dc(buf: &mut [u8], stride: usize, top: &[u8], _left: &[u8]) {
    let dc0 = dc_val(sum(&top[..4]), 2);
    let dc1 = dc_val(sum(&top[4..8]), 2);
    for row in buf.chunks_mut(stride).take(8) {
        row[..4].copy_from_slice(&[dc0; 4]);
        row[4..8].copy_from_slice(&[dc1; 4]);
    }
}
pub fn pred8x8_dc128(buf: &mut [u8], stride: usize, _top: &[u8], _left: &[u8]) {
    fill_block(buf, stride, 8, 8, 128);
}
pub fn pred8x8_plane(buf: &mut [u8], stride: usize, top: &[u8], left: &[u8]) {
    let tl = i32::from(left[0]);
    let mut h = 4 * (i32::from(top[7]) - tl);
    let mut v = 4 * (i32::from(left[8]) - tl);
    for k in 0..3 {
        let weight = (k as i32) + 1;
        h += weight * (i32::from(top[4 + k])  - i32::from(top[2 - k]));
        v += weight * (i32::from(left[5 + k]) - i32::from(left[3 - k]));
    }
    let b = (17 * h + 16) >> 5;
    let c = (17 * v + 16) >> 5;
    let mut a = 16 * (i32::from(left[8]) + i32::from(top[7]) + 1) - 3 * (b + c);
    for row in buf.chunks_mut(stride).take(8) {
        let mut acc = a;
        for el in row[..8].iter_mut() {
            *el = clip8(acc >> 5);
            acc += b;
        }
        a += c;
    }
}

/// 4:2:2 chroma vertical prediction (8 wide, 16 tall).
pub fn pred8x16_vertical(buf: &mut [u8], stride: usize, top: &[u8], _left: &[u8]) {
    copy_top(buf, stride, top, 8, 16);
}
/// 4:2:2 chroma horizontal prediction, `left` holds 16 column samples after the corner.
pub fn pred8x16_horizontal(buf: &mut [u8], stride: usize, _top: &[u8], left: &[u8]) {
    copy_left(buf, stride, left, 8, 16);
}

pub fn pred4x4_vertical(buf: &mut [u8], stride: usize, top: &[u8], _left: &[u8]) {
    copy_top(buf, stride, top, 4, 4);
}
pub fn pred4x4_horizontal(buf: &mut [u8], stride: usize, _top: &[u8], left: &[u8]) {
    copy_left(buf, stride, left, 4, 4);
}
pub fn pred4x4_dc(buf: &mut [u8], stride: usize, top: &[u8], left: &[u8]) {
    fill_block(buf, stride, 4, 4, dc_val(sum(&top[..4]) + sum(&left[1..5]), 3));
}
pub fn pred4x4_left_dc(buf: &mut [u8], stride: usize, _top: &[u8], left: &[u8]) {
    fill_block(buf, stride, 4, 4, dc_val(sum(&left[1..5]), 2));
}
pub fn pred4x4_top_dc(buf: &mut [u8], stride: usize, top: &[u8], _left: &[u8]) {
    fill_block(buf, stride, 4, 4, dc_val(sum(&top[..4]), 2));
}
pub fn pred4x4_dc128(buf: &mut [u8], stride: usize, _top: &[u8], _left: &[u8]) {
    fill_block(buf, stride, 4, 4, 128);
}

/// Filtered neighbourhood of an 8x8 luma block.
///
/// `t` holds 16 filtered samples of the row above (the second half is the top-right
/// extension), `l` the 8 filtered left samples and `tl` the filtered corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IPred8Context {
    pub t:      [u8; 16],
    pub l:      [u8; 8],
    pub tl:     u8,
}

impl Default for IPred8Context {
    fn default() -> Self { Self::new() }
}

impl IPred8Context {
    pub fn new() -> Self {
        Self {
            t:      [128; 16],
            l:      [128; 8],
            tl:     128,
        }
    }
    /// Applies the `[1 2 1]` edge filter to the available neighbours.
    ///
    /// `top` must hold 8 samples (16 when `has_tr` is set) and `left` 9 samples with
    /// the corner first. Missing top-right samples replicate the last top sample and a
    /// missing corner replicates the nearest edge sample.
    pub fn fill(&mut self, top: &[u8], left: &[u8], has_t: bool, has_tr: bool, has_l: bool, has_tl: bool) {
        // edges padded by one sample on each side for the 3-tap filter
        let mut t = [128u8; 18];
        let mut l = [128u8; 10];
        if has_t {
            t[1..9].copy_from_slice(&top[..8]);
        }
        if has_tr {
            t[9..17].copy_from_slice(&top[8..16]);
        } else {
            let last = t[8];
            for el in t[9..17].iter_mut() {
                *el = last;
            }
        }
        t[17] = t[16];
        if has_l {
            l[1..9].copy_from_slice(&left[1..9]);
        }
        l[9] = l[8];
        if has_tl {
            t[0] = left[0];
            l[0] = left[0];
        } else {
            t[0] = t[1];
            l[0] = l[1];
        }

        for (dst, win) in self.t.iter_mut().zip(t.windows(3)) {
            *dst = ((u16::from(win[0]) + 2 * u16::from(win[1]) + u16::from(win[2]) + 2) >> 2) as u8;
        }
        for (dst, win) in self.l.iter_mut().zip(l.windows(3)) {
            *dst = ((u16::from(win[0]) + 2 * u16::from(win[1]) + u16::from(win[2]) + 2) >> 2) as u8;
        }
        self.tl = match (has_t, has_l) {
                (true, true)  => ((u16::from(t[1]) + 2 * u16::from(t[0]) + u16::from(l[1]) + 2) >> 2) as u8,
                (true, false) => ((3 * u16::from(t[0]) + u16::from(t[1]) + 2) >> 2) as u8,
                (false, true) => ((3 * u16::from(l[0]) + u16::from(l[1]) + 2) >> 2) as u8,
                (false, false) => t[0],
            };
    }
}

pub fn pred8x8l_vertical(buf: &mut [u8], stride: usize, ctx: &IPred8Context) {
    copy_top(buf, stride, &ctx.t, 8, 8);
}
pub fn pred8x8l_horizontal(buf: &mut [u8], stride: usize, ctx: &IPred8Context) {
    for (row, &val) in buf.chunks_mut(stride).zip(ctx.l.iter()) {
        for el in row[..8].iter_mut() {
            *el = val;
        }
    }
}
pub fn pred8x8l_dc(buf: &mut [u8], stride: usize, ctx: &IPred8Context) {
    fill_block(buf, stride, 8, 8, dc_val(sum(&ctx.t[..8]) + sum(&ctx.l), 4));
}
pub fn pred8x8l_left_dc(buf: &mut [u8], stride: usize, ctx: &IPred8Context) {
    fill_block(buf, stride, 8, 8, dc_val(sum(&ctx.l), 3));
}
pub fn pred8x8l_top_dc(buf: &mut [u8], stride: usize, ctx: &IPred8Context) {
    fill_block(buf, stride, 8, 8, dc_val(sum(&ctx.t[..8]), 3));
}
pub fn pred8x8l_dc128(buf: &mut [u8], stride: usize, _ctx: &IPred8Context) {
    fill_block(buf, stride, 8, 8, 128);
}

/// 16x16 predictors in bitstream mode order followed by the DC fallbacks.
pub const IPRED_FUNCS16X16: [IPredFunc; 7] = [
    pred16x16_vertical, pred16x16_horizontal, pred16x16_dc, pred16x16_plane,
    pred16x16_left_dc, pred16x16_top_dc, pred16x16_dc128
];

/// Chroma predictors in bitstream mode order followed by the DC fallbacks.
pub const IPRED_FUNCS_CHROMA: [IPredFunc; 7] = [
    pred8x8_dc, pred8x8_horizontal, pred8x8_vertical, pred8x8_plane,
    pred8x8_left_dc, pred8x8_top_dc, pred8x8_dc128
];

pub const IPRED_FUNCS4X4: [IPredFunc; 6] = [
    pred4x4_vertical, pred4x4_horizontal, pred4x4_dc,
    pred4x4_left_dc, pred4x4_top_dc, pred4x4_dc128
];

pub const IPRED_FUNCS8X8_LUMA: [IPred8LumaFunc; 6] = [
    pred8x8l_vertical, pred8x8l_horizontal, pred8x8l_dc,
    pred8x8l_left_dc, pred8x8l_top_dc, pred8x8l_dc128
];
