//! Motion compensation: quarter-sample luma interpolation, eighth-sample chroma
//! interpolation and explicit weighted prediction.
//!
//! Luma source slices start two rows above and two columns left of the block origin
//! so the 6-tap filter can reach its neighbours; chroma source slices start at the
//! block origin. Block widths are indexed largest first (`16, 8, 4` for luma,
//! `8, 4, 2` for chroma, `16, 8, 4, 2` for weighting) and luma phases by `x + y * 4`.

use tracing::{debug, trace};

use crate::error::{check_area, DspError, DspResult};

macro_rules! module_selector {
    ($( ($cond:meta, $module:ident) ),*) => {
        module_selector!(list; r#false; $(($cond, $module)),*);
    };
    (list; $nocond:meta; ($ccar:meta, $carmod:ident), $(($condcdr:meta, $cdrmod:ident)),*) => {
        module_selector!(single; $nocond; $ccar; $carmod);
        module_selector!(list; any($nocond, $ccar); $(($condcdr, $cdrmod)),*);
    };
    (list; $nocond:meta; ($yescond:meta, $module:ident)) => {
        module_selector!(single; $nocond; $yescond; $module);
    };
    (list; $_:meta; ) => {};
    (single; $nocond:meta; $yescond:meta; $module:ident) => {
        #[cfg(all(not($nocond), $yescond))]
        mod $module;
        #[cfg(all(not($nocond), $yescond))]
        use $module::*;
    };
}

/// Builds one quarter-sample position as the rounded average of two predictions,
/// each taken from the source shifted by `(x, y)` samples.
macro_rules! qpel_pair {
    ($name:ident, $first:ident, $x0:expr, $y0:expr, $second:ident, $x1:expr, $y1:expr) => {
        fn $name(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize) {
            let (x0, y0, x1, y1): (usize, usize, usize, usize) = ($x0, $y0, $x1, $y1);
            let mut tmp  = [0u8; TMP_BUF_STRIDE * 16];
            let mut tmp2 = [0u8; TMP_BUF_STRIDE * 16];
            $first(&mut tmp,   TMP_BUF_STRIDE, &src[x0 + y0 * sstride..], sstride, w, h);
            $second(&mut tmp2, TMP_BUF_STRIDE, &src[x1 + y1 * sstride..], sstride, w, h);
            avg_pair(dst, dstride, &tmp, &tmp2, w, h);
        }
    }
}

macro_rules! luma_mc {
    ($orig:ident: $put16:ident, $put8:ident, $put4:ident; $avg16:ident, $avg8:ident, $avg4:ident) => {
        fn $put16(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, h: usize) {
            $orig(dst, dstride, src, sstride, 16, h);
        }
        fn $put8(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, h: usize) {
            $orig(dst, dstride, src, sstride, 8, h);
        }
        fn $put4(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, h: usize) {
            $orig(dst, dstride, src, sstride, 4, h);
        }
        fn $avg16(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, h: usize) {
            avg_mc($orig, dst, dstride, src, sstride, 16, h);
        }
        fn $avg8(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, h: usize) {
            avg_mc($orig, dst, dstride, src, sstride, 8, h);
        }
        fn $avg4(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, h: usize) {
            avg_mc($orig, dst, dstride, src, sstride, 4, h);
        }
    }
}

/// Expands the complete interpolation set on top of a backend's primitives
/// (`put_full`, `put_hpel_h`, `put_hpel_v`, `put_hpel_hv`, `avg_pair`, `avg_into`
/// and `chroma_interp`).
macro_rules! qpel_functions {
    () => {
        fn mc00(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize) {
            put_full(dst, dstride, src, sstride, w, h);
        }
        fn mc20(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize) {
            put_hpel_h(dst, dstride, src, sstride, w, h);
        }
        fn mc02(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize) {
            put_hpel_v(dst, dstride, src, sstride, w, h);
        }
        fn mc22(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize) {
            put_hpel_hv(dst, dstride, src, sstride, w, h);
        }

        qpel_pair!(mc10, put_full,   0, 0, put_hpel_h,  0, 0);
        qpel_pair!(mc30, put_full,   1, 0, put_hpel_h,  0, 0);
        qpel_pair!(mc01, put_full,   0, 0, put_hpel_v,  0, 0);
        qpel_pair!(mc03, put_full,   0, 1, put_hpel_v,  0, 0);
        qpel_pair!(mc11, put_hpel_h, 0, 0, put_hpel_v,  0, 0);
        qpel_pair!(mc31, put_hpel_h, 0, 0, put_hpel_v,  1, 0);
        qpel_pair!(mc13, put_hpel_h, 0, 1, put_hpel_v,  0, 0);
        qpel_pair!(mc33, put_hpel_h, 0, 1, put_hpel_v,  1, 0);
        qpel_pair!(mc21, put_hpel_h, 0, 0, put_hpel_hv, 0, 0);
        qpel_pair!(mc23, put_hpel_h, 0, 1, put_hpel_hv, 0, 0);
        qpel_pair!(mc12, put_hpel_v, 0, 0, put_hpel_hv, 0, 0);
        qpel_pair!(mc32, put_hpel_v, 1, 0, put_hpel_hv, 0, 0);

        fn avg_mc(put: fn(&mut [u8], usize, &[u8], usize, usize, usize), dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize) {
            let mut tmp = [0u8; TMP_BUF_STRIDE * 16];
            put(&mut tmp, TMP_BUF_STRIDE, src, sstride, w, h);
            avg_into(dst, dstride, &tmp, TMP_BUF_STRIDE, w, h);
        }

        luma_mc!(mc00: put_qpel16_mc00, put_qpel8_mc00, put_qpel4_mc00; avg_qpel16_mc00, avg_qpel8_mc00, avg_qpel4_mc00);
        luma_mc!(mc10: put_qpel16_mc10, put_qpel8_mc10, put_qpel4_mc10; avg_qpel16_mc10, avg_qpel8_mc10, avg_qpel4_mc10);
        luma_mc!(mc20: put_qpel16_mc20, put_qpel8_mc20, put_qpel4_mc20; avg_qpel16_mc20, avg_qpel8_mc20, avg_qpel4_mc20);
        luma_mc!(mc30: put_qpel16_mc30, put_qpel8_mc30, put_qpel4_mc30; avg_qpel16_mc30, avg_qpel8_mc30, avg_qpel4_mc30);
        luma_mc!(mc01: put_qpel16_mc01, put_qpel8_mc01, put_qpel4_mc01; avg_qpel16_mc01, avg_qpel8_mc01, avg_qpel4_mc01);
        luma_mc!(mc11: put_qpel16_mc11, put_qpel8_mc11, put_qpel4_mc11; avg_qpel16_mc11, avg_qpel8_mc11, avg_qpel4_mc11);
        luma_mc!(mc21: put_qpel16_mc21, put_qpel8_mc21, put_qpel4_mc21; avg_qpel16_mc21, avg_qpel8_mc21, avg_qpel4_mc21);
        luma_mc!(mc31: put_qpel16_mc31, put_qpel8_mc31, put_qpel4_mc31; avg_qpel16_mc31, avg_qpel8_mc31, avg_qpel4_mc31);
        luma_mc!(mc02: put_qpel16_mc02, put_qpel8_mc02, put_qpel4_mc02; avg_qpel16_mc02, avg_qpel8_mc02, avg_qpel4_mc02);
        luma_mc!(mc12: put_qpel16_mc12, put_qpel8_mc12, put_qpel4_mc12; avg_qpel16_mc12, avg_qpel8_mc12, avg_qpel4_mc12);
        luma_mc!(mc22: put_qpel16_mc22, put_qpel8_mc22, put_qpel4_mc22; avg_qpel16_mc22, avg_qpel8_mc22, avg_qpel4_mc22);
        luma_mc!(mc32: put_qpel16_mc32, put_qpel8_mc32, put_qpel4_mc32; avg_qpel16_mc32, avg_qpel8_mc32, avg_qpel4_mc32);
        luma_mc!(mc03: put_qpel16_mc03, put_qpel8_mc03, put_qpel4_mc03; avg_qpel16_mc03, avg_qpel8_mc03, avg_qpel4_mc03);
        luma_mc!(mc13: put_qpel16_mc13, put_qpel8_mc13, put_qpel4_mc13; avg_qpel16_mc13, avg_qpel8_mc13, avg_qpel4_mc13);
        luma_mc!(mc23: put_qpel16_mc23, put_qpel8_mc23, put_qpel4_mc23; avg_qpel16_mc23, avg_qpel8_mc23, avg_qpel4_mc23);
        luma_mc!(mc33: put_qpel16_mc33, put_qpel8_mc33, put_qpel4_mc33; avg_qpel16_mc33, avg_qpel8_mc33, avg_qpel4_mc33);
        pub(crate) const H264_LUMA_PUT: &[[MCFunc; 16]; 3] = &[
          [
            put_qpel16_mc00, put_qpel16_mc10, put_qpel16_mc20, put_qpel16_mc30,
            put_qpel16_mc01, put_qpel16_mc11, put_qpel16_mc21, put_qpel16_mc31,
            put_qpel16_mc02, put_qpel16_mc12, put_qpel16_mc22, put_qpel16_mc32,
            put_qpel16_mc03, put_qpel16_mc13, put_qpel16_mc23, put_qpel16_mc33
          ],
          [
            put_qpel8_mc00, put_qpel8_mc10, put_qpel8_mc20, put_qpel8_mc30,
            put_qpel8_mc01, put_qpel8_mc11, put_qpel8_mc21, put_qpel8_mc31,
            put_qpel8_mc02, put_qpel8_mc12, put_qpel8_mc22, put_qpel8_mc32,
            put_qpel8_mc03, put_qpel8_mc13, put_qpel8_mc23, put_qpel8_mc33
          ],
          [
            put_qpel4_mc00, put_qpel4_mc10, put_qpel4_mc20, put_qpel4_mc30,
            put_qpel4_mc01, put_qpel4_mc11, put_qpel4_mc21, put_qpel4_mc31,
            put_qpel4_mc02, put_qpel4_mc12, put_qpel4_mc22, put_qpel4_mc32,
            put_qpel4_mc03, put_qpel4_mc13, put_qpel4_mc23, put_qpel4_mc33
          ]
        ];
        pub(crate) const H264_LUMA_AVG: &[[MCFunc; 16]; 3] = &[
          [
            avg_qpel16_mc00, avg_qpel16_mc10, avg_qpel16_mc20, avg_qpel16_mc30,
            avg_qpel16_mc01, avg_qpel16_mc11, avg_qpel16_mc21, avg_qpel16_mc31,
            avg_qpel16_mc02, avg_qpel16_mc12, avg_qpel16_mc22, avg_qpel16_mc32,
            avg_qpel16_mc03, avg_qpel16_mc13, avg_qpel16_mc23, avg_qpel16_mc33
          ],
          [
            avg_qpel8_mc00, avg_qpel8_mc10, avg_qpel8_mc20, avg_qpel8_mc30,
            avg_qpel8_mc01, avg_qpel8_mc11, avg_qpel8_mc21, avg_qpel8_mc31,
            avg_qpel8_mc02, avg_qpel8_mc12, avg_qpel8_mc22, avg_qpel8_mc32,
            avg_qpel8_mc03, avg_qpel8_mc13, avg_qpel8_mc23, avg_qpel8_mc33
          ],
          [
            avg_qpel4_mc00, avg_qpel4_mc10, avg_qpel4_mc20, avg_qpel4_mc30,
            avg_qpel4_mc01, avg_qpel4_mc11, avg_qpel4_mc21, avg_qpel4_mc31,
            avg_qpel4_mc02, avg_qpel4_mc12, avg_qpel4_mc22, avg_qpel4_mc32,
            avg_qpel4_mc03, avg_qpel4_mc13, avg_qpel4_mc23, avg_qpel4_mc33
          ]
        ];

        fn put_chroma_mc8(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, h: usize, x: u8, y: u8) {
            chroma_interp(dst, dstride, src, sstride, 8, h, x, y, false);
        }
        fn put_chroma_mc4(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, h: usize, x: u8, y: u8) {
            chroma_interp(dst, dstride, src, sstride, 4, h, x, y, false);
        }
        fn put_chroma_mc2(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, h: usize, x: u8, y: u8) {
            chroma_interp(dst, dstride, src, sstride, 2, h, x, y, false);
        }
        fn avg_chroma_mc8(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, h: usize, x: u8, y: u8) {
            chroma_interp(dst, dstride, src, sstride, 8, h, x, y, true);
        }
        fn avg_chroma_mc4(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, h: usize, x: u8, y: u8) {
            chroma_interp(dst, dstride, src, sstride, 4, h, x, y, true);
        }
        fn avg_chroma_mc2(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, h: usize, x: u8, y: u8) {
            chroma_interp(dst, dstride, src, sstride, 2, h, x, y, true);
        }

        pub(crate) const H264_CHROMA_PUT: [ChromaMCFunc; 3] = [put_chroma_mc8, put_chroma_mc4, put_chroma_mc2];
        pub(crate) const H264_CHROMA_AVG: [ChromaMCFunc; 3] = [avg_chroma_mc8, avg_chroma_mc4, avg_chroma_mc2];
    }
}

module_selector! (
    (all(feature = "simd", not(debug_assertions)), release),
    (any(debug_assertions, not(feature = "simd")), debug)
);

/// Luma interpolation for one block width and phase.
pub type MCFunc = fn(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, h: usize);
/// Chroma interpolation for one block width, `x` and `y` are eighth-sample phases.
pub type ChromaMCFunc = fn(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, h: usize, x: u8, y: u8);
/// Explicit weighted prediction of a block in place.
pub type WeightFunc = fn(block: &mut [u8], stride: usize, h: usize, log2_denom: u8, weight: i32, offset: i32);
/// Bi-predictive weighting of `src` into `dst`.
pub type BiWeightFunc = fn(dst: &mut [u8], src: &[u8], stride: usize, h: usize, log2_denom: u8, weightd: i32, weights: i32, offset: i32);

const TMP_BUF_STRIDE: usize = 16;

fn clip_u8(val: i32) -> u8 { val.max(0).min(255) as u8 }

#[inline(always)]
fn tap6(a: i32, b: i32, c: i32, d: i32, e: i32, f: i32) -> i32 {
    a + f - 5 * (b + e) + 20 * (c + d)
}

pub(crate) trait RegisterSIMD {
    fn register_simd(&mut self);
}

/// Name of the compiled-in interpolation backend.
pub fn backend_name() -> &'static str { BACKEND }

fn weight_pixels(block: &mut [u8], stride: usize, w: usize, h: usize, log2_denom: u8, weight: i32, offset: i32) {
    let offset = (offset << log2_denom) + if log2_denom > 0 { 1 << (log2_denom - 1) } else { 0 };
    for row in block.chunks_mut(stride).take(h) {
        for el in row[..w].iter_mut() {
            *el = clip_u8((i32::from(*el) * weight + offset) >> log2_denom);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn biweight_pixels(dst: &mut [u8], src: &[u8], stride: usize, w: usize, h: usize, log2_denom: u8, weightd: i32, weights: i32, offset: i32) {
    let offset = ((offset + 1) | 1) << log2_denom;
    let shift = log2_denom + 1;
    for (drow, srow) in dst.chunks_mut(stride).zip(src.chunks(stride)).take(h) {
        for (el, &s) in drow[..w].iter_mut().zip(srow[..w].iter()) {
            *el = clip_u8((i32::from(s) * weights + i32::from(*el) * weightd + offset) >> shift);
        }
    }
}

pub fn weight_h264_pixels16(block: &mut [u8], stride: usize, h: usize, log2_denom: u8, weight: i32, offset: i32) {
    weight_pixels(block, stride, 16, h, log2_denom, weight, offset);
}
pub fn weight_h264_pixels8(block: &mut [u8], stride: usize, h: usize, log2_denom: u8, weight: i32, offset: i32) {
    weight_pixels(block, stride, 8, h, log2_denom, weight, offset);
}
pub fn weight_h264_pixels4(block: &mut [u8], stride: usize, h: usize, log2_denom: u8, weight: i32, offset: i32) {
    weight_pixels(block, stride, 4, h, log2_denom, weight, offset);
}
pub fn weight_h264_pixels2(block: &mut [u8], stride: usize, h: usize, log2_denom: u8, weight: i32, offset: i32) {
    weight_pixels(block, stride, 2, h, log2_denom, weight, offset);
}

#[allow(clippy::too_many_arguments)]
pub fn biweight_h264_pixels16(dst: &mut [u8], src: &[u8], stride: usize, h: usize, log2_denom: u8, weightd: i32, weights: i32, offset: i32) {
    biweight_pixels(dst, src, stride, 16, h, log2_denom, weightd, weights, offset);
}
#[allow(clippy::too_many_arguments)]
pub fn biweight_h264_pixels8(dst: &mut [u8], src: &[u8], stride: usize, h: usize, log2_denom: u8, weightd: i32, weights: i32, offset: i32) {
    biweight_pixels(dst, src, stride, 8, h, log2_denom, weightd, weights, offset);
}
#[allow(clippy::too_many_arguments)]
pub fn biweight_h264_pixels4(dst: &mut [u8], src: &[u8], stride: usize, h: usize, log2_denom: u8, weightd: i32, weights: i32, offset: i32) {
    biweight_pixels(dst, src, stride, 4, h, log2_denom, weightd, weights, offset);
}
#[allow(clippy::too_many_arguments)]
pub fn biweight_h264_pixels2(dst: &mut [u8], src: &[u8], stride: usize, h: usize, log2_denom: u8, weightd: i32, weights: i32, offset: i32) {
    biweight_pixels(dst, src, stride, 2, h, log2_denom, weightd, weights, offset);
}

fn check_weight_range(val: i32) -> DspResult<()> {
    if (i32::from(i8::MIN)..=i32::from(i8::MAX)).contains(&val) {
        Ok(())
    } else {
        Err(DspError::Weight(val))
    }
}

fn check_offset_range(val: i32) -> DspResult<()> {
    if (i32::from(i8::MIN)..=i32::from(i8::MAX)).contains(&val) {
        Ok(())
    } else {
        Err(DspError::Offset(val))
    }
}

fn check_denom(log2_denom: u8) -> DspResult<()> {
    if log2_denom > 7 {
        return Err(DspError::WeightDenom(log2_denom));
    }
    Ok(())
}

/// Validated parameters for single-list explicit weighting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightParams {
    pub log2_denom: u8,
    pub weight:     i32,
    pub offset:     i32,
}

impl WeightParams {
    pub fn new(log2_denom: u8, weight: i32, offset: i32) -> DspResult<Self> {
        check_denom(log2_denom)?;
        check_weight_range(weight)?;
        check_offset_range(offset)?;
        Ok(Self { log2_denom, weight, offset })
    }
    /// Parameters that leave every sample unchanged.
    pub fn identity(log2_denom: u8) -> DspResult<Self> {
        check_denom(log2_denom)?;
        Ok(Self { log2_denom, weight: 1 << log2_denom, offset: 0 })
    }
}

/// Validated parameters for bi-predictive weighting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BiWeightParams {
    pub log2_denom: u8,
    pub weightd:    i32,
    pub weights:    i32,
    pub offset:     i32,
}

impl BiWeightParams {
    pub fn new(log2_denom: u8, weightd: i32, weights: i32, offset: i32) -> DspResult<Self> {
        check_denom(log2_denom)?;
        check_weight_range(weightd)?;
        check_weight_range(weights)?;
        check_offset_range(offset)?;
        Ok(Self { log2_denom, weightd, weights, offset })
    }
}

/// Maps a weighting block width to its table index.
pub(crate) fn weight_width_idx(w: usize) -> DspResult<usize> {
    match w {
        16 => Ok(0),
        8  => Ok(1),
        4  => Ok(2),
        2  => Ok(3),
        _  => Err(DspError::BlockWidth(w)),
    }
}

/// Interpolation function tables.
#[derive(Clone, Copy)]
pub struct H264QpelContext {
    /// `put_luma[size][x + y * 4]` for block widths 16, 8 and 4.
    pub put_luma:   [[MCFunc; 16]; 3],
    pub avg_luma:   [[MCFunc; 16]; 3],
    /// `put_chroma[size]` for block widths 8, 4 and 2.
    pub put_chroma: [ChromaMCFunc; 3],
    pub avg_chroma: [ChromaMCFunc; 3],
}

impl Default for H264QpelContext {
    fn default() -> Self { Self::new() }
}

impl H264QpelContext {
    pub fn new() -> Self {
        let mut obj = Self {
            put_luma:   *H264_LUMA_PUT,
            avg_luma:   *H264_LUMA_AVG,
            put_chroma: H264_CHROMA_PUT,
            avg_chroma: H264_CHROMA_AVG,
        };
        obj.register_simd();
        debug!(backend = backend_name(), "qpel context initialised");
        obj
    }

    /// Interpolates a `w`x`h` luma block at quarter-sample phase `(dx, dy)`.
    ///
    /// `src` starts two rows above and two columns left of the reference block.
    /// With `avg` set the prediction is averaged into `dst` instead of stored.
    #[allow(clippy::too_many_arguments)]
    pub fn luma_mc(&self, avg: bool, dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize,
                   w: usize, h: usize, dx: u8, dy: u8) -> DspResult<()> {
        let size = match w {
                16 => 0,
                8  => 1,
                4  => 2,
                _  => return Err(DspError::BlockWidth(w)),
            };
        if !matches!(h, 4 | 8 | 16) || h > w * 2 || h * 2 < w {
            return Err(DspError::BlockHeight { width: w, height: h });
        }
        if dx > 3 || dy > 3 {
            return Err(DspError::SubpelPhase { x: dx, y: dy, max: 3 });
        }
        check_area(dst.len(), dstride, w, h)?;
        check_area(src.len(), sstride, w + 5, h + 5)?;
        trace!(w, h, dx, dy, avg, "luma mc");

        let mode = usize::from(dx) + usize::from(dy) * 4;
        let table = if avg { &self.avg_luma } else { &self.put_luma };
        (table[size][mode])(dst, dstride, src, sstride, h);
        Ok(())
    }

    /// Interpolates a `w`x`h` chroma block at eighth-sample phase `(dx, dy)`.
    ///
    /// `src` starts at the reference block and must cover one extra row and column.
    #[allow(clippy::too_many_arguments)]
    pub fn chroma_mc(&self, avg: bool, dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize,
                     w: usize, h: usize, dx: u8, dy: u8) -> DspResult<()> {
        let size = match w {
                8 => 0,
                4 => 1,
                2 => 2,
                _ => return Err(DspError::BlockWidth(w)),
            };
        if !matches!(h, 2 | 4 | 8 | 16) {
            return Err(DspError::BlockHeight { width: w, height: h });
        }
        if dx > 7 || dy > 7 {
            return Err(DspError::SubpelPhase { x: dx, y: dy, max: 7 });
        }
        check_area(dst.len(), dstride, w, h)?;
        // the bilinear taps reach one column right and one row down only for a non-zero phase
        let src_w = if dx != 0 { w + 1 } else { w };
        let src_h = if dy != 0 { h + 1 } else { h };
        check_area(src.len(), sstride, src_w, src_h)?;
        trace!(w, h, dx, dy, avg, "chroma mc");

        let table = if avg { &self.avg_chroma } else { &self.put_chroma };
        (table[size])(dst, dstride, src, sstride, h, dx, dy);
        Ok(())
    }
}
