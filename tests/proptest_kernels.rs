//! Property-based tests for the reconstruction, deblocking and prediction kernels.
//!
//! Uses proptest to check the algebraic guarantees of the kernels and to cross-check
//! kernels that must agree with each other.

use nihav_h264dsp::idct::*;
use nihav_h264dsp::ipred::*;
use nihav_h264dsp::loopfilter::*;
use nihav_h264dsp::mc::*;
use nihav_h264dsp::{H264DSPContext, H264QpelContext, WeightParams};
use proptest::prelude::*;

fn plane(len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), len)
}

// =============================================================================
// Inverse transform
// =============================================================================

/// One 8-point pass of the inverse transform, written out as even and odd halves.
fn idct8_1d(b: [i32; 8]) -> [i32; 8] {
    let a0 = b[0] + b[4];
    let a2 = b[0] - b[4];
    let a4 = (b[2] >> 1) - b[6];
    let a6 = b[2] + (b[6] >> 1);

    let b0 = a0 + a6;
    let b2 = a2 + a4;
    let b4 = a2 - a4;
    let b6 = a0 - a6;

    let a1 = -b[3] + b[5] - b[7] - (b[7] >> 1);
    let a3 = b[1] + b[7] - b[3] - (b[3] >> 1);
    let a5 = -b[1] + b[7] + b[5] + (b[5] >> 1);
    let a7 = b[3] + b[5] + b[1] + (b[1] >> 1);

    let b1 = (a7 >> 2) + a1;
    let b3 = a3 + (a5 >> 2);
    let b5 = (a3 >> 2) - a5;
    let b7 = a7 - (a1 >> 2);

    [b0 + b7, b2 + b5, b4 + b3, b6 + b1, b6 - b1, b4 - b3, b2 - b5, b0 - b7]
}

/// Separable 8x8 reconstruction: rows stored back as 16-bit, then columns.
fn ref_idct8_add(pred: &[u8], coeffs: &[i16]) -> Vec<u8> {
    let mut m = [[0i32; 8]; 8];
    for (y, row) in m.iter_mut().enumerate() {
        let mut line = [0i32; 8];
        for (x, el) in line.iter_mut().enumerate() {
            *el = i32::from(coeffs[x + y * 8]);
        }
        if y == 0 {
            line[0] = i32::from(coeffs[0].wrapping_add(32));
        }
        for (dst, src) in row.iter_mut().zip(idct8_1d(line).iter()) {
            *dst = i32::from(*src as i16);
        }
    }
    let mut out = pred.to_vec();
    for x in 0..8 {
        let col = idct8_1d([m[0][x], m[1][x], m[2][x], m[3][x], m[4][x], m[5][x], m[6][x], m[7][x]]);
        for (y, &val) in col.iter().enumerate() {
            out[x + y * 8] = (i32::from(pred[x + y * 8]) + (val >> 6)).max(0).min(255) as u8;
        }
    }
    out
}

proptest! {
    /// DC-only blocks give the same result through the shortcut and the full transform.
    #[test]
    fn dc_shortcut_matches_idct4(dc in -2048i16..=2047, pred in plane(4 * 4)) {
        let mut full = pred.clone();
        let mut fast = pred;
        let mut blk = [0i16; 16];
        blk[0] = dc;
        idct_add(&mut full, 0, 4, &mut blk);
        prop_assert_eq!(blk, [0i16; 16]);
        blk[0] = dc;
        idct_dc_add(&mut fast, 0, 4, &mut blk);
        prop_assert_eq!(blk[0], 0);
        prop_assert_eq!(full, fast);
    }

    /// Same for the 8x8 transform.
    #[test]
    fn dc_shortcut_matches_idct8(dc in -2048i16..=2047, pred in plane(8 * 8)) {
        let mut full = pred.clone();
        let mut fast = pred;
        let mut blk = [0i16; 64];
        blk[0] = dc;
        idct8_add(&mut full, 0, 8, &mut blk);
        blk[0] = dc;
        idct8_dc_add(&mut fast, 0, 8, &mut blk);
        prop_assert_eq!(full, fast);
    }

    /// Full 8x8 blocks match the separable even/odd reference and are consumed.
    #[test]
    fn idct8_matches_reference(coeffs in prop::collection::vec(-1024i16..=1023, 64), pred in plane(8 * 8)) {
        let expected = ref_idct8_add(&pred, &coeffs);
        let mut dst = pred;
        let mut blk = [0i16; 64];
        blk.copy_from_slice(&coeffs);
        idct8_add(&mut dst, 0, 8, &mut blk);
        prop_assert_eq!(dst, expected);
        prop_assert_eq!(&blk[..], &[0i16; 64][..]);
    }

    /// The transform consumes its coefficients and touches only its own 4x4 area.
    #[test]
    fn idct4_clears_and_stays_inside(coeffs in prop::collection::vec(-512i16..=511, 16), pred in plane(6 * 5)) {
        let mut dst = pred.clone();
        let mut blk = [0i16; 16];
        blk.copy_from_slice(&coeffs);
        idct_add(&mut dst, 1, 6, &mut blk);
        prop_assert_eq!(blk, [0i16; 16]);
        for (i, (&d, &p)) in dst.iter().zip(pred.iter()).enumerate() {
            let (x, y) = (i % 6, i / 6);
            if !(1..5).contains(&x) || y >= 4 {
                prop_assert_eq!(d, p);
            }
        }
    }

    /// Bypass blocks add the residual modulo 256 and clear it.
    #[test]
    fn add_pixels_is_modular(coeffs in prop::collection::vec(-255i16..=255, 16), pred in plane(16)) {
        let mut dst = pred.clone();
        let mut blk = [0i16; 16];
        blk.copy_from_slice(&coeffs);
        add_pixels4_clear(&mut dst, 0, 4, &mut blk);
        prop_assert_eq!(blk, [0i16; 16]);
        for ((&d, &p), &c) in dst.iter().zip(pred.iter()).zip(coeffs.iter()) {
            prop_assert_eq!(d, p.wrapping_add(c as u8));
        }
    }
}

// =============================================================================
// Deblocking
// =============================================================================

/// Eight columns per row with the vertical edge between columns 3 and 4.
fn edge_rows(rows: usize) -> impl Strategy<Value = Vec<u8>> {
    plane(8 * rows)
}

proptest! {
    /// Lines whose step across the edge reaches alpha are never filtered.
    #[test]
    fn large_step_is_preserved(alpha in 0i16..=255, beta in 0i16..=18, tc in 0i8..=25,
                               p in 0u8..=255, q in 0u8..=255) {
        let alpha = alpha.min((i16::from(p) - i16::from(q)).abs());
        let mut buf = Vec::with_capacity(8 * 16);
        for _ in 0..16 {
            buf.extend_from_slice(&[p, p, p, p, q, q, q, q]);
        }
        let orig = buf.clone();
        h_loop_filter_luma(&mut buf, 4, 8, alpha, beta, &[tc; 4]);
        prop_assert_eq!(&buf, &orig);
        h_loop_filter_luma_intra(&mut buf, 4, 8, alpha, beta);
        prop_assert_eq!(&buf, &orig);
        h_loop_filter_chroma(&mut buf, 4, 8, alpha, beta, &[tc; 4]);
        prop_assert_eq!(&buf, &orig);
        h_loop_filter_chroma_intra(&mut buf, 4, 8, alpha, beta);
        prop_assert_eq!(&buf, &orig);
    }

    /// A segment with a negative tc0 is left alone while the others may be filtered.
    #[test]
    fn skipped_segment_is_untouched(buf in edge_rows(16), seg in 0usize..4,
                                    alpha in 0i16..=255, beta in 0i16..=18, tc in 0i8..=25) {
        let mut tc0 = [tc; 4];
        tc0[seg] = -1;
        let mut luma = buf.clone();
        h_loop_filter_luma(&mut luma, 4, 8, alpha, beta, &tc0);
        prop_assert_eq!(&luma[seg * 4 * 8..][..4 * 8], &buf[seg * 4 * 8..][..4 * 8]);

        let mut chroma = buf.clone();
        h_loop_filter_chroma(&mut chroma, 4, 8, alpha, beta, &tc0);
        prop_assert_eq!(&chroma[seg * 2 * 8..][..2 * 8], &buf[seg * 2 * 8..][..2 * 8]);
    }

    /// Filtering across a horizontal edge is the transpose of filtering across a vertical one.
    #[test]
    fn edge_direction_is_transposed(buf in edge_rows(16), alpha in 0i16..=255, beta in 0i16..=18,
                                    tc0 in prop::array::uniform4(-1i8..=25), bs4 in any::<bool>()) {
        let mut tr = vec![0u8; 16 * 8];
        for y in 0..16 {
            for x in 0..8 {
                tr[y + x * 16] = buf[x + y * 8];
            }
        }
        let mut hor = buf;
        if bs4 {
            h_loop_filter_luma_intra(&mut hor, 4, 8, alpha, beta);
            v_loop_filter_luma_intra(&mut tr, 4 * 16, 16, alpha, beta);
        } else {
            h_loop_filter_luma(&mut hor, 4, 8, alpha, beta, &tc0);
            v_loop_filter_luma(&mut tr, 4 * 16, 16, alpha, beta, &tc0);
        }
        for y in 0..16 {
            for x in 0..8 {
                prop_assert_eq!(tr[y + x * 16], hor[x + y * 8]);
            }
        }
    }
}

// =============================================================================
// Weighted prediction
// =============================================================================

proptest! {
    /// Weight `1 << log2_denom` without offset keeps every sample.
    #[test]
    fn unit_weight_is_identity(blk in plane(16 * 16), log2_denom in 0u8..=7) {
        let ctx = H264DSPContext::new();
        let funcs: [(usize, WeightFunc); 4] = [
                (16, weight_h264_pixels16), (8, weight_h264_pixels8),
                (4, weight_h264_pixels4), (2, weight_h264_pixels2)
            ];
        for (w, weight) in funcs.iter() {
            let mut dst = blk.clone();
            weight(&mut dst, 16, 16, log2_denom, 1 << log2_denom, 0);
            prop_assert_eq!(&dst, &blk);
            let params = WeightParams::identity(log2_denom).unwrap();
            ctx.weight_block(&mut dst, 16, *w, 16, &params).unwrap();
            prop_assert_eq!(&dst, &blk);
        }
    }

    /// Equal unit weights reduce to a rounded average.
    #[test]
    fn equal_biweight_is_average(src in plane(8 * 8), dst in plane(8 * 8)) {
        let mut out = dst.clone();
        biweight_h264_pixels8(&mut out, &src, 8, 8, 0, 1, 1, 0);
        for ((&o, &s), &d) in out.iter().zip(src.iter()).zip(dst.iter()) {
            prop_assert_eq!(u16::from(o), (u16::from(s) + u16::from(d) + 1) >> 1);
        }
    }

    /// Table entries installed by the backend agree with the portable kernels.
    #[test]
    fn context_weight_matches_portable(blk in plane(16 * 16), src in plane(16 * 16), log2_denom in 0u8..=7,
                                       wd in -128i32..=127, ws in -128i32..=127, offset in -128i32..=127) {
        let ctx = H264DSPContext::new();
        let mut a = blk.clone();
        let mut b = blk.clone();
        (ctx.weight[0])(&mut a, 16, 16, log2_denom, wd, offset);
        weight_h264_pixels16(&mut b, 16, 16, log2_denom, wd, offset);
        prop_assert_eq!(&a, &b);

        let mut a = blk.clone();
        let mut b = blk;
        (ctx.biweight[0])(&mut a, &src, 16, 16, log2_denom, wd, ws, offset);
        biweight_h264_pixels16(&mut b, &src, 16, 16, log2_denom, wd, ws, offset);
        prop_assert_eq!(a, b);
    }
}

// =============================================================================
// Motion compensation
// =============================================================================

const SSTRIDE: usize = 24;

proptest! {
    /// A 16x16 prediction equals its four 8x8 quarters predicted separately.
    #[test]
    fn luma_mc_splits_into_quarters(src in plane(SSTRIDE * 24), dx in 0u8..4, dy in 0u8..4) {
        let ctx = H264QpelContext::new();
        let mut whole = [0u8; 16 * 16];
        ctx.luma_mc(false, &mut whole, 16, &src, SSTRIDE, 16, 16, dx, dy).unwrap();
        let mut parts = [0u8; 16 * 16];
        for &(bx, by) in [(0, 0), (8, 0), (0, 8), (8, 8)].iter() {
            ctx.luma_mc(false, &mut parts[bx + by * 16..], 16, &src[bx + by * SSTRIDE..], SSTRIDE, 8, 8, dx, dy).unwrap();
        }
        prop_assert_eq!(&whole[..], &parts[..]);
    }

    /// Every phase averages into the destination as a rounded mean with the put result.
    #[test]
    fn luma_avg_is_rounded_mean(src in plane(SSTRIDE * 24), prev in plane(4 * 8), dx in 0u8..4, dy in 0u8..4) {
        let ctx = H264QpelContext::new();
        let mut pred = [0u8; 4 * 8];
        ctx.luma_mc(false, &mut pred, 4, &src, SSTRIDE, 4, 8, dx, dy).unwrap();
        let mut dst = prev.clone();
        ctx.luma_mc(true, &mut dst, 4, &src, SSTRIDE, 4, 8, dx, dy).unwrap();
        for ((&d, &p), &o) in dst.iter().zip(pred.iter()).zip(prev.iter()) {
            prop_assert_eq!(u16::from(d), (u16::from(p) + u16::from(o) + 1) >> 1);
        }
    }

    /// Chroma interpolation of an 8-wide block equals two 4-wide halves.
    #[test]
    fn chroma_mc_splits_into_halves(src in plane(9 * 9), dx in 0u8..8, dy in 0u8..8) {
        let ctx = H264QpelContext::new();
        let mut whole = [0u8; 8 * 8];
        ctx.chroma_mc(false, &mut whole, 8, &src, 9, 8, 8, dx, dy).unwrap();
        let mut halves = [0u8; 8 * 8];
        ctx.chroma_mc(false, &mut halves, 8, &src, 9, 4, 8, dx, dy).unwrap();
        ctx.chroma_mc(false, &mut halves[4..], 8, &src[4..], 9, 4, 8, dx, dy).unwrap();
        prop_assert_eq!(&whole[..], &halves[..]);
    }

    /// The zero phase copies the reference for both components.
    #[test]
    fn zero_phase_copies(src in plane(SSTRIDE * 24)) {
        let ctx = H264QpelContext::new();
        let mut luma = [0u8; 8 * 8];
        ctx.luma_mc(false, &mut luma, 8, &src, SSTRIDE, 8, 8, 0, 0).unwrap();
        let mut chroma = [0u8; 8 * 8];
        ctx.chroma_mc(false, &mut chroma, 8, &src[2 + 2 * SSTRIDE..], SSTRIDE, 8, 8, 0, 0).unwrap();
        for y in 0..8 {
            prop_assert_eq!(&luma[y * 8..][..8], &src[2 + (y + 2) * SSTRIDE..][..8]);
            prop_assert_eq!(&chroma[y * 8..][..8], &src[2 + (y + 2) * SSTRIDE..][..8]);
        }
    }
}

// =============================================================================
// Intra prediction
// =============================================================================

proptest! {
    /// Flat neighbours predict a flat block in every directional and DC mode.
    #[test]
    fn flat_neighbours_predict_flat(val in any::<u8>()) {
        let top = [val; 16];
        let left = [val; 17];
        for pred in IPRED_FUNCS16X16[..IPRED_DC128].iter() {
            let mut buf = [0u8; 16 * 16];
            pred(&mut buf, 16, &top, &left);
            prop_assert!(buf.iter().all(|&p| p == val));
        }
        for pred in IPRED_FUNCS_CHROMA[..IPRED_DC128].iter() {
            let mut buf = [0u8; 8 * 8];
            pred(&mut buf, 8, &top, &left);
            prop_assert!(buf.iter().all(|&p| p == val));
        }
        for pred in IPRED_FUNCS4X4[..IPRED4_DC128].iter() {
            let mut buf = [0u8; 4 * 4];
            pred(&mut buf, 4, &top, &left);
            prop_assert!(buf.iter().all(|&p| p == val));
        }
        let mut ctx = IPred8Context::new();
        ctx.fill(&top, &left, true, true, true, true);
        for pred in IPRED_FUNCS8X8_LUMA[..5].iter() {
            let mut buf = [0u8; 8 * 8];
            pred(&mut buf, 8, &ctx);
            prop_assert!(buf.iter().all(|&p| p == val));
        }
    }
}
