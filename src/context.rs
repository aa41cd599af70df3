//! Function table for deblocking, reconstruction and weighted prediction.

use tracing::{debug, trace};

use crate::error::{check_area, DspError, DspResult};
use crate::idct::*;
use crate::loopfilter::*;
use crate::mc::*;
use crate::strength::{loop_filter_strength, STRENGTH_CACHE_SIZE};

pub type IdctFunc = fn(dst: &mut [u8], off: usize, stride: usize, blk: &mut [i16]);
pub type IdctBlocksFunc = fn(dst: &mut [u8], off: usize, stride: usize, block_offset: &[usize], coeffs: &mut [i16], nnzc: &[u8; NNZ_CACHE_SIZE]);
pub type IdctChromaFunc = fn(dst: [&mut [u8]; 2], off: [usize; 2], stride: usize, block_offset: &[usize], coeffs: &mut [i16], nnzc: &[u8; NNZ_CACHE_SIZE]);
pub type LumaDcFunc = fn(output: &mut [i16], input: &[i16; 16], qmul: i32);
pub type ChromaDcFunc = fn(blk: &mut [i16], qmul: i32);
pub type StrengthFunc = fn(bs: &mut [[[i16; 4]; 4]; 2], nnz: &[u8; STRENGTH_CACHE_SIZE],
                           refs: &[[i8; STRENGTH_CACHE_SIZE]; 2], mv: &[[[i16; 2]; STRENGTH_CACHE_SIZE]; 2],
                           bidir: bool, edges: usize, step: usize, mask_mv0: usize, mask_mv1: usize, field: bool);

/// Reconstruction kernels for one chroma format.
///
/// Chroma entries depend on the chroma format: 4:2:2 installs the taller vertical-edge
/// chroma filters, the 2x4 chroma DC transform and the eight-block chroma driver.
/// Every field is public so individual kernels can be replaced after construction.
#[derive(Clone, Copy)]
pub struct H264DSPContext {
    pub chroma_format_idc:          u8,

    /// Indexed by block width: 16, 8, 4, 2.
    pub weight:                     [WeightFunc; 4],
    pub biweight:                   [BiWeightFunc; 4],

    pub v_loop_filter_luma:         LoopFilterFunc,
    pub h_loop_filter_luma:         LoopFilterFunc,
    pub h_loop_filter_luma_mbaff:   LoopFilterFunc,
    pub v_loop_filter_luma_intra:   LoopFilterIntraFunc,
    pub h_loop_filter_luma_intra:   LoopFilterIntraFunc,
    pub h_loop_filter_luma_mbaff_intra:     LoopFilterIntraFunc,
    pub v_loop_filter_chroma:       LoopFilterFunc,
    pub h_loop_filter_chroma:       LoopFilterFunc,
    pub h_loop_filter_chroma_mbaff: LoopFilterFunc,
    pub v_loop_filter_chroma_intra: LoopFilterIntraFunc,
    pub h_loop_filter_chroma_intra: LoopFilterIntraFunc,
    pub h_loop_filter_chroma_mbaff_intra:   LoopFilterIntraFunc,
    pub loop_filter_strength:       StrengthFunc,

    pub idct_add:                   IdctFunc,
    pub idct8_add:                  IdctFunc,
    pub idct_dc_add:                IdctFunc,
    pub idct8_dc_add:               IdctFunc,
    /// Lossless bypass: residual added without a transform.
    pub add_pixels4_clear:          IdctFunc,
    pub add_pixels8_clear:          IdctFunc,
    pub idct_add16:                 IdctBlocksFunc,
    pub idct8_add4:                 IdctBlocksFunc,
    pub idct_add8:                  IdctChromaFunc,
    pub idct_add16intra:            IdctBlocksFunc,
    pub luma_dc_dequant_idct:       LumaDcFunc,
    pub chroma_dc_dequant_idct:     ChromaDcFunc,
}

impl Default for H264DSPContext {
    fn default() -> Self { Self::new() }
}

impl H264DSPContext {
    /// Creates the table for 4:2:0 content.
    pub fn new() -> Self {
        Self::with_chroma_format(1)
    }
    /// Creates the table for the given `chroma_format_idc`; values above 1 select 4:2:2
    /// chroma kernels.
    pub fn with_chroma_format(chroma_format_idc: u8) -> Self {
        let is_422 = chroma_format_idc > 1;
        let mut obj = Self {
            chroma_format_idc,

            weight:     [weight_h264_pixels16, weight_h264_pixels8, weight_h264_pixels4, weight_h264_pixels2],
            biweight:   [biweight_h264_pixels16, biweight_h264_pixels8, biweight_h264_pixels4, biweight_h264_pixels2],

            v_loop_filter_luma:         v_loop_filter_luma,
            h_loop_filter_luma:         h_loop_filter_luma,
            h_loop_filter_luma_mbaff:   h_loop_filter_luma_mbaff,
            v_loop_filter_luma_intra:   v_loop_filter_luma_intra,
            h_loop_filter_luma_intra:   h_loop_filter_luma_intra,
            h_loop_filter_luma_mbaff_intra:     h_loop_filter_luma_mbaff_intra,
            v_loop_filter_chroma:       v_loop_filter_chroma,
            h_loop_filter_chroma:       if is_422 { h_loop_filter_chroma422 } else { h_loop_filter_chroma },
            h_loop_filter_chroma_mbaff: if is_422 { h_loop_filter_chroma422_mbaff } else { h_loop_filter_chroma_mbaff },
            v_loop_filter_chroma_intra: v_loop_filter_chroma_intra,
            h_loop_filter_chroma_intra: if is_422 { h_loop_filter_chroma422_intra } else { h_loop_filter_chroma_intra },
            h_loop_filter_chroma_mbaff_intra:
                if is_422 { h_loop_filter_chroma422_mbaff_intra } else { h_loop_filter_chroma_mbaff_intra },
            loop_filter_strength,

            idct_add,
            idct8_add,
            idct_dc_add,
            idct8_dc_add,
            add_pixels4_clear,
            add_pixels8_clear,
            idct_add16,
            idct8_add4,
            idct_add8:                  if is_422 { idct_add8_422 } else { idct_add8 },
            idct_add16intra,
            luma_dc_dequant_idct,
            chroma_dc_dequant_idct:     if is_422 { chroma422_dc_dequant_idct } else { chroma_dc_dequant_idct },
        };
        obj.register_simd();
        debug!(backend = backend_name(), chroma_format_idc, "dsp context initialised");
        obj
    }

    /// Applies explicit weighting to a `w`x`h` block in place.
    pub fn weight_block(&self, block: &mut [u8], stride: usize, w: usize, h: usize, params: &WeightParams) -> DspResult<()> {
        let idx = weight_width_idx(w)?;
        if h == 0 || h > 16 {
            return Err(DspError::BlockHeight { width: w, height: h });
        }
        check_area(block.len(), stride, w, h)?;
        trace!(w, h, log2_denom = params.log2_denom, weight = params.weight, offset = params.offset, "weight");
        (self.weight[idx])(block, stride, h, params.log2_denom, params.weight, params.offset);
        Ok(())
    }

    /// Combines the prediction in `src` with the one in `dst` using bi-predictive weights.
    pub fn biweight_block(&self, dst: &mut [u8], src: &[u8], stride: usize, w: usize, h: usize, params: &BiWeightParams) -> DspResult<()> {
        let idx = weight_width_idx(w)?;
        if h == 0 || h > 16 {
            return Err(DspError::BlockHeight { width: w, height: h });
        }
        check_area(dst.len(), stride, w, h)?;
        check_area(src.len(), stride, w, h)?;
        trace!(w, h, log2_denom = params.log2_denom, weightd = params.weightd, weights = params.weights, "biweight");
        (self.biweight[idx])(dst, src, stride, h, params.log2_denom, params.weightd, params.weights, params.offset);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_chroma_format_selection() {
        let ctx420 = H264DSPContext::new();
        let ctx422 = H264DSPContext::with_chroma_format(2);
        assert_eq!(ctx420.chroma_format_idc, 1);

        // the 4:2:2 vertical-edge filter covers 16 rows instead of 8
        let mut buf420 = [0u8; 8 * 16];
        for row in buf420.chunks_mut(8) {
            row.copy_from_slice(&[100, 100, 100, 100, 120, 120, 120, 120]);
        }
        let mut buf422 = buf420;
        (ctx420.h_loop_filter_chroma)(&mut buf420, 4, 8, 40, 10, &[3; 4]);
        (ctx422.h_loop_filter_chroma)(&mut buf422, 4, 8, 40, 10, &[3; 4]);
        assert_eq!(buf420[8 * 7 + 3], buf422[8 * 7 + 3]);
        assert_ne!(buf422[8 * 15 + 3], 100);
        assert_eq!(buf420[8 * 15 + 3], 100);

        let mut blk = [0i16; 16 * 8];
        blk[0] = 4;
        (ctx422.chroma_dc_dequant_idct)(&mut blk, 64);
        // the 2x4 transform spreads a lone DC to all eight blocks
        assert!((0..8).all(|k| blk[k * 16] != 0));
    }

    #[test]
    fn test_weight_block() {
        let ctx = H264DSPContext::new();
        let mut blk = [50u8; 8 * 4];
        let params = WeightParams::new(1, 4, -10).unwrap();
        ctx.weight_block(&mut blk, 8, 8, 4, &params).unwrap();
        // (50 * 4 + (-10 << 1) + 1) >> 1
        assert_eq!(blk, [90; 8 * 4]);

        let id = WeightParams::identity(6).unwrap();
        let mut blk2 = [77u8; 16 * 16];
        ctx.weight_block(&mut blk2, 16, 16, 16, &id).unwrap();
        assert_eq!(blk2[..], [77u8; 16 * 16][..]);

        assert_eq!(ctx.weight_block(&mut blk, 8, 6, 4, &params), Err(DspError::BlockWidth(6)));
        assert_eq!(ctx.weight_block(&mut blk, 8, 8, 5, &params),
                   Err(DspError::BufferTooSmall { needed: 40, available: 32 }));
        assert_eq!(ctx.weight_block(&mut blk, 8, 8, 0, &params),
                   Err(DspError::BlockHeight { width: 8, height: 0 }));
    }

    #[test]
    fn test_biweight_block() {
        let ctx = H264DSPContext::new();
        let src = [30u8; 16 * 16];
        let mut dst = [10u8; 16 * 16];
        let params = BiWeightParams::new(0, 1, 1, 0).unwrap();
        ctx.biweight_block(&mut dst, &src, 16, 16, 16, &params).unwrap();
        assert!(dst.iter().all(|&p| p == 20));

        let mut dst = [10u8; 4];
        assert_eq!(ctx.biweight_block(&mut dst, &src[..3], 2, 2, 2, &params),
                   Err(DspError::BufferTooSmall { needed: 4, available: 3 }));
    }

    #[test]
    fn test_strength_entry() {
        let ctx = H264DSPContext::new();
        let mut bs = [[[0i16; 4]; 4]; 2];
        let mut nnz = [0u8; STRENGTH_CACHE_SIZE];
        nnz[12] = 1;
        let refs = [[0i8; STRENGTH_CACHE_SIZE]; 2];
        let mv = [[[0i16; 2]; STRENGTH_CACHE_SIZE]; 2];
        (ctx.loop_filter_strength)(&mut bs, &nnz, &refs, &mv, false, 4, 1, 0, 0, false);
        assert_eq!(bs[1][0], [2, 0, 0, 0]);
        assert_eq!(bs[1][1], [2, 0, 0, 0]);
        assert_eq!(bs[0][0], [2, 0, 0, 0]);
        assert_eq!(bs[0][1], [2, 0, 0, 0]);
    }

    #[test]
    fn test_bypass_entries() {
        let ctx = H264DSPContext::new();
        let mut dst = [100u8; 8 * 8];
        let mut blk = [0i16; 64];
        for (i, el) in blk.iter_mut().enumerate() {
            *el = if (i & 1) == 0 { 5 } else { -3 };
        }
        (ctx.add_pixels8_clear)(&mut dst, 0, 8, &mut blk);
        for (i, &pix) in dst.iter().enumerate() {
            assert_eq!(pix, if (i & 1) == 0 { 105 } else { 97 });
        }
        assert_eq!(blk, [0; 64]);

        let mut dst = [100u8; 6 * 4];
        let mut blk = [7i16; 16];
        (ctx.add_pixels4_clear)(&mut dst, 1, 6, &mut blk);
        for (i, &pix) in dst.iter().enumerate() {
            let x = i % 6;
            assert_eq!(pix, if (1..5).contains(&x) { 107 } else { 100 });
        }
        assert_eq!(blk, [0; 16]);
    }
}
