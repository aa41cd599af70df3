use super::{clip_u8, tap6, ChromaMCFunc, H264QpelContext, MCFunc, RegisterSIMD, TMP_BUF_STRIDE};
use crate::context::H264DSPContext;

pub(crate) const BACKEND: &str = "pointer";

/// Number of elements a `w`x`h` block with the given stride spans.
fn span(stride: usize, w: usize, h: usize) -> usize {
    if h == 0 { 0 } else { (h - 1) * stride + w }
}

#[inline(always)]
unsafe fn tap6_ptr(src: *const u8, step: usize) -> i32 {
    tap6(i32::from(*src), i32::from(*src.add(step)), i32::from(*src.add(step * 2)),
         i32::from(*src.add(step * 3)), i32::from(*src.add(step * 4)), i32::from(*src.add(step * 5)))
}

fn put_full(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize) {
    assert!(dst.len() >= span(dstride, w, h));
    assert!(src.len() >= sstride * 2 + 2 + span(sstride, w, h));
    unsafe {
        let sbase = src.as_ptr().add(sstride * 2 + 2);
        let dbase = dst.as_mut_ptr();
        for y in 0..h {
            std::ptr::copy_nonoverlapping(sbase.add(y * sstride), dbase.add(y * dstride), w);
        }
    }
}

fn put_hpel_h(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize) {
    assert!(dst.len() >= span(dstride, w, h));
    assert!(src.len() >= sstride * 2 + span(sstride, w + 5, h));
    unsafe {
        let sbase = src.as_ptr().add(sstride * 2);
        let dbase = dst.as_mut_ptr();
        for y in 0..h {
            let sline = sbase.add(y * sstride);
            let dline = dbase.add(y * dstride);
            for x in 0..w {
                *dline.add(x) = clip_u8((tap6_ptr(sline.add(x), 1) + 16) >> 5);
            }
        }
    }
}

fn put_hpel_v(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize) {
    assert!(dst.len() >= span(dstride, w, h));
    assert!(src.len() >= 2 + span(sstride, w, h + 5));
    unsafe {
        let sbase = src.as_ptr().add(2);
        let dbase = dst.as_mut_ptr();
        for y in 0..h {
            let sline = sbase.add(y * sstride);
            let dline = dbase.add(y * dstride);
            for x in 0..w {
                *dline.add(x) = clip_u8((tap6_ptr(sline.add(x), sstride) + 16) >> 5);
            }
        }
    }
}

fn put_hpel_hv(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize) {
    assert!(w <= TMP_BUF_STRIDE && h <= 16);
    assert!(dst.len() >= span(dstride, w, h));
    assert!(src.len() >= span(sstride, w + 5, h + 5));
    let mut tmp = [0i32; TMP_BUF_STRIDE * (16 + 5)];
    unsafe {
        let sbase = src.as_ptr();
        let tbase = tmp.as_mut_ptr();
        for y in 0..h + 5 {
            let sline = sbase.add(y * sstride);
            let tline = tbase.add(y * TMP_BUF_STRIDE);
            for x in 0..w {
                *tline.add(x) = tap6_ptr(sline.add(x), 1);
            }
        }
        let tbase = tmp.as_ptr();
        let dbase = dst.as_mut_ptr();
        for y in 0..h {
            let col = tbase.add(y * TMP_BUF_STRIDE);
            let dline = dbase.add(y * dstride);
            for x in 0..w {
                let c = col.add(x);
                let sum = tap6(*c, *c.add(TMP_BUF_STRIDE), *c.add(TMP_BUF_STRIDE * 2),
                               *c.add(TMP_BUF_STRIDE * 3), *c.add(TMP_BUF_STRIDE * 4), *c.add(TMP_BUF_STRIDE * 5));
                *dline.add(x) = clip_u8((sum + 512) >> 10);
            }
        }
    }
}

fn avg_pair(dst: &mut [u8], dstride: usize, a: &[u8], b: &[u8], w: usize, h: usize) {
    assert!(dst.len() >= span(dstride, w, h));
    assert!(a.len() >= span(TMP_BUF_STRIDE, w, h) && b.len() >= span(TMP_BUF_STRIDE, w, h));
    unsafe {
        let dbase = dst.as_mut_ptr();
        for y in 0..h {
            let aline = a.as_ptr().add(y * TMP_BUF_STRIDE);
            let bline = b.as_ptr().add(y * TMP_BUF_STRIDE);
            let dline = dbase.add(y * dstride);
            for x in 0..w {
                *dline.add(x) = ((u16::from(*aline.add(x)) + u16::from(*bline.add(x)) + 1) >> 1) as u8;
            }
        }
    }
}

fn avg_into(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize) {
    assert!(dst.len() >= span(dstride, w, h));
    assert!(src.len() >= span(sstride, w, h));
    unsafe {
        let dbase = dst.as_mut_ptr();
        for y in 0..h {
            let sline = src.as_ptr().add(y * sstride);
            let dline = dbase.add(y * dstride);
            for x in 0..w {
                let d = dline.add(x);
                *d = ((u16::from(*d) + u16::from(*sline.add(x)) + 1) >> 1) as u8;
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn chroma_interp(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize, x: u8, y: u8, avg: bool) {
    let (x, y) = (u16::from(x), u16::from(y));
    let a = (8 - x) * (8 - y);
    let b = x * (8 - y);
    let c = (8 - x) * y;
    let d = x * y;
    let extra_w = if b + d != 0 { 1 } else { 0 };
    let extra_h = if c + d != 0 { 1 } else { 0 };
    assert!(dst.len() >= span(dstride, w, h));
    assert!(src.len() >= span(sstride, w + extra_w, h + extra_h));

    unsafe {
        let dbase = dst.as_mut_ptr();
        for row in 0..h {
            let s0 = src.as_ptr().add(row * sstride);
            let dline = dbase.add(row * dstride);
            for i in 0..w {
                let s = s0.add(i);
                let mut val = a * u16::from(*s);
                if b != 0 {
                    val += b * u16::from(*s.add(1));
                }
                if c != 0 {
                    val += c * u16::from(*s.add(sstride));
                }
                if d != 0 {
                    val += d * u16::from(*s.add(sstride + 1));
                }
                let pred = ((val + 32) >> 6) as u8;
                let pix = dline.add(i);
                *pix = if avg { ((u16::from(*pix) + u16::from(pred) + 1) >> 1) as u8 } else { pred };
            }
        }
    }
}

qpel_functions!();

fn weight16(block: &mut [u8], stride: usize, h: usize, log2_denom: u8, weight: i32, offset: i32) {
    assert!(block.len() >= span(stride, 16, h));
    let offset = (offset << log2_denom) + if log2_denom > 0 { 1 << (log2_denom - 1) } else { 0 };
    unsafe {
        let base = block.as_mut_ptr();
        for y in 0..h {
            let line = base.add(y * stride);
            for x in 0..16 {
                let p = line.add(x);
                *p = clip_u8((i32::from(*p) * weight + offset) >> log2_denom);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn biweight16(dst: &mut [u8], src: &[u8], stride: usize, h: usize, log2_denom: u8, weightd: i32, weights: i32, offset: i32) {
    assert!(dst.len() >= span(stride, 16, h));
    assert!(src.len() >= span(stride, 16, h));
    let offset = ((offset + 1) | 1) << log2_denom;
    let shift = log2_denom + 1;
    unsafe {
        let dbase = dst.as_mut_ptr();
        for y in 0..h {
            let sline = src.as_ptr().add(y * stride);
            let dline = dbase.add(y * stride);
            for x in 0..16 {
                let p = dline.add(x);
                *p = clip_u8((i32::from(*sline.add(x)) * weights + i32::from(*p) * weightd + offset) >> shift);
            }
        }
    }
}

impl RegisterSIMD for H264QpelContext {
    fn register_simd(&mut self) {}
}

impl RegisterSIMD for H264DSPContext {
    fn register_simd(&mut self) {
        self.weight[0]   = weight16;
        self.biweight[0] = biweight16;
    }
}
