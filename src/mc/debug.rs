use super::{clip_u8, tap6, ChromaMCFunc, H264QpelContext, MCFunc, RegisterSIMD, TMP_BUF_STRIDE};
use crate::context::H264DSPContext;

pub(crate) const BACKEND: &str = "indexed";

fn tap6_line(line: &[u8], step: usize) -> i32 {
    tap6(line[0].into(), line[step].into(), line[step * 2].into(),
         line[step * 3].into(), line[step * 4].into(), line[step * 5].into())
}

fn put_full(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize) {
    for (dline, sline) in dst.chunks_mut(dstride).zip(src[sstride * 2 + 2..].chunks(sstride)).take(h) {
        dline[..w].copy_from_slice(&sline[..w]);
    }
}

fn put_hpel_h(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize) {
    for (dline, sline) in dst.chunks_mut(dstride).zip(src[sstride * 2..].chunks(sstride)).take(h) {
        for (x, pix) in dline[..w].iter_mut().enumerate() {
            *pix = clip_u8((tap6_line(&sline[x..], 1) + 16) >> 5);
        }
    }
}

fn put_hpel_v(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize) {
    for (y, dline) in dst.chunks_mut(dstride).take(h).enumerate() {
        let line = &src[y * sstride + 2..];
        for (x, pix) in dline[..w].iter_mut().enumerate() {
            *pix = clip_u8((tap6_line(&line[x..], sstride) + 16) >> 5);
        }
    }
}

fn put_hpel_hv(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize) {
    let mut tmp = [0i32; TMP_BUF_STRIDE * (16 + 5)];
    for (tline, sline) in tmp.chunks_mut(TMP_BUF_STRIDE).zip(src.chunks(sstride)).take(h + 5) {
        for (x, el) in tline[..w].iter_mut().enumerate() {
            *el = tap6_line(&sline[x..], 1);
        }
    }
    for (y, dline) in dst.chunks_mut(dstride).take(h).enumerate() {
        let col = &tmp[y * TMP_BUF_STRIDE..];
        for (x, pix) in dline[..w].iter_mut().enumerate() {
            let sum = tap6(col[x], col[x + TMP_BUF_STRIDE], col[x + TMP_BUF_STRIDE * 2],
                           col[x + TMP_BUF_STRIDE * 3], col[x + TMP_BUF_STRIDE * 4], col[x + TMP_BUF_STRIDE * 5]);
            *pix = clip_u8((sum + 512) >> 10);
        }
    }
}

fn avg_pair(dst: &mut [u8], dstride: usize, a: &[u8], b: &[u8], w: usize, h: usize) {
    for (dline, (aline, bline)) in dst.chunks_mut(dstride).zip(a.chunks(TMP_BUF_STRIDE).zip(b.chunks(TMP_BUF_STRIDE))).take(h) {
        for (pix, (&a, &b)) in dline[..w].iter_mut().zip(aline.iter().zip(bline.iter())) {
            *pix = ((u16::from(a) + u16::from(b) + 1) >> 1) as u8;
        }
    }
}

fn avg_into(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize) {
    for (dline, sline) in dst.chunks_mut(dstride).zip(src.chunks(sstride)).take(h) {
        for (pix, &s) in dline[..w].iter_mut().zip(sline.iter()) {
            *pix = ((u16::from(*pix) + u16::from(s) + 1) >> 1) as u8;
        }
    }
}

fn store(pix: &mut u8, val: u16, avg: bool) {
    let val = ((val + 32) >> 6) as u8;
    *pix = if avg { ((u16::from(*pix) + u16::from(val) + 1) >> 1) as u8 } else { val };
}

#[allow(clippy::too_many_arguments)]
fn chroma_interp(dst: &mut [u8], dstride: usize, src: &[u8], sstride: usize, w: usize, h: usize, x: u8, y: u8, avg: bool) {
    let (x, y) = (u16::from(x), u16::from(y));
    let a = (8 - x) * (8 - y);
    let b = x * (8 - y);
    let c = (8 - x) * y;
    let d = x * y;

    if d != 0 {
        for (dline, (line0, line1)) in dst.chunks_mut(dstride).zip(src.chunks(sstride).zip(src[sstride..].chunks(sstride))).take(h) {
            for (i, pix) in dline[..w].iter_mut().enumerate() {
                let val = a * u16::from(line0[i]) + b * u16::from(line0[i + 1])
                        + c * u16::from(line1[i]) + d * u16::from(line1[i + 1]);
                store(pix, val, avg);
            }
        }
    } else if b + c != 0 {
        // one of the phases is zero: a two-tap filter along the other axis
        let e = b + c;
        let step = if c != 0 { sstride } else { 1 };
        for (row, dline) in dst.chunks_mut(dstride).take(h).enumerate() {
            let line = &src[row * sstride..];
            for (i, pix) in dline[..w].iter_mut().enumerate() {
                store(pix, a * u16::from(line[i]) + e * u16::from(line[i + step]), avg);
            }
        }
    } else {
        for (dline, sline) in dst.chunks_mut(dstride).zip(src.chunks(sstride)).take(h) {
            for (pix, &s) in dline[..w].iter_mut().zip(sline.iter()) {
                store(pix, 64 * u16::from(s), avg);
            }
        }
    }
}

qpel_functions!();

impl RegisterSIMD for H264QpelContext {
    fn register_simd(&mut self) {}
}

impl RegisterSIMD for H264DSPContext {
    fn register_simd(&mut self) {}
}
