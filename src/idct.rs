//! Inverse transforms with reconstruction.
//!
//! Coefficients are stored row by row (`blk[x + y * 4]` for 4x4, `blk[x + y * 8]` for 8x8).
//! Every `*_add` function adds the residual to the prediction already present in `dst`,
//! clips the result to `[0,255]` and leaves the consumed coefficients zeroed.

/// Size of the neighbour-aware non-zero count cache consumed by the block drivers.
pub const NNZ_CACHE_SIZE: usize = 15 * 8;

/// Maps a macroblock block index to its position in the non-zero count cache.
///
/// Entries 0..16 are luma blocks, 16..32 and 32..48 are Cb and Cr blocks (4:2:0 uses the
/// first four of each group, 4:2:2 the first eight), and the last three are the DC slots.
pub const SCAN8: [usize; 16 * 3 + 3] = [
    4 +  1 * 8, 5 +  1 * 8, 4 +  2 * 8, 5 +  2 * 8,
    6 +  1 * 8, 7 +  1 * 8, 6 +  2 * 8, 7 +  2 * 8,
    4 +  3 * 8, 5 +  3 * 8, 4 +  4 * 8, 5 +  4 * 8,
    6 +  3 * 8, 7 +  3 * 8, 6 +  4 * 8, 7 +  4 * 8,
    4 +  6 * 8, 5 +  6 * 8, 4 +  7 * 8, 5 +  7 * 8,
    6 +  6 * 8, 7 +  6 * 8, 6 +  7 * 8, 7 +  7 * 8,
    4 +  8 * 8, 5 +  8 * 8, 4 +  9 * 8, 5 +  9 * 8,
    6 +  8 * 8, 7 +  8 * 8, 6 +  9 * 8, 7 +  9 * 8,
    4 + 11 * 8, 5 + 11 * 8, 4 + 12 * 8, 5 + 12 * 8,
    6 + 11 * 8, 7 + 11 * 8, 6 + 12 * 8, 7 + 12 * 8,
    4 + 13 * 8, 5 + 13 * 8, 4 + 14 * 8, 5 + 14 * 8,
    6 + 13 * 8, 7 + 13 * 8, 6 + 14 * 8, 7 + 14 * 8,
    0 +  0 * 8, 0 +  5 * 8, 0 + 10 * 8
];

macro_rules! transform {
    (luma_dc; $a: expr, $b: expr, $c: expr, $d: expr) => ({
        let z0 = $a + $b;
        let z1 = $a - $b;
        let z2 = $c - $d;
        let z3 = $c + $d;
        $a = z0 + z3;
        $b = z0 - z3;
        $c = z1 - z2;
        $d = z1 + z2;
    });
    ($a: expr, $b: expr, $c: expr, $d: expr) => ({
        let z0 = $a + $c;
        let z1 = $a - $c;
        let z2 = ($b >> 1) - $d;
        let z3 = $b + ($d >> 1);
        $a = z0 + z3;
        $b = z1 + z2;
        $c = z1 - z2;
        $d = z0 - z3;
    });
    ($a: expr, $b: expr, $c: expr, $d: expr, $e: expr, $f: expr, $g: expr, $h: expr) => {
        let e0 = $a + $e;
        let e1 = -$d + $f - $h - ($h >> 1);
        let e2 = $a - $e;
        let e3 = $b + $h - $d - ($d >> 1);
        let e4 = ($c >> 1) - $g;
        let e5 = -$b + $h + $f + ($f >> 1);
        let e6 = $c + ($g >> 1);
        let e7 = $d + $f + $b + ($b >> 1);

        let f0 = e0 + e6;
        let f1 = e1 + (e7 >> 2);
        let f2 = e2 + e4;
        let f3 = e3 + (e5 >> 2);
        let f4 = e2 - e4;
        let f5 = (e3 >> 2) - e5;
        let f6 = e0 - e6;
        let f7 = e7 - (e1 >> 2);

        $a = f0 + f7;
        $b = f2 + f5;
        $c = f4 + f3;
        $d = f6 + f1;
        $e = f6 - f1;
        $f = f4 - f3;
        $g = f2 - f5;
        $h = f0 - f7;
    };
}

fn clip8(val: i32) -> u8 { val.max(0).min(255) as u8 }

// The first pass result is stored as 16-bit like the coefficient buffer itself.
fn narrow(val: i32) -> i32 { i32::from(val as i16) }

/// Full 4x4 inverse transform of `blk[..16]` added to the 4x4 block at `dst[off..]`.
pub fn idct_add(dst: &mut [u8], off: usize, stride: usize, blk: &mut [i16]) {
    let blk = &mut blk[..16];
    blk[0] = blk[0].wrapping_add(32);
    let mut tmp = [0i32; 16];
    for (dst, &src) in tmp.iter_mut().zip(blk.iter()) {
        *dst = i32::from(src);
    }
    for row in tmp.chunks_exact_mut(4) {
        transform!(row[0], row[1], row[2], row[3]);
        for el in row.iter_mut() {
            *el = narrow(*el);
        }
    }
    for i in 0..4 {
        transform!(tmp[i], tmp[i + 4], tmp[i + 8], tmp[i + 12]);
    }
    for (line, coeffs) in dst[off..].chunks_mut(stride).take(4).zip(tmp.chunks_exact(4)) {
        for (pix, &coef) in line.iter_mut().take(4).zip(coeffs.iter()) {
            *pix = clip8(i32::from(*pix) + (coef >> 6));
        }
    }
    for el in blk.iter_mut() {
        *el = 0;
    }
}

/// Full 8x8 inverse transform of `blk[..64]` added to the 8x8 block at `dst[off..]`.
pub fn idct8_add(dst: &mut [u8], off: usize, stride: usize, blk: &mut [i16]) {
    let blk = &mut blk[..64];
    blk[0] = blk[0].wrapping_add(32);
    let mut tmp = [0i32; 64];
    for (dst, &src) in tmp.iter_mut().zip(blk.iter()) {
        *dst = i32::from(src);
    }
    for row in tmp.chunks_exact_mut(8) {
        transform!(row[0], row[1], row[2], row[3], row[4], row[5], row[6], row[7]);
        for el in row.iter_mut() {
            *el = narrow(*el);
        }
    }
    for col in 0..8 {
        transform!(tmp[col], tmp[col + 8], tmp[col + 8 * 2], tmp[col + 8 * 3],
                   tmp[col + 8 * 4], tmp[col + 8 * 5], tmp[col + 8 * 6], tmp[col + 8 * 7]);
    }
    for (line, coeffs) in dst[off..].chunks_mut(stride).take(8).zip(tmp.chunks_exact(8)) {
        for (pix, &coef) in line.iter_mut().take(8).zip(coeffs.iter()) {
            *pix = clip8(i32::from(*pix) + (coef >> 6));
        }
    }
    for el in blk.iter_mut() {
        *el = 0;
    }
}

fn dc_add(dst: &mut [u8], off: usize, stride: usize, blk: &mut [i16], size: usize) {
    let dc = (i32::from(blk[0]) + 32) >> 6;
    blk[0] = 0;
    for line in dst[off..].chunks_mut(stride).take(size) {
        for pix in line[..size].iter_mut() {
            *pix = clip8(i32::from(*pix) + dc);
        }
    }
}

/// DC-only shortcut for a 4x4 block, identical to [`idct_add`] when only `blk[0]` is set.
pub fn idct_dc_add(dst: &mut [u8], off: usize, stride: usize, blk: &mut [i16]) {
    dc_add(dst, off, stride, blk, 4);
}

/// DC-only shortcut for an 8x8 block.
pub fn idct8_dc_add(dst: &mut [u8], off: usize, stride: usize, blk: &mut [i16]) {
    dc_add(dst, off, stride, blk, 8);
}

fn add_pixels_clear(dst: &mut [u8], off: usize, stride: usize, blk: &mut [i16], size: usize) {
    for (line, coeffs) in dst[off..].chunks_mut(stride).take(size).zip(blk.chunks_exact_mut(size)) {
        for (pix, coef) in line.iter_mut().take(size).zip(coeffs.iter_mut()) {
            *pix = pix.wrapping_add(*coef as u8);
            *coef = 0;
        }
    }
}

/// Adds a raw 4x4 residual without transform (lossless bypass) and clears it.
///
/// The bypass residual always lands inside the sample range, so the addition wraps
/// instead of clipping.
pub fn add_pixels4_clear(dst: &mut [u8], off: usize, stride: usize, blk: &mut [i16]) {
    add_pixels_clear(dst, off, stride, &mut blk[..16], 4);
}

/// 8x8 counterpart of [`add_pixels4_clear`].
pub fn add_pixels8_clear(dst: &mut [u8], off: usize, stride: usize, blk: &mut [i16]) {
    add_pixels_clear(dst, off, stride, &mut blk[..64], 8);
}

/// Applies the luma DC Hadamard transform and dequantisation.
///
/// `input` holds the 16 DC levels as a 4x4 matrix whose columns correspond to block rows;
/// results go to `output[16 * n]` for every 4x4 block `n` of the macroblock.
/// `input` is not modified.
pub fn luma_dc_dequant_idct(output: &mut [i16], input: &[i16; 16], qmul: i32) {
    const X_OFFSET: [usize; 4] = [0, 2 * 16, 8 * 16, 10 * 16];
    let mut tmp = [0i32; 16];
    for (dst, &src) in tmp.iter_mut().zip(input.iter()) {
        *dst = i32::from(src);
    }
    for row in tmp.chunks_exact_mut(4) {
        transform!(luma_dc; row[0], row[1], row[2], row[3]);
    }
    for (i, &off) in X_OFFSET.iter().enumerate() {
        let z0 = tmp[i] + tmp[i + 8];
        let z1 = tmp[i] - tmp[i + 8];
        let z2 = tmp[i + 4] - tmp[i + 12];
        let z3 = tmp[i + 4] + tmp[i + 12];
        output[off]          = ((z0 + z3).wrapping_mul(qmul).wrapping_add(128) >> 8) as i16;
        output[off + 16]     = ((z1 + z2).wrapping_mul(qmul).wrapping_add(128) >> 8) as i16;
        output[off + 16 * 4] = ((z1 - z2).wrapping_mul(qmul).wrapping_add(128) >> 8) as i16;
        output[off + 16 * 5] = ((z0 - z3).wrapping_mul(qmul).wrapping_add(128) >> 8) as i16;
    }
}

/// 2x2 chroma DC transform over `blk[0]`, `blk[16]`, `blk[32]`, `blk[48]`.
pub fn chroma_dc_dequant_idct(blk: &mut [i16], qmul: i32) {
    let a = i32::from(blk[0]);
    let b = i32::from(blk[16]);
    let c = i32::from(blk[32]);
    let d = i32::from(blk[48]);

    let e = a - b;
    let a = a + b;
    let b = c - d;
    let c = c + d;

    blk[0]  = ((a + c).wrapping_mul(qmul) >> 7) as i16;
    blk[16] = ((e + b).wrapping_mul(qmul) >> 7) as i16;
    blk[32] = ((a - c).wrapping_mul(qmul) >> 7) as i16;
    blk[48] = ((e - b).wrapping_mul(qmul) >> 7) as i16;
}

/// 2x4 chroma DC transform for 4:2:2 over `blk[16 * k]`, `k` in `0..8`.
pub fn chroma422_dc_dequant_idct(blk: &mut [i16], qmul: i32) {
    const STRIDE: usize = 16 * 2;
    let mut tmp = [0i32; 8];
    for i in 0..4 {
        let a = i32::from(blk[STRIDE * i]);
        let b = i32::from(blk[STRIDE * i + 16]);
        tmp[2 * i]     = a + b;
        tmp[2 * i + 1] = a - b;
    }
    for i in 0..2 {
        let off = i * 16;
        let z0 = tmp[i]     + tmp[4 + i];
        let z1 = tmp[i]     - tmp[4 + i];
        let z2 = tmp[2 + i] - tmp[6 + i];
        let z3 = tmp[2 + i] + tmp[6 + i];
        blk[off]              = ((z0 + z3).wrapping_mul(qmul).wrapping_add(128) >> 8) as i16;
        blk[off + STRIDE]     = ((z1 + z2).wrapping_mul(qmul).wrapping_add(128) >> 8) as i16;
        blk[off + STRIDE * 2] = ((z1 - z2).wrapping_mul(qmul).wrapping_add(128) >> 8) as i16;
        blk[off + STRIDE * 3] = ((z0 - z3).wrapping_mul(qmul).wrapping_add(128) >> 8) as i16;
    }
}

/// Reconstructs the 16 luma 4x4 blocks of an inter macroblock.
///
/// Block `i` uses coefficients `coeffs[i * 16..]` and lands at `off + block_offset[i]`.
/// A single non-zero DC takes the DC shortcut, empty blocks are skipped.
pub fn idct_add16(dst: &mut [u8], off: usize, stride: usize, block_offset: &[usize], coeffs: &mut [i16], nnzc: &[u8; NNZ_CACHE_SIZE]) {
    for (i, &boff) in block_offset.iter().enumerate().take(16) {
        let nnz = nnzc[SCAN8[i]];
        if nnz == 0 {
            continue;
        }
        let blk = &mut coeffs[i * 16..][..16];
        if nnz == 1 && blk[0] != 0 {
            idct_dc_add(dst, off + boff, stride, blk);
        } else {
            idct_add(dst, off + boff, stride, blk);
        }
    }
}

/// Reconstructs the 16 luma blocks of an intra 16x16 macroblock, where the DC may be
/// present without being counted in the non-zero cache.
pub fn idct_add16intra(dst: &mut [u8], off: usize, stride: usize, block_offset: &[usize], coeffs: &mut [i16], nnzc: &[u8; NNZ_CACHE_SIZE]) {
    for (i, &boff) in block_offset.iter().enumerate().take(16) {
        let blk = &mut coeffs[i * 16..][..16];
        if nnzc[SCAN8[i]] != 0 {
            idct_add(dst, off + boff, stride, blk);
        } else if blk[0] != 0 {
            idct_dc_add(dst, off + boff, stride, blk);
        }
    }
}

/// Reconstructs the four 8x8 luma blocks; block `i` (0, 4, 8, 12) owns `coeffs[i * 16..][..64]`.
pub fn idct8_add4(dst: &mut [u8], off: usize, stride: usize, block_offset: &[usize], coeffs: &mut [i16], nnzc: &[u8; NNZ_CACHE_SIZE]) {
    for i in (0..16).step_by(4) {
        let nnz = nnzc[SCAN8[i]];
        if nnz == 0 {
            continue;
        }
        let blk = &mut coeffs[i * 16..][..64];
        if nnz == 1 && blk[0] != 0 {
            idct8_dc_add(dst, off + block_offset[i], stride, blk);
        } else {
            idct8_add(dst, off + block_offset[i], stride, blk);
        }
    }
}

fn chroma_block(dst: &mut [u8], off: usize, stride: usize, blk: &mut [i16], nnz: u8) {
    if nnz != 0 {
        idct_add(dst, off, stride, blk);
    } else if blk[0] != 0 {
        idct_dc_add(dst, off, stride, blk);
    }
}

/// Reconstructs 4:2:0 chroma: blocks 16..20 go to `dst[0]` and 32..36 to `dst[1]`.
pub fn idct_add8(dst: [&mut [u8]; 2], off: [usize; 2], stride: usize, block_offset: &[usize], coeffs: &mut [i16], nnzc: &[u8; NNZ_CACHE_SIZE]) {
    for (j, (plane, poff)) in IntoIterator::into_iter(dst).zip(off.iter()).enumerate() {
        let first = (j + 1) * 16;
        for i in first..first + 4 {
            chroma_block(plane, poff + block_offset[i], stride, &mut coeffs[i * 16..][..16], nnzc[SCAN8[i]]);
        }
    }
}

/// Reconstructs 4:2:2 chroma: the upper halves as in [`idct_add8`], the lower halves
/// from blocks 20..24 and 36..40 using cache and offset entries shifted by four.
pub fn idct_add8_422(dst: [&mut [u8]; 2], off: [usize; 2], stride: usize, block_offset: &[usize], coeffs: &mut [i16], nnzc: &[u8; NNZ_CACHE_SIZE]) {
    for (j, (plane, poff)) in IntoIterator::into_iter(dst).zip(off.iter()).enumerate() {
        let first = (j + 1) * 16;
        for i in first..first + 4 {
            chroma_block(plane, poff + block_offset[i], stride, &mut coeffs[i * 16..][..16], nnzc[SCAN8[i]]);
        }
        for i in first + 4..first + 8 {
            chroma_block(plane, poff + block_offset[i + 4], stride, &mut coeffs[i * 16..][..16], nnzc[SCAN8[i + 4]]);
        }
    }
}
