//! Errors reported by the checked dispatch helpers.
//!
//! The kernels themselves never fail: their inputs come from an already validated
//! bitstream and overflow is defined by the clipping rules. These errors only come
//! from the front-ends that validate caller-supplied geometry and parameters.

use thiserror::Error;

/// Error type for the checked entry points.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DspError {
    /// Block width has no kernel.
    #[error("Unsupported block width {0}")]
    BlockWidth(usize),

    /// Block height is not usable with the given width.
    #[error("Unsupported block height {height} for width {width}")]
    BlockHeight { width: usize, height: usize },

    /// Sub-pel phase does not fit the interpolation grid.
    #[error("Sub-pel phase ({x}, {y}) out of range, maximum is {max}")]
    SubpelPhase { x: u8, y: u8, max: u8 },

    /// A plane slice does not cover the area the kernel touches.
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Stride is narrower than the block.
    #[error("Stride {stride} is smaller than block width {width}")]
    Stride { stride: usize, width: usize },

    /// Weight denominator outside `0..=7`.
    #[error("Invalid log2 weight denominator {0}")]
    WeightDenom(u8),

    /// Weight outside the signed 8-bit range.
    #[error("Weight {0} out of range")]
    Weight(i32),

    /// Offset outside the signed 8-bit range.
    #[error("Offset {0} out of range")]
    Offset(i32),
}

/// Result alias for the checked entry points.
pub type DspResult<T> = Result<T, DspError>;

/// Verifies that a plane slice covers `w`x`h` samples laid out with `stride`.
pub fn check_area(len: usize, stride: usize, w: usize, h: usize) -> DspResult<()> {
    if stride < w {
        return Err(DspError::Stride { stride, width: w });
    }
    if h == 0 || w == 0 {
        return Ok(());
    }
    let needed = (h - 1) * stride + w;
    if len < needed {
        return Err(DspError::BufferTooSmall { needed, available: len });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_check_area() {
        assert_eq!(check_area(16 * 15 + 16, 16, 16, 16), Ok(()));
        assert_eq!(check_area(16 * 15 + 15, 16, 16, 16),
                   Err(DspError::BufferTooSmall { needed: 256, available: 255 }));
        assert_eq!(check_area(100, 4, 8, 2), Err(DspError::Stride { stride: 4, width: 8 }));
        assert_eq!(check_area(0, 8, 8, 0), Ok(()));
    }

    #[test]
    fn test_messages() {
        assert_eq!(DspError::BlockWidth(6).to_string(), "Unsupported block width 6");
        assert_eq!(DspError::WeightDenom(9).to_string(), "Invalid log2 weight denominator 9");
    }
}
