//! Crate providing 8-bit H.264 DSP kernels: deblocking, inverse transforms,
//! motion compensation with weighted prediction and intra prediction.
pub mod context;
pub mod error;
pub mod idct;
pub mod ipred;
#[allow(clippy::too_many_arguments)]
pub mod loopfilter;
pub mod mc;
pub mod strength;

pub use crate::context::H264DSPContext;
pub use crate::error::{DspError, DspResult};
pub use crate::ipred::IPred8Context;
pub use crate::mc::{backend_name, BiWeightParams, H264QpelContext, WeightParams};
pub use crate::strength::loop_filter_strength;
