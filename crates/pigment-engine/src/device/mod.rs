//! GPU device and surface bootstrap.
//!
//! - creates the wgpu Instance/Adapter/Device/Queue for a window
//! - configures the surface and hands out one encoder + view per frame
//! - reports the texture-size limit atlases must respect

mod frame;
mod gpu;
mod init;

pub use frame::{GpuFrame, SurfaceErrorAction};
pub use gpu::Gpu;
pub use init::GpuInit;
