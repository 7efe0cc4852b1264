//! Sample rendering module

mod rasterizer;

pub use rasterizer::{RasterizedSample, SampleBox, SampleRasterizer};
