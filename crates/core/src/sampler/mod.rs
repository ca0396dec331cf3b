pub mod sampler;

pub use sampler::{sample, sample_file, SampleError};
