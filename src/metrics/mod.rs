pub mod sample;
pub mod sampler;
pub mod source;

pub use sample::StatsSample;
pub use sampler::{StatsSampler, SummaryThrottle};
pub use source::{MetricSource, ProbeError, SysinfoSource};
