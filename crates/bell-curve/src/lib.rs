pub mod error;
pub mod jitter;
pub mod model;

pub use error::DistributionError;
pub use model::{
    build, top_n_mask, CurvePoint, DistributionModel, DistributionOptions, ScatterPoint, SigmaBand,
};
