pub mod linalg;
pub mod parser;
pub mod predictor;
pub mod render;

pub use crate::domain::model::{Prediction, SetupFailurePolicy};
pub use crate::domain::ports::{ConfigProvider, EnvironmentInspector, Predictor};
pub use crate::utils::error::Result;
