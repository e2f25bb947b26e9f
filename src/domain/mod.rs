// Domain layer: core models and ports (interfaces). No external dependencies beyond std, serde and chrono.

pub mod model;
pub mod ports;
