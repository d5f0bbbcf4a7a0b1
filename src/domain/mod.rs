// Domain layer: request-scoped models and the provider ports.

pub mod model;
pub mod ports;
