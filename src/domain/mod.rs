// Domain layer: profile model, request/result types and the ports the core consumes.

pub mod model;
pub mod ports;
