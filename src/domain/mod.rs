// Domain layer: records exchanged between the services and the ports they talk through.

pub mod model;
pub mod ports;
