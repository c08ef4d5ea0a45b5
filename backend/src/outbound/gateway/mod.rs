//! HTTP adapter for the hosted gateway.

mod dto;
mod http_gateway;

pub use http_gateway::{GatewayBuildError, HttpGateway};
