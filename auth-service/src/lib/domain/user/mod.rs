pub mod errors;
#[cfg(test)]
pub mod mocks;
pub mod models;
pub mod notifications;
pub mod ports;
pub mod service;
