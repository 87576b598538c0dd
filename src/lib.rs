//! Six cities client library exports for testing

pub mod api;
pub mod core;

#[cfg(test)]
pub mod test_support;
