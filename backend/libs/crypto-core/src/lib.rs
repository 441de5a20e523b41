//! Cryptographic helpers shared by Mind Stream services.
//!
//! Currently this is bearer-token validation; see [`jwt`].

pub mod jwt;

#[cfg(any(test, feature = "test-support"))]
pub mod test_keys;
