//! Built-in storage provider definitions.
//!
//! Hosts can register more at runtime; these are the stock set.

pub mod azure;
pub mod gcs;
pub mod localfiles;
pub mod redis;
pub mod s3;

use crate::provider::ProviderDef;

/// The stock definitions, in display order.
pub fn builtin() -> Vec<ProviderDef> {
    vec![
        s3::definition(),
        gcs::definition(),
        azure::definition(),
        redis::definition(),
        localfiles::definition(),
    ]
}
