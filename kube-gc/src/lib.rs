pub mod certificate;
pub mod classify;
pub mod cluster;
pub mod cutoff;
pub mod eviction;
pub mod executor;
pub mod kubectl;
pub mod namespace;
pub(crate) mod process;
pub mod resource;
pub mod scan;
pub mod time_ext;

pub mod cli;

#[cfg(test)]
pub(crate) mod testing;

pub(crate) type Result<T, E = Box<dyn std::error::Error + Send + Sync + 'static>> =
    std::result::Result<T, E>;
