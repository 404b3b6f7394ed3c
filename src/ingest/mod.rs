/// Upstream API clients. One file per service.
pub mod discovery;
pub mod vigicrues;

#[cfg(test)]
pub(crate) mod fixtures;
