pub mod agents;
pub mod context;
pub mod outlet;
pub mod pipeline;
pub mod session;
pub mod timing;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;
