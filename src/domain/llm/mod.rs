//! Model invocation boundary

mod invoker;

pub use invoker::ModelInvoker;

#[cfg(test)]
pub use invoker::MockModelInvoker;
