// Core modules: context lifecycle, native bindings, store budgets, errors.
pub mod context;
pub mod error;
pub mod link;
pub mod link_libs;
pub mod native;
pub mod probe;
pub mod store;
