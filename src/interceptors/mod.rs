//! Interceptors: derived values as ordered pipelines of pure transformers.
//!
//! Every attribute the rules ask about (attack, cost, "can this attack?",
//! "who really gets hit?") is computed by taking a base value and folding
//! it through the interceptors registered for that attribute on the entity.
//!
//! ## Ordering
//!
//! Interceptors run in registration order. An interceptor added with
//! [`InterceptOrder::Last`] runs after all regular ones, which is how
//! clamps and overrides ("attack can't go below 0") are expressed.
//!
//! ## Purity
//!
//! Transformers receive `&Game`. They can read anything and change nothing.

pub mod attribute;
pub mod pipeline;
pub mod registry;

pub use attribute::{Attribute, AttributeKey, Flag, Redirect, Stat};
pub use pipeline::{InterceptContext, InterceptOrder, InterceptorFn, Pipeline};
pub use registry::{InterceptorHandle, InterceptorRegistry};
