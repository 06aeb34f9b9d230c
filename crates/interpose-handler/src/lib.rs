//! Interpose Handlers
//!
//! Pluggable interception policy bound to one target.
//!
//! # Core Concepts
//!
//! - [`InvocationHandler`]: Single dispatch entry point every proxied call passes
//! - [`TargetHandler`]: Base handler delegating straight to the target
//! - [`Interceptor`]: Before/after/failure hooks around the delegation
//! - [`InterceptingHandler`]: Runs an interceptor around a [`TargetHandler`]
//! - [`InterceptorChain`]: Ordered pipeline of interceptors
//!
//! Built-in interceptors: [`TimingInterceptor`], [`ValidationInterceptor`],
//! [`FallbackInterceptor`], [`CallRecorder`], and closure-based [`Hooks`].
//!
//! # Example
//!
//! ```rust,ignore
//! use interpose_handler::{CallRecorder, HandlerBuilder, TimingInterceptor};
//! use std::sync::Arc;
//!
//! let recorder = Arc::new(CallRecorder::new());
//! let handler = HandlerBuilder::<DataBeanContract, Bean>::new()
//!     .target(Arc::clone(&bean))
//!     .intercept(Arc::clone(&recorder))
//!     .intercept(TimingInterceptor::new().only(["get_data"]))
//!     .build()?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod fallback;
mod handler;
mod interceptor;
mod recorder;
mod timing;
mod validation;

#[cfg(test)]
mod testing;

// Re-exports
pub use fallback::FallbackInterceptor;
pub use handler::{HandlerBuilder, InterceptingHandler, InvocationHandler, TargetHandler};
pub use interceptor::{Hooks, Interceptor, InterceptorChain, Next};
pub use recorder::{CallRecorder, InvocationRecord, Outcome};
pub use timing::TimingInterceptor;
pub use validation::ValidationInterceptor;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
