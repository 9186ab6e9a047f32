//! Capability tokens and the broker that keeps acquire/release balanced.
//!
//! A capability token is an opaque serialized least-privilege access grant
//! to one directory. The provider seam hides the platform that issues them;
//! the broker owns the single active handle on behalf of a session.

pub mod broker;
pub mod provider;
pub mod stub;

pub use broker::CapabilityBroker;
pub use provider::{CapabilityProvider, FsCapabilityProvider};
pub use stub::StubCapabilityProvider;
