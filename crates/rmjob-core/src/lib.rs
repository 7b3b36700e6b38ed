//! Resource-manager-agnostic job model for rmjob.
//!
//! Describe a job once as a [`Script`], read it back as [`Info`] or
//! [`Status`], and let an [`Adapter`] speak the scheduler's dialect.

pub mod adapter;
pub mod info;
pub mod native;
pub mod node;
pub mod script;
pub mod status;

pub use adapter::{Adapter, AdapterError, Dependencies, InfoResult, count_by_identity};
pub use info::Info;
pub use native::{AttrValue, Attributes, NativeSpec};
pub use node::{NodeInfo, NodeRequest, NodeSpec};
pub use script::Script;
pub use status::{InvalidState, Status};
