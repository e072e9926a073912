//! Microservice read-policy management.
//!
//! A [`Policy`] is the set of read grants of one
//! `(framework, group, team, service)` scope. The [`PolicyReconciler`] loads a
//! scope from a [`PolicyRepository`], applies grant changes and writes the
//! whole document back.

pub mod model;
pub mod reconciler;
pub mod repository;

pub use model::{MicroserviceName, Policy, PolicyDocument, PolicyEntry, PolicyScope};
pub use reconciler::{PolicyReconciler, ReconcilerState};
pub use repository::{FilePolicyRepository, InMemoryPolicyRepository, PolicyRepository};
