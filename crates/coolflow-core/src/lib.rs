//! CoolFlow workflows
//!
//! Multi-step operations on top of the Coolify client:
//!
//! - [`discovery`]: find the current application, database, redis and server
//! - [`destroy`]: tear a project down
//! - [`provision`]: create a project environment with its resources
//! - [`deploy`]: trigger, wait for and roll back deployments
//! - [`ci`]: render the GitHub Actions deploy workflow
//!
//! All waits are bounded by a [`PollPolicy`].

pub mod ci;
pub mod deploy;
pub mod destroy;
pub mod discovery;
pub mod error;
pub mod poll;
pub mod provision;

pub use ci::{WorkflowOptions, render_workflow, write_workflow};
pub use deploy::{DeploymentWatcher, WaitOutcome, rollback_target};
pub use destroy::{
    ActionResult, BatchItem, BatchReport, Confirm, DestroyObserver, DestroyOptions,
    DestroyOutcome, DestroyPlan, DestroyReport, Destroyer, ResourceKind, SilentObserver,
    filter_by_environment,
};
pub use discovery::{DiscoveryOverrides, ProjectDiscovery};
pub use error::{CoreError, Result};
pub use poll::{PollOutcome, PollPolicy};
pub use provision::{
    ApplicationSource, ApplicationSpec, CacheKind, CacheSpec, DatabaseSpec, ProjectTarget,
    ProvisionPlan, ProvisionReport, Provisioner,
};
