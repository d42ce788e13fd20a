pub mod deploy;
pub mod destroy;
pub mod env;
pub mod install;
pub mod kick;
pub mod logs;
pub mod provision;
pub mod restart;
pub mod rollback;
pub mod setup_ci;
pub mod status;
pub mod sync;
