//! Dev kit dispenser
//!
//! Hands out a dev kit bundled with exactly one license drawn from a shared,
//! platform-scoped pool. The pool lives on the filesystem and reservations are
//! settled by atomic renames, so independent processes can dispense from the
//! same pool without coordinating in memory.
//!
//! A request flows through four parts:
//! - [`identifier`]: validates the untrusted identifier and derives its platform
//! - [`devkit`]: locates the dev kit as a directory or a prebuilt archive
//! - [`pool`]: reserves one license for the platform
//! - [`assembler`]: writes the build archive
//!
//! [`dispenser::Dispenser`] composes them; [`response::DispenseResponse`] is
//! the structured result handed to a transport layer.

pub mod assembler;
pub mod config;
pub mod devkit;
pub mod dispenser;
pub mod error;
pub mod identifier;
pub mod layout;
pub mod pool;
pub mod response;

pub use assembler::{ArchiveAssembler, BuildArchive};
pub use config::DispenserConfig;
pub use devkit::{DevKit, DevKitResolver};
pub use dispenser::{Dispensed, Dispenser};
pub use error::{DispenserError, ErrorCategory, Result};
pub use identifier::{Identifier, Platform};
pub use layout::Layout;
pub use pool::{CandidateOrder, Inventory, License, LicensePool};
pub use response::DispenseResponse;
