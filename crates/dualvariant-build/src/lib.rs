//! # dualvariant-build
//!
//! Build Variant Resolver, meant to be called from a `build.rs`.
//!
//! 1. Resolve the tri-state architecture flag from `DUALVARIANT_MODERN`
//!    and the manifest property `package.metadata.dualvariant.architecture`
//! 2. Pick the one variant descriptor whose build condition holds and check
//!    its source roots exist
//! 3. Let the inclusion strategy decide which compiled roots end up in the
//!    artifact
//! 4. Write `OUT_DIR/dualvariant_build.rs` and print the cargo directives
//!
//! Every check runs before anything is written, so a failed build leaves
//! no generated config behind.
//!
//! ```rust,ignore
//! // build.rs
//! fn main() {
//!     if let Err(e) = dualvariant_build::run() {
//!         eprintln!("dualvariant: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod error;
pub mod flag;
pub mod strategy;
pub mod resolver;
pub mod script;

pub use error::{BuildError, BuildResult, ConfigurationError, MissingVariantError};
pub use flag::{parse_flag, read_manifest_property, resolve_flag, FLAG_ENV};
pub use strategy::{
    strategy_from_name, ConditionalCompilation, DisjointRoots, Inclusion, InclusionStrategy,
    INCLUSION_ENV, SHARED_ROOT,
};
pub use resolver::{InclusionPlan, VariantResolver, GENERATED_FILE};
pub use script::{lookup_from, run, BuildInputs};
