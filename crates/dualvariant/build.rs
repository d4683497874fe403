//! Build script for dualvariant
//!
//! Resolves the architecture flag and writes OUT_DIR/dualvariant_build.rs.
//!
//! - `DUALVARIANT_MODERN` - `1`/`true`/`modern` selects the modern variant,
//!   unset/`0`/`false`/`legacy` the legacy one
//! - `DUALVARIANT_INCLUSION` - `conditional` (default), `disjoint` or
//!   `disjoint-all`
//!
//! The selected variant's feature must be enabled, e.g.
//! `DUALVARIANT_MODERN=1 cargo build --features modern`.

fn main() {
    if let Err(e) = dualvariant_build::run() {
        println!("cargo:warning=dualvariant: {}", e);
        eprintln!("dualvariant: {}", e);
        std::process::exit(1);
    }
}
