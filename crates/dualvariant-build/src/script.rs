//! Build script driver

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use dualvariant_core::{VariantId, DESCRIPTORS};

use crate::error::{BuildResult, ConfigurationError};
use crate::flag::{read_manifest_property, resolve_flag, FLAG_ENV};
use crate::resolver::{InclusionPlan, VariantResolver};
use crate::strategy::{strategy_from_name, INCLUSION_ENV};

/// Everything the resolver needs from the cargo build script environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInputs {
    pub manifest_dir: PathBuf,
    pub out_dir: PathBuf,
    /// Descriptor source paths are relative to this
    pub workspace_root: PathBuf,
    pub env_flag: Option<String>,
    pub inclusion: Option<String>,
    /// Variant roots whose cargo feature is enabled
    pub compiled: Vec<VariantId>,
}

fn feature_env(feature: &str) -> String {
    format!("CARGO_FEATURE_{}", feature.to_ascii_uppercase().replace('-', "_"))
}

impl BuildInputs {
    pub fn from_env() -> BuildResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> BuildResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(PathBuf::from)
                .ok_or(ConfigurationError::MissingEnv(key))
        };
        let manifest_dir = required("CARGO_MANIFEST_DIR")?;
        let out_dir = required("OUT_DIR")?;

        // crates/<name> sits two levels below the workspace root
        let workspace_root = manifest_dir
            .ancestors()
            .nth(2)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| manifest_dir.clone());

        let compiled = DESCRIPTORS
            .iter()
            .filter(|d| lookup(&feature_env(d.cargo_feature)).is_some())
            .map(|d| d.id)
            .collect();

        Ok(Self {
            manifest_dir,
            out_dir,
            workspace_root,
            env_flag: lookup(FLAG_ENV),
            inclusion: lookup(INCLUSION_ENV),
            compiled,
        })
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.manifest_dir.join("Cargo.toml")
    }

    /// Resolve flag, strategy and variant without touching `OUT_DIR`.
    pub fn plan(&self) -> BuildResult<InclusionPlan> {
        let property = read_manifest_property(&self.manifest_path())?;
        let flag = resolve_flag(self.env_flag.as_deref(), property.as_deref())?;
        let strategy = strategy_from_name(self.inclusion.as_deref())?;
        VariantResolver::new(&self.workspace_root, strategy).resolve(flag, &self.compiled)
    }
}

/// Entry point for the facade's `build.rs`.
///
/// Prints the rerun triggers first so a failed build is retried once the
/// inputs change.
pub fn run() -> BuildResult<InclusionPlan> {
    println!("cargo:rerun-if-env-changed={}", FLAG_ENV);
    println!("cargo:rerun-if-env-changed={}", INCLUSION_ENV);

    let inputs = BuildInputs::from_env()?;
    println!("cargo:rerun-if-changed={}", inputs.manifest_path().display());

    let plan = inputs.plan()?;
    plan.write(&inputs.out_dir)?;
    for line in plan.cargo_directives() {
        println!("{}", line);
    }
    Ok(plan)
}

/// Variable map for tests and tooling that drive [`BuildInputs::from_lookup`].
pub fn lookup_from(vars: &HashMap<String, String>) -> impl Fn(&str) -> Option<String> + '_ {
    move |key| vars.get(key).cloned()
}
