//! Variant selection and the resulting inclusion plan

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use dualvariant_core::{ArchitectureFlag, VariantDescriptor, VariantId, DESCRIPTORS};

use crate::error::{BuildError, BuildResult, ConfigurationError, MissingVariantError};
use crate::strategy::{Inclusion, InclusionStrategy};

/// Name of the generated config under `OUT_DIR`
pub const GENERATED_FILE: &str = "dualvariant_build.rs";

/// Resolves the architecture flag against the variant descriptors.
pub struct VariantResolver {
    root: PathBuf,
    descriptors: &'static [VariantDescriptor],
    strategy: Box<dyn InclusionStrategy>,
}

impl VariantResolver {
    /// `root` is the directory descriptor source paths are relative to.
    pub fn new(root: impl Into<PathBuf>, strategy: Box<dyn InclusionStrategy>) -> Self {
        Self {
            root: root.into(),
            descriptors: &DESCRIPTORS,
            strategy,
        }
    }

    pub fn with_descriptors(mut self, descriptors: &'static [VariantDescriptor]) -> Self {
        self.descriptors = descriptors;
        self
    }

    fn check_roots(&self, owner: &'static str, paths: &[&'static str]) -> BuildResult<()> {
        for path in paths {
            let full = self.root.join(path);
            if !full.is_dir() {
                return Err(MissingVariantError::SourceMissing { owner, path: full }.into());
            }
        }
        Ok(())
    }

    /// Select the variant for `flag` and compute what goes into the artifact.
    ///
    /// `compiled` lists the variant roots cargo is building.
    pub fn resolve(&self, flag: ArchitectureFlag, compiled: &[VariantId]) -> BuildResult<InclusionPlan> {
        let mut matching = self.descriptors.iter().filter(|d| d.selected_by(flag));
        let selected = match (matching.next(), matching.next()) {
            (Some(d), None) => d,
            _ => {
                let matches = self.descriptors.iter().filter(|d| d.selected_by(flag)).count();
                return Err(ConfigurationError::NoUniqueVariant { flag, matches }.into());
            }
        };

        self.check_roots(selected.id.as_str(), selected.source_paths)?;

        let inclusion = self.strategy.include(selected, self.descriptors, compiled)?;
        self.check_roots("shared", &inclusion.shared_roots)?;
        for d in inclusion.variants.iter().filter(|d| d.id != selected.id) {
            self.check_roots(d.id.as_str(), d.source_paths)?;
        }

        Ok(InclusionPlan {
            flag,
            selected,
            strategy: self.strategy.name(),
            descriptors: self.descriptors,
            inclusion,
        })
    }
}

/// What the resolver decided for one build.
#[derive(Debug, Clone)]
pub struct InclusionPlan {
    pub flag: ArchitectureFlag,
    pub selected: &'static VariantDescriptor,
    pub strategy: &'static str,
    descriptors: &'static [VariantDescriptor],
    inclusion: Inclusion,
}

impl InclusionPlan {
    /// The generated boolean build field.
    pub fn modern_enabled(&self) -> bool {
        self.selected.id == VariantId::Modern
    }

    pub fn includes(&self, id: VariantId) -> bool {
        self.inclusion.variants.iter().any(|d| d.id == id)
    }

    pub fn included_variants(&self) -> Vec<VariantId> {
        self.inclusion.variants.iter().map(|d| d.id).collect()
    }

    /// Source paths of the selected variant.
    pub fn variant_source_paths(&self) -> &'static [&'static str] {
        self.selected.source_paths
    }

    /// Every root the artifact is composed from.
    pub fn source_roots(&self) -> Vec<&'static str> {
        let mut roots = self.inclusion.shared_roots.clone();
        for d in &self.inclusion.variants {
            roots.extend_from_slice(d.source_paths);
        }
        roots
    }

    pub fn warnings(&self) -> &[String] {
        &self.inclusion.warnings
    }

    /// `cargo:` lines for the build script to print.
    pub fn cargo_directives(&self) -> Vec<String> {
        let mut out = Vec::new();
        for d in self.descriptors {
            out.push(format!("cargo:rustc-check-cfg=cfg({})", d.cfg_name));
        }
        for d in self.descriptors.iter().filter(|d| self.includes(d.id)) {
            out.push(format!("cargo:rustc-cfg={}", d.cfg_name));
        }
        for w in &self.inclusion.warnings {
            out.push(format!("cargo:warning={}", w));
        }
        out
    }

    /// Contents of the generated build config.
    pub fn generated_config(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "// Auto-generated by dualvariant-build - do not edit");
        let _ = writeln!(
            out,
            "// architecture flag: {}, inclusion: {}\n",
            self.flag, self.strategy
        );
        let _ = writeln!(out, "/// Variant selected by the architecture flag");
        let _ = writeln!(out, "pub const ARCHITECTURE: &str = {:?};", self.selected.id.as_str());
        let _ = writeln!(out, "/// Raw tri-state flag (`unset`, `legacy`, `modern`)");
        let _ = writeln!(out, "pub const FLAG: &str = {:?};", self.flag.as_str());
        let _ = writeln!(out, "/// True when the modern variant was selected at build time");
        let _ = writeln!(out, "pub const MODERN_ENABLED: bool = {};", self.modern_enabled());
        let _ = writeln!(out, "/// Inclusion strategy that composed this artifact");
        let _ = writeln!(out, "pub const INCLUSION: &str = {:?};", self.strategy);
        let _ = writeln!(
            out,
            "/// Variants compiled into this artifact\npub const COMPILED_VARIANTS: &[&str] = &{:?};",
            self.included_variants().iter().map(|id| id.as_str()).collect::<Vec<_>>()
        );
        let _ = writeln!(
            out,
            "/// Source roots this artifact was composed from\npub const SOURCE_ROOTS: &[&str] = &{:?};",
            self.source_roots()
        );
        out
    }

    /// Write the generated config into `out_dir`.
    pub fn write(&self, out_dir: &Path) -> BuildResult<PathBuf> {
        let dest = out_dir.join(GENERATED_FILE);
        fs::write(&dest, self.generated_config()).map_err(|source| BuildError::Io {
            path: dest.clone(),
            source,
        })?;
        Ok(dest)
    }
}
