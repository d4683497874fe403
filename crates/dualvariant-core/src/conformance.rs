//! Conformance suite for `Component` implementations
//!
//! Every variant must pass `exercise`. The suite only uses the public
//! capability set, so a pass on both variants means callers can treat the
//! facade binding polymorphically.

use core::fmt;

use dualvariant_shared::{PropertyError, PropertyValue, ResourceId};

use crate::component::Component;

/// First check that did not hold.
#[derive(Debug, Clone, PartialEq)]
pub struct ConformanceFailure {
    pub step: &'static str,
    pub detail: String,
}

impl fmt::Display for ConformanceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conformance step '{}' failed: {}", self.step, self.detail)
    }
}

impl std::error::Error for ConformanceFailure {}

fn check(step: &'static str, ok: bool, detail: impl FnOnce() -> String) -> Result<(), ConformanceFailure> {
    if ok {
        Ok(())
    } else {
        Err(ConformanceFailure { step, detail: detail() })
    }
}

fn expect_ok<T>(step: &'static str, r: Result<T, PropertyError>) -> Result<T, ConformanceFailure> {
    r.map_err(|e| ConformanceFailure {
        step,
        detail: e.to_string(),
    })
}

/// Run every public operation against `component`.
///
/// The component may already own resources; the suite only looks at what
/// it creates and restores the resource count before returning.
pub fn exercise(component: &dyn Component) -> Result<(), ConformanceFailure> {
    let name = component.name();
    check("name", !name.is_empty(), || "empty component name".into())?;

    let before = component.len();

    // create
    let a = expect_ok("create", component.create("view"))?;
    let b = expect_ok("create", component.create("text"))?;
    check("create", a != b && !a.is_none() && !b.is_none(), || {
        format!("ids not distinct: {} {}", a, b)
    })?;
    check("len", component.len() == before + 2, || {
        format!("expected {} resources, found {}", before + 2, component.len())
    })?;
    check(
        "create",
        matches!(component.create("9lives"), Err(PropertyError::InvalidKind(_))),
        || "invalid kind accepted".into(),
    )?;

    // set_property / property, before commit
    expect_ok("set_property", component.set_property(a, "opacity", PropertyValue::Float(0.5)))?;
    expect_ok("set_property", component.set_property(a, "hidden", PropertyValue::Bool(false)))?;
    expect_ok("set_property", component.set_property(b, "label", "hello".into()))?;
    expect_ok("set_property", component.set_property(a, "opacity", PropertyValue::Float(0.75)))?;
    check_value(component, a, "opacity", PropertyValue::Float(0.75), "read-before-commit")?;
    check_value(component, b, "label", "hello".into(), "read-before-commit")?;

    // commit
    let applied = component.commit();
    check("commit", component.commit() == 0, || {
        format!("second commit applied updates (first applied {})", applied)
    })?;
    check_value(component, a, "opacity", PropertyValue::Float(0.75), "read-after-commit")?;
    check_value(component, a, "hidden", PropertyValue::Bool(false), "read-after-commit")?;
    check("property", component.property(a, "missing").is_none(), || {
        "unset property has a value".into()
    })?;

    // rejected updates leave state untouched
    let mismatch = component.set_property(a, "opacity", "opaque".into());
    check(
        "type-mismatch",
        matches!(mismatch, Err(PropertyError::TypeMismatch { .. })),
        || format!("got {:?}", mismatch),
    )?;
    let bad_name = component.set_property(a, "", PropertyValue::Int(1));
    check(
        "invalid-name",
        matches!(bad_name, Err(PropertyError::InvalidName(_))),
        || format!("got {:?}", bad_name),
    )?;
    component.commit();
    check_value(component, a, "opacity", PropertyValue::Float(0.75), "after-rejected")?;

    // destroy
    check("destroy", component.destroy(a), || format!("{} not destroyed", a))?;
    check("destroy", !component.destroy(a), || format!("{} destroyed twice", a))?;
    let stale = component.set_property(a, "opacity", PropertyValue::Float(1.0));
    check(
        "unknown-resource",
        matches!(stale, Err(PropertyError::UnknownResource(_))),
        || format!("got {:?}", stale),
    )?;
    check("property", component.property(a, "opacity").is_none(), || {
        "destroyed resource still readable".into()
    })?;
    check("destroy", component.destroy(b), || format!("{} not destroyed", b))?;
    check("len", component.len() == before, || {
        format!("expected {} resources, found {}", before, component.len())
    })?;

    Ok(())
}

fn check_value(
    component: &dyn Component,
    id: ResourceId,
    name: &str,
    expected: PropertyValue,
    step: &'static str,
) -> Result<(), ConformanceFailure> {
    let found = component.property(id, name);
    check(step, found.as_ref() == Some(&expected), || {
        format!("{}.{}: expected {}, found {:?}", id, name, expected, found)
    })
}
