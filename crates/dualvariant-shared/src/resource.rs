//! Resource construction and property application
//!
//! These are the two primitives both variants build on: construct the
//! underlying resource, then apply named properties to it. A property keeps
//! the type of the first value applied to it.

use std::collections::BTreeMap;

use crate::error::{PropertyError, SharedResult};
use crate::property::{is_identifier, validate_property_name, PropertyValue};

/// The underlying resource a component manages.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    kind: String,
    properties: BTreeMap<String, PropertyValue>,
}

impl Resource {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

/// Construct an empty resource of the given kind.
pub fn construct_resource(kind: &str) -> SharedResult<Resource> {
    if !is_identifier(kind) {
        return Err(PropertyError::InvalidKind(kind.to_string()));
    }
    Ok(Resource {
        kind: kind.to_string(),
        properties: BTreeMap::new(),
    })
}

/// Check that `value` may be applied to `name` on `resource` without
/// applying it.
pub fn check_property(resource: &Resource, name: &str, value: &PropertyValue) -> SharedResult<()> {
    validate_property_name(name)?;
    match resource.properties.get(name) {
        Some(existing) if !existing.same_type(value) => Err(PropertyError::TypeMismatch {
            name: name.to_string(),
            expected: existing.type_name(),
            found: value.type_name(),
        }),
        _ => Ok(()),
    }
}

/// Apply a named property, returning the value it replaced.
pub fn apply_property(
    resource: &mut Resource,
    name: &str,
    value: PropertyValue,
) -> SharedResult<Option<PropertyValue>> {
    check_property(resource, name, &value)?;
    Ok(resource.properties.insert(name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct_resource() {
        let r = construct_resource("view").unwrap();
        assert_eq!(r.kind(), "view");
        assert_eq!(r.property_count(), 0);

        assert_eq!(
            construct_resource(""),
            Err(PropertyError::InvalidKind(String::new()))
        );
    }

    #[test]
    fn test_apply_returns_previous() {
        let mut r = construct_resource("view").unwrap();
        assert_eq!(apply_property(&mut r, "opacity", 0.5.into()).unwrap(), None);
        assert_eq!(
            apply_property(&mut r, "opacity", 1.0.into()).unwrap(),
            Some(PropertyValue::Float(0.5))
        );
        assert_eq!(r.get("opacity"), Some(&PropertyValue::Float(1.0)));
    }

    #[test]
    fn test_apply_keeps_type() {
        let mut r = construct_resource("view").unwrap();
        apply_property(&mut r, "hidden", true.into()).unwrap();

        let err = apply_property(&mut r, "hidden", "yes".into()).unwrap_err();
        assert!(matches!(err, PropertyError::TypeMismatch { expected: "bool", .. }));
        assert_eq!(r.get("hidden"), Some(&PropertyValue::Bool(true)));
    }

    #[test]
    fn test_apply_rejects_bad_name() {
        let mut r = construct_resource("view").unwrap();
        assert!(apply_property(&mut r, "", 1i64.into()).is_err());
        assert_eq!(r.property_count(), 0);
    }
}
