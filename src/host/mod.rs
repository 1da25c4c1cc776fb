//! Host compiler collaborator: declarations plus resolved semantics, frozen
//! into an immutable snapshot the generators read from.

mod operations;
mod symbols;
mod types;

pub use operations::{Descendants, Operation};
pub use symbols::{
    ContainingType, FieldSymbol, Member, MethodSymbol, ParameterSymbol, PropertySymbol,
    TypeDeclaration, TypeKind,
};
pub use types::{Accessibility, NamedTypeRef, TypeKey, TypeRef};

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// On-demand semantic queries the generators issue against the host.
pub trait SemanticModel {
    /// Static type of an expression, when the host resolved one.
    fn type_of(&self, operation: &Operation) -> Option<TypeRef>;

    /// Declared members of the definition `ty` refers to.
    fn members_of(&self, ty: &NamedTypeRef) -> &[Member];

    /// Declared accessibility of the definition `ty` refers to.
    fn declared_accessibility(&self, ty: &NamedTypeRef) -> Accessibility;

    /// Type parameter names of the definition `ty` refers to.
    fn type_parameters_of(&self, ty: &NamedTypeRef) -> &[String];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Source(usize),
    Metadata(usize),
}

/// Immutable view of the program under generation.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    declarations: Vec<TypeDeclaration>,
    external_types: Vec<TypeDeclaration>,
    index: HashMap<TypeKey, Origin>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSnapshot {
    #[serde(default)]
    declarations: Vec<TypeDeclaration>,
    #[serde(default)]
    external_types: Vec<TypeDeclaration>,
}

impl Snapshot {
    /// Build a snapshot from source declarations (in host order) and
    /// metadata-only types the declarations refer to.
    #[must_use]
    pub fn new(declarations: Vec<TypeDeclaration>, external_types: Vec<TypeDeclaration>) -> Self {
        let mut index = HashMap::new();
        for (position, declaration) in external_types.iter().enumerate() {
            index.insert(declaration_key(declaration), Origin::Metadata(position));
        }
        // Source declarations shadow metadata with the same identity.
        for (position, declaration) in declarations.iter().enumerate() {
            index.insert(declaration_key(declaration), Origin::Source(position));
        }
        Self {
            declarations,
            external_types,
            index,
        }
    }

    /// Decode a snapshot from its JSON interchange form.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawSnapshot =
            serde_json::from_str(text).map_err(|err| Error::snapshot(None, err.to_string()))?;
        Ok(Self::new(raw.declarations, raw.external_types))
    }

    /// Read and decode a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|err| Error::snapshot(Some(path.to_path_buf()), err.to_string()))?;
        let raw: RawSnapshot = serde_json::from_str(&text)
            .map_err(|err| Error::snapshot(Some(path.to_path_buf()), err.to_string()))?;
        tracing::debug!(
            target: "pipeline",
            stage = "snapshot.load",
            path = %path.display(),
            declarations = raw.declarations.len(),
            external_types = raw.external_types.len(),
            "loaded host snapshot"
        );
        Ok(Self::new(raw.declarations, raw.external_types))
    }

    /// Source declarations in host order.
    #[must_use]
    pub fn declarations(&self) -> &[TypeDeclaration] {
        &self.declarations
    }

    /// Resolve the declaration (source or metadata) a reference points at.
    #[must_use]
    pub fn resolve(&self, ty: &NamedTypeRef) -> Option<&TypeDeclaration> {
        match self.index.get(&ty.key())? {
            Origin::Source(position) => self.declarations.get(*position),
            Origin::Metadata(position) => self.external_types.get(*position),
        }
    }
}

impl SemanticModel for Snapshot {
    fn type_of(&self, operation: &Operation) -> Option<TypeRef> {
        operation.static_type().cloned()
    }

    fn members_of(&self, ty: &NamedTypeRef) -> &[Member] {
        self.resolve(ty)
            .map_or(&[][..], |declaration| declaration.members.as_slice())
    }

    fn declared_accessibility(&self, ty: &NamedTypeRef) -> Accessibility {
        self.resolve(ty)
            .map_or(Accessibility::NotApplicable, |declaration| {
                declaration.accessibility
            })
    }

    fn type_parameters_of(&self, ty: &NamedTypeRef) -> &[String] {
        self.resolve(ty)
            .map_or(&[][..], |declaration| declaration.type_parameters.as_slice())
    }
}

fn declaration_key(declaration: &TypeDeclaration) -> TypeKey {
    TypeKey {
        namespace: declaration.namespace.clone().filter(|ns| !ns.is_empty()),
        containing_types: declaration
            .containing_types
            .iter()
            .map(|outer| outer.name.clone())
            .collect(),
        name: declaration.name.clone(),
        arity: declaration.type_parameters.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "declarations": [
            {
                "name": "Bar",
                "namespace": "Demo",
                "accessibility": "public",
                "members": [
                    { "member": "property", "name": "Name",
                      "type": { "kind": "named", "name": "String", "namespace": "System" } }
                ]
            }
        ],
        "external_types": [
            { "name": "Uri", "namespace": "System", "accessibility": "public" }
        ]
    }"#;

    #[test]
    fn snapshot_indexes_source_and_metadata_types() {
        let snapshot = Snapshot::from_json(SNAPSHOT).expect("snapshot");
        let bar = NamedTypeRef::new(Some("Demo"), "Bar", Vec::new());
        assert_eq!(snapshot.members_of(&bar).len(), 1);
        assert_eq!(snapshot.declared_accessibility(&bar), Accessibility::Public);

        let uri = NamedTypeRef::new(Some("System"), "Uri", Vec::new());
        assert!(snapshot.members_of(&uri).is_empty());
        assert_eq!(snapshot.declared_accessibility(&uri), Accessibility::Public);

        let missing = NamedTypeRef::new(Some("Demo"), "Missing", Vec::new());
        assert_eq!(
            snapshot.declared_accessibility(&missing),
            Accessibility::NotApplicable
        );
    }

    #[test]
    fn arity_distinguishes_definitions() {
        let mut generic = TypeDeclaration::new(Some("Demo"), "Bar", TypeKind::Class);
        generic.type_parameters = vec!["T".into()];
        generic.accessibility = Accessibility::Private;
        let plain = TypeDeclaration::new(Some("Demo"), "Bar", TypeKind::Class);
        let snapshot = Snapshot::new(vec![plain, generic], Vec::new());

        let closed = NamedTypeRef::new(
            Some("Demo"),
            "Bar",
            vec![TypeRef::named(Some("System"), "Int32", Vec::new())],
        );
        assert_eq!(
            snapshot.declared_accessibility(&closed),
            Accessibility::Private
        );
    }

    #[test]
    fn malformed_snapshot_reports_snapshot_error() {
        let err = Snapshot::from_json("{ \"declarations\": 3 }").expect_err("invalid");
        assert!(matches!(err, Error::Snapshot { path: None, .. }));
    }
}
