use crate::cancellation::{CancellationError, CancellationToken, check_cancellation};
use crate::classify::{TASKS_NAMESPACE, TaskKind};
use crate::emit::fingerprint;
use crate::host::{Accessibility, Member, NamedTypeRef, SemanticModel, TypeRef};

/// An accessor the wrapper exposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyModel {
    pub name: String,
    /// Fully-qualified type display string.
    pub ty: String,
}

/// Structural view of a payload type carried inside a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WrappedTypeModel {
    pub name: String,
    /// Dotted namespace, `None` for the global namespace.
    pub namespace: Option<String>,
    pub display: String,
    pub accessibility: Accessibility,
    pub properties: Vec<PropertyModel>,
}

impl WrappedTypeModel {
    /// Model `ty`, keeping instance properties that are neither indexers
    /// nor explicit interface implementations, in declaration order.
    /// Properties a sibling type cannot reach are skipped.
    pub fn create<M: SemanticModel + ?Sized>(
        ty: &NamedTypeRef,
        semantic: &M,
        token: &CancellationToken,
    ) -> Result<Self, CancellationError> {
        check_cancellation(token, "postfix.wrapped_type")?;

        let type_parameters = semantic.type_parameters_of(ty);
        let mut properties = Vec::new();
        for member in semantic.members_of(ty) {
            check_cancellation(token, "postfix.wrapped_type.member")?;
            let Member::Property(property) = member else {
                continue;
            };
            if property.is_indexer
                || property.is_static
                || property.explicit_interface.is_some()
                || !property.accessibility.is_assembly_visible()
            {
                continue;
            }
            let property_type = property.ty.substitute(type_parameters, &ty.type_arguments);
            properties.push(PropertyModel {
                name: property.name.clone(),
                ty: property_type.display(),
            });
        }

        Ok(Self {
            name: ty.name.clone(),
            namespace: ty.namespace.clone().filter(|ns| !ns.is_empty()),
            display: ty.identity_display(),
            accessibility: semantic.declared_accessibility(ty),
            properties,
        })
    }
}

/// One marker call site, resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwaitInvocationModel {
    /// Display string of the awaited container without nullable reference
    /// annotations; the dedup key.
    pub container: String,
    pub kind: TaskKind,
    pub wrapped: WrappedTypeModel,
}

impl AwaitInvocationModel {
    /// Marker called directly on `Task<T>` / `ValueTask<T>`.
    #[must_use]
    pub fn stub(container: &TypeRef, kind: TaskKind, wrapped: WrappedTypeModel) -> Self {
        Self {
            container: container.identity_display(),
            kind,
            wrapped,
        }
    }

    /// Marker called on a payload assumed to come from a generated
    /// wrapper's `ValueTask<T>` accessor.
    #[must_use]
    pub fn chained(wrapped: WrappedTypeModel) -> Self {
        Self {
            container: format!("global::{TASKS_NAMESPACE}.ValueTask<{}>", wrapped.display),
            kind: TaskKind::ValueTask,
            wrapped,
        }
    }
}

/// A unique container identity that gets a wrapper and a marker overload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwaitExtensionModel {
    pub container: String,
    pub kind: TaskKind,
    pub wrapped: WrappedTypeModel,
    /// `<WrappedName><Task|ValueTask>`.
    pub wrapper_name: String,
}

impl AwaitExtensionModel {
    #[must_use]
    pub fn from_invocation(invocation: AwaitInvocationModel) -> Self {
        let wrapper_name = format!("{}{}", invocation.wrapped.name, invocation.kind.name());
        Self {
            container: invocation.container,
            kind: invocation.kind,
            wrapped: invocation.wrapped,
            wrapper_name,
        }
    }

    /// Append a short digest of the container to the wrapper name, for a
    /// container whose wrapper name is already taken by another one
    /// (`Box<int>` and `Box<string>` both naming `BoxTask`).
    pub fn disambiguate(&mut self) {
        let digest = fingerprint(&self.container);
        let short = digest.get(..8).unwrap_or(&digest);
        self.wrapper_name = format!("{}_{short}", self.wrapper_name);
    }

    /// Fragment identifier (`Demo_Models_BarTask.g.cs`).
    #[must_use]
    pub fn fragment_id(&self) -> String {
        match &self.wrapped.namespace {
            Some(namespace) => format!("{}_{}.g.cs", namespace.replace('.', "_"), self.wrapper_name),
            None => format!("{}.g.cs", self.wrapper_name),
        }
    }
}
