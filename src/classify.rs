//! Shape classification over resolved types.
//!
//! Every candidate type falls into exactly one [`Shape`]; the generators
//! match on the shape instead of re-deriving the checks. Nullable reference
//! annotations never change a shape.

use std::fmt;

use crate::host::{NamedTypeRef, TypeRef};

pub const TASKS_NAMESPACE: &str = "System.Threading.Tasks";
pub const THREADING_NAMESPACE: &str = "System.Threading";
pub const CANCELLATION_TOKEN: &str = "CancellationToken";

/// Asynchronous container flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// `Task` / `Task<T>`.
    Task,
    /// `ValueTask` / `ValueTask<T>`.
    ValueTask,
}

impl TaskKind {
    /// Base name of the container, also used as the wrapper suffix.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TaskKind::Task => "Task",
            TaskKind::ValueTask => "ValueTask",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "Task" => Some(TaskKind::Task),
            "ValueTask" => Some(TaskKind::ValueTask),
            _ => None,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of classifying a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape<'a> {
    /// `Task`, `ValueTask`, or their single-argument generic forms.
    AsyncContainer {
        kind: TaskKind,
        argument: Option<&'a TypeRef>,
    },
    CancellationToken,
    Other,
}

/// Classify `ty` into its shape. Total; unknown types are [`Shape::Other`].
#[must_use]
pub fn classify(ty: &TypeRef) -> Shape<'_> {
    let Some(named) = ty.as_named() else {
        return Shape::Other;
    };
    if let Some((kind, argument)) = container_parts(named) {
        return Shape::AsyncContainer { kind, argument };
    }
    if is_cancellation_token_named(named) {
        return Shape::CancellationToken;
    }
    Shape::Other
}

#[must_use]
pub fn is_async_container(ty: &TypeRef) -> bool {
    matches!(classify(ty), Shape::AsyncContainer { .. })
}

#[must_use]
pub fn is_cancellation_token(ty: &TypeRef) -> bool {
    matches!(classify(ty), Shape::CancellationToken)
}

/// Container kind and its single type argument, for `Task<T>` / `ValueTask<T>`.
#[must_use]
pub fn generic_container(ty: &TypeRef) -> Option<(TaskKind, &TypeRef)> {
    match classify(ty) {
        Shape::AsyncContainer {
            kind,
            argument: Some(argument),
        } => Some((kind, argument)),
        _ => None,
    }
}

fn container_parts(named: &NamedTypeRef) -> Option<(TaskKind, Option<&TypeRef>)> {
    if !named.is_in_namespace(TASKS_NAMESPACE) || !named.containing_types.is_empty() {
        return None;
    }
    let kind = TaskKind::from_name(&named.name)?;
    match named.type_arguments.as_slice() {
        [] => Some((kind, None)),
        [argument] => Some((kind, Some(argument))),
        _ => None,
    }
}

fn is_cancellation_token_named(named: &NamedTypeRef) -> bool {
    named.name == CANCELLATION_TOKEN
        && named.is_in_namespace(THREADING_NAMESPACE)
        && named.containing_types.is_empty()
        && named.type_arguments.is_empty()
}
