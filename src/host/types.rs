//! Resolved type references as handed over by the host compiler.
//!
//! Display strings follow the host's fully-qualified format: every named type
//! is prefixed with `global::`, well-known special types collapse to their
//! keyword spelling, and generic arguments are rendered recursively.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared accessibility of a type or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    Public,
    #[default]
    Internal,
    Protected,
    Private,
    ProtectedInternal,
    PrivateProtected,
    NotApplicable,
}

impl Accessibility {
    /// Source keyword for the accessibility; empty when not applicable.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::Internal => "internal",
            Accessibility::Protected => "protected",
            Accessibility::Private => "private",
            Accessibility::ProtectedInternal => "protected internal",
            Accessibility::PrivateProtected => "private protected",
            Accessibility::NotApplicable => "",
        }
    }

    /// Whether a sibling type in the same assembly can reach a member
    /// declared with this accessibility.
    #[must_use]
    pub fn is_assembly_visible(self) -> bool {
        matches!(
            self,
            Accessibility::Public | Accessibility::Internal | Accessibility::ProtectedInternal
        )
    }
}

impl fmt::Display for Accessibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A resolved type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    Named(NamedTypeRef),
    TypeParameter {
        name: String,
    },
    Array {
        element: Box<TypeRef>,
        #[serde(default = "default_rank")]
        rank: u32,
    },
    Pointer {
        pointee: Box<TypeRef>,
    },
}

fn default_rank() -> u32 {
    1
}

impl TypeRef {
    #[must_use]
    pub fn named(namespace: Option<&str>, name: &str, type_arguments: Vec<TypeRef>) -> Self {
        TypeRef::Named(NamedTypeRef::new(namespace, name, type_arguments))
    }

    #[must_use]
    pub fn type_parameter(name: impl Into<String>) -> Self {
        TypeRef::TypeParameter { name: name.into() }
    }

    #[must_use]
    pub fn as_named(&self) -> Option<&NamedTypeRef> {
        match self {
            TypeRef::Named(named) => Some(named),
            _ => None,
        }
    }

    /// Replace type parameters named in `parameters` with the matching entry
    /// of `arguments`.
    #[must_use]
    pub fn substitute(&self, parameters: &[String], arguments: &[TypeRef]) -> TypeRef {
        match self {
            TypeRef::TypeParameter { name } => parameters
                .iter()
                .position(|parameter| parameter == name)
                .and_then(|index| arguments.get(index))
                .map_or_else(|| self.clone(), Clone::clone),
            TypeRef::Named(named) => {
                let mut named = named.clone();
                named.type_arguments = named
                    .type_arguments
                    .iter()
                    .map(|argument| argument.substitute(parameters, arguments))
                    .collect();
                TypeRef::Named(named)
            }
            TypeRef::Array { element, rank } => TypeRef::Array {
                element: Box::new(element.substitute(parameters, arguments)),
                rank: *rank,
            },
            TypeRef::Pointer { pointee } => TypeRef::Pointer {
                pointee: Box::new(pointee.substitute(parameters, arguments)),
            },
        }
    }

    /// Fully-qualified display string, nullable reference annotations included.
    #[must_use]
    pub fn display(&self) -> String {
        let mut out = String::new();
        self.write_display(&mut out, Annotations::Keep);
        out
    }

    /// Fully-qualified display string without nullable reference
    /// annotations at any level. Two references with the same identity
    /// display equal; `Nullable<T>` still renders as `T?`.
    #[must_use]
    pub fn identity_display(&self) -> String {
        let mut out = String::new();
        self.write_display(&mut out, Annotations::Strip);
        out
    }

    fn write_display(&self, out: &mut String, annotations: Annotations) {
        match self {
            TypeRef::Named(named) => named.write_display(out, annotations),
            TypeRef::TypeParameter { name } => out.push_str(name),
            TypeRef::Array { element, rank } => {
                element.write_display(out, annotations);
                out.push_str(&array_suffix(*rank));
            }
            TypeRef::Pointer { pointee } => {
                pointee.write_display(out, annotations);
                out.push('*');
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Annotations {
    Keep,
    Strip,
}

fn array_suffix(rank: u32) -> String {
    let commas = ",".repeat(rank.saturating_sub(1) as usize);
    format!("[{commas}]")
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// A reference to a named (possibly generic, possibly nested) type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedTypeRef {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    /// Enclosing type names, outermost first.
    #[serde(default)]
    pub containing_types: Vec<String>,
    #[serde(default)]
    pub type_arguments: Vec<TypeRef>,
    /// Nullable reference annotation (`string?`).
    #[serde(default)]
    pub nullable: bool,
}

impl NamedTypeRef {
    #[must_use]
    pub fn new(namespace: Option<&str>, name: &str, type_arguments: Vec<TypeRef>) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            containing_types: Vec::new(),
            type_arguments,
            nullable: false,
        }
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.type_arguments.len()
    }

    #[must_use]
    pub fn is_in_namespace(&self, namespace: &str) -> bool {
        self.namespace.as_deref() == Some(namespace)
    }

    /// Identity of the definition this reference points at, ignoring the
    /// concrete type arguments.
    #[must_use]
    pub fn key(&self) -> TypeKey {
        TypeKey {
            namespace: self.namespace.clone().filter(|ns| !ns.is_empty()),
            containing_types: self.containing_types.clone(),
            name: self.name.clone(),
            arity: self.arity(),
        }
    }

    #[must_use]
    pub fn display(&self) -> String {
        let mut out = String::new();
        self.write_display(&mut out, Annotations::Keep);
        out
    }

    /// See [`TypeRef::identity_display`].
    #[must_use]
    pub fn identity_display(&self) -> String {
        let mut out = String::new();
        self.write_display(&mut out, Annotations::Strip);
        out
    }

    fn write_display(&self, out: &mut String, annotations: Annotations) {
        if let Some(keyword) = self.special_keyword() {
            out.push_str(keyword);
        } else if let Some(inner) = self.nullable_value_argument() {
            inner.write_display(out, annotations);
            out.push('?');
            return;
        } else {
            out.push_str("global::");
            if let Some(namespace) = self.namespace.as_deref().filter(|ns| !ns.is_empty()) {
                out.push_str(namespace);
                out.push('.');
            }
            for outer in &self.containing_types {
                out.push_str(outer);
                out.push('.');
            }
            out.push_str(&self.name);
            if !self.type_arguments.is_empty() {
                out.push('<');
                for (index, argument) in self.type_arguments.iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    argument.write_display(out, annotations);
                }
                out.push('>');
            }
        }
        if self.nullable && annotations == Annotations::Keep {
            out.push('?');
        }
    }

    fn nullable_value_argument(&self) -> Option<&TypeRef> {
        if self.name == "Nullable"
            && self.is_in_namespace("System")
            && self.containing_types.is_empty()
        {
            if let [argument] = self.type_arguments.as_slice() {
                return Some(argument);
            }
        }
        None
    }

    fn special_keyword(&self) -> Option<&'static str> {
        if !self.is_in_namespace("System")
            || !self.containing_types.is_empty()
            || !self.type_arguments.is_empty()
        {
            return None;
        }
        let keyword = match self.name.as_str() {
            "Boolean" => "bool",
            "Byte" => "byte",
            "SByte" => "sbyte",
            "Char" => "char",
            "Decimal" => "decimal",
            "Double" => "double",
            "Single" => "float",
            "Int16" => "short",
            "UInt16" => "ushort",
            "Int32" => "int",
            "UInt32" => "uint",
            "Int64" => "long",
            "UInt64" => "ulong",
            "IntPtr" => "nint",
            "UIntPtr" => "nuint",
            "Object" => "object",
            "String" => "string",
            "Void" => "void",
            _ => return None,
        };
        Some(keyword)
    }
}

impl fmt::Display for NamedTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Definition identity of a named type: namespace, nesting, name and arity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    pub namespace: Option<String>,
    pub containing_types: Vec<String>,
    pub name: String,
    pub arity: usize,
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(namespace) = &self.namespace {
            write!(f, "{namespace}.")?;
        }
        for outer in &self.containing_types {
            write!(f, "{outer}.")?;
        }
        f.write_str(&self.name)?;
        if self.arity > 0 {
            write!(f, "`{}", self.arity)?;
        }
        Ok(())
    }
}
