//! Declared symbols visible to the generators.

use serde::{Deserialize, Serialize};

use super::operations::Operation;
use super::types::{Accessibility, TypeRef};

/// Keyword flavour of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Record,
    RecordStruct,
    Interface,
}

impl TypeKind {
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Record => "record",
            TypeKind::RecordStruct => "record struct",
            TypeKind::Interface => "interface",
        }
    }
}

/// A type declared in source, together with its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    /// Enclosing type declarations, outermost first.
    #[serde(default)]
    pub containing_types: Vec<ContainingType>,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub is_partial: bool,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl TypeDeclaration {
    #[must_use]
    pub fn new(namespace: Option<&str>, name: &str, kind: TypeKind) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            containing_types: Vec::new(),
            kind,
            is_partial: false,
            accessibility: Accessibility::Internal,
            type_parameters: Vec::new(),
            attributes: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Whether the declaration carries `attribute`, accepting the `Attribute`
    /// suffix and namespace qualification.
    #[must_use]
    pub fn has_attribute(&self, attribute: &str) -> bool {
        let wanted = attribute.trim_end_matches("Attribute");
        self.attributes.iter().any(|candidate| {
            let simple = candidate.rsplit('.').next().unwrap_or(candidate);
            let simple = simple.strip_prefix("global::").unwrap_or(simple);
            simple.trim_end_matches("Attribute") == wanted
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodSymbol> {
        self.members.iter().filter_map(|member| match member {
            Member::Method(method) => Some(method),
            _ => None,
        })
    }
}

/// An enclosing type declaration of a nested type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainingType {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub type_parameters: Vec<String>,
}

/// A member of a type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum Member {
    Method(MethodSymbol),
    Property(PropertySymbol),
    Field(FieldSymbol),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSymbol {
    pub name: String,
    #[serde(default = "private_accessibility")]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterSymbol>,
    /// `None` for `void` methods.
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    /// Interface named by an explicit implementation (`IFoo.Bar`).
    #[serde(default)]
    pub explicit_interface: Option<String>,
    #[serde(default)]
    pub body: Option<Operation>,
}

impl MethodSymbol {
    #[must_use]
    pub fn new(name: &str, return_type: Option<TypeRef>) -> Self {
        Self {
            name: name.to_string(),
            accessibility: Accessibility::Public,
            is_static: false,
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type,
            explicit_interface: None,
            body: None,
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, name: &str, ty: TypeRef) -> Self {
        let ordinal = self.parameters.len();
        self.parameters.push(ParameterSymbol::new(name, ty, ordinal));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Operation) -> Self {
        self.body = Some(body);
        self
    }
}

fn private_accessibility() -> Accessibility {
    Accessibility::Private
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSymbol {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Declaring syntax as written (`ref int count`, `string name = ""`).
    #[serde(default)]
    pub syntax: Option<String>,
    #[serde(default)]
    pub ordinal: usize,
}

impl ParameterSymbol {
    #[must_use]
    pub fn new(name: &str, ty: TypeRef, ordinal: usize) -> Self {
        Self {
            name: name.to_string(),
            ty,
            syntax: None,
            ordinal,
        }
    }

    /// Declaring syntax, falling back to `<type> <name>` when the host did
    /// not supply the original text.
    #[must_use]
    pub fn declaring_syntax(&self) -> String {
        match &self.syntax {
            Some(syntax) => syntax.trim().to_string(),
            None => format!("{} {}", self.ty.display(), self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySymbol {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default = "public_accessibility")]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_indexer: bool,
    #[serde(default)]
    pub explicit_interface: Option<String>,
}

impl PropertySymbol {
    #[must_use]
    pub fn new(name: &str, ty: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            ty,
            accessibility: Accessibility::Public,
            is_static: false,
            is_indexer: false,
            explicit_interface: None,
        }
    }
}

fn public_accessibility() -> Accessibility {
    Accessibility::Public
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSymbol {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default = "private_accessibility")]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub is_static: bool,
}
