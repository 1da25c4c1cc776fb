use crate::cancellation::{CancellationError, CancellationToken, check_cancellation};
use crate::classify::{Shape, classify};
use crate::host::{
    Accessibility, ContainingType, MethodSymbol, ParameterSymbol, TypeDeclaration, TypeKind,
};

/// A parameter as it is re-emitted on the synthesized overload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub name: String,
    /// Declaring syntax, re-emitted verbatim.
    pub syntax: String,
    pub ordinal: usize,
    /// `ref` / `out` / `in` modifier the forwarding argument must repeat.
    pub modifier: Option<&'static str>,
}

impl ParameterDescriptor {
    #[must_use]
    pub fn from_symbol(parameter: &ParameterSymbol) -> Self {
        let syntax = parameter.declaring_syntax();
        let modifier = passing_modifier(&syntax);
        Self {
            name: parameter.name.clone(),
            syntax,
            ordinal: parameter.ordinal,
            modifier,
        }
    }

    /// Named forwarding argument (`count: ref count`).
    #[must_use]
    pub fn forwarding_argument(&self) -> String {
        match self.modifier {
            Some(modifier) => format!("{0}: {modifier} {0}", self.name),
            None => format!("{0}: {0}", self.name),
        }
    }
}

fn passing_modifier(syntax: &str) -> Option<&'static str> {
    let declaration = strip_attribute_lists(syntax);
    let declaration = declaration.split('=').next().unwrap_or(declaration);
    let tokens: Vec<&str> = declaration.split_whitespace().collect();
    let leading = tokens.len().saturating_sub(2);
    tokens[..leading].iter().find_map(|token| match *token {
        "ref" => Some("ref"),
        "out" => Some("out"),
        "in" => Some("in"),
        _ => None,
    })
}

/// Skip leading `[...]` attribute lists. Brackets nest and string literals
/// inside an attribute argument are opaque.
fn strip_attribute_lists(syntax: &str) -> &str {
    let mut rest = syntax.trim_start();
    while rest.starts_with('[') {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        let mut end = None;
        for (index, ch) in rest.char_indices() {
            if in_string {
                match ch {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '"' => in_string = true,
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(index);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(end) = end else {
            return "";
        };
        rest = rest[end + 1..].trim_start();
    }
    rest
}

/// Where synthesized members attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainingTypeDescriptor {
    pub name: String,
    pub namespace: Option<String>,
    pub accessibility: Accessibility,
    pub kind: TypeKind,
    pub type_parameters: Vec<String>,
    pub outer_types: Vec<ContainingType>,
}

impl ContainingTypeDescriptor {
    #[must_use]
    pub fn from_declaration(declaration: &TypeDeclaration) -> Self {
        Self {
            name: declaration.name.clone(),
            namespace: declaration.namespace.clone().filter(|ns| !ns.is_empty()),
            accessibility: declaration.accessibility,
            kind: declaration.kind,
            type_parameters: declaration.type_parameters.clone(),
            outer_types: declaration.containing_types.clone(),
        }
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.type_parameters.len()
    }

    /// Fully-qualified display string; the grouping key for emission.
    #[must_use]
    pub fn display(&self) -> String {
        let mut out = String::from("global::");
        if let Some(namespace) = &self.namespace {
            out.push_str(namespace);
            out.push('.');
        }
        for outer in &self.outer_types {
            out.push_str(&outer.name);
            push_type_parameters(&mut out, &outer.type_parameters);
            out.push('.');
        }
        out.push_str(&self.name);
        push_type_parameters(&mut out, &self.type_parameters);
        out
    }

    /// Fragment identifier (`Demo_Models_Outer_Foo`1.Cancellable.g.cs`).
    #[must_use]
    pub fn fragment_id(&self) -> String {
        let mut parts = Vec::new();
        if let Some(namespace) = &self.namespace {
            parts.push(namespace.replace('.', "_"));
        }
        for outer in &self.outer_types {
            parts.push(metadata_name(&outer.name, outer.type_parameters.len()));
        }
        parts.push(metadata_name(&self.name, self.arity()));
        format!("{}.Cancellable.g.cs", parts.join("_"))
    }
}

fn metadata_name(name: &str, arity: usize) -> String {
    if arity == 0 {
        name.to_string()
    } else {
        format!("{name}`{arity}")
    }
}

pub(crate) fn push_type_parameters(out: &mut String, parameters: &[String]) {
    if !parameters.is_empty() {
        out.push('<');
        out.push_str(&parameters.join(", "));
        out.push('>');
    }
}

/// A method that qualifies for a cancellable overload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellableMethodModel {
    pub containing_type: ContainingTypeDescriptor,
    pub accessibility: Accessibility,
    pub is_static: bool,
    pub method_name: String,
    pub method_type_parameters: Vec<String>,
    /// `global::<runtime>.Cancellable<Base><<Arg>>`.
    pub return_type: String,
    /// Display string of the container's type argument, if generic.
    pub element_type: Option<String>,
    /// Declared parameters minus the cancellation parameter, in order.
    pub parameters: Vec<ParameterDescriptor>,
    pub cancellation_parameter: ParameterDescriptor,
}

impl CancellableMethodModel {
    /// Build the model, or `Ok(None)` when `method` does not qualify.
    ///
    /// With several token parameters the last one is the one removed.
    pub fn create(
        declaration: &TypeDeclaration,
        method: &MethodSymbol,
        runtime_namespace: &str,
        token: &CancellationToken,
    ) -> Result<Option<Self>, CancellationError> {
        check_cancellation(token, "cancellable.model")?;

        if method.explicit_interface.is_some() || method.parameters.is_empty() {
            return Ok(None);
        }
        let Some(return_type) = &method.return_type else {
            return Ok(None);
        };
        let Shape::AsyncContainer { kind, argument } = classify(return_type) else {
            return Ok(None);
        };

        let mut cancellation_index = None;
        for (index, parameter) in method.parameters.iter().enumerate() {
            check_cancellation(token, "cancellable.parameter")?;
            if matches!(classify(&parameter.ty), Shape::CancellationToken) {
                cancellation_index = Some(index);
            }
        }
        let Some(cancellation_index) = cancellation_index else {
            return Ok(None);
        };

        let mut parameters: Vec<ParameterDescriptor> = method
            .parameters
            .iter()
            .map(ParameterDescriptor::from_symbol)
            .collect();
        let cancellation_parameter = parameters.remove(cancellation_index);

        let element_type = argument.map(|argument| argument.display());
        let argument_suffix = element_type
            .as_deref()
            .map(|element| format!("<{element}>"))
            .unwrap_or_default();
        let runtime_prefix = if runtime_namespace.is_empty() {
            String::from("global::")
        } else {
            format!("global::{runtime_namespace}.")
        };
        let return_type = format!("{runtime_prefix}Cancellable{}{argument_suffix}", kind.name());

        Ok(Some(Self {
            containing_type: ContainingTypeDescriptor::from_declaration(declaration),
            accessibility: method.accessibility,
            is_static: method.is_static,
            method_name: method.name.clone(),
            method_type_parameters: method.type_parameters.clone(),
            return_type,
            element_type,
            parameters,
            cancellation_parameter,
        }))
    }

    /// Method name with its type parameters (`Load<T>`).
    #[must_use]
    pub fn generic_name(&self) -> String {
        let mut out = self.method_name.clone();
        push_type_parameters(&mut out, &self.method_type_parameters);
        out
    }
}
