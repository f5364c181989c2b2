//! Conversion of tree-sitter type syntax into [`Type`] values.

use std::collections::HashSet;

use tree_sitter::Node;
use typeswitch_core::types::{ChanDir, Field, InterfaceShape, Method, Signature, Type, TypeName};

use super::imports::FileScope;
use crate::treesitter::node_text;

const PREDECLARED: &[&str] = &[
    "bool", "byte", "comparable", "complex64", "complex128", "float32", "float64", "int", "int8",
    "int16", "int32", "int64", "rune", "string", "uint", "uint8", "uint16", "uint32", "uint64",
    "uintptr",
];

/// Returns the flattened shape of an embedded type when it is an interface.
pub type ShapeLookup<'l> = dyn FnMut(&Type) -> Option<InterfaceShape> + 'l;

pub fn is_predeclared_type(name: &str) -> bool {
    PREDECLARED.contains(&name) || matches!(name, "any" | "error")
}

/// The shape of the predeclared `error` interface.
pub fn error_shape() -> InterfaceShape {
    InterfaceShape::new(vec![Method::new(
        "Error",
        "",
        Signature {
            results: vec![Type::basic("string")],
            ..Default::default()
        },
    )])
}

/// Stands in for the methods of an embedded element whose shape is unknown,
/// such as an interface from an import that is not loaded. The name is not a
/// valid Go identifier, so no concrete method set contains it and the shape
/// stays distinct from `any`.
fn unknown_requirement(embedded: &Type, package: &str) -> Method {
    Method::new(&format!("<{embedded}>"), package, Signature::default())
}

/// A parameter of a parameter list, one per declared name.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: Option<String>,
    pub ty: Type,
}

/// Everything needed to resolve type names at one point in a file.
#[derive(Clone, Copy)]
pub struct TypeScope<'a> {
    /// Import path of the package being converted.
    pub package: &'a str,
    /// Names of the package's top-level type declarations.
    pub local_types: &'a HashSet<String>,
    pub file: &'a FileScope,
    pub source: &'a [u8],
    /// Type parameters in scope; they stay opaque.
    pub type_params: &'a [String],
}

impl<'a> TypeScope<'a> {
    pub fn text(&self, node: Node<'_>) -> &'a str {
        node_text(node, self.source)
    }

    /// Resolve a bare type name.
    pub fn named_type(&self, name: &str) -> Type {
        if self.type_params.iter().any(|p| p == name) {
            return Type::Named(TypeName::new("", name));
        }
        if self.local_types.contains(name) {
            return Type::named(self.package, name);
        }
        match name {
            "nil" => Type::Nil,
            "any" => Type::Interface(InterfaceShape::default()),
            "error" => Type::Interface(error_shape()),
            // Aliases of uint8 and int32.
            "byte" => Type::basic("uint8"),
            "rune" => Type::basic("int32"),
            _ if PREDECLARED.contains(&name) => Type::basic(name),
            _ => {
                tracing::trace!(package = self.package, name, "unresolved type name");
                Type::named(self.package, name)
            }
        }
    }

    /// Resolve `alias.Name`; an unknown alias is kept as the package path.
    pub fn qualified_type(&self, alias: &str, name: &str) -> Type {
        let package = self.file.resolve(alias).unwrap_or(alias);
        Type::named(package, name)
    }

    pub fn convert(&self, node: Node<'_>, lookup: &mut ShapeLookup<'_>) -> Type {
        match node.kind() {
            "type_identifier" | "identifier" => self.named_type(self.text(node)),
            "nil" => Type::Nil,
            "qualified_type" => {
                let (Some(pkg), Some(name)) = (
                    node.child_by_field_name("package"),
                    node.child_by_field_name("name"),
                ) else {
                    return self.opaque(node);
                };
                self.qualified_type(self.text(pkg), self.text(name))
            }
            "selector_expression" => {
                let (Some(operand), Some(field)) = (
                    node.child_by_field_name("operand"),
                    node.child_by_field_name("field"),
                ) else {
                    return self.opaque(node);
                };
                self.qualified_type(self.text(operand), self.text(field))
            }
            "pointer_type" => match node.named_child(0) {
                Some(elem) => Type::pointer(self.convert(elem, lookup)),
                None => self.opaque(node),
            },
            "unary_expression" if self.field_text(node, "operator") == Some("*") => {
                match node.child_by_field_name("operand") {
                    Some(elem) => Type::pointer(self.convert(elem, lookup)),
                    None => self.opaque(node),
                }
            }
            "slice_type" => Type::Slice {
                elem: Box::new(self.field_type(node, "element", lookup)),
            },
            "array_type" => Type::Array {
                len: self.field_text(node, "length").unwrap_or("").to_string(),
                elem: Box::new(self.field_type(node, "element", lookup)),
            },
            "implicit_length_array_type" => Type::Array {
                len: "...".to_string(),
                elem: Box::new(self.field_type(node, "element", lookup)),
            },
            "map_type" => Type::Map {
                key: Box::new(self.field_type(node, "key", lookup)),
                value: Box::new(self.field_type(node, "value", lookup)),
            },
            "channel_type" => {
                let text = self.text(node);
                let dir = if text.starts_with("<-") {
                    ChanDir::Recv
                } else if text["chan".len().min(text.len())..].trim_start().starts_with("<-") {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Type::Chan {
                    dir,
                    elem: Box::new(self.field_type(node, "value", lookup)),
                }
            }
            "function_type" => Type::Func(self.signature(
                node.child_by_field_name("parameters"),
                node.child_by_field_name("result"),
                lookup,
            )),
            "struct_type" => Type::Struct {
                fields: self.struct_fields(node, lookup),
            },
            "interface_type" => Type::Interface(self.interface_shape(node, lookup)),
            "generic_type" => {
                let base = match node.child_by_field_name("type") {
                    Some(base) => self.convert(base, lookup),
                    None => return self.opaque(node),
                };
                let Type::Named(mut name) = base else {
                    return base;
                };
                if let Some(args) = node.child_by_field_name("type_arguments") {
                    let mut cursor = args.walk();
                    name.args = args
                        .named_children(&mut cursor)
                        .filter(|a| a.kind() != "comment")
                        .map(|a| self.convert(a, lookup))
                        .collect();
                }
                Type::Named(name)
            }
            "parenthesized_type" | "parenthesized_expression" | "negated_type" | "type_elem" => {
                match node.named_child(0) {
                    Some(inner) => self.convert(inner, lookup),
                    None => self.opaque(node),
                }
            }
            _ => self.opaque(node),
        }
    }

    fn opaque(&self, node: Node<'_>) -> Type {
        tracing::trace!(kind = node.kind(), "unsupported type syntax");
        Type::Named(TypeName::new("", self.text(node)))
    }

    fn field_text(&self, node: Node<'_>, field: &str) -> Option<&'a str> {
        node.child_by_field_name(field).map(|n| self.text(n))
    }

    fn field_type(&self, node: Node<'_>, field: &str, lookup: &mut ShapeLookup<'_>) -> Type {
        match node.child_by_field_name(field) {
            Some(child) => self.convert(child, lookup),
            None => self.opaque(node),
        }
    }

    fn struct_fields(&self, node: Node<'_>, lookup: &mut ShapeLookup<'_>) -> Vec<Field> {
        let mut fields = Vec::new();
        let mut cursor = node.walk();
        let Some(list) = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "field_declaration_list")
        else {
            return fields;
        };
        let mut list_cursor = list.walk();
        for decl in list.named_children(&mut list_cursor) {
            if decl.kind() != "field_declaration" {
                continue;
            }
            let Some(type_node) = decl.child_by_field_name("type") else {
                continue;
            };
            let ty = self.convert(type_node, lookup);
            let mut name_cursor = decl.walk();
            let names: Vec<&str> = decl
                .children_by_field_name("name", &mut name_cursor)
                .map(|n| self.text(n))
                .collect();
            if names.is_empty() {
                let mut star_cursor = decl.walk();
                let pointer = decl.children(&mut star_cursor).any(|c| c.kind() == "*");
                let name = match &ty {
                    Type::Named(n) => n.name.clone(),
                    other => other.to_string(),
                };
                let ty = if pointer { Type::pointer(ty) } else { ty };
                fields.push(Field {
                    name,
                    ty,
                    embedded: true,
                });
            } else {
                for name in names {
                    fields.push(Field {
                        name: name.to_string(),
                        ty: ty.clone(),
                        embedded: false,
                    });
                }
            }
        }
        fields
    }

    /// Explicit methods plus those of every embedded interface. Union and
    /// approximation elements restrict the type set, so they become
    /// requirements no concrete type provides.
    pub fn interface_shape(&self, node: Node<'_>, lookup: &mut ShapeLookup<'_>) -> InterfaceShape {
        let mut methods = Vec::new();
        let mut cursor = node.walk();
        for elem in node.named_children(&mut cursor) {
            match elem.kind() {
                "method_elem" | "method_spec" => {
                    let Some(name) = elem.child_by_field_name("name") else {
                        continue;
                    };
                    let signature = self.signature(
                        elem.child_by_field_name("parameters"),
                        elem.child_by_field_name("result"),
                        lookup,
                    );
                    methods.push(Method::new(self.text(name), self.package, signature));
                }
                "type_elem" | "constraint_elem" => {
                    if elem.named_child_count() != 1 {
                        let union = Type::basic(self.text(elem));
                        methods.push(unknown_requirement(&union, self.package));
                        continue;
                    }
                    if let Some(inner) = elem.named_child(0) {
                        self.embed(inner, lookup, &mut methods);
                    }
                }
                "type_identifier" | "qualified_type" | "generic_type" => {
                    self.embed(elem, lookup, &mut methods);
                }
                _ => {}
            }
        }
        InterfaceShape::new(methods)
    }

    fn embed(&self, node: Node<'_>, lookup: &mut ShapeLookup<'_>, methods: &mut Vec<Method>) {
        let ty = self.convert(node, lookup);
        match lookup(&ty) {
            Some(shape) => methods.extend(shape.methods.iter().cloned()),
            None => {
                tracing::debug!(
                    package = self.package,
                    embedded = %ty,
                    "embedded element is not a known interface"
                );
                methods.push(unknown_requirement(&ty, self.package));
            }
        }
    }

    /// Parameters of a `parameter_list`, one entry per declared name.
    /// The flag is set when the last parameter is variadic; its type is
    /// recorded as a slice.
    pub fn parameters(&self, list: Node<'_>, lookup: &mut ShapeLookup<'_>) -> (Vec<Param>, bool) {
        let mut params = Vec::new();
        let mut variadic = false;
        let mut cursor = list.walk();
        for decl in list.named_children(&mut cursor) {
            let is_variadic = match decl.kind() {
                "parameter_declaration" => false,
                "variadic_parameter_declaration" => true,
                _ => continue,
            };
            let Some(type_node) = decl.child_by_field_name("type") else {
                continue;
            };
            let mut ty = self.convert(type_node, lookup);
            if is_variadic {
                ty = Type::Slice { elem: Box::new(ty) };
                variadic = true;
            }
            let mut name_cursor = decl.walk();
            let names: Vec<String> = decl
                .children_by_field_name("name", &mut name_cursor)
                .map(|n| self.text(n).to_string())
                .collect();
            if names.is_empty() {
                params.push(Param { name: None, ty });
            } else {
                for name in names {
                    params.push(Param {
                        name: Some(name),
                        ty: ty.clone(),
                    });
                }
            }
        }
        (params, variadic)
    }

    pub fn signature(
        &self,
        params: Option<Node<'_>>,
        result: Option<Node<'_>>,
        lookup: &mut ShapeLookup<'_>,
    ) -> Signature {
        let (params, variadic) = match params {
            Some(list) => self.parameters(list, lookup),
            None => (vec![], false),
        };
        let results = match result {
            None => vec![],
            Some(list) if list.kind() == "parameter_list" => self
                .parameters(list, lookup)
                .0
                .into_iter()
                .map(|p| p.ty)
                .collect(),
            Some(single) => vec![self.convert(single, lookup)],
        };
        Signature {
            params: params.into_iter().map(|p| p.ty).collect(),
            results,
            variadic,
        }
    }
}

/// Names declared by a `type_parameter_list`, or by the type arguments of
/// a generic receiver such as `(l *List[T])`.
pub fn type_param_names(node: Option<Node<'_>>, source: &[u8]) -> Vec<String> {
    let Some(node) = node else {
        return vec![];
    };
    let mut names = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "type_parameter_declaration" | "parameter_declaration" => {
                let mut name_cursor = child.walk();
                names.extend(
                    child
                        .children_by_field_name("name", &mut name_cursor)
                        .map(|n| node_text(n, source).to_string()),
                );
            }
            "type_identifier" | "identifier" => names.push(node_text(child, source).to_string()),
            "type_elem" => names.extend(type_param_names(Some(child), source)),
            _ => {}
        }
    }
    names
}
