//! Package-level type declarations: underlying types, flattened interface
//! shapes, and method sets including promotion through embedded fields.

use std::collections::{BTreeMap, HashMap, HashSet};

use tree_sitter::Node;
use typeswitch_core::package::TypeDecl;
use typeswitch_core::types::{InterfaceShape, Method, MethodSet, Type, TypeName};

use super::file::{specs, ParsedFile, TopLevel};
use super::types::{type_param_names, TypeScope};
use super::PackageContext;

#[derive(Clone)]
struct Spec<'a> {
    /// The right-hand side type node.
    node: Node<'a>,
    file: &'a ParsedFile,
    alias: bool,
    type_params: Vec<String>,
}

#[derive(Clone, Copy)]
struct RawMethod<'a> {
    node: Node<'a>,
    file: &'a ParsedFile,
}

struct ResolvedMethod {
    receiver: String,
    pointer: bool,
    method: Method,
}

/// Names of every top-level type declaration across `tops`.
pub fn local_type_names(files: &[ParsedFile], tops: &[TopLevel<'_>]) -> HashSet<String> {
    let mut names = HashSet::new();
    for (file, top) in files.iter().zip(tops) {
        for decl in &top.types {
            for spec in specs(*decl, &["type_spec", "type_alias"]) {
                if let Some(name) = spec.child_by_field_name("name") {
                    names.insert(file_text(file, name).to_string());
                }
            }
        }
    }
    names
}

fn file_text<'f>(file: &'f ParsedFile, node: Node<'_>) -> &'f str {
    crate::treesitter::node_text(node, file.bytes())
}

/// Resolves one package's type declarations on demand, memoizing each
/// result. Cycles resolve to nothing instead of looping.
pub struct DeclBuilder<'a> {
    path: &'a str,
    local_types: &'a HashSet<String>,
    imports: &'a HashMap<String, &'a PackageContext>,
    specs: BTreeMap<String, Spec<'a>>,
    raw_methods: Vec<RawMethod<'a>>,
    methods: Vec<ResolvedMethod>,
    declared: HashMap<String, Type>,
    underlying: HashMap<String, Option<Type>>,
    resolving: HashSet<String>,
    method_sets: HashMap<String, (MethodSet, MethodSet)>,
    collecting: HashSet<String>,
}

impl<'a> DeclBuilder<'a> {
    pub fn new(
        path: &'a str,
        local_types: &'a HashSet<String>,
        imports: &'a HashMap<String, &'a PackageContext>,
    ) -> Self {
        Self {
            path,
            local_types,
            imports,
            specs: BTreeMap::new(),
            raw_methods: Vec::new(),
            methods: Vec::new(),
            declared: HashMap::new(),
            underlying: HashMap::new(),
            resolving: HashSet::new(),
            method_sets: HashMap::new(),
            collecting: HashSet::new(),
        }
    }

    /// Register the declarations of one file.
    pub fn add_file(&mut self, file: &'a ParsedFile, top: &TopLevel<'a>) {
        for decl in &top.types {
            for spec in specs(*decl, &["type_spec", "type_alias"]) {
                let (Some(name), Some(node)) = (
                    spec.child_by_field_name("name"),
                    spec.child_by_field_name("type"),
                ) else {
                    continue;
                };
                let name = file_text(file, name).to_string();
                if self.specs.contains_key(&name) {
                    tracing::warn!(package = self.path, "{name} redeclared in {}", file.path);
                    continue;
                }
                let type_params =
                    type_param_names(spec.child_by_field_name("type_parameters"), file.bytes());
                self.specs.insert(
                    name,
                    Spec {
                        node,
                        file,
                        alias: spec.kind() == "type_alias",
                        type_params,
                    },
                );
            }
        }
        self.raw_methods
            .extend(top.methods.iter().map(|&node| RawMethod { node, file }));
    }

    fn scope<'s>(&self, file: &'s ParsedFile, type_params: &'s [String]) -> TypeScope<'s>
    where
        'a: 's,
    {
        TypeScope {
            package: self.path,
            local_types: self.local_types,
            file: &file.scope,
            source: file.bytes(),
            type_params,
        }
    }

    /// The converted right-hand side of a declaration.
    fn rhs(&mut self, name: &str) -> Option<Type> {
        if let Some(ty) = self.declared.get(name) {
            return Some(ty.clone());
        }
        let spec = self.specs.get(name)?.clone();
        let scope = self.scope(spec.file, &spec.type_params);
        let ty = scope.convert(spec.node, &mut |t: &Type| self.shape_of(t));
        self.declared.insert(name.to_string(), ty.clone());
        Some(ty)
    }

    fn underlying(&mut self, name: &str) -> Option<Type> {
        if let Some(u) = self.underlying.get(name) {
            return u.clone();
        }
        if !self.resolving.insert(name.to_string()) {
            tracing::debug!(package = self.path, "cycle through type {name}");
            return None;
        }
        let result = self.rhs(name).and_then(|ty| self.underlying_of(&ty));
        self.resolving.remove(name);
        self.underlying.insert(name.to_string(), result.clone());
        result
    }

    /// Underlying type of any type visible from this package.
    fn underlying_of(&mut self, ty: &Type) -> Option<Type> {
        match ty {
            Type::Named(n) if n.package == self.path => {
                if self.local_types.contains(&n.name) {
                    self.underlying(&n.name)
                } else {
                    None
                }
            }
            Type::Named(n) => self.imports.get(&n.package)?.package.underlying(ty),
            other => Some(other.clone()),
        }
    }

    fn shape_of(&mut self, ty: &Type) -> Option<InterfaceShape> {
        match self.underlying_of(ty)? {
            Type::Interface(shape) => Some(shape),
            _ => None,
        }
    }

    fn resolve_methods(&mut self) {
        let raw = std::mem::take(&mut self.raw_methods);
        for RawMethod { node, file } in raw {
            let Some(resolved) = self.resolve_method(node, file) else {
                continue;
            };
            self.methods.push(resolved);
        }
    }

    fn resolve_method(&mut self, node: Node<'a>, file: &'a ParsedFile) -> Option<ResolvedMethod> {
        let name = file_text(file, node.child_by_field_name("name")?).to_string();
        let (receiver, pointer, type_params) = receiver_of(node, file)?;
        if !self.specs.contains_key(&receiver) {
            tracing::debug!(package = self.path, "method {name} on undeclared type {receiver}");
            return None;
        }
        let scope = self.scope(file, &type_params);
        let signature = scope.signature(
            node.child_by_field_name("parameters"),
            node.child_by_field_name("result"),
            &mut |t: &Type| self.shape_of(t),
        );
        Some(ResolvedMethod {
            receiver,
            pointer,
            method: Method::new(&name, self.path, signature),
        })
    }

    /// Value and pointer method sets of a local defined type.
    fn method_sets(&mut self, name: &str) -> (MethodSet, MethodSet) {
        if let Some(sets) = self.method_sets.get(name) {
            return sets.clone();
        }
        if !self.collecting.insert(name.to_string()) {
            return Default::default();
        }
        let mut value = Vec::new();
        let mut pointer = Vec::new();
        match self.underlying(name) {
            Some(Type::Interface(shape)) => {
                value.extend(shape.methods.iter().cloned());
                pointer.extend(shape.methods.iter().cloned());
            }
            underlying => {
                for m in self.methods.iter().filter(|m| m.receiver == name) {
                    pointer.push(m.method.clone());
                    if !m.pointer {
                        value.push(m.method.clone());
                    }
                }
                if let Some(Type::Struct { fields }) = underlying {
                    for field in fields.iter().filter(|f| f.embedded) {
                        let (v, p) = self.promoted(&field.ty);
                        value.extend(v);
                        pointer.extend(p);
                    }
                }
            }
        }
        let sets = (MethodSet::new(value), MethodSet::new(pointer));
        self.collecting.remove(name);
        self.method_sets.insert(name.to_string(), sets.clone());
        sets
    }

    /// Methods an embedded field promotes into the value and pointer
    /// method sets of its struct. Embedding `*E` promotes all of `E`'s
    /// methods into both.
    fn promoted(&mut self, field: &Type) -> (Vec<Method>, Vec<Method>) {
        let (inner, via_pointer) = match field {
            Type::Pointer { elem } => (elem.as_ref(), true),
            other => (other, false),
        };
        let Type::Named(name) = inner else {
            return Default::default();
        };
        let (value, all) = self.named_sets(name);
        let value = if via_pointer { all.clone() } else { value };
        (
            value.iter().cloned().collect(),
            all.iter().cloned().collect(),
        )
    }

    fn named_sets(&mut self, name: &TypeName) -> (MethodSet, MethodSet) {
        if name.package == self.path {
            if !self.specs.contains_key(&name.name) {
                return Default::default();
            }
            if self.specs.get(&name.name).is_some_and(|s| s.alias) {
                return match self.rhs(&name.name) {
                    Some(Type::Named(target)) => self.named_sets(&target),
                    _ => Default::default(),
                };
            }
            return self.method_sets(&name.name);
        }
        let Some(ctx) = self.imports.get(&name.package) else {
            return Default::default();
        };
        let Some(decl) = ctx.package.resolve_named(&name.package, &name.name) else {
            return Default::default();
        };
        let pointer = ctx
            .pointer_methods
            .get(&name.name)
            .cloned()
            .unwrap_or_else(|| decl.methods.clone());
        (decl.methods.clone(), pointer)
    }

    /// Resolve everything: declarations in name order plus each type's
    /// pointer method set.
    pub fn finish(mut self) -> (Vec<TypeDecl>, HashMap<String, MethodSet>) {
        self.resolve_methods();
        let names: Vec<(String, bool)> = self
            .specs
            .iter()
            .map(|(name, spec)| (name.clone(), spec.alias))
            .collect();
        let mut decls = Vec::with_capacity(names.len());
        let mut pointer_methods = HashMap::new();
        for (name, alias) in names {
            let ty = if alias {
                self.rhs(&name).unwrap_or_else(|| Type::named(self.path, &name))
            } else {
                Type::named(self.path, &name)
            };
            let (value, pointer) = match &ty {
                Type::Named(n) if alias => self.named_sets(n),
                Type::Named(_) => self.method_sets(&name),
                _ => Default::default(),
            };
            let underlying = match self.underlying(&name) {
                Some(u) => u,
                None => {
                    tracing::debug!(package = self.path, "underlying type of {name} is unknown");
                    ty.clone()
                }
            };
            pointer_methods.insert(name.clone(), pointer);
            decls.push(TypeDecl {
                name,
                ty,
                underlying,
                methods: value,
            });
        }
        (decls, pointer_methods)
    }
}

/// Receiver base type name, whether it is a pointer receiver, and the type
/// parameters a generic receiver introduces.
pub(crate) fn receiver_of(method: Node<'_>, file: &ParsedFile) -> Option<(String, bool, Vec<String>)> {
    let list = method.child_by_field_name("receiver")?;
    let mut cursor = list.walk();
    let param = list
        .named_children(&mut cursor)
        .find(|c| c.kind() == "parameter_declaration")?;
    let mut ty = param.child_by_field_name("type")?;
    let mut pointer = false;
    while matches!(ty.kind(), "pointer_type" | "parenthesized_type") {
        pointer |= ty.kind() == "pointer_type";
        ty = ty.named_child(0)?;
    }
    match ty.kind() {
        "type_identifier" => Some((file_text(file, ty).to_string(), pointer, vec![])),
        "generic_type" => {
            let base = ty.child_by_field_name("type")?;
            let params = type_param_names(ty.child_by_field_name("type_arguments"), file.bytes());
            Some((file_text(file, base).to_string(), pointer, params))
        }
        _ => None,
    }
}
