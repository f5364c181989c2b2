//! Function bodies: static type inference for expressions and lowering of
//! statements into the resolved syntax the analysis walks.

use std::collections::HashMap;

use tree_sitter::Node;
use typeswitch_core::syntax::{AssignStmt, CaseClause, Expr, ExprKind, SourceFile, Stmt, TypeSwitchStmt};
use typeswitch_core::types::{InterfaceShape, Signature, Type};

use super::decls::receiver_of;
use super::file::{specs, ParsedFile, TopLevel};
use super::types::{is_predeclared_type, type_param_names, TypeScope};
use super::PackageContext;
use crate::treesitter::{node_text, position};

const BUILTIN_FUNCS: &[&str] = &[
    "append", "cap", "clear", "close", "complex", "copy", "delete", "imag", "len", "make", "max",
    "min", "new", "panic", "print", "println", "real", "recover",
];

/// Types of package-level functions and variables.
#[derive(Debug, Clone, Default)]
pub struct ValueIndex {
    pub funcs: HashMap<String, Signature>,
    /// Variables and constants with a known type.
    pub vars: HashMap<String, Type>,
}

/// Fill `ctx.values` from the package's top-level `func`, `var` and
/// `const` declarations. Initializers may refer to variables declared
/// later, so variables get a second pass.
pub fn index_values(
    ctx: &mut PackageContext,
    files: &[ParsedFile],
    tops: &[TopLevel<'_>],
    imports: &HashMap<String, &PackageContext>,
) {
    let mut funcs = HashMap::new();
    for (file, top) in files.iter().zip(tops) {
        let mut lowerer = Lowerer::new(ctx, imports, file);
        for func in &top.funcs {
            let Some(name) = func.child_by_field_name("name") else {
                continue;
            };
            lowerer.type_params =
                type_param_names(func.child_by_field_name("type_parameters"), file.bytes());
            funcs.insert(
                node_text(name, file.bytes()).to_string(),
                lowerer.signature_of(*func),
            );
        }
    }
    ctx.values.funcs = funcs;

    for _ in 0..2 {
        let mut found = Vec::new();
        for (file, top) in files.iter().zip(tops) {
            let lowerer = Lowerer::new(ctx, imports, file);
            for decl in top.vars.iter().chain(&top.consts) {
                for (name, ty) in lowerer.declared_values(*decl) {
                    if let Some(ty) = ty {
                        if !ctx.values.vars.contains_key(&name) {
                            found.push((name, ty));
                        }
                    }
                }
            }
        }
        for (name, ty) in found {
            ctx.values.vars.entry(name).or_insert(ty);
        }
    }
}

/// Lower every function body of `file`, plus function literals in
/// package-level initializers, in source order.
pub fn lower_file(
    ctx: &PackageContext,
    imports: &HashMap<String, &PackageContext>,
    file: &ParsedFile,
    top: &TopLevel<'_>,
) -> SourceFile {
    let mut lowerer = Lowerer::new(ctx, imports, file);
    let mut items: Vec<(usize, Stmt)> = Vec::new();
    for func in top.funcs.iter().chain(&top.methods) {
        if let Some(body) = lowerer.lower_function(*func) {
            items.push((func.start_byte(), body));
        }
    }
    for decl in top.vars.iter().chain(&top.consts) {
        let closures = lowerer.closures(*decl);
        if !closures.is_empty() {
            items.push((decl.start_byte(), Stmt::block(closures)));
        }
    }
    items.sort_by_key(|(start, _)| *start);
    SourceFile {
        path: file.path.clone(),
        generated: file.generated,
        body: items.into_iter().map(|(_, stmt)| stmt).collect(),
    }
}

/// Walks one file with a stack of lexical scopes.
///
/// A scope entry of `None` is a local whose type could not be inferred; it
/// still shadows package-level names and imports.
pub struct Lowerer<'a> {
    ctx: &'a PackageContext,
    imports: &'a HashMap<String, &'a PackageContext>,
    file: &'a ParsedFile,
    scopes: Vec<HashMap<String, Option<Type>>>,
    type_params: Vec<String>,
}

impl<'a> Lowerer<'a> {
    pub fn new(
        ctx: &'a PackageContext,
        imports: &'a HashMap<String, &'a PackageContext>,
        file: &'a ParsedFile,
    ) -> Self {
        Self {
            ctx,
            imports,
            file,
            scopes: vec![HashMap::new()],
            type_params: Vec::new(),
        }
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        node_text(node, self.file.bytes())
    }

    fn type_scope(&self) -> TypeScope<'_> {
        TypeScope {
            package: &self.ctx.package.path,
            local_types: &self.ctx.local_types,
            file: &self.file.scope,
            source: self.file.bytes(),
            type_params: &self.type_params,
        }
    }

    fn convert(&self, node: Node<'_>) -> Type {
        let ty = self
            .type_scope()
            .convert(node, &mut |t: &Type| self.shape_of(t));
        self.resolve_alias(ty)
    }

    /// An alias name denotes its target type.
    fn resolve_alias(&self, ty: Type) -> Type {
        match ty {
            Type::Named(n) if n.args.is_empty() => {
                let target = self
                    .context_for(&n.package)
                    .and_then(|c| c.package.lookup(&n.name))
                    .map(|decl| decl.ty.clone());
                match target {
                    Some(target) if target != Type::Named(n.clone()) => target,
                    _ => Type::Named(n),
                }
            }
            Type::Pointer { elem } => Type::pointer(self.resolve_alias(*elem)),
            other => other,
        }
    }

    fn signature_of(&self, func: Node<'_>) -> Signature {
        self.type_scope().signature(
            func.child_by_field_name("parameters"),
            func.child_by_field_name("result"),
            &mut |t: &Type| self.shape_of(t),
        )
    }

    fn context_for(&self, package: &str) -> Option<&'a PackageContext> {
        if package == self.ctx.package.path {
            Some(self.ctx)
        } else {
            self.imports.get(package).copied()
        }
    }

    fn underlying(&self, ty: &Type) -> Option<Type> {
        match ty {
            Type::Named(n) => self.context_for(&n.package)?.package.underlying(ty),
            other => Some(other.clone()),
        }
    }

    fn shape_of(&self, ty: &Type) -> Option<InterfaceShape> {
        match self.underlying(ty)? {
            Type::Interface(shape) => Some(shape),
            _ => None,
        }
    }

    fn push(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop(&mut self) {
        self.scopes.pop();
    }

    fn bind(&mut self, name: &str, ty: Option<Type>) {
        if name == "_" {
            return;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), ty);
        }
    }

    /// `Some` when `name` is a local, carrying its type if known.
    fn local(&self, name: &str) -> Option<Option<&Type>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .map(Option::as_ref)
    }

    /// The import path `name` refers to, unless a local shadows it.
    fn import_path(&self, name: &str) -> Option<&'a str> {
        if self.local(name).is_some() {
            return None;
        }
        self.file.scope.resolve(name)
    }

    fn names_type(&self, name: &str) -> bool {
        self.local(name).is_none()
            && !self.ctx.values.vars.contains_key(name)
            && !self.ctx.values.funcs.contains_key(name)
            && (self.ctx.local_types.contains(name)
                || self.type_params.iter().any(|p| p == name)
                || is_predeclared_type(name))
    }

    /// Static type of an expression, when it can be determined.
    pub fn infer(&self, node: Node<'_>) -> Option<Type> {
        match node.kind() {
            "identifier" => self.infer_ident(self.text(node)),
            "int_literal" => Some(Type::basic("int")),
            "float_literal" => Some(Type::basic("float64")),
            "imaginary_literal" => Some(Type::basic("complex128")),
            "rune_literal" => Some(Type::basic("int32")),
            "interpreted_string_literal" | "raw_string_literal" => Some(Type::basic("string")),
            "true" | "false" => Some(Type::basic("bool")),
            "nil" => Some(Type::Nil),
            "iota" => Some(Type::basic("int")),
            "parenthesized_expression" => self.infer(node.named_child(0)?),
            "composite_literal" => Some(self.convert(node.child_by_field_name("type")?)),
            "func_literal" => Some(Type::Func(self.signature_of(node))),
            "type_assertion_expression" | "type_conversion_expression" => {
                Some(self.convert(node.child_by_field_name("type")?))
            }
            "unary_expression" => {
                let operand = node.child_by_field_name("operand")?;
                match self.text(node.child_by_field_name("operator")?) {
                    "&" => Some(Type::pointer(self.infer(operand)?)),
                    "*" => match self.infer(operand)? {
                        Type::Pointer { elem } => Some(*elem),
                        _ => None,
                    },
                    "<-" => match self.underlying(&self.infer(operand)?)? {
                        Type::Chan { elem, .. } => Some(*elem),
                        _ => None,
                    },
                    "!" => Some(Type::basic("bool")),
                    _ => self.infer(operand),
                }
            }
            "binary_expression" => {
                let op = self.text(node.child_by_field_name("operator")?);
                if matches!(op, "==" | "!=" | "<" | "<=" | ">" | ">=" | "&&" | "||") {
                    return Some(Type::basic("bool"));
                }
                let left = node.child_by_field_name("left")?;
                let right = node.child_by_field_name("right")?;
                self.infer(left).or_else(|| self.infer(right))
            }
            "call_expression" => {
                let mut results = self.call_results(node)?;
                if results.len() == 1 {
                    results.pop()
                } else {
                    None
                }
            }
            "selector_expression" => self.infer_selector(node),
            "index_expression" => {
                let operand = self.infer(node.child_by_field_name("operand")?)?;
                match self.underlying(&operand)? {
                    Type::Slice { elem } | Type::Array { elem, .. } => Some(*elem),
                    Type::Map { value, .. } => Some(*value),
                    Type::Pointer { elem } => match self.underlying(&elem)? {
                        Type::Array { elem, .. } => Some(*elem),
                        _ => None,
                    },
                    Type::Basic { name } if name == "string" => Some(Type::basic("uint8")),
                    _ => None,
                }
            }
            "slice_expression" => {
                let operand = self.infer(node.child_by_field_name("operand")?)?;
                match self.underlying(&operand)? {
                    Type::Array { elem, .. } => Some(Type::Slice { elem }),
                    Type::Pointer { elem } => match self.underlying(&elem)? {
                        Type::Array { elem, .. } => Some(Type::Slice { elem }),
                        _ => None,
                    },
                    _ => Some(operand),
                }
            }
            _ => None,
        }
    }

    fn infer_ident(&self, name: &str) -> Option<Type> {
        if let Some(local) = self.local(name) {
            return local.cloned();
        }
        if let Some(ty) = self.ctx.values.vars.get(name) {
            return Some(ty.clone());
        }
        if let Some(sig) = self.ctx.values.funcs.get(name) {
            return Some(Type::Func(sig.clone()));
        }
        match name {
            "nil" => Some(Type::Nil),
            "true" | "false" => Some(Type::basic("bool")),
            "iota" => Some(Type::basic("int")),
            _ => None,
        }
    }

    fn infer_selector(&self, node: Node<'_>) -> Option<Type> {
        let operand = node.child_by_field_name("operand")?;
        let field = self.text(node.child_by_field_name("field")?);
        if operand.kind() == "identifier" {
            if let Some(path) = self.import_path(self.text(operand)) {
                let dep = self.imports.get(path)?;
                return dep
                    .values
                    .vars
                    .get(field)
                    .cloned()
                    .or_else(|| dep.values.funcs.get(field).cloned().map(Type::Func));
            }
        }
        let recv = self.infer(operand)?;
        self.field_type(&recv, field, 0)
            .or_else(|| self.method_signature(&recv, field).map(Type::Func))
    }

    /// Type of a field reached through `ty`, following embedded fields.
    fn field_type(&self, ty: &Type, name: &str, depth: usize) -> Option<Type> {
        if depth > 8 {
            return None;
        }
        let Type::Struct { fields } = self.underlying(ty.deref())? else {
            return None;
        };
        if let Some(field) = fields.iter().find(|f| f.name == name) {
            return Some(field.ty.clone());
        }
        fields
            .iter()
            .filter(|f| f.embedded)
            .find_map(|f| self.field_type(&f.ty, name, depth + 1))
    }

    /// Signature of method `name` callable on a value of type `ty`. Values
    /// are treated as addressable, so pointer-receiver methods count.
    fn method_signature(&self, ty: &Type, name: &str) -> Option<Signature> {
        let base = ty.deref();
        if let Type::Named(n) = base {
            let ctx = self.context_for(&n.package)?;
            let found = ctx
                .pointer_methods
                .get(&n.name)
                .and_then(|set| set.get(name))
                .map(|m| m.signature.clone());
            if found.is_some() {
                return found;
            }
        }
        match self.underlying(base)? {
            Type::Interface(shape) => shape.methods.get(name).map(|m| m.signature.clone()),
            Type::Struct { .. } => match self.underlying(&self.field_type(base, name, 0)?)? {
                Type::Func(sig) => Some(sig),
                _ => None,
            },
            _ => None,
        }
    }

    fn func_results(&self, ty: &Type) -> Option<Vec<Type>> {
        match self.underlying(ty)? {
            Type::Func(sig) => Some(sig.results),
            _ => None,
        }
    }

    /// Result types of a call, or the converted type of a conversion.
    fn call_results(&self, call: Node<'_>) -> Option<Vec<Type>> {
        let func = call.child_by_field_name("function")?;
        match func.kind() {
            "identifier" => {
                let name = self.text(func);
                if let Some(local) = self.local(name) {
                    return self.func_results(local?);
                }
                if let Some(sig) = self.ctx.values.funcs.get(name) {
                    return Some(sig.results.clone());
                }
                if let Some(var) = self.ctx.values.vars.get(name) {
                    return self.func_results(var);
                }
                if self.names_type(name) {
                    return Some(vec![self.type_scope().named_type(name)]);
                }
                if BUILTIN_FUNCS.contains(&name) {
                    return Some(self.builtin_results(name, call));
                }
                None
            }
            "selector_expression" => {
                let operand = func.child_by_field_name("operand")?;
                let field = self.text(func.child_by_field_name("field")?);
                if operand.kind() == "identifier" {
                    if let Some(path) = self.import_path(self.text(operand)) {
                        let dep = self.imports.get(path)?;
                        if let Some(sig) = dep.values.funcs.get(field) {
                            return Some(sig.results.clone());
                        }
                        if dep.package.lookup(field).is_some() {
                            return Some(vec![Type::named(path, field)]);
                        }
                        return self.func_results(dep.values.vars.get(field)?);
                    }
                }
                let recv = self.infer(operand)?;
                Some(self.method_signature(&recv, field)?.results)
            }
            "parenthesized_expression" => {
                let inner = func.named_child(0)?;
                let is_pointer_type = inner.kind() == "pointer_type"
                    || (inner.kind() == "unary_expression"
                        && inner
                            .child_by_field_name("operator")
                            .is_some_and(|op| self.text(op) == "*")
                        && inner
                            .child_by_field_name("operand")
                            .is_some_and(|o| self.names_type_expr(o)));
                if is_pointer_type {
                    return Some(vec![self.convert(inner)]);
                }
                self.func_results(&self.infer(inner)?)
            }
            "func_literal" => Some(self.signature_of(func).results),
            "index_expression" | "generic_function" => {
                // explicit instantiation; type arguments are not substituted
                let target = func
                    .child_by_field_name("operand")
                    .or_else(|| func.child_by_field_name("function"))?;
                self.func_results(&self.infer(target)?)
            }
            "slice_type" | "array_type" | "map_type" | "pointer_type" | "function_type"
            | "interface_type" | "struct_type" | "channel_type" | "qualified_type"
            | "generic_type" | "parenthesized_type" => Some(vec![self.convert(func)]),
            _ => self.func_results(&self.infer(func)?),
        }
    }

    fn names_type_expr(&self, node: Node<'_>) -> bool {
        match node.kind() {
            "identifier" | "type_identifier" => self.names_type(self.text(node)),
            "selector_expression" | "qualified_type" => {
                let (operand, field) = match node.kind() {
                    "selector_expression" => ("operand", "field"),
                    _ => ("package", "name"),
                };
                let (Some(pkg), Some(name)) = (
                    node.child_by_field_name(operand),
                    node.child_by_field_name(field),
                ) else {
                    return false;
                };
                self.import_path(self.text(pkg))
                    .and_then(|path| self.imports.get(path))
                    .is_some_and(|dep| dep.package.lookup(self.text(name)).is_some())
            }
            _ => false,
        }
    }

    fn builtin_results(&self, name: &str, call: Node<'_>) -> Vec<Type> {
        let first_arg = call.child_by_field_name("arguments").and_then(|args| {
            let mut cursor = args.walk();
            let first = args
                .named_children(&mut cursor)
                .find(|a| a.kind() != "comment");
            first
        });
        let ty = match name {
            "new" => first_arg.map(|arg| Type::pointer(self.convert(arg))),
            "make" => first_arg.map(|arg| self.convert(arg)),
            "len" | "cap" | "copy" => Some(Type::basic("int")),
            "append" | "min" | "max" => first_arg.and_then(|arg| self.infer(arg)),
            "complex" => Some(Type::basic("complex128")),
            "real" | "imag" => Some(Type::basic("float64")),
            "recover" => Some(Type::Interface(InterfaceShape::default())),
            _ => return vec![],
        };
        ty.into_iter().collect()
    }

    /// Types bound by `names := values` (or `var names = values`),
    /// including the two-value forms of calls, assertions, map indexing
    /// and receives.
    fn assigned_types(&self, values: &[Node<'_>], count: usize) -> Vec<Option<Type>> {
        if values.len() == count {
            return values.iter().map(|v| self.infer(*v)).collect();
        }
        let mut types = vec![None; count];
        let [value] = values else {
            return types;
        };
        let value = unparen(*value);
        match value.kind() {
            "call_expression" => {
                if let Some(results) = self.call_results(value) {
                    for (slot, ty) in types.iter_mut().zip(results) {
                        *slot = Some(ty);
                    }
                }
            }
            "type_assertion_expression" | "index_expression" | "unary_expression" if count == 2 => {
                types[0] = self.infer(value);
                types[1] = Some(Type::basic("bool"));
            }
            _ => {}
        }
        types
    }

    /// Names and types declared by a `var` or `const` declaration. A const
    /// spec without type or value repeats the previous spec's type.
    fn declared_values(&self, decl: Node<'_>) -> Vec<(String, Option<Type>)> {
        let mut out = Vec::new();
        let mut previous: Option<Type> = None;
        for spec in specs(decl, &["var_spec", "const_spec"]) {
            let mut cursor = spec.walk();
            let names: Vec<String> = spec
                .children_by_field_name("name", &mut cursor)
                .map(|n| self.text(n).to_string())
                .collect();
            let values = spec
                .child_by_field_name("value")
                .map(expression_list)
                .unwrap_or_default();
            let types = match spec.child_by_field_name("type") {
                Some(ty) => vec![Some(self.convert(ty)); names.len()],
                None if values.is_empty() && spec.kind() == "const_spec" => {
                    vec![previous.clone(); names.len()]
                }
                None => self.assigned_types(&values, names.len()),
            };
            previous = types.first().cloned().flatten();
            out.extend(names.into_iter().zip(types));
        }
        out
    }

    fn lower_expr(&self, node: Node<'_>) -> Expr {
        match node.kind() {
            "identifier" => Expr::ident(self.text(node), self.infer(node)),
            "type_assertion_expression" => {
                let asserted = node.child_by_field_name("type").map(|t| self.convert(t));
                let operand = match node.child_by_field_name("operand") {
                    Some(op) => self.lower_expr(op),
                    None => Expr::new(ExprKind::Other { text: String::new() }, None),
                };
                Expr::new(
                    ExprKind::TypeAssert {
                        operand: Box::new(operand),
                        asserted: asserted.clone(),
                    },
                    asserted,
                )
            }
            _ => Expr::new(
                ExprKind::Other {
                    text: self.text(node).to_string(),
                },
                self.infer(node),
            ),
        }
    }

    /// Lower a function declaration, method, or literal into a block,
    /// with its receiver, parameters and named results in scope.
    pub fn lower_function(&mut self, node: Node<'_>) -> Option<Stmt> {
        let body = node.child_by_field_name("body")?;
        let saved_params = self.type_params.len();
        self.type_params.extend(type_param_names(
            node.child_by_field_name("type_parameters"),
            self.file.bytes(),
        ));
        if node.kind() == "method_declaration" {
            if let Some((_, _, params)) = receiver_of(node, self.file) {
                self.type_params.extend(params);
            }
        }
        self.push();
        for field in ["receiver", "parameters", "result"] {
            if let Some(list) = node.child_by_field_name(field) {
                if list.kind() == "parameter_list" {
                    self.bind_params(list);
                }
            }
        }
        let stmts = self.lower_children(body);
        self.pop();
        self.type_params.truncate(saved_params);
        Some(Stmt::block(stmts))
    }

    fn bind_params(&mut self, list: Node<'_>) {
        let (params, _) = self
            .type_scope()
            .parameters(list, &mut |t: &Type| self.shape_of(t));
        for param in params {
            if let Some(name) = param.name {
                self.bind(&name, Some(param.ty));
            }
        }
    }

    /// Function literals inside an expression, each lowered to a block.
    /// Literals nested in another literal are handled by that literal.
    fn closures(&mut self, node: Node<'_>) -> Vec<Stmt> {
        let mut found = Vec::new();
        collect_func_literals(node, &mut found);
        found
            .into_iter()
            .filter_map(|lit| self.lower_function(lit))
            .collect()
    }

    fn lower_children(&mut self, node: Node<'_>) -> Vec<Stmt> {
        statement_children(node)
            .into_iter()
            .map(|child| self.lower_stmt(child))
            .collect()
    }

    fn with_closures(&mut self, stmt: Stmt, node: Node<'_>) -> Stmt {
        let closures = self.closures(node);
        if closures.is_empty() {
            return stmt;
        }
        let mut stmts = vec![stmt];
        stmts.extend(closures);
        Stmt::block(stmts)
    }

    pub fn lower_stmt(&mut self, node: Node<'_>) -> Stmt {
        match node.kind() {
            "block" => {
                self.push();
                let stmts = self.lower_children(node);
                self.pop();
                Stmt::block(stmts)
            }
            "statement_list" => Stmt::block(self.lower_children(node)),
            "expression_statement" => match node.named_child(0) {
                Some(expr) => {
                    let lowered = Stmt::Expr {
                        expr: self.lower_expr(expr),
                    };
                    self.with_closures(lowered, expr)
                }
                None => Stmt::Other,
            },
            "short_var_declaration" => self.lower_short_var(node),
            "assignment_statement" => {
                let lhs = node
                    .child_by_field_name("left")
                    .map(expression_list)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|n| self.text(n).to_string())
                    .collect();
                let rhs = node
                    .child_by_field_name("right")
                    .map(expression_list)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|n| self.lower_expr(n))
                    .collect();
                let assign = Stmt::Assign(AssignStmt {
                    lhs,
                    rhs,
                    define: false,
                });
                self.with_closures(assign, node)
            }
            "var_declaration" | "const_declaration" => {
                let declared = self.declared_values(node);
                let closures = self.closures(node);
                for (name, ty) in declared {
                    self.bind(&name, ty);
                }
                if closures.is_empty() {
                    Stmt::Other
                } else {
                    Stmt::block(closures)
                }
            }
            "if_statement" => {
                self.push();
                let mut stmts = Vec::new();
                if let Some(init) = node.child_by_field_name("initializer") {
                    stmts.push(self.lower_stmt(init));
                }
                if let Some(cond) = node.child_by_field_name("condition") {
                    stmts.extend(self.closures(cond));
                }
                for field in ["consequence", "alternative"] {
                    if let Some(branch) = node.child_by_field_name(field) {
                        stmts.push(self.lower_stmt(branch));
                    }
                }
                self.pop();
                Stmt::block(stmts)
            }
            "for_statement" => self.lower_for(node),
            "expression_switch_statement" => {
                self.push();
                let mut stmts = Vec::new();
                if let Some(init) = node.child_by_field_name("initializer") {
                    stmts.push(self.lower_stmt(init));
                }
                if let Some(value) = node.child_by_field_name("value") {
                    stmts.extend(self.closures(value));
                }
                let mut cursor = node.walk();
                let cases: Vec<Node<'_>> = node
                    .named_children(&mut cursor)
                    .filter(|c| matches!(c.kind(), "expression_case" | "default_case"))
                    .collect();
                for case in cases {
                    self.push();
                    stmts.push(Stmt::block(self.lower_children(case)));
                    self.pop();
                }
                self.pop();
                Stmt::block(stmts)
            }
            "type_switch_statement" => self.lower_type_switch(node),
            "select_statement" => {
                let mut stmts = Vec::new();
                let mut cursor = node.walk();
                let cases: Vec<Node<'_>> = node
                    .named_children(&mut cursor)
                    .filter(|c| matches!(c.kind(), "communication_case" | "default_case"))
                    .collect();
                for case in cases {
                    self.push();
                    if let Some(comm) = case.child_by_field_name("communication") {
                        if comm.kind() == "receive_statement" {
                            self.bind_receive(comm);
                        }
                    }
                    stmts.push(Stmt::block(self.lower_children(case)));
                    self.pop();
                }
                Stmt::block(stmts)
            }
            "labeled_statement" => Stmt::block(self.lower_children(node)),
            "go_statement" | "defer_statement" | "return_statement" | "send_statement"
            | "inc_statement" | "dec_statement" => {
                let closures = self.closures(node);
                if closures.is_empty() {
                    Stmt::Other
                } else {
                    Stmt::block(closures)
                }
            }
            "type_declaration" => {
                tracing::trace!(file = %self.file.path, "local type declaration left opaque");
                Stmt::Other
            }
            _ => Stmt::Other,
        }
    }

    fn lower_short_var(&mut self, node: Node<'_>) -> Stmt {
        let names: Vec<String> = node
            .child_by_field_name("left")
            .map(expression_list)
            .unwrap_or_default()
            .into_iter()
            .map(|n| self.text(n).to_string())
            .collect();
        let values = node
            .child_by_field_name("right")
            .map(expression_list)
            .unwrap_or_default();
        let rhs: Vec<Expr> = values.iter().map(|v| self.lower_expr(*v)).collect();
        let types = self.assigned_types(&values, names.len());
        let closures = self.closures(node);
        for (name, ty) in names.iter().zip(types) {
            self.bind(name, ty);
        }
        let assign = Stmt::Assign(AssignStmt {
            lhs: names,
            rhs,
            define: true,
        });
        if closures.is_empty() {
            assign
        } else {
            let mut stmts = vec![assign];
            stmts.extend(closures);
            Stmt::block(stmts)
        }
    }

    fn bind_receive(&mut self, comm: Node<'_>) {
        let Some(left) = comm.child_by_field_name("left") else {
            return;
        };
        let names: Vec<String> = expression_list(left)
            .into_iter()
            .map(|n| self.text(n).to_string())
            .collect();
        let values: Vec<Node<'_>> = comm.child_by_field_name("right").into_iter().collect();
        let types = self.assigned_types(&values, names.len());
        for (name, ty) in names.iter().zip(types) {
            self.bind(name, ty);
        }
    }

    fn lower_for(&mut self, node: Node<'_>) -> Stmt {
        self.push();
        let mut stmts = Vec::new();
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        for child in children {
            match child.kind() {
                "for_clause" => {
                    if let Some(init) = child.child_by_field_name("initializer") {
                        stmts.push(self.lower_stmt(init));
                    }
                }
                "range_clause" => {
                    if let Some(right) = child.child_by_field_name("right") {
                        stmts.extend(self.closures(right));
                    }
                    self.bind_range(child);
                }
                "block" => stmts.push(self.lower_stmt(child)),
                _ => {}
            }
        }
        self.pop();
        Stmt::block(stmts)
    }

    fn bind_range(&mut self, clause: Node<'_>) {
        let Some(left) = clause.child_by_field_name("left") else {
            return;
        };
        let mut cursor = clause.walk();
        let defines = clause.children(&mut cursor).any(|c| c.kind() == ":=");
        if !defines {
            return;
        }
        let names: Vec<String> = expression_list(left)
            .into_iter()
            .map(|n| self.text(n).to_string())
            .collect();
        let ranged = clause
            .child_by_field_name("right")
            .and_then(|r| self.infer(r))
            .and_then(|t| self.underlying(&t));
        let (key, value) = match ranged {
            Some(Type::Slice { elem }) | Some(Type::Array { elem, .. }) => {
                (Some(Type::basic("int")), Some(*elem))
            }
            Some(Type::Pointer { elem }) => match self.underlying(&elem) {
                Some(Type::Array { elem, .. }) => (Some(Type::basic("int")), Some(*elem)),
                _ => (None, None),
            },
            Some(Type::Map { key, value }) => (Some(*key), Some(*value)),
            Some(Type::Chan { elem, .. }) => (Some(*elem), None),
            Some(Type::Basic { name }) if name == "string" => {
                (Some(Type::basic("int")), Some(Type::basic("int32")))
            }
            Some(Type::Basic { name }) => (Some(Type::basic(&name)), None),
            Some(Type::Func(sig)) => {
                // range over an iterator function: yield's parameters
                match sig.params.first().and_then(|y| self.underlying(y)) {
                    Some(Type::Func(yield_sig)) => {
                        let mut params = yield_sig.params.into_iter();
                        (params.next(), params.next())
                    }
                    _ => (None, None),
                }
            }
            _ => (None, None),
        };
        let mut types = [key, value].into_iter();
        for name in names {
            self.bind(&name, types.next().flatten());
        }
    }

    fn lower_type_switch(&mut self, node: Node<'_>) -> Stmt {
        self.push();
        let init = node
            .child_by_field_name("initializer")
            .map(|i| self.lower_stmt(i));
        let operand = match node.child_by_field_name("value") {
            Some(value) => self.lower_expr(value),
            None => Expr::new(ExprKind::Other { text: String::new() }, None),
        };
        let subject_ty = operand.ty.clone();
        let alias = node
            .child_by_field_name("alias")
            .and_then(|list| expression_list(list).into_iter().next())
            .map(|n| self.text(n).to_string());
        let guard_expr = Expr::type_switch_guard(operand);
        let guard = match &alias {
            Some(name) => Stmt::Assign(AssignStmt {
                lhs: vec![name.clone()],
                rhs: vec![guard_expr],
                define: true,
            }),
            None => Stmt::Expr { expr: guard_expr },
        };

        let mut clauses = Vec::new();
        let mut cursor = node.walk();
        let cases: Vec<Node<'_>> = node
            .named_children(&mut cursor)
            .filter(|c| matches!(c.kind(), "type_case" | "default_case"))
            .collect();
        for case in cases {
            let list = (case.kind() == "type_case").then(|| {
                let mut type_cursor = case.walk();
                let types: Vec<Node<'_>> = case
                    .children_by_field_name("type", &mut type_cursor)
                    .collect();
                types
                    .into_iter()
                    .map(|t| Expr::type_expr(self.convert(t)))
                    .collect::<Vec<_>>()
            });
            self.push();
            if let Some(name) = &alias {
                let bound = match list.as_deref() {
                    Some([single]) if single.ty != Some(Type::Nil) => single.ty.clone(),
                    _ => subject_ty.clone(),
                };
                self.bind(name, bound);
            }
            let body = self.lower_children(case);
            self.pop();
            clauses.push(CaseClause {
                pos: position(case, &self.file.path),
                list,
                body,
            });
        }
        self.pop();

        let switch = Stmt::TypeSwitch(TypeSwitchStmt {
            pos: position(node, &self.file.path),
            guard: Box::new(guard),
            clauses,
        });
        match init {
            Some(init) => Stmt::block(vec![init, switch]),
            None => switch,
        }
    }
}

/// Named, non-field children that are statements, flattening any
/// `statement_list` wrapper.
fn statement_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    if !cursor.goto_first_child() {
        return out;
    }
    loop {
        let child = cursor.node();
        if child.is_named() && cursor.field_name().is_none() && child.kind() != "comment" {
            if child.kind() == "statement_list" {
                out.extend(statement_children(child));
            } else {
                out.push(child);
            }
        }
        if !cursor.goto_next_sibling() {
            break;
        }
    }
    out
}

/// Elements of an `expression_list`; any other node stands for itself.
fn expression_list(node: Node<'_>) -> Vec<Node<'_>> {
    if node.kind() != "expression_list" {
        return vec![node];
    }
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

fn unparen(mut node: Node<'_>) -> Node<'_> {
    while node.kind() == "parenthesized_expression" {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

fn collect_func_literals<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "func_literal" {
            out.push(child);
        } else {
            collect_func_literals(child, out);
        }
    }
}
