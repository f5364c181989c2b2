use std::fmt;

use serde::{Deserialize, Serialize};

/// A static Go type.
///
/// Equality is type identity: defined types are identical only to
/// themselves (same package, name and type arguments), every other
/// constructor compares structurally. `byte` and `rune` are represented
/// by `uint8` and `int32`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Type {
    /// Predeclared types (`int`, `string`, `error`, ...).
    Basic { name: String },
    /// A defined type, referenced by its qualified name.
    Named(TypeName),
    Pointer { elem: Box<Type> },
    Slice { elem: Box<Type> },
    Array { len: String, elem: Box<Type> },
    Map { key: Box<Type>, value: Box<Type> },
    Chan { dir: ChanDir, elem: Box<Type> },
    Func(Signature),
    Struct { fields: Vec<Field> },
    Interface(InterfaceShape),
    /// The untyped nil, as listed by `case nil:`.
    Nil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// Qualified reference to a defined type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName {
    /// Import path of the declaring package.
    pub package: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub embedded: bool,
}

/// A function signature. Parameter names do not take part in identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub params: Vec<Type>,
    pub results: Vec<Type>,
    pub variadic: bool,
}

/// A method requirement or a method a type provides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    /// Declaring package, recorded only for unexported names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    pub signature: Signature,
}

/// A name-ordered, duplicate-free set of methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSet {
    methods: Vec<Method>,
}

/// The structural shape of an interface: its full (flattened) method set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceShape {
    pub methods: MethodSet,
}

/// A source location, 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

/// Go's export rule: a name is exported if it starts with an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}

impl Type {
    pub fn basic(name: &str) -> Self {
        Type::Basic { name: name.to_string() }
    }

    pub fn named(package: &str, name: &str) -> Self {
        Type::Named(TypeName::new(package, name))
    }

    pub fn pointer(elem: Type) -> Self {
        Type::Pointer { elem: Box::new(elem) }
    }

    pub fn as_interface(&self) -> Option<&InterfaceShape> {
        match self {
            Type::Interface(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_named(&self) -> Option<&TypeName> {
        match self {
            Type::Named(n) => Some(n),
            _ => None,
        }
    }

    /// Strip one level of pointer indirection, if any.
    pub fn deref(&self) -> &Type {
        match self {
            Type::Pointer { elem } => elem,
            other => other,
        }
    }
}

impl TypeName {
    pub fn new(package: &str, name: &str) -> Self {
        Self {
            package: package.to_string(),
            name: name.to_string(),
            args: vec![],
        }
    }

    /// Object identifier: the bare name when exported, `path.name` otherwise.
    pub fn id(&self) -> String {
        object_id(&self.package, &self.name)
    }
}

/// Identifier of a package-level object, qualified for unexported names.
pub fn object_id(package: &str, name: &str) -> String {
    if is_exported(name) || package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

impl Method {
    /// Build a method declared in `package`. The package only sticks for
    /// unexported names.
    pub fn new(name: &str, package: &str, signature: Signature) -> Self {
        let package = if is_exported(name) {
            None
        } else {
            Some(package.to_string())
        };
        Self {
            name: name.to_string(),
            package,
            signature,
        }
    }
}

impl MethodSet {
    /// Normalize into name order. On a duplicate name the first entry wins,
    /// so callers list shallower (outer) methods before promoted ones.
    pub fn new(methods: Vec<Method>) -> Self {
        let mut deduped: Vec<Method> = Vec::with_capacity(methods.len());
        for m in methods {
            if !deduped
                .iter()
                .any(|d| d.name == m.name && d.package == m.package)
            {
                deduped.push(m);
            }
        }
        deduped.sort_by(|a, b| (&a.name, &a.package).cmp(&(&b.name, &b.package)));
        Self { methods: deduped }
    }

    pub fn contains(&self, method: &Method) -> bool {
        self.methods.iter().any(|m| m == method)
    }

    pub fn get(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl FromIterator<Method> for MethodSet {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl InterfaceShape {
    pub fn new(methods: Vec<Method>) -> Self {
        Self {
            methods: MethodSet::new(methods),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Basic { name } => f.write_str(name),
            Type::Named(n) => write!(f, "{n}"),
            Type::Pointer { elem } => write!(f, "*{elem}"),
            Type::Slice { elem } => write!(f, "[]{elem}"),
            Type::Array { len, elem } => write!(f, "[{len}]{elem}"),
            Type::Map { key, value } => write!(f, "map[{key}]{value}"),
            Type::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            Type::Func(sig) => write!(f, "func{sig}"),
            Type::Struct { fields } => {
                f.write_str("struct{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    if field.embedded {
                        write!(f, "{}", field.ty)?;
                    } else {
                        write!(f, "{} {}", field.name, field.ty)?;
                    }
                }
                f.write_str("}")
            }
            Type::Interface(shape) => write!(f, "{shape}"),
            Type::Nil => f.write_str("untyped nil"),
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_empty() {
            f.write_str(&self.name)?;
        } else {
            write!(f, "{}.{}", self.package, self.name)?;
        }
        if !self.args.is_empty() {
            let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
            write!(f, "[{}]", args.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        if self.variadic {
            if let Some(last) = params.last_mut() {
                // variadic params are stored as their slice type
                *last = format!("...{}", last.trim_start_matches("[]"));
            }
        }
        write!(f, "({})", params.join(", "))?;
        match self.results.len() {
            0 => Ok(()),
            1 => write!(f, " {}", self.results[0]),
            _ => {
                let results: Vec<String> = self.results.iter().map(|r| r.to_string()).collect();
                write!(f, " ({})", results.join(", "))
            }
        }
    }
}

impl fmt::Display for InterfaceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.methods.is_empty() {
            return f.write_str("interface{}");
        }
        let methods: Vec<String> = self
            .methods
            .iter()
            .map(|m| format!("{}{}", m.name, m.signature))
            .collect();
        write!(f, "interface{{ {} }}", methods.join("; "))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
