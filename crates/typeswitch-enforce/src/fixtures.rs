//! Hand-built packages and switches shared by the unit tests.

use typeswitch_core::package::{Package, TypeDecl};
use typeswitch_core::syntax::{CaseClause, Expr, Stmt, TypeSwitchStmt};
use typeswitch_core::types::{
    InterfaceShape, Method, MethodSet, Position, Signature, Type,
};

pub const ZOO: &str = "example.com/zoo";
pub const SEALED: &str = "example.com/shapes";

fn sound() -> Method {
    Method::new("Sound", ZOO, Signature::default())
}

fn area() -> Method {
    Method::new(
        "area",
        SEALED,
        Signature {
            results: vec![Type::basic("float64")],
            ..Default::default()
        },
    )
}

pub fn animal_shape() -> InterfaceShape {
    InterfaceShape::new(vec![sound()])
}

pub fn shape_shape() -> InterfaceShape {
    InterfaceShape::new(vec![area()])
}

pub fn animal_ty() -> Type {
    Type::named(ZOO, "Animal")
}

pub fn dog() -> Type {
    Type::named(ZOO, "Dog")
}

pub fn cat() -> Type {
    Type::named(ZOO, "Cat")
}

pub fn bird() -> Type {
    Type::named(ZOO, "Bird")
}

pub fn interface(pkg: &str, name: &str, shape: InterfaceShape) -> TypeDecl {
    TypeDecl {
        name: name.to_string(),
        ty: Type::named(pkg, name),
        underlying: Type::Interface(shape),
        methods: MethodSet::default(),
    }
}

pub fn strukt(pkg: &str, name: &str, methods: Vec<Method>) -> TypeDecl {
    TypeDecl {
        name: name.to_string(),
        ty: Type::named(pkg, name),
        underlying: Type::Struct { fields: vec![] },
        methods: MethodSet::new(methods),
    }
}

/// `Animal` with `Dog`, `Cat`, `Bird` implementing it and `Rock` not.
pub fn zoo() -> Package {
    Package::new(
        ZOO,
        "zoo",
        vec![
            interface(ZOO, "Animal", animal_shape()),
            strukt(ZOO, "Dog", vec![sound()]),
            strukt(ZOO, "Cat", vec![sound()]),
            strukt(ZOO, "Bird", vec![sound()]),
            strukt(ZOO, "Rock", vec![]),
        ],
    )
}

/// Like [`zoo`], plus `Noisy`, shaped exactly like `Animal`.
pub fn zoo_with_alias_interface() -> Package {
    let mut decls = zoo().decls().to_vec();
    decls.push(interface(ZOO, "Noisy", animal_shape()));
    Package::new(ZOO, "zoo", decls)
}

/// An interface with a single implementor.
pub fn lonely() -> Package {
    Package::new(
        ZOO,
        "zoo",
        vec![
            interface(ZOO, "Animal", animal_shape()),
            strukt(ZOO, "Dog", vec![sound()]),
        ],
    )
}

/// `Shape` with an unexported method, implemented by `Circle`, `Square`
/// and the unexported `hidden`.
pub fn sealed() -> Package {
    Package::new(
        SEALED,
        "shapes",
        vec![
            interface(SEALED, "Shape", shape_shape()),
            strukt(SEALED, "Circle", vec![area()]),
            strukt(SEALED, "Square", vec![area()]),
            strukt(SEALED, "hidden", vec![area()]),
        ],
    )
}

pub fn app_importing_sealed() -> Package {
    Package::new("example.com/app", "app", vec![]).with_imports(vec![sealed()])
}

pub fn pos(line: u32) -> Position {
    Position {
        file: "zoo.go".to_string(),
        line,
        column: 2,
    }
}

/// `switch a.(type)` on a subject of type `subject`, at `line`. Each clause
/// is `None` for `default` or the list of case types.
pub fn switch_at(line: u32, subject: Type, clauses: Vec<Option<Vec<Type>>>) -> TypeSwitchStmt {
    TypeSwitchStmt {
        pos: pos(line),
        guard: Box::new(Stmt::Expr {
            expr: Expr::type_switch_guard(Expr::ident("a", Some(subject))),
        }),
        clauses: clauses
            .into_iter()
            .enumerate()
            .map(|(i, list)| CaseClause {
                pos: pos(line + 1 + i as u32),
                list: list.map(|types| types.into_iter().map(Expr::type_expr).collect()),
                body: vec![],
            })
            .collect(),
    }
}
