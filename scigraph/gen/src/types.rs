//! Mapping from document types to Rust types.
//!
//! [`TypeMapper::build`] walks the whole model once, in a fixed order, and
//! assigns every named model and every inline object or enum a unique Rust
//! name. After that, [`TypeMapper::map`] is a pure lookup.
//!
//! ## Traversal order
//!
//! Hoisted names are handed out first come, first served:
//!
//! 1. models, alphabetically by name
//! 2. resources, alphabetically by identifier
//! 3. operations, in declaration order
//! 4. within an operation: parameters, success response, error responses
//! 5. within a type: depth first, fields in declaration order
//!
//! Models keep their own name unless it is one of the std or serde names the
//! generated code relies on (`Option`, `String`, `Vec`, ...); those are
//! renamed like any other collision. A hoisted type whose name is taken gets
//! the smallest free numeric suffix (`TermGetResponse2`).

use std::collections::{BTreeSet, HashMap, HashSet};

use proc_macro2::TokenStream;
use quote::quote;
use scigraph_define::{Primitive, SpecModel, TypeOrigin, TypeSpec};
use tracing::{debug, instrument};

use crate::naming::{disambiguate, ident, pascal_ident};

/// A Rust type as it appears in generated code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    String,
    I32,
    I64,
    F32,
    F64,
    Bool,
    /// `serde_json::Value`
    Json,
    /// `()`
    Unit,
    Vec(Box<TargetType>),
    Option(Box<TargetType>),
    /// `Box<T>`, for recursive fields.
    Boxed(Box<TargetType>),
    /// A generated declaration in the `types` unit.
    Named(String),
}

/// Where generated tokens will live relative to the `types` unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeScope {
    /// Inside the `types` unit: named types are referenced bare.
    Local,
    /// In a sibling unit: named types are referenced as `super::types::X`.
    Sibling,
}

impl TargetType {
    /// Renders the type as tokens.
    pub fn to_tokens(&self, scope: TypeScope) -> TokenStream {
        match self {
            Self::String => quote! { String },
            Self::I32 => quote! { i32 },
            Self::I64 => quote! { i64 },
            Self::F32 => quote! { f32 },
            Self::F64 => quote! { f64 },
            Self::Bool => quote! { bool },
            Self::Json => quote! { serde_json::Value },
            Self::Unit => quote! { () },
            Self::Vec(inner) => {
                let inner = inner.to_tokens(scope);
                quote! { Vec<#inner> }
            }
            Self::Option(inner) => {
                let inner = inner.to_tokens(scope);
                quote! { Option<#inner> }
            }
            Self::Boxed(inner) => {
                let inner = inner.to_tokens(scope);
                quote! { Box<#inner> }
            }
            Self::Named(name) => {
                let name = ident(name);
                match scope {
                    TypeScope::Local => quote! { #name },
                    TypeScope::Sibling => quote! { super::types::#name },
                }
            }
        }
    }

    /// Wraps in `Option` unless already optional.
    pub fn optional(self) -> Self {
        match self {
            Self::Option(_) => self,
            other => Self::Option(Box::new(other)),
        }
    }

    /// True for `String`.
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }

    /// True if the type implements `Default` without relying on a generated
    /// declaration.
    pub fn has_default(&self) -> bool {
        match self {
            Self::Named(_) => false,
            Self::Boxed(inner) => inner.has_default(),
            _ => true,
        }
    }

    /// Human-readable rendering, used by `inspect` and in docs.
    pub fn display(&self) -> String {
        match self {
            Self::String => "String".into(),
            Self::I32 => "i32".into(),
            Self::I64 => "i64".into(),
            Self::F32 => "f32".into(),
            Self::F64 => "f64".into(),
            Self::Bool => "bool".into(),
            Self::Json => "serde_json::Value".into(),
            Self::Unit => "()".into(),
            Self::Vec(inner) => format!("Vec<{}>", inner.display()),
            Self::Option(inner) => format!("Option<{}>", inner.display()),
            Self::Boxed(inner) => format!("Box<{}>", inner.display()),
            Self::Named(name) => name.clone(),
        }
    }

    /// The named declaration reached without passing through a `Vec`.
    fn direct_named(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Option(inner) | Self::Boxed(inner) => inner.direct_named(),
            _ => None,
        }
    }
}

/// A declaration emitted into the `types` unit.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    /// Unique Rust name.
    pub name: String,
    /// Where the type was declared in the document.
    pub origin: TypeOrigin,
    /// Description from the document.
    pub description: Option<String>,
    /// Struct or enum body.
    pub kind: DeclKind,
}

/// Body of a [`TypeDecl`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    Struct(Vec<FieldDecl>),
    Enum(Vec<VariantDecl>),
}

/// A struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Name on the wire.
    pub wire_name: String,
    /// Rust identifier (possibly raw).
    pub ident: String,
    /// Full field type, `Option` and `Box` included.
    pub ty: TargetType,
    /// Whether the field may be absent from the payload.
    pub optional: bool,
    /// Description from the document.
    pub description: Option<String>,
}

/// A unit variant of a string enum.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantDecl {
    /// Value on the wire.
    pub wire_value: String,
    /// Rust variant name.
    pub ident: String,
}

/// Assigns Rust names and types to everything in a [`SpecModel`].
#[derive(Debug, Clone)]
pub struct TypeMapper {
    names: HashMap<TypeOrigin, String>,
    models: HashMap<String, String>,
    decls: Vec<TypeDecl>,
}

impl TypeMapper {
    /// Names every declaration in `model` and builds the declarations.
    #[instrument(name = "map_types", skip(model), fields(models = model.types.len()))]
    pub fn build(model: &SpecModel) -> Self {
        let mut naming = Naming::default();
        naming.taken.extend(RESERVED_NAMES.iter().map(|n| n.to_string()));
        naming.taken.extend(
            model
                .types
                .iter()
                .map(|t| t.type_ident.clone())
                .filter(|n| !is_reserved(n)),
        );

        let mut models: HashMap<String, String> = HashMap::new();
        for named in &model.types {
            let ident = if is_reserved(&named.type_ident) {
                let ident = disambiguate(&named.type_ident, |n| naming.taken.contains(n));
                naming.taken.insert(ident.clone());
                ident
            } else {
                named.type_ident.clone()
            };
            naming.model_names.insert(named.type_ident.clone(), ident.clone());
            models.insert(named.name.clone(), ident);
        }

        for named in &model.types {
            naming.visit(&named.ty);
        }
        for resource in model.resources_sorted() {
            for operation in &resource.operations {
                for parameter in &operation.parameters {
                    naming.visit(&parameter.ty);
                }
                if let Some(ty) = &operation.response.ty {
                    naming.visit(ty);
                }
                for error in &operation.errors {
                    if let Some(ty) = &error.ty {
                        naming.visit(ty);
                    }
                }
            }
        }

        let mut mapper = Self {
            names: naming.names,
            models,
            decls: Vec::new(),
        };
        let decls: Vec<TypeDecl> = naming
            .order
            .iter()
            .filter_map(|spec| mapper.declare(spec))
            .collect();
        mapper.decls = decls;
        mapper.box_recursive_fields();

        debug!(declarations = mapper.decls.len(), "mapped types");
        mapper
    }

    /// Maps a type descriptor to its Rust type.
    pub fn map(&self, ty: &TypeSpec) -> TargetType {
        match ty {
            TypeSpec::Primitive { primitive } => match primitive {
                Primitive::String => TargetType::String,
                Primitive::Int32 => TargetType::I32,
                Primitive::Int64 => TargetType::I64,
                Primitive::Float => TargetType::F32,
                Primitive::Double => TargetType::F64,
                Primitive::Boolean => TargetType::Bool,
            },
            TypeSpec::Array { items } => TargetType::Vec(Box::new(self.map(items))),
            TypeSpec::Any => TargetType::Json,
            TypeSpec::Ref { name } => self.named(self.models.get(name)),
            TypeSpec::Object(object) => self.named(self.names.get(&object.origin)),
            TypeSpec::Enum(e) => self.named(self.names.get(&e.origin)),
        }
    }

    /// Maps an optional payload type; `None` means no payload.
    pub fn map_payload(&self, ty: Option<&TypeSpec>) -> TargetType {
        ty.map_or(TargetType::Unit, |ty| self.map(ty))
    }

    /// Every declaration, in traversal order.
    pub fn declarations(&self) -> &[TypeDecl] {
        &self.decls
    }

    /// Looks up a declaration by Rust name.
    pub fn declaration(&self, name: &str) -> Option<&TypeDecl> {
        self.decls.iter().find(|d| d.name == name)
    }

    /// The Rust name given to an inline type's origin.
    pub fn name_of(&self, origin: &TypeOrigin) -> Option<&str> {
        self.names.get(origin).map(String::as_str)
    }

    fn named(&self, name: Option<&String>) -> TargetType {
        name.map_or(TargetType::Json, |n| TargetType::Named(n.clone()))
    }

    fn declare(&self, spec: &TypeSpec) -> Option<TypeDecl> {
        match spec {
            TypeSpec::Object(object) => Some(TypeDecl {
                name: self.names.get(&object.origin).cloned().unwrap_or_default(),
                origin: object.origin.clone(),
                description: object.description.clone(),
                kind: DeclKind::Struct(
                    object
                        .fields
                        .iter()
                        .map(|field| {
                            let mut ty = self.map(&field.ty);
                            if field.is_optional() {
                                ty = ty.optional();
                            }
                            FieldDecl {
                                wire_name: field.name.clone(),
                                ident: field.ident.clone(),
                                ty,
                                optional: field.is_optional(),
                                description: field.description.clone(),
                            }
                        })
                        .collect(),
                ),
            }),
            TypeSpec::Enum(e) => {
                let mut taken: HashSet<String> = HashSet::new();
                let variants = e
                    .values
                    .iter()
                    .map(|value| {
                        let candidate = pascal_ident(value).unwrap_or_else(|| "Empty".to_string());
                        let ident = disambiguate(&candidate, |n| taken.contains(n));
                        taken.insert(ident.clone());
                        VariantDecl {
                            wire_value: value.clone(),
                            ident,
                        }
                    })
                    .collect();
                Some(TypeDecl {
                    name: self.names.get(&e.origin).cloned().unwrap_or_default(),
                    origin: e.origin.clone(),
                    description: None,
                    kind: DeclKind::Enum(variants),
                })
            }
            _ => None,
        }
    }

    /// Wraps fields in `Box` where a declaration can reach itself through
    /// direct (non-`Vec`) fields.
    fn box_recursive_fields(&mut self) {
        let edges: HashMap<String, Vec<String>> = self
            .decls
            .iter()
            .map(|decl| {
                let targets = match &decl.kind {
                    DeclKind::Struct(fields) => fields
                        .iter()
                        .filter_map(|f| f.ty.direct_named().map(str::to_string))
                        .collect(),
                    DeclKind::Enum(_) => Vec::new(),
                };
                (decl.name.clone(), targets)
            })
            .collect();

        for decl in &mut self.decls {
            let DeclKind::Struct(fields) = &mut decl.kind else {
                continue;
            };
            for field in fields.iter_mut() {
                let Some(target) = field.ty.direct_named() else {
                    continue;
                };
                if reaches(&edges, target, &decl.name) {
                    field.ty = boxed(field.ty.clone());
                }
            }
        }
    }
}

/// Names the generated code uses unqualified.
const RESERVED_NAMES: &[&str] = &[
    "Box",
    "Deserialize",
    "Option",
    "Result",
    "Serialize",
    "String",
    "Vec",
];

fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Puts `Box` directly around the named type, inside any `Option`.
fn boxed(ty: TargetType) -> TargetType {
    match ty {
        TargetType::Option(inner) => TargetType::Option(Box::new(boxed(*inner))),
        named @ TargetType::Named(_) => TargetType::Boxed(Box::new(named)),
        other => other,
    }
}

fn reaches(edges: &HashMap<String, Vec<String>>, from: &str, to: &str) -> bool {
    let mut stack = vec![from];
    let mut seen = BTreeSet::new();
    while let Some(current) = stack.pop() {
        if current == to {
            return true;
        }
        if !seen.insert(current) {
            continue;
        }
        if let Some(next) = edges.get(current) {
            stack.extend(next.iter().map(String::as_str));
        }
    }
    false
}

/// First pass: hands out names in traversal order.
#[derive(Default)]
struct Naming<'m> {
    taken: HashSet<String>,
    model_names: HashMap<String, String>,
    names: HashMap<TypeOrigin, String>,
    order: Vec<&'m TypeSpec>,
}

impl<'m> Naming<'m> {
    fn visit(&mut self, ty: &'m TypeSpec) {
        match ty {
            TypeSpec::Object(object) => {
                self.register(&object.origin, ty);
                for field in &object.fields {
                    self.visit(&field.ty);
                }
            }
            TypeSpec::Enum(e) => self.register(&e.origin, ty),
            TypeSpec::Array { items } => self.visit(items),
            TypeSpec::Primitive { .. } | TypeSpec::Any | TypeSpec::Ref { .. } => {}
        }
    }

    fn register(&mut self, origin: &TypeOrigin, ty: &'m TypeSpec) {
        if self.names.contains_key(origin) {
            return;
        }
        let name = if origin.is_model_root() {
            self.model_names
                .get(&origin.owner)
                .cloned()
                .unwrap_or_else(|| origin.owner.clone())
        } else {
            let name = disambiguate(&origin.candidate_name(), |n| self.taken.contains(n));
            self.taken.insert(name.clone());
            name
        };
        self.names.insert(origin.clone(), name);
        self.order.push(ty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{field, model_with, object, operation, resource};
    use scigraph_define::{EnumSpec, NamedType};

    #[test]
    fn primitives_map_to_rust_types() {
        let mapper = TypeMapper::build(&model_with(vec![], vec![]));
        assert_eq!(mapper.map(&TypeSpec::string()), TargetType::String);
        assert_eq!(mapper.map(&TypeSpec::primitive(Primitive::Int32)), TargetType::I32);
        assert_eq!(mapper.map(&TypeSpec::primitive(Primitive::Int64)), TargetType::I64);
        assert_eq!(mapper.map(&TypeSpec::primitive(Primitive::Float)), TargetType::F32);
        assert_eq!(mapper.map(&TypeSpec::primitive(Primitive::Double)), TargetType::F64);
        assert_eq!(mapper.map(&TypeSpec::Any), TargetType::Json);
        assert_eq!(
            mapper.map(&TypeSpec::array(TypeSpec::string())).display(),
            "Vec<String>"
        );
    }

    #[test]
    fn inline_response_is_hoisted_with_nested_names() {
        let meta = object(
            TypeOrigin::operation("GraphNeighbors").child("Response").child("Meta"),
            vec![field("count", TypeSpec::primitive(Primitive::Int32), true)],
        );
        let response = object(
            TypeOrigin::operation("GraphNeighbors").child("Response"),
            vec![field("meta", meta, false)],
        );
        let mut op = operation("neighbors", "GraphNeighbors");
        op.response.ty = Some(response.clone());
        let model = model_with(vec![], vec![resource("graph", vec![op])]);

        let mapper = TypeMapper::build(&model);
        assert_eq!(mapper.map(&response), TargetType::Named("GraphNeighborsResponse".into()));
        let names: Vec<_> = mapper.declarations().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["GraphNeighborsResponse", "GraphNeighborsResponseMeta"]);

        let DeclKind::Struct(fields) = &mapper.declarations()[0].kind else {
            panic!("expected struct");
        };
        assert_eq!(fields[0].ty.display(), "Option<GraphNeighborsResponseMeta>");
    }

    #[test]
    fn hoisted_names_never_shadow_models() {
        let inline = object(
            TypeOrigin::operation("Term").child("Response"),
            vec![field("id", TypeSpec::string(), true)],
        );
        let mut op = operation("get", "Term");
        op.response.ty = Some(inline.clone());
        let mut model = model_with(vec![], vec![resource("term", vec![op])]);
        model.types.push(NamedType {
            name: "TermResponse".into(),
            type_ident: "TermResponse".into(),
            ty: object(TypeOrigin::model("TermResponse"), vec![]),
        });

        let mapper = TypeMapper::build(&model);
        assert_eq!(mapper.map(&inline), TargetType::Named("TermResponse2".into()));
        assert_eq!(
            mapper.map(&TypeSpec::reference("TermResponse")),
            TargetType::Named("TermResponse".into())
        );
    }

    #[test]
    fn collisions_resolve_in_traversal_order() {
        // Resources are visited alphabetically regardless of document order.
        let make = |owner: &str| {
            object(
                TypeOrigin::operation(owner).child("Response"),
                vec![field("x", TypeSpec::string(), true)],
            )
        };
        let mut a = operation("b_response", "AB");
        a.response.ty = Some(make("AB"));
        let mut b = operation("response", "ABResponse");
        b.response.ty = Some(object(
            TypeOrigin::operation("A").child("BResponse"),
            vec![field("y", TypeSpec::string(), true)],
        ));

        let model = model_with(
            vec![],
            vec![resource("zeta", vec![b.clone()]), resource("alpha", vec![a.clone()])],
        );
        let mapper = TypeMapper::build(&model);
        let first = mapper.map(a.response.ty.as_ref().unwrap());
        let second = mapper.map(b.response.ty.as_ref().unwrap());
        assert_eq!(first, TargetType::Named("ABResponse".into()));
        assert_eq!(second, TargetType::Named("ABResponse2".into()));

        // Same input, same names.
        let again = TypeMapper::build(&model);
        assert_eq!(again.declarations(), mapper.declarations());
    }

    #[test]
    fn direct_recursion_is_boxed() {
        let node = object(
            TypeOrigin::model("Node"),
            vec![
                field("parent", TypeSpec::reference("Node"), false),
                field("children", TypeSpec::array(TypeSpec::reference("Node")), true),
            ],
        );
        let mut model = model_with(vec![], vec![]);
        model.types.push(NamedType {
            name: "Node".into(),
            type_ident: "Node".into(),
            ty: node,
        });

        let mapper = TypeMapper::build(&model);
        let DeclKind::Struct(fields) = &mapper.declarations()[0].kind else {
            panic!("expected struct");
        };
        assert_eq!(fields[0].ty.display(), "Option<Box<Node>>");
        assert_eq!(fields[1].ty.display(), "Vec<Node>");
    }

    #[test]
    fn models_named_after_std_types_are_renamed() {
        let mut model = model_with(vec![], vec![]);
        for (name, fields) in [
            ("Option", vec![field("label", TypeSpec::string(), true)]),
            ("Option2", vec![]),
            (
                "Term",
                vec![field("choice", TypeSpec::reference("Option"), false)],
            ),
        ] {
            model.types.push(NamedType {
                name: name.into(),
                type_ident: name.into(),
                ty: object(TypeOrigin::model(name), fields),
            });
        }

        let mapper = TypeMapper::build(&model);
        assert!(mapper.declaration("Option").is_none());
        assert!(mapper.declaration("Option2").is_some());
        assert!(mapper.declaration("Option3").is_some());
        assert_eq!(
            mapper.map(&TypeSpec::reference("Option")),
            TargetType::Named("Option3".into())
        );
        let term = mapper.declaration("Term").unwrap();
        let DeclKind::Struct(fields) = &term.kind else {
            panic!("expected struct");
        };
        assert_eq!(fields[0].ty.display(), "Option<Option3>");
    }

    #[test]
    fn mutual_recursion_is_boxed_on_both_sides() {
        let mut model = model_with(vec![], vec![]);
        for (name, other) in [("Edge", "Vertex"), ("Vertex", "Edge")] {
            model.types.push(NamedType {
                name: name.into(),
                type_ident: name.into(),
                ty: object(
                    TypeOrigin::model(name),
                    vec![field("next", TypeSpec::reference(other), true)],
                ),
            });
        }
        let mapper = TypeMapper::build(&model);
        for decl in mapper.declarations() {
            let DeclKind::Struct(fields) = &decl.kind else {
                panic!("expected struct");
            };
            assert!(matches!(fields[0].ty, TargetType::Boxed(_)), "{}", decl.name);
        }
    }

    #[test]
    fn enum_variants_are_pascal_and_unique() {
        let e = TypeSpec::Enum(EnumSpec {
            origin: TypeOrigin::operation("GraphNeighbors").child("Direction"),
            values: vec!["INCOMING".into(), "incoming".into(), "BOTH".into()],
        });
        let mut op = operation("neighbors", "GraphNeighbors");
        op.response.ty = Some(e.clone());
        let mapper = TypeMapper::build(&model_with(vec![], vec![resource("graph", vec![op])]));

        let DeclKind::Enum(variants) = &mapper.declarations()[0].kind else {
            panic!("expected enum");
        };
        let idents: Vec<_> = variants.iter().map(|v| v.ident.as_str()).collect();
        assert_eq!(idents, ["Incoming", "Incoming2", "Both"]);
    }
}
