//! Type descriptors for parameters, fields and payloads.
//!
//! [`TypeSpec`] is recursive. Inline objects and enums carry a [`TypeOrigin`]
//! recording where they were declared, which is what the generator uses to
//! give them stable names. Named references ([`TypeSpec::Ref`]) are never
//! expanded in place, so recursive models stay finite.

use serde::Serialize;

/// Scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    /// UTF-8 string.
    String,
    /// 32-bit signed integer (`integer` + `int32`).
    Int32,
    /// 64-bit signed integer (`integer`, default width).
    Int64,
    /// 32-bit float (`number` + `float`).
    Float,
    /// 64-bit float (`number`, default width).
    Double,
    /// Boolean.
    Boolean,
}

/// Whether an inline type was declared inside a model or an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginKind {
    /// Declared within a named model.
    Model,
    /// Declared within an operation's parameters or responses.
    Operation,
}

/// Where an inline object or enum was declared.
///
/// `owner` is the `PascalCase` name of the model or operation (e.g.
/// `GraphNeighbors`), and `path` the `PascalCase` segments leading to the
/// type (e.g. `["Response", "Meta"]`). The candidate name of the hoisted
/// declaration is the concatenation of both.
///
/// ## Examples
///
/// ```
/// use scigraph_define::TypeOrigin;
///
/// let origin = TypeOrigin::operation("GraphNeighbors").child("Response").child("Meta");
/// assert_eq!(origin.candidate_name(), "GraphNeighborsResponseMeta");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeOrigin {
    /// Model or operation.
    pub kind: OriginKind,
    /// `PascalCase` owner name.
    pub owner: String,
    /// `PascalCase` path segments below the owner.
    pub path: Vec<String>,
}

impl TypeOrigin {
    /// Root origin of a named model.
    pub fn model(owner: impl Into<String>) -> Self {
        Self {
            kind: OriginKind::Model,
            owner: owner.into(),
            path: Vec::new(),
        }
    }

    /// Root origin of an operation.
    pub fn operation(owner: impl Into<String>) -> Self {
        Self {
            kind: OriginKind::Operation,
            owner: owner.into(),
            path: Vec::new(),
        }
    }

    /// Returns a new origin one segment deeper.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(segment.into());
        Self {
            kind: self.kind,
            owner: self.owner.clone(),
            path,
        }
    }

    /// True for the root of a named model.
    pub fn is_model_root(&self) -> bool {
        self.kind == OriginKind::Model && self.path.is_empty()
    }

    /// Name a hoisted declaration gets before collision resolution.
    pub fn candidate_name(&self) -> String {
        let mut name = self.owner.clone();
        for segment in &self.path {
            name.push_str(segment);
        }
        name
    }
}

/// A recursive type descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeSpec {
    /// A scalar.
    Primitive {
        /// The scalar type.
        primitive: Primitive,
    },
    /// A closed set of string values.
    Enum(EnumSpec),
    /// A homogeneous list.
    Array {
        /// Element type.
        items: Box<TypeSpec>,
    },
    /// An inline object with ordered fields.
    Object(ObjectSpec),
    /// Arbitrary JSON (`"type": "object"` without properties).
    Any,
    /// A reference to a named type, by its document name.
    Ref {
        /// Document name of the referenced model.
        name: String,
    },
}

impl TypeSpec {
    /// Shorthand for a primitive.
    pub fn primitive(primitive: Primitive) -> Self {
        Self::Primitive { primitive }
    }

    /// Shorthand for `string`.
    pub fn string() -> Self {
        Self::primitive(Primitive::String)
    }

    /// Shorthand for an array.
    pub fn array(items: TypeSpec) -> Self {
        Self::Array {
            items: Box::new(items),
        }
    }

    /// Shorthand for a named reference.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Ref { name: name.into() }
    }

    /// True if values of this type can be rendered into a path segment,
    /// query value or header: scalars, enums and arrays of those.
    pub fn is_scalar_like(&self) -> bool {
        match self {
            Self::Primitive { .. } | Self::Enum(_) => true,
            Self::Array { items } => matches!(
                items.as_ref(),
                Self::Primitive { .. } | Self::Enum(_)
            ),
            Self::Object(_) | Self::Any | Self::Ref { .. } => false,
        }
    }

    /// Collects every named reference reachable without crossing another
    /// reference, in depth-first order.
    pub fn references(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        self.collect_references(&mut refs);
        refs
    }

    fn collect_references<'a>(&'a self, refs: &mut Vec<&'a str>) {
        match self {
            Self::Ref { name } => refs.push(name),
            Self::Array { items } => items.collect_references(refs),
            Self::Object(object) => {
                for field in &object.fields {
                    field.ty.collect_references(refs);
                }
            }
            Self::Primitive { .. } | Self::Enum(_) | Self::Any => {}
        }
    }
}

/// An inline object type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSpec {
    /// Where the object was declared.
    pub origin: TypeOrigin,
    /// Description, if documented.
    pub description: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldSpec>,
}

/// A field of an [`ObjectSpec`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Name on the wire.
    pub name: String,
    /// Canonical `snake_case` Rust identifier.
    pub ident: String,
    /// Field type.
    pub ty: TypeSpec,
    /// Whether the field must be present.
    pub required: bool,
    /// Whether the field may be `null`.
    pub nullable: bool,
    /// Description, if documented.
    pub description: Option<String>,
}

impl FieldSpec {
    /// True if the field maps to an `Option`.
    pub fn is_optional(&self) -> bool {
        !self.required || self.nullable
    }
}

/// An inline string enumeration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumSpec {
    /// Where the enum was declared.
    pub origin: TypeOrigin,
    /// Allowed values in declaration order.
    pub values: Vec<String>,
}

/// A named declaration from the document's `models` section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedType {
    /// Name used by references in the document.
    pub name: String,
    /// Canonical `PascalCase` identifier.
    pub type_ident: String,
    /// The declaration. Always an [`TypeSpec::Object`] or [`TypeSpec::Enum`]
    /// whose origin is [`TypeOrigin::model`] of `type_ident`.
    pub ty: TypeSpec,
}
