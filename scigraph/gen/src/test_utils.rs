//! Builders for hand-made spec models used across unit tests.

use scigraph_define::{
    BodyFormat, FieldSpec, ObjectSpec, OperationSpec, ParamKind, ParameterSpec, ResourceSpec,
    ResponseSpec, RestMethod, SpecModel, TypeOrigin, TypeSpec,
};

use crate::naming::{pascal_ident, snake_ident};

pub fn model_with(types: Vec<scigraph_define::NamedType>, resources: Vec<ResourceSpec>) -> SpecModel {
    SpecModel {
        title: "SciGraph".into(),
        description: None,
        api_version: Some("1.0".into()),
        base_url: Some("https://scigraph.example.org/scigraph".into()),
        resources,
        types,
    }
}

pub fn resource(name: &str, operations: Vec<OperationSpec>) -> ResourceSpec {
    ResourceSpec {
        name: format!("/{name}"),
        ident: snake_ident(name).unwrap_or_default(),
        type_ident: pascal_ident(name).unwrap_or_default(),
        description: None,
        operations,
    }
}

/// A `GET /<ident>` operation with an empty success response.
pub fn operation(ident: &str, type_ident: &str) -> OperationSpec {
    OperationSpec {
        name: ident.into(),
        ident: ident.into(),
        type_ident: type_ident.into(),
        method: RestMethod::Get,
        path: format!("/{ident}"),
        summary: None,
        notes: None,
        parameters: Vec::new(),
        body_format: BodyFormat::Json,
        response: ResponseSpec::empty(),
        errors: Vec::new(),
    }
}

pub fn object(origin: TypeOrigin, fields: Vec<FieldSpec>) -> TypeSpec {
    TypeSpec::Object(ObjectSpec {
        origin,
        description: None,
        fields,
    })
}

pub fn field(name: &str, ty: TypeSpec, required: bool) -> FieldSpec {
    FieldSpec {
        name: name.into(),
        ident: snake_ident(name).unwrap_or_default(),
        ty,
        required,
        nullable: false,
        description: None,
    }
}

pub fn parameter(name: &str, kind: ParamKind, ty: TypeSpec, required: bool) -> ParameterSpec {
    ParameterSpec {
        name: name.into(),
        ident: snake_ident(name).unwrap_or_default(),
        kind,
        ty,
        required: required || kind == ParamKind::Path,
        default: None,
        description: None,
    }
}
