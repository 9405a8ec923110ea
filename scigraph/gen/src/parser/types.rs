//! Interpretation of type descriptors.

use std::collections::{BTreeSet, HashSet};

use scigraph_define::{EnumSpec, FieldSpec, ObjectSpec, Primitive, TypeOrigin, TypeSpec};
use serde_json::{Map, Value};

use crate::errors::{GeneratorError, SpecLocation};
use crate::naming::{pascal_ident, snake_ident};

/// Swagger 1.2 keywords that can appear in `type` without being model names.
const TYPE_KEYWORDS: &[&str] = &["string", "integer", "number", "boolean", "array", "object"];

/// Turns descriptor values into [`TypeSpec`]s, resolving references against
/// the set of declared model names.
pub(crate) struct TypeParser<'a> {
    models: &'a BTreeSet<String>,
}

impl<'a> TypeParser<'a> {
    pub fn new(models: &'a BTreeSet<String>) -> Self {
        Self { models }
    }

    /// Parses one descriptor. `origin` names any inline object or enum found.
    pub fn parse(
        &self,
        descriptor: &Value,
        origin: &TypeOrigin,
        location: &SpecLocation,
    ) -> Result<TypeSpec, GeneratorError> {
        let Value::Object(map) = descriptor else {
            return Err(GeneratorError::malformed(
                location.clone(),
                "type descriptor must be an object",
            ));
        };

        if let Some(reference) = map.get("$ref") {
            let name = as_str(reference, location, "$ref")?;
            return self.reference(name, location);
        }

        let ty = match map.get("type") {
            Some(ty) => Some(as_str(ty, location, "type")?),
            None => None,
        };
        let format = match map.get("format") {
            Some(format) => Some(as_str(format, location, "format")?),
            None => None,
        };

        match ty {
            Some("string") => {
                if format == Some("binary") {
                    return Err(GeneratorError::unsupported(
                        location.clone(),
                        "binary string payloads",
                    ));
                }
                match map.get("enum") {
                    Some(values) => self.enumeration(values, origin, location),
                    None => Ok(TypeSpec::string()),
                }
            }
            Some("integer") => Ok(TypeSpec::primitive(match format {
                Some("int32") => Primitive::Int32,
                _ => Primitive::Int64,
            })),
            Some("number") => Ok(TypeSpec::primitive(match format {
                Some("float") => Primitive::Float,
                _ => Primitive::Double,
            })),
            Some("boolean") => Ok(TypeSpec::primitive(Primitive::Boolean)),
            Some("array") => {
                let items = map.get("items").ok_or_else(|| {
                    GeneratorError::malformed(location.clone(), "array type without 'items'")
                })?;
                let items = self.parse(items, &origin.child("Item"), &location.field("items"))?;
                Ok(TypeSpec::array(items))
            }
            Some("object") | None if map.contains_key("properties") => {
                self.object(map, origin, location).map(TypeSpec::Object)
            }
            Some("object") => Ok(TypeSpec::Any),
            Some("void") => Err(GeneratorError::malformed(
                location.clone(),
                "'void' is only valid as an operation type",
            )),
            Some("File" | "file") => Err(GeneratorError::unsupported(
                location.clone(),
                "binary (File) payloads",
            )),
            Some(name) => self.reference(name, location),
            None => Err(GeneratorError::malformed(
                location.clone(),
                "type descriptor has neither 'type', '$ref' nor 'properties'",
            )),
        }
    }

    /// Parses an object descriptor (`properties` + `required`).
    pub fn object(
        &self,
        map: &Map<String, Value>,
        origin: &TypeOrigin,
        location: &SpecLocation,
    ) -> Result<ObjectSpec, GeneratorError> {
        let properties = match map.get("properties") {
            Some(Value::Object(properties)) => properties.clone(),
            Some(_) => {
                return Err(GeneratorError::malformed(
                    location.field("properties"),
                    "'properties' must be an object",
                ));
            }
            None => Map::new(),
        };
        let required = string_list(map.get("required"), &location.field("required"))?;
        for name in &required {
            if !properties.contains_key(name) {
                return Err(GeneratorError::malformed(
                    location.field("required"),
                    format!("required property '{name}' is not declared"),
                ));
            }
        }

        let mut idents = HashSet::new();
        let mut fields = Vec::with_capacity(properties.len());
        for (name, descriptor) in &properties {
            let field_location = location.field(name);
            let ident = snake_ident(name).ok_or_else(|| {
                GeneratorError::malformed(field_location.clone(), "property name has no letters")
            })?;
            if !idents.insert(ident.clone()) {
                return Err(GeneratorError::malformed(
                    field_location,
                    format!("property '{name}' collides with another as '{ident}'"),
                ));
            }
            let segment = pascal_ident(name).unwrap_or_default();
            let ty = self.parse(descriptor, &origin.child(segment), &field_location)?;
            let nullable = descriptor
                .get("nullable")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            fields.push(FieldSpec {
                name: name.clone(),
                ident,
                ty,
                required: required.contains(name),
                nullable,
                description: description(descriptor),
            });
        }

        Ok(ObjectSpec {
            origin: origin.clone(),
            description: text(map.get("description")),
            fields,
        })
    }

    fn enumeration(
        &self,
        values: &Value,
        origin: &TypeOrigin,
        location: &SpecLocation,
    ) -> Result<TypeSpec, GeneratorError> {
        let values = string_list(Some(values), &location.field("enum"))?;
        if values.is_empty() {
            return Err(GeneratorError::malformed(
                location.field("enum"),
                "enum must list at least one value",
            ));
        }
        let mut seen = HashSet::new();
        for value in &values {
            if !seen.insert(value) {
                return Err(GeneratorError::malformed(
                    location.field("enum"),
                    format!("duplicate enum value '{value}'"),
                ));
            }
        }
        Ok(TypeSpec::Enum(EnumSpec {
            origin: origin.clone(),
            values,
        }))
    }

    fn reference(&self, raw: &str, location: &SpecLocation) -> Result<TypeSpec, GeneratorError> {
        // `#/models/Term` and `Term` refer to the same model.
        let name = raw.rsplit('/').next().unwrap_or(raw);
        if self.models.contains(name) {
            Ok(TypeSpec::reference(name))
        } else if TYPE_KEYWORDS.contains(&name) {
            Err(GeneratorError::malformed(
                location.clone(),
                format!("'{name}' is a type keyword, not a model"),
            ))
        } else {
            Err(GeneratorError::unresolved(location.clone(), raw))
        }
    }
}

pub(crate) fn description(descriptor: &Value) -> Option<String> {
    text(descriptor.get("description"))
}

pub(crate) fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

fn as_str<'v>(value: &'v Value, location: &SpecLocation, key: &str) -> Result<&'v str, GeneratorError> {
    value
        .as_str()
        .ok_or_else(|| GeneratorError::malformed(location.clone(), format!("'{key}' must be a string")))
}

pub(crate) fn string_list(
    value: Option<&Value>,
    location: &SpecLocation,
) -> Result<Vec<String>, GeneratorError> {
    match value {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    GeneratorError::malformed(location.clone(), "expected a list of strings")
                })
            })
            .collect(),
        Some(_) => Err(GeneratorError::malformed(
            location.clone(),
            "expected a list of strings",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use serde_json::json;

    fn models() -> BTreeSet<String> {
        ["Term", "Node"].iter().map(|s| s.to_string()).collect()
    }

    fn parse(descriptor: Value) -> Result<TypeSpec, GeneratorError> {
        let models = models();
        TypeParser::new(&models).parse(
            &descriptor,
            &TypeOrigin::operation("GraphNeighbors").child("Response"),
            &SpecLocation::document(),
        )
    }

    #[test]
    fn primitives_and_formats() {
        assert_eq!(
            parse(json!({"type": "integer", "format": "int32"})).unwrap(),
            TypeSpec::primitive(Primitive::Int32)
        );
        assert_eq!(
            parse(json!({"type": "integer"})).unwrap(),
            TypeSpec::primitive(Primitive::Int64)
        );
        assert_eq!(
            parse(json!({"type": "number", "format": "float"})).unwrap(),
            TypeSpec::primitive(Primitive::Float)
        );
        assert_eq!(
            parse(json!({"type": "string", "format": "date-time"})).unwrap(),
            TypeSpec::string()
        );
    }

    #[test]
    fn model_names_in_type_are_references() {
        assert_eq!(parse(json!({"type": "Term"})).unwrap(), TypeSpec::reference("Term"));
        assert_eq!(
            parse(json!({"$ref": "#/models/Node"})).unwrap(),
            TypeSpec::reference("Node")
        );
    }

    #[test]
    fn unknown_reference_is_unresolved() {
        let err = parse(json!({"type": "array", "items": {"$ref": "Edge"}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unresolved);
        assert!(err.to_string().contains("'Edge'"));
        assert!(err.to_string().contains("field items"));
    }

    #[test]
    fn object_without_properties_is_any() {
        assert_eq!(parse(json!({"type": "object"})).unwrap(), TypeSpec::Any);
    }

    #[test]
    fn inline_object_keeps_order_and_origin() {
        let ty = parse(json!({
            "type": "object",
            "required": ["nodes"],
            "properties": {
                "nodes": {"type": "array", "items": {"$ref": "Node"}},
                "meta": {"type": "object", "properties": {"count": {"type": "integer"}}},
                "label": {"type": "string", "nullable": true}
            }
        }))
        .unwrap();

        let TypeSpec::Object(object) = ty else {
            panic!("expected object");
        };
        let names: Vec<_> = object.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["nodes", "meta", "label"]);
        assert!(object.fields[0].required);
        assert!(!object.fields[1].required);
        assert!(object.fields[2].nullable);
        let TypeSpec::Object(meta) = &object.fields[1].ty else {
            panic!("expected nested object");
        };
        assert_eq!(meta.origin.candidate_name(), "GraphNeighborsResponseMeta");
    }

    #[test]
    fn array_items_get_item_suffix() {
        let ty = parse(json!({
            "type": "array",
            "items": {"type": "string", "enum": ["INCOMING", "OUTGOING"]}
        }))
        .unwrap();
        let TypeSpec::Array { items } = ty else {
            panic!("expected array");
        };
        let TypeSpec::Enum(e) = *items else {
            panic!("expected enum");
        };
        assert_eq!(e.origin.candidate_name(), "GraphNeighborsResponseItem");
    }

    #[test]
    fn colliding_property_idents_are_malformed() {
        let err = parse(json!({
            "properties": {"fooBar": {"type": "string"}, "foo_bar": {"type": "string"}}
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn undeclared_required_property_is_malformed() {
        let err = parse(json!({"properties": {}, "required": ["id"]})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn binary_payloads_are_unsupported() {
        assert_eq!(
            parse(json!({"type": "File"})).unwrap_err().kind(),
            ErrorKind::Unsupported
        );
        assert_eq!(
            parse(json!({"type": "string", "format": "binary"}))
                .unwrap_err()
                .kind(),
            ErrorKind::Unsupported
        );
    }

    #[test]
    fn empty_enum_is_malformed() {
        let err = parse(json!({"type": "string", "enum": []})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }
}
