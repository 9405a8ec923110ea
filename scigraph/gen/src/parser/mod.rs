//! Document parsing.
//!
//! [`parse`] turns a SciGraph API document into a [`SpecModel`]. Every check
//! on the input happens here, so code generation never sees a document that
//! could produce invalid or ambiguous output:
//!
//! - placeholders and path parameters match one to one
//! - names are unique after canonicalization
//! - every named reference resolves
//! - unsupported constructs are rejected, not approximated

mod document;
mod path;
mod types;

use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;

use scigraph_define::{
    BodyFormat, ErrorSpec, NamedType, OperationSpec, ParamKind, ParameterSpec, PayloadFormat,
    Primitive, ResourceSpec, ResponseSpec, RestMethod, SpecModel, StatusMatch, TypeOrigin,
    TypeSpec,
};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::errors::{GeneratorError, SpecLocation};
use crate::naming::{derive_operation_name, pascal_ident, snake_ident};

use document::{RawDocument, RawOperation, RawParameter, RawResource, RawResponseMessage};
use types::TypeParser;

pub use path::{check_template, extract_path_params};

/// Module names taken by the shared generated units.
const RESERVED_MODULES: &[&str] = &["lib", "types", "client"];

/// Title used when the document has none.
const DEFAULT_TITLE: &str = "Api";

/// Parses a document into a [`SpecModel`].
///
/// ## Errors
///
/// - [`GeneratorError::MalformedSpec`] if the document does not match the
///   expected shape
/// - [`GeneratorError::UnsupportedFeature`] for constructs the generator does
///   not model
/// - [`GeneratorError::UnresolvedReference`] for references to undeclared
///   models
#[instrument(name = "parse", skip(document), fields(bytes = document.len()))]
pub fn parse(document: &[u8]) -> Result<SpecModel, GeneratorError> {
    let raw: RawDocument = serde_json::from_slice(document)
        .map_err(|e| GeneratorError::malformed(SpecLocation::document(), e.to_string()))?;
    let model = Parser::new(&raw)?.model(&raw)?;
    debug!(
        resources = model.resources.len(),
        operations = model.operation_count(),
        types = model.types.len(),
        "parsed spec"
    );
    Ok(model)
}

struct Parser<'a> {
    /// Model descriptors from the document and every resource, by name.
    models: Vec<(&'a str, &'a Value)>,
    model_names: BTreeSet<String>,
}

impl<'a> Parser<'a> {
    fn new(raw: &'a RawDocument) -> Result<Self, GeneratorError> {
        let mut models: Vec<(&str, &Value)> = Vec::new();
        let mut model_names = BTreeSet::new();
        let sections = std::iter::once(&raw.models).chain(raw.apis.iter().map(|r| &r.models));
        for section in sections {
            for (name, descriptor) in section {
                if !model_names.insert(name.clone()) {
                    return Err(GeneratorError::malformed(
                        SpecLocation::model(name),
                        "model is declared more than once",
                    ));
                }
                models.push((name.as_str(), descriptor));
            }
        }
        models.sort_by(|a, b| a.0.cmp(b.0));
        Ok(Self {
            models,
            model_names,
        })
    }

    fn types(&self) -> TypeParser<'_> {
        TypeParser::new(&self.model_names)
    }

    fn model(&self, raw: &RawDocument) -> Result<SpecModel, GeneratorError> {
        let base_url = match raw.base_path.as_deref().map(str::trim) {
            Some(base) if !base.is_empty() => {
                url::Url::parse(base).map_err(|e| {
                    GeneratorError::malformed(
                        SpecLocation::document().field("basePath"),
                        format!("'{base}' is not an absolute URL: {e}"),
                    )
                })?;
                Some(base.trim_end_matches('/').to_string())
            }
            _ => None,
        };

        let types = self.named_types()?;

        let mut resources = Vec::with_capacity(raw.apis.len());
        let mut idents = HashSet::new();
        for resource in &raw.apis {
            let resource = self.resource(raw, resource)?;
            if !idents.insert(resource.ident.clone()) {
                return Err(GeneratorError::malformed(
                    SpecLocation::resource(&resource.name),
                    format!("resource name collides with another as '{}'", resource.ident),
                ));
            }
            resources.push(resource);
        }

        let info = raw.info.as_ref();
        Ok(SpecModel {
            title: info
                .and_then(|i| i.title.as_deref())
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_TITLE)
                .to_string(),
            description: info.and_then(|i| i.description.clone()),
            api_version: raw.api_version.clone(),
            base_url,
            resources,
            types,
        })
    }

    fn named_types(&self) -> Result<Vec<NamedType>, GeneratorError> {
        let mut idents = HashSet::new();
        let mut types = Vec::with_capacity(self.models.len());
        for (name, descriptor) in &self.models {
            let location = SpecLocation::model(*name);
            let type_ident = pascal_ident(name).ok_or_else(|| {
                GeneratorError::malformed(location.clone(), "model name has no letters")
            })?;
            if !idents.insert(type_ident.clone()) {
                return Err(GeneratorError::malformed(
                    location,
                    format!("model name collides with another as '{type_ident}'"),
                ));
            }
            let ty = self.named_type(name, descriptor, &type_ident, &location)?;
            types.push(NamedType {
                name: name.to_string(),
                type_ident,
                ty,
            });
        }
        Ok(types)
    }

    fn named_type(
        &self,
        name: &str,
        descriptor: &Value,
        type_ident: &str,
        location: &SpecLocation,
    ) -> Result<TypeSpec, GeneratorError> {
        let Value::Object(map) = descriptor else {
            return Err(GeneratorError::malformed(
                location.clone(),
                "model must be an object",
            ));
        };
        if let Some(id) = map.get("id").and_then(Value::as_str)
            && id != name
        {
            return Err(GeneratorError::malformed(
                location.field("id"),
                format!("model id '{id}' does not match its key '{name}'"),
            ));
        }
        if map.contains_key("subTypes") || map.contains_key("discriminator") {
            return Err(GeneratorError::unsupported(
                location.clone(),
                "model inheritance (subTypes/discriminator)",
            ));
        }

        let origin = TypeOrigin::model(type_ident);
        match map.get("type").and_then(Value::as_str) {
            None | Some("object") => self
                .types()
                .object(map, &origin, location)
                .map(TypeSpec::Object),
            Some("string") if map.contains_key("enum") => {
                self.types().parse(descriptor, &origin, location)
            }
            Some(other) => Err(GeneratorError::unsupported(
                location.clone(),
                format!("model of type '{other}' (only objects and string enums)"),
            )),
        }
    }

    fn resource(
        &self,
        doc: &RawDocument,
        raw: &RawResource,
    ) -> Result<ResourceSpec, GeneratorError> {
        let location = SpecLocation::resource(&raw.resource_path);
        let mut ident = snake_ident(&raw.resource_path).ok_or_else(|| {
            GeneratorError::malformed(location.clone(), "resource path has no letters")
        })?;
        if RESERVED_MODULES.contains(&ident.as_str()) {
            ident.push_str("_resource");
        }
        let type_ident = pascal_ident(&ident).unwrap_or_default();

        let produces = raw.produces.as_deref().unwrap_or(&doc.produces);
        let consumes = raw.consumes.as_deref().unwrap_or(&doc.consumes);

        let mut operations: Vec<OperationSpec> = Vec::new();
        for api in &raw.apis {
            path::check_template(&api.path)
                .map_err(|reason| GeneratorError::malformed(location.field("path"), reason))?;
            for operation in &api.operations {
                let context = OperationContext {
                    resource_type_ident: &type_ident,
                    path: &api.path,
                    produces,
                    consumes,
                    location: &location,
                };
                let operation = self.operation(&context, operation)?;
                if operations.iter().any(|o| o.ident == operation.ident) {
                    return Err(GeneratorError::malformed(
                        location.operation(&operation.name),
                        format!("operation name collides with another as '{}'", operation.ident),
                    ));
                }
                operations.push(operation);
            }
        }

        Ok(ResourceSpec {
            name: raw.resource_path.clone(),
            ident,
            type_ident,
            description: raw.description.clone(),
            operations,
        })
    }

    fn operation(
        &self,
        context: &OperationContext<'_>,
        raw: &RawOperation,
    ) -> Result<OperationSpec, GeneratorError> {
        let method_location = context
            .location
            .operation(format!("{} {}", raw.method, context.path));
        let method = RestMethod::from_str(&raw.method.to_uppercase()).map_err(|_| {
            GeneratorError::unsupported(
                method_location.clone(),
                format!("HTTP method '{}'", raw.method),
            )
        })?;

        let name = raw
            .nickname
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| derive_operation_name(method, context.path));
        let location = context.location.operation(&name);
        let ident = snake_ident(&name).ok_or_else(|| {
            GeneratorError::malformed(location.clone(), "operation name has no letters")
        })?;
        let type_ident = format!(
            "{}{}",
            context.resource_type_ident,
            pascal_ident(&ident).unwrap_or_default()
        );
        let origin = TypeOrigin::operation(&type_ident);

        let error_segments: Vec<String> = raw
            .response_messages
            .iter()
            .filter_map(|m| status_of(&m.code).ok())
            .map(error_segment)
            .collect();
        let mut parameters: Vec<ParameterSpec> = Vec::with_capacity(raw.parameters.len());
        for parameter in &raw.parameters {
            let parameter = self.parameter(parameter, &origin, &error_segments, &location)?;
            if parameters
                .iter()
                .any(|p| p.ident == parameter.ident || (p.kind == parameter.kind && p.name == parameter.name))
            {
                return Err(GeneratorError::malformed(
                    location.field(&parameter.name),
                    format!("parameter collides with another as '{}'", parameter.ident),
                ));
            }
            parameters.push(parameter);
        }
        check_placeholders(context.path, &parameters, &location)?;

        let body_count = parameters.iter().filter(|p| p.kind == ParamKind::Body).count();
        if body_count > 1 {
            return Err(GeneratorError::unsupported(
                location,
                "more than one body parameter",
            ));
        }
        let consumes = raw.consumes.as_deref().unwrap_or(context.consumes);
        let body_format = match consumes.iter().find_map(|c| BodyFormat::from_content_type(c)) {
            Some(format) => format,
            None if consumes.is_empty() || body_count == 0 => BodyFormat::Json,
            None => {
                return Err(GeneratorError::unsupported(
                    location.field("consumes"),
                    format!("request content types {consumes:?}"),
                ));
            }
        };

        let produces = raw.produces.as_deref().unwrap_or(context.produces);
        let (response, errors) = self.responses(raw, produces, &origin, &location)?;

        Ok(OperationSpec {
            name,
            ident,
            type_ident,
            method,
            path: context.path.to_string(),
            summary: raw.summary.clone(),
            notes: raw.notes.clone(),
            parameters,
            body_format,
            response,
            errors,
        })
    }

    fn parameter(
        &self,
        raw: &RawParameter,
        origin: &TypeOrigin,
        reserved_segments: &[String],
        location: &SpecLocation,
    ) -> Result<ParameterSpec, GeneratorError> {
        let location = location.field(&raw.name);
        let kind = match raw.param_type.as_str() {
            "form" => {
                return Err(GeneratorError::unsupported(
                    location,
                    "form parameters (paramType 'form')",
                ));
            }
            other => ParamKind::from_str(other).map_err(|_| {
                GeneratorError::unsupported(location.clone(), format!("parameter kind '{other}'"))
            })?,
        };
        let ident = snake_ident(&raw.name).ok_or_else(|| {
            GeneratorError::malformed(location.clone(), "parameter name has no letters")
        })?;

        // Parameter origins must not collide with response origins.
        let mut segment = pascal_ident(&raw.name).unwrap_or_default();
        if segment == "Response" || reserved_segments.contains(&segment) {
            segment.push_str("Param");
        }
        let param_origin = origin.child(segment);

        if raw.descriptor.is_empty() {
            return Err(GeneratorError::malformed(location, "parameter has no type"));
        }
        let mut ty = self
            .types()
            .parse(&raw.descriptor.to_value(), &param_origin, &location)?;
        if raw.allow_multiple {
            ty = TypeSpec::array(ty);
        }

        match kind {
            ParamKind::Path if !matches!(ty, TypeSpec::Primitive { .. } | TypeSpec::Enum(_)) => {
                return Err(GeneratorError::unsupported(
                    location,
                    "non-scalar path parameter",
                ));
            }
            ParamKind::Query | ParamKind::Header if !ty.is_scalar_like() => {
                return Err(GeneratorError::unsupported(
                    location,
                    format!("object-typed {kind} parameter"),
                ));
            }
            _ => {}
        }

        Ok(ParameterSpec {
            name: raw.name.clone(),
            ident,
            kind,
            ty,
            required: raw.required || kind == ParamKind::Path,
            default: raw.default_value.clone(),
            description: raw.description.clone(),
        })
    }

    fn responses(
        &self,
        raw: &RawOperation,
        produces: &[String],
        origin: &TypeOrigin,
        location: &SpecLocation,
    ) -> Result<(ResponseSpec, Vec<ErrorSpec>), GeneratorError> {
        let format = PayloadFormat::from_produces(produces).ok_or_else(|| {
            GeneratorError::unsupported(
                location.field("produces"),
                format!("response media types {produces:?}"),
            )
        })?;

        let mut success: Option<(StatusMatch, TypeSpec)> = None;
        let mut success_codes: Vec<StatusMatch> = Vec::new();
        let mut errors: Vec<ErrorSpec> = Vec::new();
        for message in &raw.response_messages {
            let status = status_of(&message.code).map_err(|e| e.at(location))?;
            let message_location = location.field(format!("responseMessages.{status}"));
            if status.is_success() {
                success_codes.push(status);
                if success.is_none()
                    && let Some(ty) = self.message_type(message, &origin.child("Response"), &message_location)?
                {
                    success = Some((status, ty));
                }
                continue;
            }
            if errors.iter().any(|e| e.status == status) {
                return Err(GeneratorError::malformed(
                    message_location,
                    "status documented more than once",
                ));
            }
            let ty = self.message_type(
                message,
                &origin.child(error_segment(status)),
                &message_location,
            )?;
            errors.push(ErrorSpec {
                status,
                message: message.message.clone(),
                ty,
            });
        }

        let response = match success {
            Some((status, ty)) => payload(status, format, Some(ty)),
            None if raw.descriptor.is_empty() => ResponseSpec::empty(),
            None => match raw.descriptor.ty.as_ref().and_then(Value::as_str) {
                Some("void") => ResponseSpec::empty(),
                _ => {
                    let ty = self.types().parse(
                        &raw.descriptor.to_value(),
                        &origin.child("Response"),
                        &location.field("type"),
                    )?;
                    payload(StatusMatch::Exact(200), format, Some(ty))
                }
            },
        };
        // Every documented 2xx must reach the success path.
        let response = if success_codes.iter().any(|s| *s != response.status) {
            ResponseSpec {
                status: StatusMatch::Class(2),
                ..response
            }
        } else {
            response
        };
        Ok((response, errors))
    }

    fn message_type(
        &self,
        message: &RawResponseMessage,
        origin: &TypeOrigin,
        location: &SpecLocation,
    ) -> Result<Option<TypeSpec>, GeneratorError> {
        if let Some(schema) = &message.schema {
            return self.types().parse(schema, origin, location).map(Some);
        }
        match message.response_model.as_deref().map(str::trim) {
            Some(model) if !model.is_empty() => {
                let descriptor = Value::Object(Map::from_iter([(
                    "type".to_string(),
                    Value::String(model.to_string()),
                )]));
                match model {
                    "void" => Ok(None),
                    _ => self.types().parse(&descriptor, origin, location).map(Some),
                }
            }
            _ => Ok(None),
        }
    }
}

struct OperationContext<'a> {
    resource_type_ident: &'a str,
    path: &'a str,
    produces: &'a [String],
    consumes: &'a [String],
    location: &'a SpecLocation,
}

/// Builds the success response. Text payloads always decode to a string.
fn payload(status: StatusMatch, format: PayloadFormat, ty: Option<TypeSpec>) -> ResponseSpec {
    match (format, ty) {
        (_, None) => ResponseSpec {
            status,
            format: PayloadFormat::Empty,
            ty: None,
        },
        (PayloadFormat::Text, Some(_)) => ResponseSpec {
            status,
            format: PayloadFormat::Text,
            ty: Some(TypeSpec::primitive(Primitive::String)),
        },
        (format, Some(ty)) => ResponseSpec {
            status,
            format,
            ty: Some(ty),
        },
    }
}

/// Origin segment for an error payload (`Error404`, `Error5xx`).
fn error_segment(status: StatusMatch) -> String {
    format!("Error{}", status.ident_suffix())
}

/// A status problem, located once the caller knows where it happened.
struct StatusProblem {
    unsupported: bool,
    reason: String,
}

impl StatusProblem {
    fn at(self, location: &SpecLocation) -> GeneratorError {
        let location = location.field("responseMessages");
        if self.unsupported {
            GeneratorError::unsupported(location, self.reason)
        } else {
            GeneratorError::malformed(location, self.reason)
        }
    }
}

fn status_of(code: &Value) -> Result<StatusMatch, StatusProblem> {
    let raw = match code {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => {
            return Err(StatusProblem {
                unsupported: false,
                reason: format!("response code must be a number or string, got {other}"),
            });
        }
    };
    if raw.trim().eq_ignore_ascii_case("default") {
        return Err(StatusProblem {
            unsupported: true,
            reason: "'default' response code".to_string(),
        });
    }
    StatusMatch::parse(&raw).ok_or_else(|| StatusProblem {
        unsupported: false,
        reason: format!("invalid response code '{raw}'"),
    })
}

fn check_placeholders(
    path: &str,
    parameters: &[ParameterSpec],
    location: &SpecLocation,
) -> Result<(), GeneratorError> {
    let placeholders = extract_path_params(path);
    let mut seen = HashSet::new();
    for placeholder in &placeholders {
        if !seen.insert(*placeholder) {
            return Err(GeneratorError::malformed(
                location.field("path"),
                format!("placeholder '{{{placeholder}}}' appears more than once in '{path}'"),
            ));
        }
        let bound = parameters
            .iter()
            .any(|p| p.kind == ParamKind::Path && p.name == *placeholder);
        if !bound {
            return Err(GeneratorError::malformed(
                location.field("path"),
                format!("placeholder '{{{placeholder}}}' in '{path}' has no matching path parameter"),
            ));
        }
    }
    for parameter in parameters.iter().filter(|p| p.kind == ParamKind::Path) {
        if !placeholders.contains(&parameter.name.as_str()) {
            return Err(GeneratorError::malformed(
                location.field(&parameter.name),
                format!("path parameter has no placeholder in '{path}'"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use serde_json::json;

    fn document(operations: Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "apiVersion": "1.0",
            "swaggerVersion": "1.2",
            "basePath": "https://scigraph.test/api/",
            "info": {"title": "SciGraph"},
            "apis": [{
                "resourcePath": "/term",
                "apis": [{"path": "/term/{id}", "operations": operations}]
            }],
            "models": {
                "Term": {
                    "id": "Term",
                    "required": ["id", "label"],
                    "properties": {"id": {"type": "string"}, "label": {"type": "string"}}
                },
                "ErrorMessage": {
                    "properties": {"code": {"type": "integer", "format": "int32"}, "message": {"type": "string"}}
                }
            }
        }))
        .unwrap()
    }

    fn id_param() -> Value {
        json!({"name": "id", "paramType": "path", "type": "string", "required": true})
    }

    #[test]
    fn parses_the_term_lookup() {
        let model = parse(&document(json!([{
            "method": "GET",
            "nickname": "get",
            "summary": "Look up a term",
            "type": "Term",
            "parameters": [id_param()],
            "responseMessages": [
                {"code": 404, "message": "Not found", "responseModel": "ErrorMessage"},
                {"code": "5XX", "message": "Server error"}
            ]
        }])))
        .unwrap();

        assert_eq!(model.title, "SciGraph");
        assert_eq!(model.base_url.as_deref(), Some("https://scigraph.test/api"));
        assert_eq!(model.types.len(), 2);
        assert_eq!(model.types[0].name, "ErrorMessage");

        let resource = &model.resources[0];
        assert_eq!(resource.ident, "term");
        assert_eq!(resource.type_ident, "Term");
        let op = &resource.operations[0];
        assert_eq!(op.ident, "get");
        assert_eq!(op.type_ident, "TermGet");
        assert_eq!(op.response.status, StatusMatch::Exact(200));
        assert_eq!(op.response.format, PayloadFormat::Json);
        assert_eq!(op.response.ty, Some(TypeSpec::reference("Term")));
        assert_eq!(op.errors.len(), 2);
        assert_eq!(op.errors[0].ty, Some(TypeSpec::reference("ErrorMessage")));
        assert_eq!(op.errors[1].status, StatusMatch::Class(5));
        assert_eq!(op.errors[1].ty, None);
    }

    #[test]
    fn missing_nickname_is_derived() {
        let model = parse(&document(json!([{
            "method": "get", "type": "Term", "parameters": [id_param()]
        }])))
        .unwrap();
        assert_eq!(model.resources[0].operations[0].ident, "get_term_by_id");
    }

    #[test]
    fn unmatched_placeholder_is_malformed() {
        let err = parse(&document(json!([{
            "method": "GET", "nickname": "get", "type": "Term", "parameters": []
        }])))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
        assert!(err.to_string().contains("'{id}'"), "{err}");
        assert!(err.to_string().contains("operation get"), "{err}");
    }

    #[test]
    fn path_parameter_without_placeholder_is_malformed() {
        let err = parse(&document(json!([{
            "method": "GET", "nickname": "get", "type": "Term",
            "parameters": [id_param(), {"name": "depth", "paramType": "path", "type": "integer"}]
        }])))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
        assert!(err.to_string().contains("field depth"), "{err}");
    }

    #[test]
    fn path_parameters_are_always_required() {
        let model = parse(&document(json!([{
            "method": "GET", "nickname": "get", "type": "Term",
            "parameters": [{"name": "id", "paramType": "path", "type": "string"}]
        }])))
        .unwrap();
        assert!(model.resources[0].operations[0].parameters[0].required);
    }

    #[test]
    fn form_parameters_are_unsupported() {
        let err = parse(&document(json!([{
            "method": "POST", "nickname": "create", "type": "Term",
            "parameters": [id_param(), {"name": "label", "paramType": "form", "type": "string"}]
        }])))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn two_body_parameters_are_unsupported() {
        let err = parse(&document(json!([{
            "method": "POST", "nickname": "create", "type": "Term",
            "parameters": [
                id_param(),
                {"name": "a", "paramType": "body", "type": "Term"},
                {"name": "b", "paramType": "body", "type": "Term"}
            ]
        }])))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn object_query_parameter_is_unsupported() {
        let err = parse(&document(json!([{
            "method": "GET", "nickname": "get", "type": "Term",
            "parameters": [id_param(), {"name": "filter", "paramType": "query", "type": "Term"}]
        }])))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn default_response_code_is_unsupported() {
        let err = parse(&document(json!([{
            "method": "GET", "nickname": "get", "type": "Term",
            "parameters": [id_param()],
            "responseMessages": [{"code": "default", "message": "anything"}]
        }])))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn unknown_response_model_is_unresolved() {
        let err = parse(&document(json!([{
            "method": "GET", "nickname": "get", "type": "Term",
            "parameters": [id_param()],
            "responseMessages": [{"code": 404, "responseModel": "Missing"}]
        }])))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unresolved);
        assert!(err.to_string().contains("'Missing'"));
    }

    #[test]
    fn duplicate_operation_names_are_malformed() {
        let err = parse(&document(json!([
            {"method": "GET", "nickname": "get", "type": "Term", "parameters": [id_param()]},
            {"method": "DELETE", "nickname": "Get", "type": "void", "parameters": [id_param()]}
        ])))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn extra_success_codes_widen_the_match() {
        let model = parse(&document(json!([
            {"method": "POST", "nickname": "create", "type": "Term", "parameters": [id_param()],
             "responseMessages": [{"code": 201, "message": "Created"}]},
            {"method": "GET", "nickname": "get", "type": "Term", "parameters": [id_param()],
             "responseMessages": [{"code": 200, "message": "OK"}]}
        ])))
        .unwrap();

        let create = &model.resources[0].operations[0];
        assert_eq!(create.response.status, StatusMatch::Class(2));
        assert_eq!(create.response.ty, Some(TypeSpec::reference("Term")));
        let get = &model.resources[0].operations[1];
        assert_eq!(get.response.status, StatusMatch::Exact(200));
    }

    #[test]
    fn void_and_text_responses() {
        let model = parse(&document(json!([
            {"method": "DELETE", "nickname": "remove", "type": "void", "parameters": [id_param()]},
            {"method": "GET", "nickname": "dump", "type": "string", "produces": ["text/plain"],
             "parameters": [id_param()]}
        ])))
        .unwrap();
        let ops = &model.resources[0].operations;
        assert_eq!(ops[0].response, ResponseSpec::empty());
        assert_eq!(ops[1].response.format, PayloadFormat::Text);
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = parse(b"{ not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
        assert!(err.to_string().contains("document"));
    }

    #[test]
    fn reserved_resource_names_are_suffixed() {
        let doc = serde_json::to_vec(&json!({
            "apis": [{"resourcePath": "/types", "apis": []}]
        }))
        .unwrap();
        let model = parse(&doc).unwrap();
        assert_eq!(model.resources[0].ident, "types_resource");
        assert_eq!(model.title, "Api");
    }
}
