//! Resource units: handle struct, operation methods, options bundles and
//! error enums.
//!
//! For a resource `term` with operation `get`, the unit contains:
//!
//! ```text
//! pub struct TermResource<'a, T = ReqwestTransport> { dispatcher: &'a Dispatcher<T> }
//! pub struct TermGetOptions { .. }   // only if `get` has optional parameters
//! pub enum TermGetError { .. }       // only if `get` documents error responses
//!
//! impl<'a, T: Transport> TermResource<'a, T> {
//!     pub async fn get(&self, id: impl Into<String>) -> Result<Term, CallError<TermGetError>>;
//! }
//! ```

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use scigraph_define::{
    ErrorSpec, OperationSpec, ParamKind, ParameterSpec, ResourceSpec, StatusMatch,
};

use super::{EmitContext, UnitTokens, doc_attrs, doc_lines};
use crate::naming::{disambiguate, ident, unraw};
use crate::types::{TargetType, TypeScope};

/// Generates the unit for one resource.
pub fn generate_resource_unit(ctx: &EmitContext<'_>, resource: &ResourceSpec) -> UnitTokens {
    let rt = &ctx.runtime;
    let handle = handle_ident(resource);

    let mut support = TokenStream::new();
    let mut methods = TokenStream::new();
    for operation in &resource.operations {
        let generator = OperationGenerator::new(ctx, resource, operation);
        support.extend(generator.options_struct());
        support.extend(generator.error_enum());
        methods.extend(generator.method());
    }

    let mut docs = vec![format!(" Operations under `{}`.", resource.name)];
    if let Some(description) = &resource.description {
        docs.push(String::new());
        docs.extend(doc_lines(description));
    }
    let handle_doc = format!(
        " Handle for the `{}` operations, borrowed from the client.",
        resource.name
    );

    UnitTokens {
        docs,
        items: quote! {
            #[doc = #handle_doc]
            pub struct #handle<'a, T = #rt::ReqwestTransport> {
                dispatcher: &'a #rt::Dispatcher<T>,
            }

            impl<T> Clone for #handle<'_, T> {
                fn clone(&self) -> Self {
                    *self
                }
            }

            impl<T> Copy for #handle<'_, T> {}

            impl<T> std::fmt::Debug for #handle<'_, T> {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.debug_struct(stringify!(#handle)).finish_non_exhaustive()
                }
            }

            impl<'a, T: #rt::Transport> #handle<'a, T> {
                /// Wraps a dispatcher.
                pub fn new(dispatcher: &'a #rt::Dispatcher<T>) -> Self {
                    Self { dispatcher }
                }

                #methods
            }

            #support
        },
    }
}

/// `<Resource>Resource`
pub fn handle_ident(resource: &ResourceSpec) -> proc_macro2::Ident {
    format_ident!("{}Resource", resource.type_ident)
}

/// Generates the pieces belonging to one operation.
pub struct OperationGenerator<'c, 'a> {
    ctx: &'c EmitContext<'a>,
    resource: &'c ResourceSpec,
    operation: &'c OperationSpec,
    /// Local variable holding the request under construction.
    request_var: String,
    /// Argument holding the options bundle.
    options_var: String,
}

impl<'c, 'a> OperationGenerator<'c, 'a> {
    pub fn new(
        ctx: &'c EmitContext<'a>,
        resource: &'c ResourceSpec,
        operation: &'c OperationSpec,
    ) -> Self {
        let taken = |name: &str| operation.parameters.iter().any(|p| unraw(&p.ident) == name);
        Self {
            ctx,
            resource,
            operation,
            request_var: disambiguate("request", taken),
            options_var: disambiguate("options", taken),
        }
    }

    fn has_options(&self) -> bool {
        self.operation.optional_parameters().next().is_some()
    }

    /// `<Resource><Operation>Options`
    pub fn options_ident(&self) -> proc_macro2::Ident {
        format_ident!("{}Options", self.operation.type_ident)
    }

    /// `<Resource><Operation>Error`
    pub fn error_ident(&self) -> proc_macro2::Ident {
        format_ident!("{}Error", self.operation.type_ident)
    }

    fn param_type(&self, parameter: &ParameterSpec) -> TargetType {
        self.ctx.types.map(&parameter.ty)
    }

    /// The options bundle, if the operation has optional parameters.
    pub fn options_struct(&self) -> TokenStream {
        if !self.has_options() {
            return TokenStream::new();
        }
        let name = self.options_ident();
        let method_doc = format!(
            " Optional parameters of [`{}::{}`].",
            handle_ident(self.resource),
            unraw(&self.operation.ident)
        );
        let fields = self.operation.optional_parameters().map(|p| {
            let field = ident(&p.ident);
            let ty = self
                .param_type(p)
                .optional()
                .to_tokens(TypeScope::Sibling);
            let docs = doc_attrs(&parameter_docs(p));
            quote! {
                #docs
                pub #field: #ty,
            }
        });
        quote! {
            #[doc = #method_doc]
            #[derive(Debug, Clone, Default, PartialEq)]
            pub struct #name {
                #(#fields)*
            }
        }
    }

    /// The error enum, if the operation documents failure responses.
    pub fn error_enum(&self) -> TokenStream {
        let errors = &self.operation.errors;
        if errors.is_empty() {
            return TokenStream::new();
        }
        let rt = &self.ctx.runtime;
        let name = self.error_ident();
        let doc = format!(
            " Documented failure responses of [`{}::{}`].",
            handle_ident(self.resource),
            unraw(&self.operation.ident)
        );

        let variants = errors.iter().map(|error| {
            let variant = variant_ident(error);
            let docs = doc_attrs(&[error_doc(error)]);
            match self.error_payload(error) {
                Some(ty) => quote! { #docs #variant(#ty), },
                None => quote! { #docs #variant, },
            }
        });

        // Exact codes are matched before classes so `404` wins over `4XX`.
        let mut ordered: Vec<&ErrorSpec> = errors.iter().collect();
        ordered.sort_by_key(|e| matches!(e.status, StatusMatch::Class(_)));
        let arms = ordered.iter().map(|error| {
            let variant = variant_ident(error);
            let pattern = match error.status {
                StatusMatch::Exact(code) => quote! { #code },
                StatusMatch::Class(class) => {
                    let low = class * 100;
                    let high = low + 99;
                    quote! { #low..=#high }
                }
            };
            match self.error_payload(error) {
                Some(_) => quote! {
                    #pattern => Some(#rt::decode_json(status, body).map(Self::#variant)),
                },
                None => quote! { #pattern => Some(Ok(Self::#variant)), },
            }
        });
        let body_arg = if errors.iter().any(|e| self.error_payload(e).is_some()) {
            quote! { body }
        } else {
            quote! { _body }
        };

        quote! {
            #[doc = #doc]
            #[derive(Debug, Clone, PartialEq)]
            pub enum #name {
                #(#variants)*
            }

            impl #rt::ErrorShape for #name {
                fn decode(
                    status: u16,
                    #body_arg: &[u8],
                ) -> Option<Result<Self, #rt::DecodeError>> {
                    match status {
                        #(#arms)*
                        _ => None,
                    }
                }
            }
        }
    }

    fn error_payload(&self, error: &ErrorSpec) -> Option<TokenStream> {
        error
            .ty
            .as_ref()
            .map(|ty| self.ctx.types.map(ty).to_tokens(TypeScope::Sibling))
    }

    /// Signature pieces: `(arguments, return type)`.
    fn signature(&self) -> (Vec<TokenStream>, TokenStream) {
        let rt = &self.ctx.runtime;
        let mut args: Vec<TokenStream> = self
            .operation
            .required_parameters()
            .map(|p| {
                let name = ident(&p.ident);
                let ty = self.param_type(p);
                if ty.is_string() {
                    quote! { #name: impl Into<String> }
                } else {
                    let ty = ty.to_tokens(TypeScope::Sibling);
                    quote! { #name: #ty }
                }
            })
            .collect();
        if self.has_options() {
            let options = ident(&self.options_var);
            let bundle = self.options_ident();
            args.push(quote! { #options: #bundle });
        }

        let success = self
            .ctx
            .types
            .map_payload(self.operation.response.ty.as_ref())
            .to_tokens(TypeScope::Sibling);
        let error = if self.operation.errors.is_empty() {
            quote! { #rt::Undocumented }
        } else {
            let name = self.error_ident();
            quote! { #name }
        };
        (args, quote! { Result<#success, #rt::CallError<#error>> })
    }

    /// The async operation method.
    pub fn method(&self) -> TokenStream {
        let rt = &self.ctx.runtime;
        let op = self.operation;
        let name = ident(&op.ident);
        let docs = doc_attrs(&self.method_docs());
        let (args, returns) = self.signature();

        let request = ident(&self.request_var);
        let options = ident(&self.options_var);
        let method = format_ident!("{}", op.method.variant_name());
        let path = &op.path;

        // Strings are taken as `impl Into<String>` and converted up front.
        let conversions = op.required_parameters().filter_map(|p| {
            self.param_type(p).is_string().then(|| {
                let name = ident(&p.ident);
                quote! { let #name: String = #name.into(); }
            })
        });

        let statements: Vec<TokenStream> = op
            .parameters
            .iter()
            .map(|p| {
                let wire = &p.name;
                let value = if p.required {
                    let name = ident(&p.ident);
                    quote! { #name }
                } else {
                    let field = ident(&p.ident);
                    quote! { #options.#field }
                };
                match p.kind {
                    ParamKind::Path => quote! { #request.path_param(#wire, &#value)?; },
                    ParamKind::Query => quote! { #request.query(#wire, &#value)?; },
                    ParamKind::Header => quote! { #request.header(#wire, &#value)?; },
                    ParamKind::Body => {
                        let format = format_ident!("{}", op.body_format.variant_name());
                        if p.required {
                            quote! { #request.body(#rt::BodyFormat::#format, &#value)?; }
                        } else {
                            quote! {
                                if let Some(body) = &#value {
                                    #request.body(#rt::BodyFormat::#format, body)?;
                                }
                            }
                        }
                    }
                }
            })
            .collect();

        let binding = if statements.is_empty() {
            quote! { let #request }
        } else {
            quote! { let mut #request }
        };
        let expectation = self.expectation();

        quote! {
            #docs
            pub async fn #name(&self, #(#args),*) -> #returns {
                #(#conversions)*
                #binding = #rt::OperationRequest::new(#rt::RestMethod::#method, #path);
                #(#statements)*
                self.dispatcher.dispatch(#request, #expectation).await
            }
        }
    }

    fn expectation(&self) -> TokenStream {
        let rt = &self.ctx.runtime;
        let response = &self.operation.response;
        let status = match response.status {
            StatusMatch::Exact(code) => quote! { #rt::StatusMatch::Exact(#code) },
            StatusMatch::Class(class) => quote! { #rt::StatusMatch::Class(#class) },
        };
        let format = format_ident!("{}", response.format.variant_name());
        quote! { #rt::Expectation::new(#status, #rt::PayloadFormat::#format) }
    }

    fn method_docs(&self) -> Vec<String> {
        let op = self.operation;
        let mut docs = Vec::new();
        if let Some(summary) = &op.summary {
            docs.extend(doc_lines(summary));
        }
        if let Some(notes) = &op.notes {
            if !docs.is_empty() {
                docs.push(String::new());
            }
            docs.extend(doc_lines(notes));
        }
        if !docs.is_empty() {
            docs.push(String::new());
        }
        docs.push(format!(" `{} {}`", op.method, op.path));

        let required: Vec<&ParameterSpec> = op.required_parameters().collect();
        if !required.is_empty() {
            docs.push(String::new());
            docs.push(" ## Arguments".to_string());
            docs.push(String::new());
            for p in required {
                let mut line = format!(" * `{}` - {} parameter `{}`", unraw(&p.ident), p.kind, p.name);
                if let Some(description) = &p.description {
                    line.push_str(": ");
                    line.push_str(description.lines().next().unwrap_or_default().trim());
                }
                docs.push(line);
            }
        }
        if !op.errors.is_empty() {
            docs.push(String::new());
            docs.push(" ## Errors".to_string());
            docs.push(String::new());
            for error in &op.errors {
                docs.push(format!(" * {}", error_doc(error).trim_start()));
            }
        }
        docs
    }
}

fn variant_ident(error: &ErrorSpec) -> proc_macro2::Ident {
    format_ident!("Status{}", error.status.ident_suffix())
}

fn error_doc(error: &ErrorSpec) -> String {
    match &error.message {
        Some(message) => format!(" HTTP {}: {}", error.status, message.trim()),
        None => format!(" HTTP {}", error.status),
    }
}

fn parameter_docs(p: &ParameterSpec) -> Vec<String> {
    let mut docs = p.description.as_deref().map(doc_lines).unwrap_or_default();
    if let Some(default) = &p.default {
        if !docs.is_empty() {
            docs.push(String::new());
        }
        docs.push(format!(" Service default: `{default}`"));
    }
    if docs.is_empty() {
        docs.push(format!(" {} parameter `{}`.", capitalized(p.kind), p.name));
    }
    docs
}

fn capitalized(kind: ParamKind) -> &'static str {
    match kind {
        ParamKind::Path => "Path",
        ParamKind::Query => "Query",
        ParamKind::Body => "Body",
        ParamKind::Header => "Header",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::EmitOptions;
    use crate::test_utils::{model_with, operation, parameter, resource};
    use crate::types::TypeMapper;
    use scigraph_define::{Primitive, ResponseSpec, PayloadFormat, SpecModel, TypeSpec};

    fn parse(model: &SpecModel) -> syn::File {
        let types = TypeMapper::build(model);
        let ctx = EmitContext::new(model, &types, &EmitOptions::default()).unwrap();
        let unit = generate_resource_unit(&ctx, &model.resources[0]);
        syn::parse2(unit.items).expect("resource unit parses")
    }

    fn render(model: &SpecModel) -> String {
        prettyplease::unparse(&parse(model))
    }

    /// Arguments of a generated method, receiver excluded, as token text.
    fn arguments(model: &SpecModel, method: &str) -> Vec<String> {
        parse(model)
            .items
            .iter()
            .filter_map(|item| match item {
                syn::Item::Impl(block) => Some(block.items.iter()),
                _ => None,
            })
            .flatten()
            .find_map(|item| match item {
                syn::ImplItem::Fn(f) if f.sig.ident == method => Some(
                    f.sig
                        .inputs
                        .iter()
                        .filter_map(|arg| match arg {
                            syn::FnArg::Typed(typed) => {
                                Some(quote::ToTokens::to_token_stream(typed).to_string())
                            }
                            syn::FnArg::Receiver(_) => None,
                        })
                        .collect(),
                ),
                _ => None,
            })
            .expect("method exists")
    }

    fn term_get() -> OperationSpec {
        let mut op = operation("get", "TermGet");
        op.path = "/term/{id}".into();
        op.summary = Some("Look up a term".into());
        op.parameters = vec![parameter("id", ParamKind::Path, TypeSpec::string(), true)];
        op.response = ResponseSpec {
            status: StatusMatch::Exact(200),
            format: PayloadFormat::Json,
            ty: Some(TypeSpec::reference("Term")),
        };
        op.errors = vec![
            ErrorSpec {
                status: StatusMatch::Class(5),
                message: Some("Server error".into()),
                ty: Some(TypeSpec::Any),
            },
            ErrorSpec {
                status: StatusMatch::Exact(404),
                message: Some("Not found".into()),
                ty: None,
            },
        ];
        op
    }

    #[test]
    fn required_path_parameter_becomes_argument() {
        let model = model_with(vec![], vec![resource("term", vec![term_get()])]);
        assert_eq!(arguments(&model, "get"), ["id : impl Into < String >"]);
        let code = render(&model);
        assert!(code.contains("request.path_param(\"id\", &id)?;"));
        assert!(code.contains("StatusMatch::Exact(200u16)"));
        assert!(code.contains("scigraph_runtime::CallError<TermGetError>"));
        assert!(code.contains("`GET /term/{id}`"));
    }

    #[test]
    fn exact_error_codes_match_before_classes() {
        let code = render(&model_with(vec![], vec![resource("term", vec![term_get()])]));
        let exact = code.find("404u16 =>").expect("exact arm");
        let class = code.find("500u16..=599u16 =>").expect("class arm");
        assert!(exact < class);
        assert!(code.contains("Status404,"));
        assert!(code.contains("Status5xx(serde_json::Value)"));
    }

    #[test]
    fn optional_parameters_go_into_bundle() {
        let mut op = operation("search", "VocabularySearch");
        op.parameters = vec![
            parameter("term", ParamKind::Query, TypeSpec::string(), true),
            parameter("limit", ParamKind::Query, TypeSpec::primitive(Primitive::Int32), false),
            parameter("prefix", ParamKind::Query, TypeSpec::array(TypeSpec::string()), false),
        ];
        let model = model_with(vec![], vec![resource("vocabulary", vec![op])]);
        assert_eq!(
            arguments(&model, "search"),
            ["term : impl Into < String >", "options : VocabularySearchOptions"]
        );
        let code = render(&model);
        assert!(code.contains("pub struct VocabularySearchOptions"));
        assert!(code.contains("pub limit: Option<i32>"));
        assert!(code.contains("pub prefix: Option<Vec<String>>"));
        assert!(code.contains("request.query(\"limit\", &options.limit)?;"));
        assert!(code.contains("scigraph_runtime::Undocumented"));
    }

    #[test]
    fn operation_without_parameters_takes_no_arguments() {
        let model = model_with(vec![], vec![resource("status", vec![operation("ping", "StatusPing")])]);
        assert!(arguments(&model, "ping").is_empty());
        let code = render(&model);
        assert!(code.contains("let request"));
        assert!(!code.contains("let mut request"));
        assert!(!code.contains("Options"));
    }

    #[test]
    fn parameter_named_request_does_not_shadow_local() {
        let mut op = operation("lookup", "TermLookup");
        op.parameters = vec![parameter("request", ParamKind::Query, TypeSpec::string(), true)];
        let code = render(&model_with(vec![], vec![resource("term", vec![op])]));
        assert!(code.contains("let mut request2"));
        assert!(code.contains("request2.query(\"request\", &request)?;"));
    }

    #[test]
    fn optional_body_is_only_sent_when_present() {
        let mut op = operation("annotate", "AnnotationsAnnotate");
        op.parameters = vec![parameter("content", ParamKind::Body, TypeSpec::string(), false)];
        op.body_format = scigraph_define::BodyFormat::Text;
        let code = render(&model_with(vec![], vec![resource("annotations", vec![op])]));
        assert!(code.contains("if let Some(body) = &options.content"));
        assert!(code.contains("BodyFormat::Text"));
    }
}
