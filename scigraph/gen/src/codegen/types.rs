//! The `types` unit: named models and hoisted inline types.

use proc_macro2::TokenStream;
use quote::quote;

use super::{EmitContext, UnitTokens, doc_attrs, doc_lines};
use crate::naming::{ident, unraw};
use crate::types::{DeclKind, FieldDecl, TypeDecl, TypeScope, VariantDecl};

/// Generates the `types` unit.
pub fn generate_types_unit(ctx: &EmitContext<'_>) -> UnitTokens {
    let declarations = ctx.types.declarations();
    let items: TokenStream = declarations.iter().map(generate_declaration).collect();
    let serde_import = if declarations.is_empty() {
        TokenStream::new()
    } else {
        quote! { use serde::{Deserialize, Serialize}; }
    };

    UnitTokens {
        docs: vec![
            format!(" Payload types of the {} API.", ctx.model.title),
            String::new(),
            " Named models keep their document name; inline objects and enums are".to_string(),
            " named after the operation or model that declares them.".to_string(),
        ],
        items: quote! {
            #serde_import
            #items
        },
    }
}

/// Generates one struct or enum declaration.
pub fn generate_declaration(decl: &TypeDecl) -> TokenStream {
    let docs = doc_attrs(&declaration_docs(decl));
    let name = ident(&decl.name);

    match &decl.kind {
        DeclKind::Struct(fields) => {
            let derive_default = fields.iter().all(|f| f.ty.has_default());
            let derives = if derive_default {
                quote! { #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)] }
            } else {
                quote! { #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)] }
            };
            let fields = fields.iter().map(generate_field);
            quote! {
                #docs
                #derives
                pub struct #name {
                    #(#fields)*
                }
            }
        }
        DeclKind::Enum(variants) => {
            let defs = variants.iter().map(|v| {
                let variant = ident(&v.ident);
                let rename = rename_attr(&v.ident, &v.wire_value);
                quote! {
                    #rename
                    #variant,
                }
            });
            let arms = variants.iter().map(|VariantDecl { wire_value, ident: v }| {
                let variant = ident(v);
                quote! { Self::#variant => #wire_value, }
            });
            quote! {
                #docs
                #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
                pub enum #name {
                    #(#defs)*
                }

                impl #name {
                    /// Value as sent on the wire.
                    pub fn as_str(&self) -> &'static str {
                        match self {
                            #(#arms)*
                        }
                    }
                }

                impl std::fmt::Display for #name {
                    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                        f.write_str(self.as_str())
                    }
                }
            }
        }
    }
}

fn generate_field(field: &FieldDecl) -> TokenStream {
    let docs = doc_attrs(&field.description.as_deref().map(doc_lines).unwrap_or_default());
    let name = ident(&field.ident);
    let ty = field.ty.to_tokens(TypeScope::Local);
    let rename = rename_attr(&field.ident, &field.wire_name);
    let optional = if field.optional {
        quote! { #[serde(default, skip_serializing_if = "Option::is_none")] }
    } else {
        TokenStream::new()
    };
    quote! {
        #docs
        #rename
        #optional
        pub #name: #ty,
    }
}

fn rename_attr(rust_name: &str, wire_name: &str) -> TokenStream {
    if unraw(rust_name) == wire_name {
        TokenStream::new()
    } else {
        quote! { #[serde(rename = #wire_name)] }
    }
}

fn declaration_docs(decl: &TypeDecl) -> Vec<String> {
    match &decl.description {
        Some(description) => doc_lines(description),
        None if decl.origin.is_model_root() => vec![format!(" `{}` model.", decl.name)],
        None => vec![format!(
            " Inline type declared by `{}`.",
            decl.origin.owner
        )],
    }
}
