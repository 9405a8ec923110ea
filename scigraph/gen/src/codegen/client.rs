//! The `client` unit: the top-level client and its resource accessors.

use proc_macro2::TokenStream;
use quote::quote;

use super::resource::handle_ident;
use super::{EmitContext, UnitTokens};
use crate::naming::{ident, unraw};

/// Methods the client defines itself. Resource accessors with these names get
/// a `_resource` suffix.
const CLIENT_METHODS: &[&str] = &[
    "new",
    "with_base_url",
    "from_env",
    "with_config",
    "with_transport",
    "dispatcher",
];

/// Name of the accessor method for a resource.
pub fn accessor_name(resource_ident: &str) -> String {
    if CLIENT_METHODS.contains(&unraw(resource_ident)) {
        format!("{}_resource", unraw(resource_ident))
    } else {
        resource_ident.to_string()
    }
}

/// Generates the `client` unit.
pub fn generate_client_unit(ctx: &EmitContext<'_>) -> UnitTokens {
    let rt = &ctx.runtime;
    let client = ctx.client_ident();
    let title = &ctx.model.title;
    let struct_doc = format!(" Client for the {title} API.");

    let accessors = ctx.model.resources_sorted().into_iter().map(|resource| {
        let module = ident(&resource.ident);
        let accessor = ident(&accessor_name(&resource.ident));
        let handle = handle_ident(resource);
        let doc = format!(" Operations under `{}`.", resource.name);
        quote! {
            #[doc = #doc]
            pub fn #accessor(&self) -> super::#module::#handle<'_, T> {
                super::#module::#handle::new(&self.dispatcher)
            }
        }
    });

    let default_transport = match &ctx.model.base_url {
        Some(base_url) => quote! {
            impl #client {
                /// Base URL declared by the API document.
                pub const BASE_URL: &str = #base_url;

                /// Creates a client for [`Self::BASE_URL`] with default settings.
                pub fn new() -> Result<Self, #rt::ConfigError> {
                    Self::with_base_url(Self::BASE_URL)
                }

                /// Creates a client for another deployment of the API.
                pub fn with_base_url(base_url: &str) -> Result<Self, #rt::ConfigError> {
                    Self::with_config(#rt::ClientConfig::new(base_url)?)
                }

                /// Creates a client configured from the environment, falling
                /// back to [`Self::BASE_URL`].
                pub fn from_env() -> Result<Self, #rt::ConfigError> {
                    Self::with_config(#rt::ClientConfig::from_env_or(Self::BASE_URL)?)
                }

                /// Creates a client with an explicit configuration.
                pub fn with_config(config: #rt::ClientConfig) -> Result<Self, #rt::ConfigError> {
                    Ok(Self::with_transport(config, #rt::ReqwestTransport::new()?))
                }
            }
        },
        None => quote! {
            impl #client {
                /// Creates a client for the given deployment of the API.
                pub fn with_base_url(base_url: &str) -> Result<Self, #rt::ConfigError> {
                    Self::with_config(#rt::ClientConfig::new(base_url)?)
                }

                /// Creates a client configured from the environment.
                pub fn from_env() -> Result<Self, #rt::ConfigError> {
                    Self::with_config(#rt::ClientConfig::from_env()?)
                }

                /// Creates a client with an explicit configuration.
                pub fn with_config(config: #rt::ClientConfig) -> Result<Self, #rt::ConfigError> {
                    Ok(Self::with_transport(config, #rt::ReqwestTransport::new()?))
                }
            }
        },
    };

    let items: TokenStream = quote! {
        #[doc = #struct_doc]
        ///
        /// Resource handles borrow the client, so one client can serve many
        /// concurrent calls.
        pub struct #client<T = #rt::ReqwestTransport> {
            dispatcher: #rt::Dispatcher<T>,
        }

        #default_transport

        impl<T: #rt::Transport> #client<T> {
            /// Creates a client that sends requests through `transport`.
            pub fn with_transport(config: #rt::ClientConfig, transport: T) -> Self {
                Self {
                    dispatcher: #rt::Dispatcher::new(config, transport),
                }
            }

            /// The dispatcher shared by every resource handle.
            pub fn dispatcher(&self) -> &#rt::Dispatcher<T> {
                &self.dispatcher
            }

            #(#accessors)*
        }
    };

    UnitTokens {
        docs: vec![format!(" Entry point of the generated {title} client.")],
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::EmitOptions;
    use crate::test_utils::{model_with, operation, resource};
    use crate::types::TypeMapper;

    fn render(model: &scigraph_define::SpecModel, options: &EmitOptions) -> String {
        let types = TypeMapper::build(model);
        let ctx = EmitContext::new(model, &types, options).unwrap();
        let file: syn::File = syn::parse2(generate_client_unit(&ctx).items).unwrap();
        prettyplease::unparse(&file)
    }

    #[test]
    fn base_url_enables_new() {
        let model = model_with(vec![], vec![resource("term", vec![operation("get", "TermGet")])]);
        let code = render(&model, &EmitOptions::default());
        assert!(code.contains("pub struct SciGraphClient<T = scigraph_runtime::ReqwestTransport>"));
        assert!(code.contains("pub const BASE_URL: &str = \"https://scigraph.example.org/scigraph\""));
        assert!(code.contains("pub fn new()"));
        assert!(code.contains("pub fn term(&self) -> super::term::TermResource<'_, T>"));
    }

    #[test]
    fn missing_base_url_drops_new() {
        let mut model = model_with(vec![], vec![]);
        model.base_url = None;
        let code = render(&model, &EmitOptions::default());
        assert!(!code.contains("BASE_URL"));
        assert!(!code.contains("pub fn new()"));
        assert!(code.contains("ClientConfig::from_env()"));
    }

    #[test]
    fn accessors_avoid_client_methods() {
        assert_eq!(accessor_name("dispatcher"), "dispatcher_resource");
        assert_eq!(accessor_name("term"), "term");
        let model = model_with(vec![], vec![resource("dispatcher", vec![])]);
        let options = EmitOptions {
            client_name: Some("Scigraph".into()),
            runtime_crate: "rt".into(),
        };
        let code = render(&model, &options);
        assert!(code.contains("pub fn dispatcher_resource(&self)"));
        assert!(code.contains("pub struct Scigraph<T = rt::ReqwestTransport>"));
    }
}
