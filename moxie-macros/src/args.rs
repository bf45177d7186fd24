use syn::parse::{Parse, ParseStream};
use syn::{Ident, LitStr, Token};

use crate::descriptor::ReturnSpec;

/// Options of the `#[mock(..)]` attribute.
#[derive(Default)]
pub(crate) struct MockArgs {
    pub(crate) returns: Option<ReturnSpec>,
    pub(crate) name: Option<LitStr>,
}

impl Parse for MockArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = MockArgs::default();
        while !input.is_empty() {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            match key.to_string().as_str() {
                "returns" if args.returns.is_none() => args.returns = Some(input.parse()?),
                "name" if args.name.is_none() => args.name = Some(input.parse()?),
                "returns" | "name" => {
                    return Err(syn::Error::new(key.span(), format!("duplicate option `{key}`")))
                }
                _ => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!("unknown option `{key}`, expected `returns` or `name`"),
                    ))
                }
            }
            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }
        Ok(args)
    }
}
