//! Arity-generic expansion over a parameter list.
//!
//! Every generated signature is one [`Projection`] of the same
//! [`ParamList`]: each descriptor goes through `item`, except the last one,
//! which goes through `tail` so list separators never dangle.

use proc_macro2::TokenStream;
use quote::quote;

use crate::descriptor::{ParamDescriptor, ParamKind};

/// Ordered, validated parameter descriptors of one function.
pub(crate) struct ParamList {
    params: Vec<ParamDescriptor>,
}

impl ParamList {
    /// Validates the descriptor list.
    ///
    /// A lone void descriptor is the explicit "no parameters" marker and
    /// yields an empty list. Void next to other descriptors is rejected.
    pub(crate) fn new(params: Vec<ParamDescriptor>) -> syn::Result<Self> {
        match params.iter().position(|p| p.kind == ParamKind::Void) {
            None => Ok(Self { params }),
            Some(_) if params.len() == 1 => Ok(Self { params: Vec::new() }),
            Some(index) => Err(syn::Error::new(
                params[index].name.span(),
                "the void marker must be the only parameter descriptor",
            )),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.params.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Applies `projection` to every descriptor in order.
    pub(crate) fn expand<P: Projection>(&self, projection: &P) -> TokenStream {
        let mut tokens = TokenStream::new();
        if let Some((last, rest)) = self.params.split_last() {
            for param in rest {
                tokens.extend(projection.item(param));
            }
            tokens.extend(projection.tail(last));
        }
        tokens
    }
}

/// A per-parameter expansion rule.
pub(crate) trait Projection {
    fn item(&self, param: &ParamDescriptor) -> TokenStream;

    fn tail(&self, param: &ParamDescriptor) -> TokenStream {
        self.item(param)
    }
}

/// `A, B, C`
pub(crate) struct TypeList;

impl Projection for TypeList {
    fn item(&self, param: &ParamDescriptor) -> TokenStream {
        let ty = &param.ty;
        quote!(#ty,)
    }

    fn tail(&self, param: &ParamDescriptor) -> TokenStream {
        let ty = &param.ty;
        quote!(#ty)
    }
}

/// `a: A, b: B, c: C`
pub(crate) struct DeclarationList;

impl Projection for DeclarationList {
    fn item(&self, param: &ParamDescriptor) -> TokenStream {
        let (name, ty) = (&param.name, &param.ty);
        quote!(#name: #ty,)
    }

    fn tail(&self, param: &ParamDescriptor) -> TokenStream {
        let (name, ty) = (&param.name, &param.ty);
        quote!(#name: #ty)
    }
}

/// `a, b, c`
pub(crate) struct CallList;

impl Projection for CallList {
    fn item(&self, param: &ParamDescriptor) -> TokenStream {
        let name = &param.name;
        quote!(#name,)
    }

    fn tail(&self, param: &ParamDescriptor) -> TokenStream {
        let name = &param.name;
        quote!(#name)
    }
}

/// One collaborator registration statement per parameter.
pub(crate) struct StatementList;

impl Projection for StatementList {
    fn item(&self, param: &ParamDescriptor) -> TokenStream {
        param.statement()
    }
}

/// `&mut A, &mut B`, the call-adapter view of the arguments.
pub(crate) struct MutRefTypeList;

impl Projection for MutRefTypeList {
    fn item(&self, param: &ParamDescriptor) -> TokenStream {
        let ty = &param.ty;
        quote!(&mut #ty,)
    }

    fn tail(&self, param: &ParamDescriptor) -> TokenStream {
        let ty = &param.ty;
        quote!(&mut #ty)
    }
}

/// `a: &mut A, b: &mut B`
pub(crate) struct MutRefDeclarationList;

impl Projection for MutRefDeclarationList {
    fn item(&self, param: &ParamDescriptor) -> TokenStream {
        let (name, ty) = (&param.name, &param.ty);
        quote!(#name: &mut #ty,)
    }

    fn tail(&self, param: &ParamDescriptor) -> TokenStream {
        let (name, ty) = (&param.name, &param.ty);
        quote!(#name: &mut #ty)
    }
}

/// `&mut a, &mut b`
pub(crate) struct MutRefCallList;

impl Projection for MutRefCallList {
    fn item(&self, param: &ParamDescriptor) -> TokenStream {
        let name = &param.name;
        quote!(&mut #name,)
    }

    fn tail(&self, param: &ParamDescriptor) -> TokenStream {
        let name = &param.name;
        quote!(&mut #name)
    }
}

/// `let mut a = a;` so the dispatcher can lend arguments mutably.
pub(crate) struct RebindList;

impl Projection for RebindList {
    fn item(&self, param: &ParamDescriptor) -> TokenStream {
        let name = &param.name;
        quote!(let mut #name = #name;)
    }
}
