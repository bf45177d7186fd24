//! Per-function code assembly.
//!
//! For a function `f` the assembler emits `fn f` bound to the wrapped
//! dispatcher, the original body under a hidden name, and a `mod f` holding
//! the mock state and everything that configures or reads it.

use proc_macro2::TokenStream;
use quote::{format_ident, quote, ToTokens};
use syn::{Abi, Attribute, Ident, ItemFn, LitStr, ReturnType, Visibility};

use crate::args::MockArgs;
use crate::descriptor::{ParamDescriptor, ReturnDescriptor};
use crate::projection::{
    CallList, DeclarationList, MutRefCallList, MutRefDeclarationList, MutRefTypeList, ParamList,
    RebindList, StatementList, TypeList,
};

pub(crate) fn expand(args: MockArgs, item: ItemFn) -> syn::Result<TokenStream> {
    Ok(MockFunction::new(args, item)?.into_token_stream())
}

pub(crate) struct MockFunction {
    attrs: Vec<Attribute>,
    cfgs: Vec<Attribute>,
    vis: Visibility,
    abi: Option<Abi>,
    ident: Ident,
    tracked_name: LitStr,
    params: ParamList,
    ret: ReturnDescriptor,
    real: ItemFn,
}

impl MockFunction {
    pub(crate) fn new(args: MockArgs, mut item: ItemFn) -> syn::Result<Self> {
        check_signature(&item)?;

        let mut descriptors = item
            .sig
            .inputs
            .iter_mut()
            .enumerate()
            .map(|(index, arg)| ParamDescriptor::from_arg(index, arg))
            .collect::<syn::Result<Vec<_>>>()?;
        if descriptors.is_empty() {
            descriptors.push(ParamDescriptor::void());
        }
        let params = ParamList::new(descriptors)?;
        let ret = ReturnDescriptor::from_output(&item.sig.output, args.returns)?;

        let ident = item.sig.ident.clone();
        let tracked_name = args
            .name
            .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
        let cfgs: Vec<Attribute> = item
            .attrs
            .iter()
            .filter(|attr| attr.path().is_ident("cfg"))
            .cloned()
            .collect();

        let attrs = std::mem::take(&mut item.attrs);
        let vis = std::mem::replace(&mut item.vis, Visibility::Inherited);
        let abi = item.sig.abi.clone();
        item.sig.ident = real_ident(&ident);

        Ok(Self {
            attrs,
            cfgs,
            vis,
            abi,
            ident,
            tracked_name,
            params,
            ret,
            real: item,
        })
    }

    fn output(&self) -> &ReturnType {
        &self.ret.output
    }

    /// Names and types every other definition refers to.
    pub(crate) fn declarations(&self) -> TokenStream {
        let tracked_name = &self.tracked_name;
        let types = self.params.expand(&TypeList);
        let mut_ref_types = self.params.expand(&MutRefTypeList);
        let output = self.output();

        quote! {
            /// Name the collaborator records calls under.
            pub const NAME: &str = #tracked_name;

            /// Hook run on every intercepted call before the result is produced.
            pub type CallAdapter = ::std::rc::Rc<
                dyn ::core::ops::Fn(&::moxie::MockSupport, &mut ::moxie::ActualCall, #mut_ref_types)
            >;

            /// Hook producing the result of an intercepted call.
            pub type ReturnAdapter = ::std::rc::Rc<
                dyn ::core::ops::Fn(&::moxie::MockSupport, &mut ::moxie::ActualCall, #types) #output
            >;
        }
    }

    /// State holder, accessors, trampoline, dispatcher and default adapters.
    pub(crate) fn definitions(&self) -> TokenStream {
        let real_ident = &self.real.sig.ident;
        let output = self.output();

        let types = self.params.expand(&TypeList);
        let decls = self.params.expand(&DeclarationList);
        let calls = self.params.expand(&CallList);
        let statements = self.params.expand(&StatementList);
        let mut_ref_types = self.params.expand(&MutRefTypeList);
        let mut_ref_decls = self.params.expand(&MutRefDeclarationList);
        let mut_ref_calls = self.params.expand(&MutRefCallList);
        let rebinds = self.params.expand(&RebindList);
        let accessor = self.ret.accessor();

        quote! {
            ::std::thread_local! {
                static STATE: ::core::cell::RefCell<::moxie::MockState<CallAdapter, ReturnAdapter>> =
                    ::core::cell::RefCell::new(::moxie::MockState::new(
                        NAME,
                        ::std::rc::Rc::new(record) as CallAdapter,
                        ::std::rc::Rc::new(stub) as ReturnAdapter,
                    ));
            }

            /// Runs `f` against a snapshot of this thread's mock state.
            ///
            /// No borrow of the state is held while `f` runs, so `f` may
            /// reconfigure the mock; the snapshot does not see those changes.
            pub fn with_state<T>(
                f: impl ::core::ops::FnOnce(&::moxie::MockState<CallAdapter, ReturnAdapter>) -> T,
            ) -> T {
                let snapshot = STATE.with(|state| state.borrow().clone());
                f(&snapshot)
            }

            pub fn reset() {
                STATE.with(|state| state.borrow_mut().reset())
            }

            pub fn enable() {
                STATE.with(|state| state.borrow_mut().enable())
            }

            pub fn disable() {
                STATE.with(|state| state.borrow_mut().disable())
            }

            pub fn is_enabled() -> bool {
                STATE.with(|state| state.borrow().is_enabled())
            }

            pub fn set_scope(scope: &str) -> ::core::result::Result<(), ::moxie::MoxieError> {
                STATE.with(|state| state.borrow_mut().set_scope(scope))
            }

            pub fn set_call_adapter<F>(adapter: F) -> ::core::result::Result<(), ::moxie::MoxieError>
            where
                F: ::core::ops::Fn(&::moxie::MockSupport, &mut ::moxie::ActualCall, #mut_ref_types) + 'static,
            {
                let adapter: CallAdapter = ::std::rc::Rc::new(adapter);
                STATE.with(|state| state.borrow_mut().set_call_adapter(::core::option::Option::Some(adapter)))
            }

            pub fn clear_call_adapter() -> ::core::result::Result<(), ::moxie::MoxieError> {
                STATE.with(|state| state.borrow_mut().set_call_adapter(::core::option::Option::None))
            }

            pub fn set_return_adapter<F>(adapter: F) -> ::core::result::Result<(), ::moxie::MoxieError>
            where
                F: ::core::ops::Fn(&::moxie::MockSupport, &mut ::moxie::ActualCall, #types) #output + 'static,
            {
                let adapter: ReturnAdapter = ::std::rc::Rc::new(adapter);
                STATE.with(|state| state.borrow_mut().set_return_adapter(::core::option::Option::Some(adapter)))
            }

            pub fn clear_return_adapter() -> ::core::result::Result<(), ::moxie::MoxieError> {
                STATE.with(|state| state.borrow_mut().set_return_adapter(::core::option::Option::None))
            }

            /// Type-erased controls, used by `MockSession`.
            pub fn handle() -> ::moxie::MockHandle {
                ::moxie::MockHandle::new(NAME, reset, enable, disable, is_enabled, set_scope)
            }

            /// The original function body.
            pub fn real(#decls) #output {
                super::#real_ident(#calls)
            }

            pub fn wrapped(#decls) #output {
                match STATE.with(|state| state.borrow().route()) {
                    ::moxie::Route::Real => self::real(#calls),
                    ::moxie::Route::Mock {
                        support,
                        mut call,
                        call_adapter: on_call,
                        return_adapter: on_return,
                    } => {
                        #rebinds
                        if let ::core::option::Option::Some(on_call) = on_call {
                            on_call(&support, &mut call, #mut_ref_calls);
                        }
                        match on_return {
                            ::core::option::Option::Some(on_return) => on_return(&support, &mut call, #calls),
                            ::core::option::Option::None => self::real(#calls),
                        }
                    }
                }
            }

            /// Default call adapter: reports every tracked parameter.
            pub fn record(support: &::moxie::MockSupport, call: &mut ::moxie::ActualCall, #mut_ref_decls) {
                #statements
            }

            /// Default return adapter: uses the configured return value when
            /// there is one, the real implementation otherwise.
            pub fn stub(support: &::moxie::MockSupport, call: &mut ::moxie::ActualCall, #decls) #output {
                if call.has_return_value() {
                    #accessor
                } else {
                    self::real(#calls)
                }
            }
        }
    }

    fn wrapper(&self) -> TokenStream {
        let attrs = &self.attrs;
        let vis = &self.vis;
        let abi = &self.abi;
        let ident = &self.ident;
        let output = self.output();
        let decls = self.params.expand(&DeclarationList);
        let calls = self.params.expand(&CallList);

        quote! {
            #(#attrs)*
            #vis #abi fn #ident(#decls) #output {
                #ident::wrapped(#calls)
            }
        }
    }

    fn module(&self) -> TokenStream {
        let cfgs = &self.cfgs;
        let vis = &self.vis;
        let ident = &self.ident;
        let declarations = self.declarations();
        let definitions = self.definitions();

        quote! {
            #(#cfgs)*
            #[allow(
                missing_docs,
                dead_code,
                unused_imports,
                unused_variables,
                unused_mut,
                clippy::too_many_arguments,
                clippy::unnecessary_cast
            )]
            #vis mod #ident {
                use super::*;

                #declarations
                #definitions
            }
        }
    }
}

impl ToTokens for MockFunction {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let cfgs = &self.cfgs;
        let real = &self.real;

        tokens.extend(self.wrapper());
        tokens.extend(quote! {
            #(#cfgs)*
            #[doc(hidden)]
            #[allow(non_snake_case, clippy::too_many_arguments)]
            #real
        });
        tokens.extend(self.module());
    }
}

fn real_ident(ident: &Ident) -> Ident {
    format_ident!("__moxie_real_{}", ident)
}

fn check_signature(item: &ItemFn) -> syn::Result<()> {
    let sig = &item.sig;
    if let Some(token) = &sig.constness {
        return Err(syn::Error::new_spanned(token, "const functions cannot be mocked"));
    }
    if let Some(token) = &sig.asyncness {
        return Err(syn::Error::new_spanned(token, "async functions cannot be mocked"));
    }
    if let Some(token) = &sig.unsafety {
        return Err(syn::Error::new_spanned(token, "unsafe functions cannot be mocked"));
    }
    if let Some(variadic) = &sig.variadic {
        return Err(syn::Error::new_spanned(variadic, "variadic functions cannot be mocked"));
    }
    if !sig.generics.params.is_empty() || sig.generics.where_clause.is_some() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "generic functions cannot be mocked",
        ));
    }
    Ok(())
}
