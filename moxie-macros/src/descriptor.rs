use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote, ToTokens};
use syn::parse::{Parse, ParseStream};
use syn::{FnArg, Ident, LitStr, Pat, PatType, ReturnType, Type};

/// Locals the generated dispatcher and adapters bind next to the arguments.
/// Parameters may not shadow them.
pub(crate) const RESERVED_NAMES: [&str; 4] = ["support", "call", "on_call", "on_return"];

/// How a parameter is reported to the expectation-tracking collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ParamKind {
    Bool,
    Int,
    UInt,
    Long,
    ULong,
    Double,
    String,
    InPtr,
    OutPtr,
    InTypePtr,
    OutTypePtr,
    Ignore,
    Custom,
    Void,
}

impl ParamKind {
    fn from_ident(ident: &Ident) -> syn::Result<Self> {
        let kind = match ident.to_string().as_str() {
            "bool" => Self::Bool,
            "int" => Self::Int,
            "uint" => Self::UInt,
            "long" => Self::Long,
            "ulong" => Self::ULong,
            "double" => Self::Double,
            "string" => Self::String,
            "in_ptr" => Self::InPtr,
            "out_ptr" => Self::OutPtr,
            "in_type_ptr" => Self::InTypePtr,
            "out_type_ptr" => Self::OutTypePtr,
            "ignore" => Self::Ignore,
            "custom" => Self::Custom,
            "void" => Self::Void,
            _ => {
                return Err(syn::Error::new(
                    ident.span(),
                    format!(
                        "unknown parameter kind `{ident}`, expected one of: bool, int, uint, long, \
                         ulong, double, string, in_ptr, out_ptr, in_type_ptr, out_type_ptr, \
                         ignore, custom"
                    ),
                ))
            }
        };
        Ok(kind)
    }

    /// Picks a kind from the parameter type alone.
    pub(crate) fn infer(ty: &Type) -> Option<Self> {
        match ty {
            Type::Reference(r) if r.mutability.is_some() => {
                is_output_reference(ty).then_some(Self::OutPtr)
            }
            Type::Reference(r) if is_string_like(&r.elem) => Some(Self::String),
            Type::Reference(_) => Some(Self::InPtr),
            Type::Ptr(p) if p.const_token.is_some() && last_ident_is(&p.elem, "c_char") => {
                Some(Self::String)
            }
            Type::Ptr(_) => Some(Self::InPtr),
            Type::Paren(p) => Self::infer(&p.elem),
            Type::Group(g) => Self::infer(&g.elem),
            Type::Path(_) => match primitive_name(ty)?.as_str() {
                "bool" => Some(Self::Bool),
                "i8" | "i16" | "i32" => Some(Self::Int),
                "u8" | "u16" | "u32" => Some(Self::UInt),
                "i64" | "isize" => Some(Self::Long),
                "u64" | "usize" => Some(Self::ULong),
                "f32" | "f64" => Some(Self::Double),
                "String" | "CString" => Some(Self::String),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Contents of a `#[param(..)]` attribute.
pub(crate) struct ParamSpec {
    kind: ParamKind,
    custom: TokenStream,
}

impl Parse for ParamSpec {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let ident: Ident = input.parse()?;
        let kind = ParamKind::from_ident(&ident)?;
        let custom = if kind == ParamKind::Custom {
            let content;
            syn::parenthesized!(content in input);
            content.parse()?
        } else {
            TokenStream::new()
        };
        Ok(Self { kind, custom })
    }
}

/// One parameter of a mocked function.
#[derive(Clone)]
pub(crate) struct ParamDescriptor {
    pub(crate) kind: ParamKind,
    pub(crate) ty: Type,
    pub(crate) name: Ident,
    pub(crate) custom: TokenStream,
}

impl ParamDescriptor {
    pub(crate) fn new(kind: ParamKind, ty: Type, name: Ident) -> Self {
        Self {
            kind,
            ty,
            name,
            custom: TokenStream::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn custom(ty: Type, name: Ident, custom: TokenStream) -> Self {
        Self {
            kind: ParamKind::Custom,
            ty,
            name,
            custom,
        }
    }

    /// The explicit "no parameters" marker.
    pub(crate) fn void() -> Self {
        Self::new(
            ParamKind::Void,
            syn::parse_quote!(()),
            Ident::new("void", Span::call_site()),
        )
    }

    /// Builds the descriptor for the `index`-th argument and strips its
    /// `#[param(..)]` attributes so the argument can be re-emitted verbatim.
    pub(crate) fn from_arg(index: usize, arg: &mut FnArg) -> syn::Result<Self> {
        let arg = match arg {
            FnArg::Typed(arg) => arg,
            FnArg::Receiver(receiver) => {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "methods cannot be mocked, only free functions",
                ))
            }
        };

        let spec = take_param_spec(arg)?;
        let name = match &*arg.pat {
            Pat::Ident(pat) if pat.subpat.is_none() => pat.ident.clone(),
            _ => format_ident!("arg{}", index),
        };
        if RESERVED_NAMES.contains(&name.to_string().as_str()) {
            return Err(syn::Error::new(
                name.span(),
                format!("parameter name `{name}` is reserved by the generated adapters"),
            ));
        }

        let ty = (*arg.ty).clone();
        let (kind, custom) = match spec {
            Some(spec) => (spec.kind, spec.custom),
            None => match ParamKind::infer(&ty) {
                Some(kind) => (kind, TokenStream::new()),
                None => {
                    return Err(syn::Error::new_spanned(
                        &arg.ty,
                        "cannot infer how to track this parameter, annotate it with \
                         #[param(kind)] or #[param(custom(..))]",
                    ))
                }
            },
        };

        match kind {
            ParamKind::Void => Err(syn::Error::new(
                name.span(),
                "`void` marks a function without parameters and cannot describe a parameter",
            )),
            ParamKind::OutPtr | ParamKind::OutTypePtr if !is_output_reference(&ty) => {
                Err(syn::Error::new_spanned(
                    &arg.ty,
                    "output parameters must be `&mut T` or `&mut [T]` references, \
                     `&mut str` and `&mut dyn Trait` cannot receive output values",
                ))
            }
            _ => Ok(Self {
                kind,
                ty,
                name,
                custom,
            }),
        }
    }

    /// The collaborator registration statement for this parameter. The
    /// parameter is bound as `&mut T` inside the call-recording adapter.
    pub(crate) fn statement(&self) -> TokenStream {
        let name = &self.name;
        let key = LitStr::new(&name.to_string(), name.span());
        match self.kind {
            ParamKind::Bool => quote!(call.with_bool_parameter(#key, *#name);),
            ParamKind::Int => quote!(call.with_int_parameter(#key, *#name as i32);),
            ParamKind::UInt => quote!(call.with_unsigned_int_parameter(#key, *#name as u32);),
            ParamKind::Long => quote!(call.with_long_int_parameter(#key, *#name as i64);),
            ParamKind::ULong => {
                quote!(call.with_unsigned_long_int_parameter(#key, *#name as u64);)
            }
            ParamKind::Double => quote!(call.with_double_parameter(#key, *#name as f64);),
            ParamKind::String => quote! {
                call.with_string_parameter(#key, ::moxie::support::StringParam::to_mock_string(&*#name));
            },
            ParamKind::InPtr => quote! {
                call.with_pointer_parameter(#key, ::moxie::support::Address::address(&*#name));
            },
            ParamKind::OutPtr => quote!(call.with_output_parameter(#key, &mut **#name);),
            ParamKind::InTypePtr => {
                let tag = type_tag(&self.ty);
                quote! {
                    call.with_parameter_of_type(#tag, #key, ::moxie::support::Address::address(&*#name));
                }
            }
            ParamKind::OutTypePtr => {
                let tag = type_tag(&self.ty);
                quote!(call.with_output_parameter_of_type(#tag, #key, &mut **#name);)
            }
            ParamKind::Custom => self.custom.clone(),
            ParamKind::Ignore | ParamKind::Void => TokenStream::new(),
        }
    }
}

/// How the stub adapter turns a configured return value into the result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ReturnKind {
    Bool,
    Int,
    UInt,
    Long,
    ULong,
    Double,
    String,
    Ptr,
    Void,
    Custom,
}

impl ReturnKind {
    fn from_ident(ident: &Ident) -> syn::Result<Self> {
        let kind = match ident.to_string().as_str() {
            "bool" => Self::Bool,
            "int" => Self::Int,
            "uint" => Self::UInt,
            "long" => Self::Long,
            "ulong" => Self::ULong,
            "double" => Self::Double,
            "string" => Self::String,
            "ptr" => Self::Ptr,
            "void" => Self::Void,
            "custom" => Self::Custom,
            _ => {
                return Err(syn::Error::new(
                    ident.span(),
                    format!(
                        "unknown return kind `{ident}`, expected one of: bool, int, uint, long, \
                         ulong, double, string, ptr, void, custom"
                    ),
                ))
            }
        };
        Ok(kind)
    }

    pub(crate) fn infer(output: &ReturnType) -> Option<Self> {
        let ty = match output {
            ReturnType::Default => return Some(Self::Void),
            ReturnType::Type(_, ty) => ty,
        };
        match &**ty {
            Type::Tuple(t) if t.elems.is_empty() => Some(Self::Void),
            Type::Ptr(_) => Some(Self::Ptr),
            Type::Path(_) => match primitive_name(ty)?.as_str() {
                "bool" => Some(Self::Bool),
                "i8" | "i16" | "i32" => Some(Self::Int),
                "u8" | "u16" | "u32" => Some(Self::UInt),
                "i64" | "isize" => Some(Self::Long),
                "u64" | "usize" => Some(Self::ULong),
                "f32" | "f64" => Some(Self::Double),
                "String" => Some(Self::String),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Value of the `returns = ..` mock option.
pub(crate) struct ReturnSpec {
    kind: ReturnKind,
    custom: TokenStream,
}

impl Parse for ReturnSpec {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let ident: Ident = input.parse()?;
        let kind = ReturnKind::from_ident(&ident)?;
        let custom = if kind == ReturnKind::Custom {
            let content;
            syn::parenthesized!(content in input);
            content.parse()?
        } else {
            TokenStream::new()
        };
        Ok(Self { kind, custom })
    }
}

/// The return type of a mocked function.
pub(crate) struct ReturnDescriptor {
    pub(crate) kind: ReturnKind,
    pub(crate) output: ReturnType,
    custom: TokenStream,
}

impl ReturnDescriptor {
    pub(crate) fn from_output(output: &ReturnType, spec: Option<ReturnSpec>) -> syn::Result<Self> {
        let (kind, custom) = match spec {
            Some(spec) => (spec.kind, spec.custom),
            None => match ReturnKind::infer(output) {
                Some(kind) => (kind, TokenStream::new()),
                None => {
                    return Err(syn::Error::new_spanned(
                        output,
                        "cannot infer how to stub this return type, use \
                         #[mock(returns = kind)] or #[mock(returns = custom(..))]",
                    ))
                }
            },
        };
        Ok(Self {
            kind,
            output: output.clone(),
            custom,
        })
    }

    /// Expression producing the result from a configured return value.
    pub(crate) fn accessor(&self) -> TokenStream {
        let ty = match &self.output {
            ReturnType::Type(_, ty) => ty.to_token_stream(),
            ReturnType::Default => quote!(()),
        };
        match self.kind {
            ReturnKind::Bool => quote!(call.bool_return_value()),
            ReturnKind::Int => quote!(call.int_return_value() as #ty),
            ReturnKind::UInt => quote!(call.unsigned_int_return_value() as #ty),
            ReturnKind::Long => quote!(call.long_int_return_value() as #ty),
            ReturnKind::ULong => quote!(call.unsigned_long_int_return_value() as #ty),
            ReturnKind::Double => quote!(call.double_return_value() as #ty),
            ReturnKind::String => {
                quote!(::core::convert::From::from(call.string_return_value()))
            }
            ReturnKind::Ptr => quote!(call.pointer_return_value() as #ty),
            ReturnKind::Void => TokenStream::new(),
            ReturnKind::Custom => self.custom.clone(),
        }
    }
}

fn take_param_spec(arg: &mut PatType) -> syn::Result<Option<ParamSpec>> {
    let mut spec = None;
    let mut kept = Vec::with_capacity(arg.attrs.len());
    for attr in arg.attrs.drain(..) {
        if !attr.path().is_ident("param") {
            kept.push(attr);
            continue;
        }
        if spec.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate #[param(..)] attribute"));
        }
        spec = Some(attr.parse_args::<ParamSpec>()?);
    }
    arg.attrs = kept;
    Ok(spec)
}

/// Stringified pointee type, used as the collaborator's type tag.
pub(crate) fn type_tag(ty: &Type) -> LitStr {
    let pointee = match ty {
        Type::Reference(r) => &*r.elem,
        Type::Ptr(p) => &*p.elem,
        other => other,
    };
    let tag: String = pointee
        .to_token_stream()
        .to_string()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    LitStr::new(&tag, Span::call_site())
}

fn primitive_name(ty: &Type) -> Option<String> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let last = path.path.segments.last()?;
    if !last.arguments.is_empty() {
        return None;
    }
    Some(last.ident.to_string())
}

fn last_ident_is(ty: &Type, name: &str) -> bool {
    primitive_name(ty).is_some_and(|ident| ident == name)
}

fn is_string_like(ty: &Type) -> bool {
    matches!(
        primitive_name(ty).as_deref(),
        Some("str" | "String" | "CStr" | "CString")
    )
}

/// `&mut T` or `&mut [T]`, the references a configured value can be written
/// through.
fn is_output_reference(ty: &Type) -> bool {
    let Type::Reference(r) = ty else {
        return false;
    };
    r.mutability.is_some()
        && !matches!(&*r.elem, Type::TraitObject(_) | Type::ImplTrait(_))
        && !last_ident_is(&r.elem, "str")
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn kind_of(ty: Type) -> Option<ParamKind> {
        ParamKind::infer(&ty)
    }

    #[test]
    fn test_infer_param_kind_when_primitive_should_map_to_accessor_family() {
        assert_eq!(kind_of(parse_quote!(bool)), Some(ParamKind::Bool));
        assert_eq!(kind_of(parse_quote!(i16)), Some(ParamKind::Int));
        assert_eq!(kind_of(parse_quote!(u32)), Some(ParamKind::UInt));
        assert_eq!(kind_of(parse_quote!(isize)), Some(ParamKind::Long));
        assert_eq!(kind_of(parse_quote!(u64)), Some(ParamKind::ULong));
        assert_eq!(kind_of(parse_quote!(f32)), Some(ParamKind::Double));
    }

    #[test]
    fn test_infer_param_kind_when_pointer_like_should_pick_pointer_kinds() {
        assert_eq!(kind_of(parse_quote!(&str)), Some(ParamKind::String));
        assert_eq!(kind_of(parse_quote!(String)), Some(ParamKind::String));
        assert_eq!(
            kind_of(parse_quote!(*const std::ffi::c_char)),
            Some(ParamKind::String)
        );
        assert_eq!(kind_of(parse_quote!(&Point)), Some(ParamKind::InPtr));
        assert_eq!(kind_of(parse_quote!(*mut u8)), Some(ParamKind::InPtr));
        assert_eq!(kind_of(parse_quote!(&mut String)), Some(ParamKind::OutPtr));
        assert_eq!(kind_of(parse_quote!(&mut [u8])), Some(ParamKind::OutPtr));
    }

    #[test]
    fn test_infer_param_kind_when_mut_pointee_cannot_receive_output_should_return_none() {
        assert_eq!(kind_of(parse_quote!(&mut str)), None);
        assert_eq!(kind_of(parse_quote!(&mut dyn std::io::Write)), None);
    }

    #[test]
    fn test_infer_param_kind_when_unknown_type_should_return_none() {
        assert_eq!(kind_of(parse_quote!(Vec<u8>)), None);
        assert_eq!(kind_of(parse_quote!(Point)), None);
        assert_eq!(kind_of(parse_quote!((i32, i32))), None);
    }

    #[test]
    fn test_from_arg_when_annotated_should_use_attribute_and_strip_it() {
        let mut arg: FnArg = parse_quote!(#[param(ignore)] #[allow(unused)] token: Token);
        let descriptor = ParamDescriptor::from_arg(0, &mut arg).unwrap();

        assert_eq!(descriptor.kind, ParamKind::Ignore);
        assert_eq!(descriptor.name, "token");
        let FnArg::Typed(arg) = arg else {
            panic!("expected typed argument");
        };
        assert_eq!(arg.attrs.len(), 1);
        assert!(arg.attrs[0].path().is_ident("allow"));
    }

    #[test]
    fn test_from_arg_when_custom_should_keep_tokens_verbatim() {
        let mut arg: FnArg =
            parse_quote!(#[param(custom(call.with_int_parameter("len", v.len() as i32);))] v: Vec<u8>);
        let descriptor = ParamDescriptor::from_arg(0, &mut arg).unwrap();

        assert_eq!(descriptor.kind, ParamKind::Custom);
        assert_eq!(
            descriptor.statement().to_string(),
            quote!(call.with_int_parameter("len", v.len() as i32);).to_string()
        );
    }

    #[test]
    fn test_from_arg_when_pattern_is_not_ident_should_synthesize_name() {
        let mut arg: FnArg = parse_quote!(_: i32);
        let descriptor = ParamDescriptor::from_arg(3, &mut arg).unwrap();

        assert_eq!(descriptor.name, "arg3");
    }

    #[test]
    fn test_from_arg_when_void_attribute_should_be_rejected() {
        let mut arg: FnArg = parse_quote!(#[param(void)] x: ());
        let err = ParamDescriptor::from_arg(0, &mut arg).err().unwrap();

        assert!(err.to_string().contains("without parameters"));
    }

    #[test]
    fn test_from_arg_when_reserved_name_should_be_rejected() {
        let mut arg: FnArg = parse_quote!(call: i32);
        let err = ParamDescriptor::from_arg(0, &mut arg).err().unwrap();

        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn test_from_arg_when_output_is_raw_pointer_should_be_rejected() {
        let mut arg: FnArg = parse_quote!(#[param(out_ptr)] out: *mut i32);
        assert!(ParamDescriptor::from_arg(0, &mut arg).is_err());
    }

    #[test]
    fn test_from_arg_when_output_is_str_or_dyn_should_be_rejected() {
        let mut arg: FnArg = parse_quote!(#[param(out_ptr)] text: &mut str);
        assert!(ParamDescriptor::from_arg(0, &mut arg).is_err());

        let mut arg: FnArg = parse_quote!(#[param(out_type_ptr)] sink: &mut dyn Sink);
        assert!(ParamDescriptor::from_arg(0, &mut arg).is_err());
    }

    #[test]
    fn test_from_arg_when_mut_str_unannotated_should_ask_for_annotation() {
        let mut arg: FnArg = parse_quote!(text: &mut str);
        let err = ParamDescriptor::from_arg(0, &mut arg).err().unwrap();

        assert!(err.to_string().contains("#[param(kind)]"));
    }

    #[test]
    fn test_from_arg_when_uninferable_should_ask_for_annotation() {
        let mut arg: FnArg = parse_quote!(items: Vec<u8>);
        let err = ParamDescriptor::from_arg(0, &mut arg).err().unwrap();

        assert!(err.to_string().contains("#[param(kind)]"));
    }

    #[test]
    fn test_statement_when_typed_pointer_should_carry_pointee_tag() {
        let descriptor = ParamDescriptor::new(
            ParamKind::OutTypePtr,
            parse_quote!(&mut geo::Point),
            parse_quote!(target),
        );

        assert_eq!(
            descriptor.statement().to_string(),
            quote!(call.with_output_parameter_of_type("geo::Point", "target", &mut **target);)
                .to_string()
        );
    }

    #[test]
    fn test_statement_when_ignored_should_be_empty() {
        let descriptor = ParamDescriptor::new(ParamKind::Ignore, parse_quote!(i32), parse_quote!(x));
        assert!(descriptor.statement().is_empty());
    }

    #[test]
    fn test_return_kind_infer_when_unit_should_be_void() {
        assert_eq!(ReturnKind::infer(&parse_quote!()), Some(ReturnKind::Void));
        assert_eq!(ReturnKind::infer(&parse_quote!(-> ())), Some(ReturnKind::Void));
        assert_eq!(ReturnKind::infer(&parse_quote!(-> f64)), Some(ReturnKind::Double));
        assert_eq!(
            ReturnKind::infer(&parse_quote!(-> *const u8)),
            Some(ReturnKind::Ptr)
        );
        assert_eq!(ReturnKind::infer(&parse_quote!(-> Option<u8>)), None);
    }

    #[test]
    fn test_return_accessor_when_int_should_cast_to_declared_type() {
        let descriptor = ReturnDescriptor::from_output(&parse_quote!(-> i16), None).unwrap();

        assert_eq!(
            descriptor.accessor().to_string(),
            quote!(call.int_return_value() as i16).to_string()
        );
    }

    #[test]
    fn test_return_spec_when_custom_should_keep_expression() {
        let spec: ReturnSpec = syn::parse_quote!(custom(Point::default()));
        let descriptor = ReturnDescriptor::from_output(&parse_quote!(-> Point), Some(spec)).unwrap();

        assert_eq!(descriptor.kind, ReturnKind::Custom);
        assert_eq!(
            descriptor.accessor().to_string(),
            quote!(Point::default()).to_string()
        );
    }

    #[test]
    fn test_return_descriptor_when_uninferable_should_fail() {
        assert!(ReturnDescriptor::from_output(&parse_quote!(-> Vec<u8>), None).is_err());
    }
}
