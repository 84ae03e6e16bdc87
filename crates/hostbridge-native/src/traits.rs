// Code generation helpers for marshalling between bridge values and Rust
//
// Arguments go through FromBridge, results through ToBridge. Host panics are
// caught at the invoker boundary.

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::{GenericArgument, PathArguments, Type};

/// Result types whose `Err` converts into `BridgeError`
const RESULT_TYPES: &[&str] = &["Result", "BridgeResult"];

/// If `ty` is `Result<T, _>` or `BridgeResult<T>`, returns `T`.
pub fn result_ok_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if !RESULT_TYPES.iter().any(|name| segment.ident == *name) {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

/// Declared kind of a return type
pub fn kind_of(ok_ty: Option<&Type>) -> TokenStream {
    match ok_ty {
        Some(ty) => quote! { <#ty as ::hostbridge_sdk::ToBridge>::KIND },
        None => quote! { ::hostbridge_sdk::ValueKind::Unit },
    }
}

/// Generates positional argument extraction: `let __arg0 = ...;`
pub fn generate_arg_extraction(arg_types: &[&Type]) -> (Vec<Ident>, TokenStream) {
    let names: Vec<Ident> = (0..arg_types.len())
        .map(|i| format_ident!("__arg{}", i))
        .collect();
    let extractions = names.iter().zip(arg_types).enumerate().map(|(i, (name, ty))| {
        quote! {
            let #name = <#ty as ::hostbridge_sdk::FromBridge>::from_bridge(&args[#i])?;
        }
    });
    let extractions = quote! { #(#extractions)* };
    (names, extractions)
}

/// Generates a panic-catching call of `call`, evaluating to its return value.
pub fn generate_panic_wrapper(member: &str, call: TokenStream) -> TokenStream {
    quote! {
        ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| #call))
            .map_err(|payload| ::hostbridge_sdk::BridgeError::Panic {
                member: #member.to_string(),
                message: ::hostbridge_sdk::panic_message(&*payload),
            })?
    }
}

/// Generates the conversion of a call result into `BridgeResult<BridgeValue>`.
pub fn generate_return_conversion(output: &syn::ReturnType, result: &Ident) -> TokenStream {
    match output {
        syn::ReturnType::Default => quote! {
            Ok(::hostbridge_sdk::BridgeValue::Null)
        },
        syn::ReturnType::Type(_, ty) => {
            if result_ok_type(ty).is_some() {
                quote! {
                    Ok(::hostbridge_sdk::ToBridge::to_bridge(
                        #result.map_err(::core::convert::Into::<::hostbridge_sdk::BridgeError>::into)?,
                    ))
                }
            } else {
                quote! {
                    Ok(::hostbridge_sdk::ToBridge::to_bridge(#result))
                }
            }
        }
    }
}

/// Declared kind of a method's or getter's return type
pub fn return_kind(output: &syn::ReturnType) -> TokenStream {
    match output {
        syn::ReturnType::Default => kind_of(None),
        syn::ReturnType::Type(_, ty) => kind_of(Some(result_ok_type(ty).unwrap_or(&**ty))),
    }
}
