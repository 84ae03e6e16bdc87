// #[expose] proc-macro implementation
//
// Generates the `Exposed` implementation (the member table) for an inherent
// impl block.

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::{FnArg, ImplItem, ImplItemFn, ItemImpl, LitStr, Result, Type, Visibility};

use crate::attrs::{ExposeArgs, MemberAttrs, Role};
use crate::traits::{
    generate_arg_extraction, generate_panic_wrapper, generate_return_conversion, result_ok_type,
    return_kind,
};

/// Accessor pair collected for one property
struct PropertyParts {
    name: LitStr,
    getter: Option<ImplItemFn>,
    setter: Option<ImplItemFn>,
    special: bool,
}

/// Expands the #[expose] attribute macro.
///
/// Example expansion:
/// ```ignore
/// // Input:
/// #[expose]
/// impl Calculator {
///     #[bridge(name = "Add")]
///     pub fn add(&self, a: i32, b: i32) -> i32 { a + b }
/// }
///
/// // Output: the impl block (without #[bridge] attributes), plus
/// impl ::hostbridge_sdk::Exposed for Calculator {
///     fn type_name(&self) -> &'static str { "Calculator" }
///     fn members(&self) -> ::hostbridge_sdk::MemberTable {
///         ::hostbridge_sdk::MemberTable::new()
///             .method("Add", <i32 as ::hostbridge_sdk::ToBridge>::KIND, |this: &Self, args| { ... })
///     }
///     // as_any / into_any
/// }
/// ```
pub fn expand_expose(args: ExposeArgs, mut input: ItemImpl) -> Result<TokenStream> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[expose] must be applied to an inherent impl block",
        ));
    }
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[expose] does not support generic impl blocks",
        ));
    }

    let self_ty = input.self_ty.clone();
    let type_name = match args.type_name {
        Some(name) => name,
        None => default_type_name(&self_ty)?,
    };

    let mut methods = Vec::new();
    let mut properties: Vec<PropertyParts> = Vec::new();

    for item in &mut input.items {
        let ImplItem::Fn(func) = item else {
            continue;
        };
        let attrs = MemberAttrs::take(&mut func.attrs)?;
        if attrs.skip || !is_exposable(func, attrs.explicit)? {
            continue;
        }

        let is_getter = matches!(attrs.role, Role::Getter(_));
        match attrs.role {
            Role::Method => {
                let name = attrs
                    .name
                    .unwrap_or_else(|| LitStr::new(&func.sig.ident.to_string(), func.sig.ident.span()));
                methods.push(expand_method(func, &name, attrs.special)?);
            }
            Role::Getter(name) | Role::Setter(name) => {
                check_accessor_shape(func, is_getter)?;
                let index = match properties.iter().position(|p| p.name.value() == name.value()) {
                    Some(index) => index,
                    None => {
                        properties.push(PropertyParts {
                            name: name.clone(),
                            getter: None,
                            setter: None,
                            special: false,
                        });
                        properties.len() - 1
                    }
                };
                let parts = &mut properties[index];
                parts.special |= attrs.special;
                let slot = if is_getter { &mut parts.getter } else { &mut parts.setter };
                if slot.is_some() {
                    return Err(syn::Error::new_spanned(
                        &func.sig.ident,
                        format!("duplicate accessor for property `{}`", name.value()),
                    ));
                }
                *slot = Some(func.clone());
            }
        }
    }

    let properties = properties
        .into_iter()
        .map(expand_property)
        .collect::<Result<Vec<_>>>()?;

    Ok(quote! {
        #input

        impl ::hostbridge_sdk::Exposed for #self_ty {
            fn type_name(&self) -> &'static str {
                #type_name
            }

            fn members(&self) -> ::hostbridge_sdk::MemberTable {
                ::hostbridge_sdk::MemberTable::new()
                    #(#methods)*
                    #(#properties)*
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn into_any(
                self: ::std::sync::Arc<Self>,
            ) -> ::std::sync::Arc<dyn ::std::any::Any + ::std::marker::Send + ::std::marker::Sync> {
                self
            }
        }
    })
}

fn default_type_name(self_ty: &Type) -> Result<LitStr> {
    if let Type::Path(type_path) = self_ty {
        if let Some(segment) = type_path.path.segments.last() {
            return Ok(LitStr::new(&segment.ident.to_string(), Span::call_site()));
        }
    }
    Err(syn::Error::new_spanned(
        self_ty,
        "cannot derive a type name, use #[expose(type_name = \"...\")]",
    ))
}

/// Public `&self` functions are exposed. Anything else is skipped, unless it
/// carries a #[bridge] attribute, which makes the mismatch an error.
fn is_exposable(func: &ImplItemFn, explicit: bool) -> Result<bool> {
    let reject = |msg: &str| -> Result<bool> {
        if explicit {
            Err(syn::Error::new_spanned(&func.sig, msg))
        } else {
            Ok(false)
        }
    };

    if !matches!(func.vis, Visibility::Public(_)) {
        return reject("exposed members must be `pub`");
    }
    match func.sig.inputs.first() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => return reject("exposed members must take `&self`"),
    }
    if func.sig.asyncness.is_some() {
        return reject("async functions cannot be exposed");
    }
    if !func.sig.generics.params.is_empty() {
        return reject("generic functions cannot be exposed");
    }
    Ok(true)
}

/// Getters are `fn(&self) -> R`, setters `fn(&self, value: A)`
fn check_accessor_shape(func: &ImplItemFn, is_getter: bool) -> Result<()> {
    let values = typed_args(func).len();
    if is_getter {
        if values != 0 {
            return Err(syn::Error::new_spanned(
                &func.sig,
                "property getters must take no arguments besides `&self`",
            ));
        }
        if matches!(func.sig.output, syn::ReturnType::Default) {
            return Err(syn::Error::new_spanned(
                &func.sig,
                "property getters must return a value",
            ));
        }
    } else if values != 1 {
        return Err(syn::Error::new_spanned(
            &func.sig,
            "property setters must take exactly one value",
        ));
    }
    Ok(())
}

fn typed_args(func: &ImplItemFn) -> Vec<&Type> {
    func.sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat_type) => Some(&*pat_type.ty),
            FnArg::Receiver(_) => None,
        })
        .collect()
}

fn expand_method(func: &ImplItemFn, name: &LitStr, special: bool) -> Result<TokenStream> {
    let ident = &func.sig.ident;
    let arg_types = typed_args(func);
    let arg_count = arg_types.len();
    let (arg_names, arg_extractions) = generate_arg_extraction(&arg_types);

    let result = format_ident!("__result");
    let call = generate_panic_wrapper(&name.value(), quote! { this.#ident(#(#arg_names),*) });
    let conversion = generate_return_conversion(&func.sig.output, &result);
    let kind = return_kind(&func.sig.output);
    let special = special.then(|| quote! { .special() });

    Ok(quote! {
        .method(
            #name,
            #kind,
            |this: &Self, args: &[::hostbridge_sdk::BridgeValue]|
                -> ::hostbridge_sdk::BridgeResult<::hostbridge_sdk::BridgeValue> {
                ::hostbridge_sdk::expect_args(#name, args, #arg_count)?;
                #arg_extractions
                let #result = #call;
                #conversion
            },
        )
        #special
    })
}

fn expand_property(parts: PropertyParts) -> Result<TokenStream> {
    let name = &parts.name;
    let Some(getter) = &parts.getter else {
        return Err(syn::Error::new_spanned(
            name,
            format!("property `{}` has a setter but no getter", name.value()),
        ));
    };

    let get_ident = &getter.sig.ident;
    let result = format_ident!("__result");
    let get_call = generate_panic_wrapper(&name.value(), quote! { this.#get_ident() });
    let get_conversion = generate_return_conversion(&getter.sig.output, &result);
    let kind = return_kind(&getter.sig.output);
    let get_closure = quote! {
        |this: &Self| -> ::hostbridge_sdk::BridgeResult<::hostbridge_sdk::BridgeValue> {
            let #result = #get_call;
            #get_conversion
        }
    };
    let special = parts.special.then(|| quote! { .special() });

    let Some(setter) = &parts.setter else {
        return Ok(quote! {
            .property(#name, #kind, #get_closure)
            #special
        });
    };

    let set_ident = &setter.sig.ident;
    let set_args = typed_args(setter);
    let [value_ty] = set_args.as_slice() else {
        return Err(syn::Error::new_spanned(
            &setter.sig,
            "property setters must take exactly one value",
        ));
    };
    let set_call = generate_panic_wrapper(&name.value(), quote! { this.#set_ident(__value) });
    let set_conversion = match &setter.sig.output {
        syn::ReturnType::Type(_, ty) if result_ok_type(ty).is_some() => quote! {
            #set_call.map_err(::core::convert::Into::<::hostbridge_sdk::BridgeError>::into)?;
            Ok(())
        },
        _ => quote! {
            #set_call;
            Ok(())
        },
    };

    Ok(quote! {
        .property_mut(
            #name,
            #kind,
            #get_closure,
            |this: &Self, value: ::hostbridge_sdk::BridgeValue|
                -> ::hostbridge_sdk::BridgeResult<()> {
                let __value = <#value_ty as ::hostbridge_sdk::FromBridge>::from_bridge(&value)?;
                #set_conversion
            },
        )
        #special
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand(input: ItemImpl) -> Result<String> {
        expand_expose(ExposeArgs::default(), input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn test_setter_declared_first_is_writable() {
        let out = expand(parse_quote! {
            impl Meter {
                #[bridge(setter = "Total")]
                pub fn set_total(&self, value: i32) {}

                #[bridge(getter = "Total")]
                pub fn total(&self) -> i32 { 0 }
            }
        })
        .unwrap();
        assert!(out.contains("property_mut"));
        assert!(out.contains("this . total ()"));
        assert!(out.contains("this . set_total (__value)"));
    }

    #[test]
    fn test_zero_argument_setter_rejected() {
        let err = expand(parse_quote! {
            impl Meter {
                #[bridge(setter = "Total")]
                pub fn recompute(&self) -> i32 { 0 }
            }
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "property setters must take exactly one value");
    }

    #[test]
    fn test_getter_with_argument_rejected() {
        let err = expand(parse_quote! {
            impl Meter {
                #[bridge(getter = "Total")]
                pub fn total(&self, scale: i32) -> i32 { scale }
            }
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "property getters must take no arguments besides `&self`"
        );
    }

    #[test]
    fn test_unit_getter_rejected() {
        let err = expand(parse_quote! {
            impl Meter {
                #[bridge(getter = "Total")]
                pub fn total(&self) {}
            }
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "property getters must return a value");
    }

    #[test]
    fn test_setter_without_getter_rejected() {
        let err = expand(parse_quote! {
            impl Meter {
                #[bridge(setter = "Total")]
                pub fn set_total(&self, value: i32) {}
            }
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "property `Total` has a setter but no getter");
    }

    #[test]
    fn test_accessors_are_not_methods() {
        let out = expand(parse_quote! {
            impl Meter {
                #[bridge(getter = "Total")]
                pub fn total(&self) -> i32 { 0 }
            }
        })
        .unwrap();
        assert!(out.contains(". property (\"Total\""));
        assert!(!out.contains(". method ("));
    }
}
