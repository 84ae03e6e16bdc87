// Attribute parsing for #[expose] and #[bridge(...)]

use syn::{Attribute, LitStr, Result};

/// Arguments of `#[expose(...)]`
#[derive(Default)]
pub struct ExposeArgs {
    /// Override for the reported runtime type name
    pub type_name: Option<LitStr>,
}

impl ExposeArgs {
    pub fn parse_meta(&mut self, meta: syn::meta::ParseNestedMeta) -> Result<()> {
        if meta.path.is_ident("type_name") {
            self.type_name = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported #[expose] argument, expected `type_name = \"...\"`"))
        }
    }
}

/// Role a method plays in the member table
pub enum Role {
    Method,
    Getter(LitStr),
    Setter(LitStr),
}

/// Parsed `#[bridge(...)]` attributes of one method
pub struct MemberAttrs {
    pub name: Option<LitStr>,
    pub role: Role,
    pub special: bool,
    pub skip: bool,
    /// Whether any #[bridge] attribute was present
    pub explicit: bool,
}

impl MemberAttrs {
    /// Parse and strip every `#[bridge(...)]` attribute from `attrs`
    pub fn take(attrs: &mut Vec<Attribute>) -> Result<Self> {
        let mut parsed = MemberAttrs {
            name: None,
            role: Role::Method,
            special: false,
            skip: false,
            explicit: false,
        };

        let mut kept = Vec::with_capacity(attrs.len());
        for attr in attrs.drain(..) {
            if !attr.path().is_ident("bridge") {
                kept.push(attr);
                continue;
            }
            parsed.explicit = true;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    parsed.name = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("getter") {
                    parsed.role = Role::Getter(meta.value()?.parse()?);
                } else if meta.path.is_ident("setter") {
                    parsed.role = Role::Setter(meta.value()?.parse()?);
                } else if meta.path.is_ident("special") {
                    parsed.special = true;
                } else if meta.path.is_ident("skip") {
                    parsed.skip = true;
                } else {
                    return Err(meta.error(
                        "unsupported #[bridge] argument, expected one of: name, getter, setter, special, skip",
                    ));
                }
                Ok(())
            })?;
        }
        *attrs = kept;

        if parsed.name.is_some() && !matches!(parsed.role, Role::Method) {
            return Err(syn::Error::new_spanned(
                parsed.name.as_ref(),
                "`name` cannot be combined with `getter` or `setter`; the accessor names the property",
            ));
        }

        Ok(parsed)
    }
}
