//! Name derivation for the hosted-runtime side

/// Derive the bridge name: the first character lower-cased, the rest untouched.
///
/// Characters without a lowercase form (digits, `_`) are left as they are.
/// A first character whose lowercase form spans several characters is kept
/// as-is.
pub fn bridge_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            let mut lower = first.to_lowercase();
            let first = match (lower.next(), lower.next()) {
                (Some(c), None) => c,
                _ => first,
            };
            let mut out = String::with_capacity(name.len());
            out.push(first);
            out.push_str(chars.as_str());
            out
        }
    }
}
