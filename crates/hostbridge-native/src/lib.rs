// hostbridge-native: derive the member table of a host type
//
// Provides one proc-macro:
// - #[expose] - Implements `hostbridge_sdk::Exposed` for an inherent impl block
//
// Example:
// ```
// use hostbridge_native::expose;
//
// struct Calculator;
//
// #[expose]
// impl Calculator {
//     #[bridge(name = "Add")]
//     pub fn add(&self, a: i32, b: i32) -> i32 {
//         a + b
//     }
// }
// ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, ItemImpl};

mod attrs;
mod expose;
mod traits;

/// Exposes the public `&self` methods of an impl block to the hosted runtime.
///
/// Generates an `Exposed` implementation whose member table:
/// - Converts bridge arguments to Rust types (FromBridge)
/// - Converts the return value to a bridge value (ToBridge)
/// - Propagates `Err` returns unchanged (via `Into<BridgeError>`)
/// - Catches panics and reports them as `BridgeError::Panic`
///
/// Members are tuned with `#[bridge(...)]`:
/// - `name = "X"` - exposed name of a method (defaults to the fn name)
/// - `getter = "X"` / `setter = "X"` - accessor of property `X`
/// - `special` - declared but never exposed
/// - `skip` - not declared at all
///
/// # Example
///
/// ```ignore
/// #[expose(type_name = "Counter")]
/// impl Counter {
///     #[bridge(getter = "Count")]
///     pub fn count(&self) -> i32 { self.count.load(Ordering::SeqCst) }
///
///     #[bridge(setter = "Count")]
///     pub fn set_count(&self, value: i32) { self.count.store(value, Ordering::SeqCst) }
/// }
/// ```
#[proc_macro_attribute]
pub fn expose(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut args = attrs::ExposeArgs::default();
    let parser = syn::meta::parser(|meta| args.parse_meta(meta));
    parse_macro_input!(attr with parser);
    let input = parse_macro_input!(item as ItemImpl);
    expose::expand_expose(args, input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
