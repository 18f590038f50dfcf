use crate::members::impl_members;
use proc_macro::TokenStream;
use syn::{parse_macro_input, ItemImpl, LitStr};

mod members;

/// See `docnotes::members`.
///
/// ```rust
/// use docnotes::Members;
///
/// struct Counter(u32);
///
/// #[docnotes::members("counter")]
/// impl Counter {
///     fn increment(&mut self) {
///         self.0 += 1;
///     }
/// }
///
/// assert_eq!(Counter::SCOPE_NAME, "counter");
/// ```
#[proc_macro_attribute]
pub fn members(attr: TokenStream, item: TokenStream) -> TokenStream {
    let scope_name = if attr.is_empty() {
        None
    } else {
        Some(parse_macro_input!(attr as LitStr))
    };
    let input = parse_macro_input!(item as ItemImpl);
    impl_members(scope_name, input).into()
}
