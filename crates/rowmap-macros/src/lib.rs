extern crate proc_macro;

use proc_macro::TokenStream;

/// Derives `Typed`, `Reflect`, `Field` and `Bean` for a struct with named
/// fields.
///
/// The struct must also implement `Debug`, `Clone`, `PartialEq` and, to be
/// instantiated by result maps, `Default`.
///
/// ```ignore
/// #[derive(Debug, Default, Clone, PartialEq, rowmap::Bean)]
/// #[bean(name = "Post")]
/// struct PostRow {
///     id: i64,
///
///     #[bean(rename = "headline")]
///     title: String,
///
///     #[bean(flatten)]
///     audit: Audit,
///
///     #[bean(readonly)]
///     version: i32,
///
///     #[bean(skip)]
///     dirty: bool,
/// }
/// ```
#[proc_macro_derive(Bean, attributes(bean))]
pub fn derive_bean(input: TokenStream) -> TokenStream {
    match rowmap_codegen::generate(input.into()) {
        Ok(output) => output.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
