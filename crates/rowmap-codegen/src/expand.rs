mod bean;
mod reflect;
mod ty;

use crate::schema::Bean;

use proc_macro2::TokenStream;
use quote::quote;

struct Expand<'a> {
    /// The bean being expanded
    bean: &'a Bean,

    /// Generics of every generated impl, with `Field` bounds on each type
    /// parameter
    generics: syn::Generics,

    /// Path prefix for rowmap types
    rowmap: TokenStream,
}

impl Expand<'_> {
    fn expand(&self) -> syn::Result<TokenStream> {
        let typed_impl = self.expand_typed_impl();
        let reflect_impl = self.expand_reflect_impl();
        let field_impl = self.expand_field_impl();
        let bean_impl = self.expand_bean_impl()?;

        Ok(wrap_in_const(quote! {
            #typed_impl
            #reflect_impl
            #field_impl
            #bean_impl
        }))
    }
}

pub(super) fn bean(bean: &Bean) -> syn::Result<TokenStream> {
    let rowmap = quote!(_rowmap::codegen_support);

    let mut generics = bean.generics.clone();
    let where_clause = generics.make_where_clause();

    for param in &bean.params {
        where_clause.predicates.push(syn::parse_quote! {
            #param: #rowmap::Field + ::std::clone::Clone + ::std::cmp::PartialEq
        });
    }

    Expand {
        bean,
        generics,
        rowmap,
    }
    .expand()
}

fn wrap_in_const(code: TokenStream) -> TokenStream {
    quote! {
        const _: () = {
            use rowmap as _rowmap;
            #code
        };
    }
}
