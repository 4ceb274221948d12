use super::Expand;

use proc_macro2::TokenStream;
use quote::quote;
use syn::visit::Visit;

impl Expand<'_> {
    /// Expression building the declared `Type` of a property.
    ///
    /// Types that do not mention the bean's type parameters come from their
    /// `Typed` impl. Others are taken apart here: parameters become type
    /// variables and generic beans are referenced through their descriptor.
    pub(super) fn expand_type(&self, ty: &syn::Type) -> syn::Result<TokenStream> {
        let rowmap = &self.rowmap;

        if !self.mentions_params(ty) {
            return Ok(quote!(<#ty as #rowmap::Typed>::ty()));
        }

        let path = match ty {
            syn::Type::Paren(ty) => return self.expand_type(&ty.elem),
            syn::Type::Group(ty) => return self.expand_type(&ty.elem),
            syn::Type::Path(ty) if ty.qself.is_none() => &ty.path,
            _ => {
                return Err(syn::Error::new_spanned(
                    ty,
                    "unsupported bean property type",
                ))
            }
        };

        if let Some(ident) = path.get_ident() {
            if self.bean.params.contains(ident) {
                let name = ident.to_string();
                return Ok(quote!(#rowmap::Type::Var(#name)));
            }

            if ident == "Self" {
                return self.expand_type(&self.self_ty());
            }
        }

        let Some(segment) = path.segments.last() else {
            return Err(syn::Error::new_spanned(path, "empty type path"));
        };

        let args = match &segment.arguments {
            syn::PathArguments::AngleBracketed(args) => args
                .args
                .iter()
                .filter_map(|arg| match arg {
                    syn::GenericArgument::Type(ty) => Some(ty),
                    _ => None,
                })
                .collect::<Vec<_>>(),
            _ => vec![],
        };

        Ok(match (segment.ident.to_string().as_str(), &args[..]) {
            ("Option", [inner]) => {
                let inner = self.expand_type(inner)?;
                quote!(#rowmap::Type::option(#inner))
            }
            ("Vec", [inner]) => {
                let inner = self.expand_type(inner)?;
                quote!(#rowmap::Type::list(#inner))
            }
            ("Box", [syn::Type::Slice(slice)]) => {
                let inner = self.expand_type(&slice.elem)?;
                quote!(#rowmap::Type::array(#inner))
            }
            ("Box", [inner]) => self.expand_type(inner)?,
            (_, []) => {
                return Err(syn::Error::new_spanned(
                    ty,
                    "properties may only use type parameters directly or as type arguments",
                ))
            }
            (_, args) => {
                let mut erased = ty.clone();
                self.erase_params(&mut erased);

                let args = args
                    .iter()
                    .map(|arg| self.expand_type(arg))
                    .collect::<syn::Result<Vec<_>>>()?;

                quote! {
                    #rowmap::Type::Bean(#rowmap::BeanRef::new(
                        <#erased as #rowmap::Bean>::describe,
                        #rowmap::Vec::from([ #( #args ),* ]),
                    ))
                }
            }
        })
    }

    fn mentions_params(&self, ty: &syn::Type) -> bool {
        struct Mentions<'a> {
            params: &'a [syn::Ident],
            found: bool,
        }

        impl<'ast> Visit<'ast> for Mentions<'_> {
            fn visit_path(&mut self, path: &'ast syn::Path) {
                if let Some(first) = path.segments.first() {
                    let generic_self = first.ident == "Self" && !self.params.is_empty();

                    if generic_self || self.params.contains(&first.ident) {
                        self.found = true;
                    }
                }

                syn::visit::visit_path(self, path);
            }
        }

        let mut visitor = Mentions {
            params: &self.bean.params,
            found: false,
        };
        visitor.visit_type(ty);
        visitor.found
    }

    /// Replaces type parameters with `Value` so the type names one concrete
    /// instantiation whose descriptor can be reached.
    fn erase_params(&self, ty: &mut syn::Type) {
        let rowmap = &self.rowmap;

        match ty {
            syn::Type::Path(path) if path.qself.is_none() => {
                if let Some(ident) = path.path.get_ident() {
                    if self.bean.params.contains(ident) {
                        *ty = syn::parse_quote!(#rowmap::Value);
                        return;
                    }

                    if ident == "Self" {
                        *ty = self.self_ty();
                        self.erase_params(ty);
                        return;
                    }
                }

                for segment in path.path.segments.iter_mut() {
                    if let syn::PathArguments::AngleBracketed(args) = &mut segment.arguments {
                        for arg in args.args.iter_mut() {
                            if let syn::GenericArgument::Type(ty) = arg {
                                self.erase_params(ty);
                            }
                        }
                    }
                }
            }
            syn::Type::Slice(ty) => self.erase_params(&mut ty.elem),
            syn::Type::Array(ty) => self.erase_params(&mut ty.elem),
            syn::Type::Paren(ty) => self.erase_params(&mut ty.elem),
            syn::Type::Group(ty) => self.erase_params(&mut ty.elem),
            syn::Type::Tuple(ty) => {
                for elem in ty.elems.iter_mut() {
                    self.erase_params(elem);
                }
            }
            _ => {}
        }
    }

    fn self_ty(&self) -> syn::Type {
        let ident = &self.bean.ident;
        let params = &self.bean.params;
        syn::parse_quote!(#ident < #( #params ),* >)
    }
}
