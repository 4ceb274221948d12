use super::Expand;

use proc_macro2::TokenStream;
use quote::quote;

impl Expand<'_> {
    pub(super) fn expand_bean_impl(&self) -> syn::Result<TokenStream> {
        let rowmap = &self.rowmap;
        let ident = &self.bean.ident;
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        let descriptor = self.expand_descriptor()?;

        let mut get_arms = vec![];
        let mut get_mut_arms = vec![];

        for (slot, field) in self.bean.properties().enumerate() {
            let field = &field.ident;

            get_arms.push(quote! {
                #slot => #rowmap::Option::Some(&self.#field as &dyn #rowmap::Reflect),
            });
            get_mut_arms.push(quote! {
                #slot => #rowmap::Option::Some(&mut self.#field as &mut dyn #rowmap::Reflect),
            });
        }

        Ok(quote! {
            impl #impl_generics #rowmap::Bean for #ident #ty_generics #where_clause {
                fn describe() -> &'static #rowmap::BeanDescriptor {
                    static DESCRIPTOR: #rowmap::OnceLock<#rowmap::BeanDescriptor> =
                        #rowmap::OnceLock::new();
                    DESCRIPTOR.get_or_init(|| #descriptor)
                }

                fn descriptor(&self) -> &'static #rowmap::BeanDescriptor {
                    <Self as #rowmap::Bean>::describe()
                }

                fn property(&self, slot: usize) -> #rowmap::Option<&dyn #rowmap::Reflect> {
                    match slot {
                        #( #get_arms )*
                        _ => #rowmap::Option::None,
                    }
                }

                fn property_mut(&mut self, slot: usize) -> #rowmap::Option<&mut dyn #rowmap::Reflect> {
                    match slot {
                        #( #get_mut_arms )*
                        _ => #rowmap::Option::None,
                    }
                }

                fn clone_bean(&self) -> #rowmap::Box<dyn #rowmap::Bean> {
                    #rowmap::Box::new(::std::clone::Clone::clone(self))
                }

                fn eq_bean(&self, other: &dyn #rowmap::Bean) -> bool {
                    other.as_any().downcast_ref::<Self>() == #rowmap::Option::Some(self)
                }

                fn as_reflect(&self) -> &dyn #rowmap::Reflect {
                    self
                }

                fn as_reflect_mut(&mut self) -> &mut dyn #rowmap::Reflect {
                    self
                }

                fn into_any(self: #rowmap::Box<Self>) -> #rowmap::Box<dyn #rowmap::Any + Send> {
                    self
                }
            }
        })
    }

    /// The descriptor literal. Shared by every instantiation of a generic
    /// bean, so property types name type parameters as variables.
    fn expand_descriptor(&self) -> syn::Result<TokenStream> {
        let rowmap = &self.rowmap;
        let name = &self.bean.name;
        let params = self.bean.params.iter().map(|param| param.to_string());

        let mut properties = vec![];

        for (slot, field) in self.bean.properties().enumerate() {
            let property = &field.name;
            let ty = self.expand_type(&field.ty)?;
            let flatten = field.attrs.flatten;
            let writable = !field.attrs.readonly;

            properties.push(quote! {
                #rowmap::PropertyDescriptor {
                    name: #property,
                    slot: #slot,
                    ty: #ty,
                    flatten: #flatten,
                    writable: #writable,
                }
            });
        }

        Ok(quote! {
            #rowmap::BeanDescriptor {
                name: #name,
                params: #rowmap::Vec::from([ #( #params ),* ]),
                properties: #rowmap::Vec::from([ #( #properties ),* ]),
            }
        })
    }
}
