use super::Expand;

use proc_macro2::TokenStream;
use quote::quote;

impl Expand<'_> {
    pub(super) fn expand_typed_impl(&self) -> TokenStream {
        let rowmap = &self.rowmap;
        let ident = &self.bean.ident;
        let args = self
            .bean
            .params
            .iter()
            .map(|param| quote!(<#param as #rowmap::Typed>::ty()));
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        quote! {
            impl #impl_generics #rowmap::Typed for #ident #ty_generics #where_clause {
                fn ty() -> #rowmap::Type {
                    #rowmap::Type::Bean(#rowmap::BeanRef::new(
                        <Self as #rowmap::Bean>::describe,
                        #rowmap::Vec::from([ #( #args ),* ]),
                    ))
                }
            }
        }
    }

    pub(super) fn expand_reflect_impl(&self) -> TokenStream {
        let rowmap = &self.rowmap;
        let ident = &self.bean.ident;
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        quote! {
            impl #impl_generics #rowmap::Reflect for #ident #ty_generics #where_clause {
                fn reflect_ty(&self) -> #rowmap::Type {
                    <Self as #rowmap::Typed>::ty()
                }

                fn to_value(&self) -> #rowmap::Value {
                    #rowmap::Value::bean(::std::clone::Clone::clone(self))
                }

                fn assign(&mut self, value: #rowmap::Value) -> #rowmap::Result<()> {
                    *self = value.into_bean()?;
                    Ok(())
                }

                fn resolve(&self) -> #rowmap::Option<&dyn #rowmap::Reflect> {
                    #rowmap::Option::Some(self as &dyn #rowmap::Reflect)
                }

                fn resolve_mut(&mut self) -> #rowmap::Option<&mut dyn #rowmap::Reflect> {
                    #rowmap::Option::Some(self as &mut dyn #rowmap::Reflect)
                }

                fn as_any(&self) -> &dyn #rowmap::Any {
                    self
                }

                fn as_bean(&self) -> #rowmap::Option<&dyn #rowmap::Bean> {
                    #rowmap::Option::Some(self as &dyn #rowmap::Bean)
                }

                fn as_bean_mut(&mut self) -> #rowmap::Option<&mut dyn #rowmap::Bean> {
                    #rowmap::Option::Some(self as &mut dyn #rowmap::Bean)
                }
            }
        }
    }

    pub(super) fn expand_field_impl(&self) -> TokenStream {
        let rowmap = &self.rowmap;
        let ident = &self.bean.ident;
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        quote! {
            impl #impl_generics #rowmap::Field for #ident #ty_generics #where_clause {
                fn from_value(value: #rowmap::Value) -> #rowmap::Result<Self> {
                    value.into_bean()
                }
            }
        }
    }
}
