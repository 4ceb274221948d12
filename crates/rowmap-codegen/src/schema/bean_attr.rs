#[derive(Debug, Default)]
pub(crate) struct BeanAttr {
    /// Descriptor name, defaulting to the struct identifier
    pub(crate) name: Option<syn::LitStr>,
}

impl BeanAttr {
    pub(super) fn from_ast(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut result = BeanAttr::default();

        for attr in attrs {
            if !attr.path().is_ident("bean") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    if result.name.is_some() {
                        return Err(meta.error("duplicate `name` attribute"));
                    }

                    result.name = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("expected `name = \"...\"`"))
                }
            })?;
        }

        Ok(result)
    }
}
