use super::ErrorSet;

#[derive(Debug)]
pub(crate) struct Field {
    /// Rust identifier of the field
    pub(crate) ident: syn::Ident,

    /// Property name
    pub(crate) name: String,

    /// Declared Rust type
    pub(crate) ty: syn::Type,

    pub(crate) attrs: FieldAttr,
}

#[derive(Debug, Default)]
pub(crate) struct FieldAttr {
    /// `#[bean(rename = "...")]`
    pub(crate) rename: Option<syn::LitStr>,

    /// The field is not a property
    pub(crate) skip: bool,

    /// The property has no setter
    pub(crate) readonly: bool,

    /// The field's own properties are exposed on the enclosing bean
    pub(crate) flatten: bool,
}

impl Field {
    pub(super) fn from_ast(field: &syn::Field) -> syn::Result<Self> {
        let Some(ident) = &field.ident else {
            return Err(syn::Error::new_spanned(field, "bean fields must be named"));
        };

        let mut errs = ErrorSet::default();
        let mut attrs = FieldAttr::default();

        for attr in &field.attrs {
            if !attr.path().is_ident("bean") {
                continue;
            }

            let res = attr.parse_nested_meta(|meta| {
                let flag = if meta.path.is_ident("rename") {
                    if attrs.rename.is_some() {
                        return Err(meta.error("duplicate `rename` attribute"));
                    }

                    attrs.rename = Some(meta.value()?.parse()?);
                    return Ok(());
                } else if meta.path.is_ident("skip") {
                    &mut attrs.skip
                } else if meta.path.is_ident("readonly") {
                    &mut attrs.readonly
                } else if meta.path.is_ident("flatten") {
                    &mut attrs.flatten
                } else {
                    return Err(meta.error(
                        "expected one of `rename`, `skip`, `readonly` or `flatten`",
                    ));
                };

                if *flag {
                    return Err(meta.error("duplicate attribute"));
                }

                *flag = true;
                Ok(())
            });

            if let Err(err) = res {
                errs.push(err);
            }
        }

        if attrs.skip && (attrs.rename.is_some() || attrs.readonly || attrs.flatten) {
            errs.spanned(ident, "a skipped field takes no other bean attributes");
        }

        if attrs.flatten && attrs.rename.is_some() {
            errs.spanned(
                ident,
                "a flattened field is never addressed by name and cannot be renamed",
            );
        }

        errs.check()?;

        let name = match &attrs.rename {
            Some(rename) => rename.value(),
            None => ident.to_string(),
        };

        Ok(Field {
            ident: ident.clone(),
            name,
            ty: field.ty.clone(),
            attrs,
        })
    }
}
