use super::{BeanAttr, ErrorSet, Field};

#[derive(Debug)]
pub(crate) struct Bean {
    /// Type identifier
    pub(crate) ident: syn::Ident,

    /// Name recorded in the descriptor
    pub(crate) name: String,

    pub(crate) generics: syn::Generics,

    /// Names of the type parameters, in declaration order
    pub(crate) params: Vec<syn::Ident>,

    /// Every named field, including skipped ones
    pub(crate) fields: Vec<Field>,
}

impl Bean {
    pub(crate) fn from_ast(ast: &syn::ItemStruct) -> syn::Result<Self> {
        let syn::Fields::Named(node) = &ast.fields else {
            return Err(syn::Error::new_spanned(
                &ast.fields,
                "bean fields must be named",
            ));
        };

        let mut errs = ErrorSet::default();
        let mut params = vec![];

        for param in &ast.generics.params {
            match param {
                syn::GenericParam::Type(param) => params.push(param.ident.clone()),
                _ => errs.spanned(param, "beans may only be generic over types"),
            }
        }

        let attr = match BeanAttr::from_ast(&ast.attrs) {
            Ok(attr) => attr,
            Err(err) => {
                errs.push(err);
                BeanAttr::default()
            }
        };

        let mut fields: Vec<Field> = vec![];

        for node in &node.named {
            let field = match Field::from_ast(node) {
                Ok(field) => field,
                Err(err) => {
                    errs.push(err);
                    continue;
                }
            };

            if !field.attrs.skip {
                let duplicate = fields
                    .iter()
                    .any(|other| !other.attrs.skip && other.name == field.name);

                if duplicate {
                    errs.spanned(
                        &field.ident,
                        format!("duplicate bean property `{}`", field.name),
                    );
                }
            }

            fields.push(field);
        }

        errs.check()?;

        Ok(Bean {
            ident: ast.ident.clone(),
            name: attr
                .name
                .map(|name| name.value())
                .unwrap_or_else(|| ast.ident.to_string()),
            generics: ast.generics.clone(),
            params,
            fields,
        })
    }

    /// Fields exposed as properties, in slot order.
    pub(crate) fn properties(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| !field.attrs.skip)
    }
}
