use std::fmt::Display;

/// Errors found while reading a bean definition, reported together.
#[derive(Debug, Default)]
pub(crate) struct ErrorSet(Vec<syn::Error>);

impl ErrorSet {
    pub(crate) fn push(&mut self, err: syn::Error) {
        self.0.push(err);
    }

    pub(crate) fn spanned(&mut self, tokens: impl quote::ToTokens, message: impl Display) {
        self.push(syn::Error::new_spanned(tokens, message));
    }

    /// Fails with every recorded error combined, in the order found.
    pub(crate) fn check(self) -> syn::Result<()> {
        match self.0.into_iter().reduce(|mut all, err| {
            all.combine(err);
            all
        }) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
