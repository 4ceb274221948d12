//! Getters and setters addressed by property paths.
//!
//! Two strategies produce accessors with the same observable behavior:
//!
//! * [`AccessorStrategy::Reflective`] re-walks the path by name on every
//!   call. Name lookups are memoized per bean descriptor.
//! * [`AccessorStrategy::Compiled`] resolves the path once and composes a
//!   chain of closures that follow precomputed slot routes.
//!
//! Accessors are cached process-wide per strategy, root type, path and kind.

mod cache;
use cache::Key;

mod compiled;
use compiled::{CompiledGetter, CompiledSetter};

mod parameter;
pub use parameter::ParameterGetter;

mod reflective;
use reflective::{ReflectiveGetter, ReflectiveSetter};

mod walk;

use rowmap_core::{
    resolve::{HopKind, Walk},
    BeanDescriptor, Error, PropertyPath, Reflect, Result, Type, Typed, Value,
};

use std::{fmt, sync::Arc};

/// How accessors navigate object graphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AccessorStrategy {
    /// Look every step up by name at call time.
    Reflective,

    /// Resolve the path once and replay the resolved slots.
    #[default]
    Compiled,
}

/// Reads the value at a property path.
pub trait Getter: fmt::Debug + Send + Sync {
    /// Reads the value addressed by the path, starting at `root`.
    ///
    /// A null final value is returned as [`Value::Null`]; a null
    /// intermediate value fails with a null-navigation error.
    fn get(&self, root: &dyn Reflect) -> Result<Value>;

    /// Declared type of the addressed property.
    fn ty(&self) -> &Type;

    fn path(&self) -> &PropertyPath;
}

/// Writes the value at a property path.
pub trait Setter: fmt::Debug + Send + Sync {
    fn set(&self, root: &mut dyn Reflect, value: Value) -> Result<()>;

    fn ty(&self) -> &Type;

    fn path(&self) -> &PropertyPath;
}

/// Entry point for building cached accessors with one strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accessors {
    strategy: AccessorStrategy,
}

impl Accessors {
    pub fn new(strategy: AccessorStrategy) -> Accessors {
        Accessors { strategy }
    }

    pub fn strategy(&self) -> AccessorStrategy {
        self.strategy
    }

    /// Returns the getter for `path` on `root`, building it on first use.
    pub fn getter(&self, root: &Type, path: &str) -> Result<Arc<dyn Getter>> {
        cache::GETTERS.get_or_try_insert_with(Key::new(self.strategy, root, path), || {
            self.build_getter(root, PropertyPath::parse(path)?)
        })
    }

    /// Like [`Accessors::getter`], for a root known at compile time.
    pub fn getter_of<T: Typed>(&self, path: &str) -> Result<Arc<dyn Getter>> {
        self.getter(&T::ty(), path)
    }

    /// Returns the setter for `path` on `root`, building it on first use.
    pub fn setter(&self, root: &Type, path: &str) -> Result<Arc<dyn Setter>> {
        cache::SETTERS.get_or_try_insert_with(Key::new(self.strategy, root, path), || {
            self.build_setter(root, PropertyPath::parse(path)?)
        })
    }

    pub fn setter_of<T: Typed>(&self, path: &str) -> Result<Arc<dyn Setter>> {
        self.setter(&T::ty(), path)
    }

    /// Returns the getter for a parameter path such as `2.article.subject`
    /// over arguments of the given types.
    pub fn parameter(&self, params: &[Type], path: &str) -> Result<Arc<ParameterGetter>> {
        cache::PARAMETERS.get_or_try_insert_with(
            Key::parameters(self.strategy, params, path),
            || {
                ParameterGetter::new(self, params, PropertyPath::parse(path)?).map(Arc::new)
            },
        )
    }

    pub(crate) fn build_getter(&self, root: &Type, path: PropertyPath) -> Result<Arc<dyn Getter>> {
        tracing::debug!(strategy = ?self.strategy, %root, %path, "building getter");

        Ok(match self.strategy {
            AccessorStrategy::Reflective => Arc::new(ReflectiveGetter::new(root, path)?),
            AccessorStrategy::Compiled => Arc::new(CompiledGetter::new(root, path)?),
        })
    }

    fn build_setter(&self, root: &Type, path: PropertyPath) -> Result<Arc<dyn Setter>> {
        tracing::debug!(strategy = ?self.strategy, %root, %path, "building setter");

        Ok(match self.strategy {
            AccessorStrategy::Reflective => Arc::new(ReflectiveSetter::new(root, path)?),
            AccessorStrategy::Compiled => Arc::new(CompiledSetter::new(root, path)?),
        })
    }
}

/// Rejects setters whose final step is a read-only property.
fn check_writable(walk: &Walk, path: &PropertyPath) -> Result<()> {
    match walk.hops.last() {
        Some(hop) => match &hop.kind {
            HopKind::Property(property) if !property.writable => Err(Error::introspection(format!(
                "property `{}` of `{}` is read-only (path `{path}`)",
                property.name, hop.owner
            ))),
            _ => Ok(()),
        },
        None => Ok(()),
    }
}

/// Descriptor a live root must have, when the root type is a bean.
fn expected(root: &Type) -> Option<&'static BeanDescriptor> {
    root.strip_option().as_bean().map(|bean| bean.descriptor())
}

fn check_root(
    expected: Option<&'static BeanDescriptor>,
    root_ty: &Type,
    node: &dyn Reflect,
) -> Result<()> {
    let Some(expected) = expected else {
        return Ok(());
    };

    match node.as_bean() {
        Some(bean) if std::ptr::eq(bean.descriptor(), expected) => Ok(()),
        _ => Err(Error::introspection(format!(
            "accessor built for `{root_ty}` applied to `{}`",
            node.reflect_ty()
        ))),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use pretty_assertions::assert_eq;

    const STRATEGIES: [AccessorStrategy; 2] =
        [AccessorStrategy::Reflective, AccessorStrategy::Compiled];

    fn get(strategy: AccessorStrategy, root: &Publication, path: &str) -> Result<Value> {
        Accessors::new(strategy)
            .getter_of::<Publication>(path)?
            .get(root)
    }

    fn set(strategy: AccessorStrategy, root: &mut Publication, path: &str, value: Value) -> Result<()> {
        Accessors::new(strategy)
            .setter_of::<Publication>(path)?
            .set(root, value)
    }

    #[test]
    fn strategies_read_the_same_values() {
        let root = publication();

        for path in [
            "id",
            "article.subject",
            "article.tags[1]",
            "article.scores[0]",
            "articles[0].subject",
            "created_by",
            "extra.subject",
            "article",
        ] {
            let reflective = get(AccessorStrategy::Reflective, &root, path).unwrap();
            let compiled = get(AccessorStrategy::Compiled, &root, path).unwrap();
            assert_eq!(reflective, compiled, "path `{path}`");
        }

        assert_eq!(
            get(AccessorStrategy::Compiled, &root, "article.tags[1]").unwrap(),
            Value::from("systems")
        );
        assert_eq!(
            get(AccessorStrategy::Reflective, &root, "article.scores[1]").unwrap(),
            Value::I32(5)
        );
    }

    #[test]
    fn null_navigation_is_reported_identically() {
        let mut root = publication();
        root.article = None;
        root.audit = None;

        for path in ["article.subject", "created_by"] {
            let messages: Vec<_> = STRATEGIES
                .iter()
                .map(|strategy| get(*strategy, &root, path).unwrap_err())
                .inspect(|err| assert!(err.is_null_navigation()))
                .map(|err| err.to_string())
                .collect();

            assert_eq!(messages[0], messages[1], "path `{path}`");
        }

        let err = get(AccessorStrategy::Compiled, &root, "article.subject").unwrap_err();
        assert_eq!(err.null_navigation_prefix(), Some("article"));
        assert_eq!(err.null_navigation_declaring_type(), Some("Publication"));
    }

    #[test]
    fn null_final_value_is_returned() {
        let mut root = publication();
        root.article = None;

        for strategy in STRATEGIES {
            assert_eq!(get(strategy, &root, "article").unwrap(), Value::Null);
        }
    }

    #[test]
    fn index_past_the_end() {
        let root = publication();

        for strategy in STRATEGIES {
            let err = get(strategy, &root, "articles[3].subject").unwrap_err();
            assert!(err.is_index_out_of_bounds());
            assert_eq!(
                err.to_string(),
                "index 3 out of bounds at `articles[3]` (length 1)"
            );
        }
    }

    #[test]
    fn written_values_read_back() {
        for strategy in STRATEGIES {
            let mut root = publication();

            set(strategy, &mut root, "article.subject", "Zig".into()).unwrap();
            set(strategy, &mut root, "article.scores[1]", Value::I64(9)).unwrap();
            set(strategy, &mut root, "created_by", "bo".into()).unwrap();
            set(strategy, &mut root, "id", Value::I32(11)).unwrap();

            assert_eq!(get(strategy, &root, "article.subject").unwrap(), Value::from("Zig"));
            assert_eq!(get(strategy, &root, "article.scores[1]").unwrap(), Value::I32(9));
            assert_eq!(root.audit.as_ref().unwrap().created_by, "bo");
            assert_eq!(root.id, 11);
        }
    }

    #[test]
    fn setter_through_null_fails() {
        for strategy in STRATEGIES {
            let mut root = publication();
            root.article = None;

            let err = set(strategy, &mut root, "article.subject", "x".into()).unwrap_err();
            assert!(err.is_null_navigation());
            assert_eq!(err.null_navigation_prefix(), Some("article"));
        }
    }

    #[test]
    fn readonly_properties_have_no_setter() {
        for strategy in STRATEGIES {
            let err = Accessors::new(strategy)
                .setter_of::<Publication>("version")
                .unwrap_err();
            assert!(err.is_introspection());
        }
    }

    #[test]
    fn conversion_failures_surface() {
        let mut root = publication();
        let err = set(AccessorStrategy::Compiled, &mut root, "id", "seven".into()).unwrap_err();
        assert!(err.is_type_conversion());
    }

    #[test]
    fn accessors_are_cached_per_key() {
        let accessors = Accessors::new(AccessorStrategy::Compiled);
        let a = accessors.getter_of::<Publication>("article.subject").unwrap();
        let b = accessors.getter_of::<Publication>("article.subject").unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let other = Accessors::new(AccessorStrategy::Reflective)
            .getter_of::<Publication>("article.subject")
            .unwrap();
        assert!(!Arc::ptr_eq(&a, &other));
        assert_eq!(a.ty(), &Type::String);
    }

    #[test]
    fn accessors_reject_other_roots() {
        // `Audit` has a `created_by` property too; only the root type differs.
        let mut audit = Audit {
            created_by: "ana".into(),
        };

        for strategy in STRATEGIES {
            let accessors = Accessors::new(strategy);

            let err = accessors
                .getter_of::<Publication>("created_by")
                .unwrap()
                .get(&audit)
                .unwrap_err();
            assert!(err.is_introspection(), "{strategy:?}: {err}");
            assert_eq!(
                err.to_string(),
                "introspection failed: accessor built for `Publication` applied to `Audit`"
            );

            let err = accessors
                .setter_of::<Publication>("created_by")
                .unwrap()
                .set(&mut audit, Value::from("bo"))
                .unwrap_err();
            assert!(err.is_introspection(), "{strategy:?}: {err}");
        }

        assert_eq!(audit.created_by, "ana");
    }
}
