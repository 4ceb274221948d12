use super::{Field, Reflect, Typed};
use crate::{Bean, Error, Result, Type, Value};

use std::any::Any;

impl<T: Typed> Typed for Option<T> {
    fn ty() -> Type {
        Type::option(T::ty())
    }
}

impl<T: Field> Reflect for Option<T> {
    fn reflect_ty(&self) -> Type {
        <Self as Typed>::ty()
    }

    fn to_value(&self) -> Value {
        match self {
            Some(value) => value.to_value(),
            None => Value::Null,
        }
    }

    fn assign(&mut self, value: Value) -> Result<()> {
        *self = <Self as Field>::from_value(value)?;
        Ok(())
    }

    fn resolve(&self) -> Option<&dyn Reflect> {
        self.as_ref().and_then(|value| value.resolve())
    }

    fn resolve_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().and_then(|value| value.resolve_mut())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: Field> Field for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl<T: Typed> Typed for Box<T> {
    fn ty() -> Type {
        T::ty()
    }
}

impl<T: Field> Reflect for Box<T> {
    fn reflect_ty(&self) -> Type {
        (**self).reflect_ty()
    }

    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn assign(&mut self, value: Value) -> Result<()> {
        (**self).assign(value)
    }

    fn resolve(&self) -> Option<&dyn Reflect> {
        (**self).resolve()
    }

    fn resolve_mut(&mut self) -> Option<&mut dyn Reflect> {
        (**self).resolve_mut()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_bean(&self) -> Option<&dyn Bean> {
        (**self).as_bean()
    }

    fn as_bean_mut(&mut self) -> Option<&mut dyn Bean> {
        (**self).as_bean_mut()
    }
}

impl<T: Field> Field for Box<T> {
    fn from_value(value: Value) -> Result<Self> {
        T::from_value(value).map(Box::new)
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn ty() -> Type {
        Type::list(T::ty())
    }
}

impl<T: Field> Reflect for Vec<T> {
    fn reflect_ty(&self) -> Type {
        <Self as Typed>::ty()
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Reflect::to_value).collect())
    }

    fn assign(&mut self, value: Value) -> Result<()> {
        *self = <Self as Field>::from_value(value)?;
        Ok(())
    }

    fn resolve(&self) -> Option<&dyn Reflect> {
        Some(self as &dyn Reflect)
    }

    fn resolve_mut(&mut self) -> Option<&mut dyn Reflect> {
        Some(self as &mut dyn Reflect)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn element(&self, index: usize) -> Option<&dyn Reflect> {
        self.get(index).map(|value| value as &dyn Reflect)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        self.get_mut(index).map(|value| value as &mut dyn Reflect)
    }

    fn len(&self) -> Option<usize> {
        Some(Vec::len(self))
    }
}

impl<T: Field> Field for Vec<T> {
    fn from_value(value: Value) -> Result<Self> {
        elements(value, &<Self as Typed>::ty())?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

impl<T: Typed> Typed for Box<[T]> {
    fn ty() -> Type {
        Type::array(T::ty())
    }
}

impl<T: Field> Reflect for Box<[T]> {
    fn reflect_ty(&self) -> Type {
        <Self as Typed>::ty()
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Reflect::to_value).collect())
    }

    fn assign(&mut self, value: Value) -> Result<()> {
        *self = <Self as Field>::from_value(value)?;
        Ok(())
    }

    fn resolve(&self) -> Option<&dyn Reflect> {
        Some(self as &dyn Reflect)
    }

    fn resolve_mut(&mut self) -> Option<&mut dyn Reflect> {
        Some(self as &mut dyn Reflect)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn element(&self, index: usize) -> Option<&dyn Reflect> {
        self.get(index).map(|value| value as &dyn Reflect)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        self.get_mut(index).map(|value| value as &mut dyn Reflect)
    }

    fn len(&self) -> Option<usize> {
        Some(<[T]>::len(self))
    }
}

impl<T: Field> Field for Box<[T]> {
    fn from_value(value: Value) -> Result<Self> {
        elements(value, &<Self as Typed>::ty())?
            .into_iter()
            .map(T::from_value)
            .collect::<Result<Vec<_>>>()
            .map(Vec::into_boxed_slice)
    }
}

/// Splits a list value into its elements. Byte strings count as lists of
/// `u8`.
fn elements(value: Value, ty: &Type) -> Result<Vec<Value>> {
    match value {
        Value::List(items) => Ok(items),
        Value::Bytes(bytes) => Ok(bytes.into_iter().map(Value::U8).collect()),
        other => Err(Error::type_conversion(other.infer_ty(), ty)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn option_resolves_to_inner_value() {
        let some = Some(5i64);
        assert_eq!(some.resolve().map(Reflect::to_value), Some(Value::I64(5)));

        let none: Option<i64> = None;
        assert!(none.resolve().is_none());
        assert_eq!(none.to_value(), Value::Null);
    }

    #[test]
    fn list_elements_are_addressable() {
        let mut list = vec![1i32, 2, 3];
        assert_eq!(list.element(1).map(Reflect::to_value), Some(Value::I32(2)));
        assert!(list.element(3).is_none());
        assert_eq!(Reflect::len(&list), Some(3));

        list.element_mut(0).unwrap().assign(Value::I64(10)).unwrap();
        assert_eq!(list, vec![10, 2, 3]);
    }

    #[test]
    fn arrays_accept_lists_and_bytes() {
        let array = <Box<[u8]>>::from_value(Value::Bytes(vec![1, 2])).unwrap();
        assert_eq!(&*array, &[1, 2]);

        let array = <Box<[Option<i32>]>>::from_value(Value::List(vec![
            Value::I64(1),
            Value::Null,
        ]))
        .unwrap();
        assert_eq!(&*array, &[Some(1), None]);
    }

    #[test]
    fn list_rejects_scalars() {
        let err = <Vec<i32>>::from_value(Value::I32(1)).unwrap_err();
        assert_eq!(err.to_string(), "cannot convert i32 to Vec<i32>");
    }
}
