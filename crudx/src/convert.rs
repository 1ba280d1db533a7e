use std::any::{type_name, Any};

use crate::entity::Entity;
use crate::error::DataError;

/// Capability for producing a type-erased converted representation of self.
///
/// The `*_convert` operations are generic over a result type `R`, but no
/// mapping between arbitrary type pairs can be known statically, so the
/// entity produces a type-erased value and the bridging function performs
/// a checked downcast to the requested type.
pub trait Convert {
    fn convert(&self) -> Box<dyn Any + Send>;
}

/// Converts `entity` into `R` through its [`Convert`] capability.
///
/// Fails with [`DataError::ConvertNotImplemented`] when the entity type
/// lacks the capability, and with [`DataError::ConvertTypeMismatch`] when
/// the capability produces a value that is not an `R`.
pub fn convert_to<T, R>(entity: &T) -> Result<R, DataError>
where
    T: Entity,
    R: 'static,
{
    let capability = entity
        .as_convert()
        .ok_or(DataError::ConvertNotImplemented(type_name::<T>()))?;
    match capability.convert().downcast::<R>() {
        Ok(converted) => Ok(*converted),
        Err(_) => Err(DataError::ConvertTypeMismatch {
            from: type_name::<T>(),
            to: type_name::<R>(),
        }),
    }
}

/// Converts every entity in order, aborting on the first failure and
/// discarding anything converted so far.
pub fn convert_all<T, R>(entities: &[T]) -> Result<Vec<R>, DataError>
where
    T: Entity,
    R: 'static,
{
    entities.iter().map(convert_to).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[derive(Debug, PartialEq)]
    struct PlainView {
        id: i64,
    }

    struct Plain {
        id: i64,
    }

    impl Entity for Plain {
        fn table_name() -> &'static str {
            "plain"
        }
        fn columns() -> &'static [&'static str] {
            &["id"]
        }
        fn values(&self) -> Vec<Value> {
            vec![self.id.into()]
        }
    }

    struct Convertible {
        id: i64,
    }

    impl Entity for Convertible {
        fn table_name() -> &'static str {
            "convertible"
        }
        fn columns() -> &'static [&'static str] {
            &["id"]
        }
        fn values(&self) -> Vec<Value> {
            vec![self.id.into()]
        }
        fn as_convert(&self) -> Option<&dyn Convert> {
            Some(self)
        }
    }

    impl Convert for Convertible {
        fn convert(&self) -> Box<dyn Any + Send> {
            Box::new(PlainView { id: self.id })
        }
    }

    #[test]
    fn test_convert() {
        let view: PlainView = convert_to(&Convertible { id: 7 }).unwrap();
        assert_eq!(view, PlainView { id: 7 });
    }

    #[test]
    fn test_capability_missing() {
        let err = convert_to::<_, PlainView>(&Plain { id: 1 }).unwrap_err();
        assert!(matches!(err, DataError::ConvertNotImplemented(_)));
    }

    #[test]
    fn test_type_mismatch() {
        let err = convert_to::<_, String>(&Convertible { id: 1 }).unwrap_err();
        assert!(matches!(err, DataError::ConvertTypeMismatch { .. }));
    }

    #[test]
    fn test_convert_all_aborts_on_failure() {
        let entities = [Plain { id: 1 }, Plain { id: 2 }];
        let result = convert_all::<_, PlainView>(&entities);
        assert!(matches!(
            result,
            Err(DataError::ConvertNotImplemented(_))
        ));
    }
}
