//! StructuredMessage - capability of exposing a nested key/value view
//!
//! Values that cannot expose a view return `None`; instrumentation treats that
//! as a degradation, not a failure.

use serde::Serialize;
use serde_json::{Map, Value};

/// Nested key/value view of a message, in source key order
pub type Message = Map<String, Value>;

/// Capability implemented by message types that can be flattened
pub trait StructuredMessage {
    /// Nested mapping view of this message, if it has one
    fn as_structured(&self) -> Option<Message>;
}

impl StructuredMessage for Message {
    fn as_structured(&self) -> Option<Message> {
        Some(self.clone())
    }
}

impl StructuredMessage for Value {
    fn as_structured(&self) -> Option<Message> {
        match self {
            Value::Object(map) => Some(map.clone()),
            _ => None,
        }
    }
}

impl<T: StructuredMessage + ?Sized> StructuredMessage for &T {
    fn as_structured(&self) -> Option<Message> {
        (**self).as_structured()
    }
}

impl<T: StructuredMessage + ?Sized> StructuredMessage for Box<T> {
    fn as_structured(&self) -> Option<Message> {
        (**self).as_structured()
    }
}

impl<T: StructuredMessage> StructuredMessage for Option<T> {
    fn as_structured(&self) -> Option<Message> {
        self.as_ref().and_then(StructuredMessage::as_structured)
    }
}

/// Wrapper exposing any `Serialize` type that serializes to a JSON object
#[derive(Debug, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl<T: Serialize> StructuredMessage for Json<T> {
    fn as_structured(&self) -> Option<Message> {
        match serde_json::to_value(&self.0) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}

/// Implement `StructuredMessage` as "no view" for plain values
macro_rules! impl_no_structured_view {
    ($($ty:ty),* $(,)?) => {
        $(
            impl StructuredMessage for $ty {
                fn as_structured(&self) -> Option<Message> {
                    None
                }
            }
        )*
    };
}

impl_no_structured_view!(
    (), bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    str, String,
);

macro_rules! impl_no_structured_view_tuple {
    ($($name:ident),+) => {
        impl<$($name),+> StructuredMessage for ($($name,)+) {
            fn as_structured(&self) -> Option<Message> {
                None
            }
        }
    };
}

impl_no_structured_view_tuple!(A);
impl_no_structured_view_tuple!(A, B);
impl_no_structured_view_tuple!(A, B, C);
impl_no_structured_view_tuple!(A, B, C, D);
