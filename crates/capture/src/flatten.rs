//! Message flattener
//!
//! Turns a nested message into one [`DataPoint`] per leaf. Each ancestor key
//! becomes a tag carrying [`TAG_PRESENT`].

use serde_json::map::Iter;
use serde_json::Value;

use contracts::{DataPoint, FieldValue, Message, Tags};

/// Placeholder value of every ancestor tag
pub const TAG_PRESENT: &str = "1";

/// Flatten `message` into its leaf points
///
/// The returned view is restartable: each call to [`Flattened::points`]
/// starts a fresh traversal.
pub fn flatten(message: &Message) -> Flattened<'_> {
    Flattened { message }
}

/// Lazy, restartable flattening of one message
#[derive(Debug, Clone, Copy)]
pub struct Flattened<'a> {
    message: &'a Message,
}

impl<'a> Flattened<'a> {
    /// Iterate the leaf points in depth-first, source key order
    pub fn points(&self) -> Points<'a> {
        Points {
            stack: vec![self.message.iter()],
            path: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
    }
}

impl<'a> IntoIterator for &Flattened<'a> {
    type Item = DataPoint;
    type IntoIter = Points<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.points()
    }
}

impl<'a> IntoIterator for Flattened<'a> {
    type Item = DataPoint;
    type IntoIter = Points<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.points()
    }
}

/// Depth-first iterator over leaf points
///
/// `path` always holds one key per mapping on `stack` except the root.
pub struct Points<'a> {
    stack: Vec<Iter<'a>>,
    path: Vec<&'a str>,
}

impl Points<'_> {
    fn tags(&self) -> Tags {
        self.path
            .iter()
            .map(|key| (key.to_string(), TAG_PRESENT.to_string()))
            .collect()
    }
}

impl Iterator for Points<'_> {
    type Item = DataPoint;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            let Some((key, value)) = top.next() else {
                self.stack.pop();
                self.path.pop();
                continue;
            };

            match value {
                Value::Object(child) if !child.is_empty() => {
                    self.path.push(key);
                    self.stack.push(child.iter());
                }
                leaf => {
                    return Some(DataPoint::new(
                        self.tags(),
                        key.as_str(),
                        FieldValue::from_json(leaf),
                    ));
                }
            }
        }
    }
}
