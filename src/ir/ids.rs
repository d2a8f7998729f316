//! Newtype ids for images, annotations and categories in an export document.
//!
//! Image and annotation ids are handed out sequentially while a split is
//! assembled; their values carry no meaning beyond being unique within one
//! document. Category ids are the fixed label ids from the taxonomy, or
//! whatever label a box CSV declares.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident($repr:ty), $getter:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $repr);

        impl $name {
            #[inline]
            pub fn new(id: $repr) -> Self {
                Self(id)
            }

            #[inline]
            pub fn $getter(&self) -> $repr {
                self.0
            }
        }

        impl From<$repr> for $name {
            fn from(id: $repr) -> Self {
                Self(id)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifies an image within one export document.
    ImageId(u64),
    as_u64
);

define_id!(
    /// Identifies a box annotation within one export document.
    AnnotationId(u64),
    as_u64
);

define_id!(
    /// A label id used as a category reference. Signed, since box CSVs may
    /// declare any integer label.
    CategoryId(i64),
    as_i64
);

/// Hands out consecutive ids starting at 1.
#[derive(Debug)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns the next id and advances the sequence.
    pub fn next_id<T: From<u64>>(&mut self) -> T {
        let id = self.next;
        self.next += 1;
        T::from(id)
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
