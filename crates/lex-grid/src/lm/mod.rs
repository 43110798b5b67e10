//! Language-model oracle consumed by the compositor.

mod text;

pub use text::{LmError, TextLanguageModel};

use std::rc::Rc;
use std::sync::Arc;

use crate::unigram::Unigram;

/// Answers "what can this key slice be written as".
///
/// `has_unigrams_for` must agree with `unigrams_for` being non-empty; the
/// compositor rolls back an insertion when it does not. Unigrams may be
/// returned in any order.
pub trait LanguageModel {
    fn unigrams_for(&self, key_array: &[String]) -> Vec<Unigram>;

    fn has_unigrams_for(&self, key_array: &[String]) -> bool {
        !self.unigrams_for(key_array).is_empty()
    }
}

impl<T: LanguageModel + ?Sized> LanguageModel for &T {
    fn unigrams_for(&self, key_array: &[String]) -> Vec<Unigram> {
        (**self).unigrams_for(key_array)
    }

    fn has_unigrams_for(&self, key_array: &[String]) -> bool {
        (**self).has_unigrams_for(key_array)
    }
}

macro_rules! forward_smart_pointer {
    ($($ptr:ident),*) => {
        $(
            impl<T: LanguageModel + ?Sized> LanguageModel for $ptr<T> {
                fn unigrams_for(&self, key_array: &[String]) -> Vec<Unigram> {
                    (**self).unigrams_for(key_array)
                }

                fn has_unigrams_for(&self, key_array: &[String]) -> bool {
                    (**self).has_unigrams_for(key_array)
                }
            }
        )*
    };
}

forward_smart_pointer!(Box, Rc, Arc);
