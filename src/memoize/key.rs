//! Key Extraction Module
//!
//! Turns call arguments into cache keys.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// Shared key extraction policy: pure, deterministic, `&Args -> K`.
pub type KeyExtractor<Args, K> = Arc<dyn Fn(&Args) -> K + Send + Sync>;

// == First Argument ==
/// Default key policy: the first call argument.
///
/// A scalar argument is its own first argument. A tuple of arguments yields a
/// clone of its first element, so `(id, verbose)` and `(id, quiet)` share one
/// cache slot. Argument types without an impl need an explicit key extractor.
pub trait FirstArgument {
    type Key: Hash + Eq + Clone + Debug;

    fn first_argument(&self) -> Self::Key;
}

macro_rules! impl_first_argument_for_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FirstArgument for $ty {
                type Key = $ty;

                fn first_argument(&self) -> $ty {
                    self.clone()
                }
            }
        )*
    };
}

impl_first_argument_for_scalar!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    String,
    &'static str,
);

macro_rules! impl_first_argument_for_tuple {
    ($head:ident $(, $tail:ident)*) => {
        impl<$head: Hash + Eq + Clone + Debug $(, $tail)*> FirstArgument for ($head, $($tail,)*) {
            type Key = $head;

            fn first_argument(&self) -> $head {
                self.0.clone()
            }
        }
    };
}

impl_first_argument_for_tuple!(A);
impl_first_argument_for_tuple!(A, B);
impl_first_argument_for_tuple!(A, B, C);
impl_first_argument_for_tuple!(A, B, C, D);
impl_first_argument_for_tuple!(A, B, C, D, E);
impl_first_argument_for_tuple!(A, B, C, D, E, F);
impl_first_argument_for_tuple!(A, B, C, D, E, F, G);
impl_first_argument_for_tuple!(A, B, C, D, E, F, G, H);

/// Key extractor for the default first-argument policy.
pub fn first_argument<Args: FirstArgument>() -> KeyExtractor<Args, Args::Key> {
    Arc::new(|args: &Args| args.first_argument())
}

/// Key extractor that keys on the whole argument value, e.g. every element of
/// a tuple.
pub fn all_arguments<Args>() -> KeyExtractor<Args, Args>
where
    Args: Hash + Eq + Clone,
{
    Arc::new(|args: &Args| args.clone())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_is_its_own_key() {
        assert_eq!(7u64.first_argument(), 7);
        assert_eq!("abc".to_string().first_argument(), "abc");
        assert_eq!("abc".first_argument(), "abc");
    }

    #[test]
    fn test_tuple_keys_on_first_element() {
        assert_eq!((1u32, "x", 2.5f64).first_argument(), 1);
        assert_eq!(("id".to_string(),).first_argument(), "id");
    }

    #[test]
    fn test_first_argument_extractor() {
        let extract = first_argument::<(u8, bool)>();
        assert_eq!(extract(&(3, true)), extract(&(3, false)));
    }

    #[test]
    fn test_all_arguments_extractor() {
        let extract = all_arguments::<(u8, bool)>();
        assert_ne!(extract(&(3, true)), extract(&(3, false)));
    }
}
