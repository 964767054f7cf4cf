//! Left-to-right function composition
//!
//! [`compose`] is the `>>>` operator: `compose(f, g)(x) == g(f(x))`. It works
//! for plain value transforms and, one kind up, for store enhancers, which
//! are themselves functions from store constructor to store constructor (see
//! [`Enhancer`](crate::store::Enhancer), whose `>>` is built on [`compose`]).
//!
//! Chains group to the left, `compose!(a, b, c)` is `compose(compose(a, b), c)`,
//! and because composition is associative the grouping is never observable.
//!
//! # Examples
//!
//! ```
//! use reflux_core::compose;
//!
//! let double = |n: i32| n * 2;
//! let describe = |n: i32| format!("value={n}");
//!
//! let pipeline = compose(double, describe);
//! assert_eq!(pipeline(21), "value=42");
//!
//! let chained = compose!(|n: i32| n + 1, |n: i32| n * 10, |n: i32| n.to_string());
//! assert_eq!(chained(4), "50");
//! ```

/// Compose two unary functions left to right
///
/// Returns `h` with `h(x) = g(f(x))`. The result is `Send`/`Sync` whenever
/// both inputs are, so composed enhancers can be shared across threads.
///
/// # Examples
///
/// ```
/// use reflux_core::compose;
///
/// let parse = |s: &str| s.len();
/// let is_long = |n: usize| n > 3;
///
/// let long_word = compose(parse, is_long);
/// assert!(long_word("reducer"));
/// assert!(!long_word("fn"));
/// ```
pub fn compose<T, U, V, F, G>(f: F, g: G) -> impl Fn(T) -> V
where
    F: Fn(T) -> U,
    G: Fn(U) -> V,
{
    move |initial| g(f(initial))
}

/// Compose any number of unary functions left to right
///
/// `compose!(f)` is `f`; `compose!(f, g, h)` is `compose(compose(f, g), h)`.
#[macro_export]
macro_rules! compose {
    ($f:expr $(,)?) => {
        $f
    };
    ($f:expr, $g:expr $(, $rest:expr)* $(,)?) => {
        $crate::compose!($crate::compose::compose($f, $g) $(, $rest)*)
    };
}
