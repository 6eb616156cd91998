use alloc::boxed::Box;
use core::{error::Error as StdError, iter::FusedIterator};

use crate::{BoxError, List};

/// Extension methods for iterators over `Result`s.
///
/// [`Iterator::collect`] into a `Result` stops at the first error.
/// [`collect_errors`](IteratorExt::collect_errors) keeps going and returns
/// every error in a [`List`]:
///
/// ```
/// use errtrail::prelude::*;
///
/// let inputs = ["1", "2", "x", "4", "y"];
/// let errors = inputs
///     .iter()
///     .map(|s| s.parse::<u8>())
///     .collect_errors::<Vec<_>>()
///     .unwrap_err();
/// assert_eq!(errors.len(), 2);
///
/// let values: Vec<u8> = ["1", "2"].iter().map(|s| s.parse::<u8>()).collect_errors().unwrap();
/// assert_eq!(values, [1, 2]);
/// ```
pub trait IteratorExt<A, E>: Sized + Iterator<Item = Result<A, E>> {
    /// Collects the `Ok` values into `Container`, or every error into a
    /// [`List`] if there was at least one.
    fn collect_errors<Container>(self) -> Result<Container, List>
    where
        Container: FromIterator<A>,
        E: StdError + Send + Sync + 'static;
}

struct UntilErr<'a, I> {
    iter: I,
    errors: &'a mut Option<List>,
}

impl<A, E, I> Iterator for UntilErr<'_, I>
where
    I: Iterator<Item = Result<A, E>>,
    E: StdError + Send + Sync + 'static,
{
    type Item = A;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.errors.is_some() {
            return None;
        }

        match self.iter.next() {
            Some(Ok(value)) => Some(value),
            Some(Err(err)) => {
                *self.errors = Some(
                    core::iter::once(err)
                        .chain((&mut self.iter).filter_map(Result::err))
                        .map(|err| Box::new(err) as BoxError)
                        .collect(),
                );
                None
            }
            None => None,
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.errors.is_some() {
            (0, Some(0))
        } else {
            (0, self.iter.size_hint().1)
        }
    }
}

impl<A, E, I> FusedIterator for UntilErr<'_, I>
where
    I: FusedIterator<Item = Result<A, E>>,
    E: StdError + Send + Sync + 'static,
{
}

impl<A, E, I> IteratorExt<A, E> for I
where
    I: Iterator<Item = Result<A, E>>,
{
    fn collect_errors<Container>(self) -> Result<Container, List>
    where
        Container: FromIterator<A>,
        E: StdError + Send + Sync + 'static,
    {
        let mut errors = None;
        let values = Container::from_iter(UntilErr {
            iter: self,
            errors: &mut errors,
        });
        match errors {
            Some(errors) => Err(errors),
            None => Ok(values),
        }
    }
}
