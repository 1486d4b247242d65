/// Result of looking up a single record.
///
/// A missing record is an ordinary outcome, so it is returned as a value
/// instead of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}
