/// What a fetch function hands back for a single `(limit, offset)` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T, E> {
    /// The items starting at the requested offset, at most `limit` of them.
    /// The length isn't validated by the loader.
    Success(Vec<T>),
    /// The fetch failed, the cause is passed through to the caller untouched.
    Error(E),
}

impl<T, E> FetchOutcome<T, E> {
    /// Whether this is a [`FetchOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Convert into a [`Result`].
    pub fn into_result(self) -> Result<Vec<T>, E> {
        match self {
            Self::Success(items) => Ok(items),
            Self::Error(cause) => Err(cause),
        }
    }
}

impl<T, E> From<Result<Vec<T>, E>> for FetchOutcome<T, E> {
    fn from(result: Result<Vec<T>, E>) -> Self {
        match result {
            Ok(items) => Self::Success(items),
            Err(cause) => Self::Error(cause),
        }
    }
}

impl<T, E> From<FetchOutcome<T, E>> for Result<Vec<T>, E> {
    fn from(outcome: FetchOutcome<T, E>) -> Self {
        outcome.into_result()
    }
}
