use thiserror::Error;

/// The result of a lookup: either the solved value or "not found here".
///
/// A miss is ordinary data. Callers that need a hard failure go through
/// [`SymbolReference::solved_or_err`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SymbolReference<T> {
    Solved(T),
    Unsolved,
}

impl<T> SymbolReference<T> {
    pub fn solved(value: T) -> Self {
        SymbolReference::Solved(value)
    }

    pub fn unsolved() -> Self {
        SymbolReference::Unsolved
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SymbolReference::Solved(_))
    }

    pub fn as_ref(&self) -> SymbolReference<&T> {
        match self {
            SymbolReference::Solved(value) => SymbolReference::Solved(value),
            SymbolReference::Unsolved => SymbolReference::Unsolved,
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            SymbolReference::Solved(value) => Some(value),
            SymbolReference::Unsolved => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SymbolReference<U> {
        match self {
            SymbolReference::Solved(value) => SymbolReference::Solved(f(value)),
            SymbolReference::Unsolved => SymbolReference::Unsolved,
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> SymbolReference<U>) -> SymbolReference<U> {
        match self {
            SymbolReference::Solved(value) => f(value),
            SymbolReference::Unsolved => SymbolReference::Unsolved,
        }
    }

    /// Keeps a solved value, otherwise tries `f`.
    pub fn or_else(self, f: impl FnOnce() -> SymbolReference<T>) -> SymbolReference<T> {
        match self {
            SymbolReference::Solved(value) => SymbolReference::Solved(value),
            SymbolReference::Unsolved => f(),
        }
    }

    pub fn solved_or_err(
        self,
        symbol: impl Into<String>,
        solver: impl Into<String>,
    ) -> Result<T, UnsolvedSymbolError> {
        match self {
            SymbolReference::Solved(value) => Ok(value),
            SymbolReference::Unsolved => Err(UnsolvedSymbolError {
                symbol: symbol.into(),
                solver: solver.into(),
            }),
        }
    }
}

impl<T> From<Option<T>> for SymbolReference<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => SymbolReference::Solved(value),
            None => SymbolReference::Unsolved,
        }
    }
}

/// Raised only when a caller explicitly demands a solved symbol.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unsolved symbol `{symbol}` in {solver}")]
pub struct UnsolvedSymbolError {
    pub symbol: String,
    pub solver: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn or_else_only_runs_on_miss() {
        let hit = SymbolReference::solved(1).or_else(|| panic!("must not run"));
        assert_eq!(hit, SymbolReference::Solved(1));

        let miss: SymbolReference<i32> = SymbolReference::unsolved();
        assert_eq!(miss.or_else(|| SymbolReference::solved(2)), SymbolReference::Solved(2));
    }

    #[test]
    fn solved_or_err_names_symbol_and_solver() {
        let miss: SymbolReference<()> = SymbolReference::Unsolved;
        let err = miss.solved_or_err("Foo", "memory solver").unwrap_err();
        assert_eq!(err.to_string(), "unsolved symbol `Foo` in memory solver");
    }
}
