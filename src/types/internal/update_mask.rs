/// A single field of an update mask
///
/// `Unset` leaves the stored value untouched, `Set` replaces it.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    Unset,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unset
    }
}

impl<T> Patch<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }

    /// Overwrite `target` when set
    pub fn apply_to(self, target: &mut T) {
        if let Patch::Set(value) = self {
            *target = value;
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Set(value) => Patch::Set(f(value)),
            Patch::Unset => Patch::Unset,
        }
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Patch<U>, E> {
        match self {
            Patch::Set(value) => f(value).map(Patch::Set),
            Patch::Unset => Ok(Patch::Unset),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Set(value),
            None => Patch::Unset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_leaves_target() {
        let mut name = "before".to_string();
        Patch::<String>::Unset.apply_to(&mut name);
        assert_eq!(name, "before");

        Patch::Set("after".to_string()).apply_to(&mut name);
        assert_eq!(name, "after");
    }

    #[test]
    fn test_try_map_propagates_error() {
        let parsed: Result<Patch<u32>, String> =
            Patch::Set("x").try_map(|s| s.parse::<u32>().map_err(|e| e.to_string()));
        assert!(parsed.is_err());

        let unset: Result<Patch<u32>, String> =
            Patch::<&str>::Unset.try_map(|s| s.parse::<u32>().map_err(|e| e.to_string()));
        assert_eq!(unset, Ok(Patch::Unset));
    }
}
