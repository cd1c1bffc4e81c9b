//! Hit-test results

/// How a query geometry relates to a drawn region
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IntersectionDetail {
    /// No primitive has been tested yet
    #[default]
    NotCalculated,
    /// The query and the region do not touch
    Empty,
    /// The query and the region partially overlap or touch
    Intersects,
    /// The region lies entirely inside the query
    FullyInside,
    /// The query lies entirely inside the region
    FullyContains,
}

impl IntersectionDetail {
    /// Fold a per-primitive result into an accumulated one
    ///
    /// The first result is adopted as-is. A `FullyInside` or `Empty` result
    /// that disagrees with what came before degrades to `Intersects`;
    /// everything else replaces the accumulated value.
    pub fn merge(self, new: IntersectionDetail) -> IntersectionDetail {
        use IntersectionDetail::*;

        match (self, new) {
            (NotCalculated, new) => new,
            (old, FullyInside) if old != FullyInside => Intersects,
            (old, Empty) if old != Empty => Intersects,
            (_, new) => new,
        }
    }

    /// True for any result other than `NotCalculated` and `Empty`
    pub fn is_hit(self) -> bool {
        !matches!(
            self,
            IntersectionDetail::NotCalculated | IntersectionDetail::Empty
        )
    }
}

#[cfg(test)]
mod tests {
    use super::IntersectionDetail::*;

    #[test]
    fn test_first_result_adopted() {
        for detail in [Empty, Intersects, FullyInside, FullyContains] {
            assert_eq!(NotCalculated.merge(detail), detail);
        }
    }

    #[test]
    fn test_merge_lattice() {
        assert_eq!(Empty.merge(Empty), Empty);
        assert_eq!(Empty.merge(Intersects), Intersects);
        assert_eq!(FullyInside.merge(FullyInside), FullyInside);
        assert_eq!(FullyInside.merge(Empty), Intersects);
        assert_eq!(Empty.merge(FullyInside), Intersects);
        assert_eq!(Intersects.merge(FullyContains), FullyContains);
        assert_eq!(Empty.merge(FullyContains), FullyContains);
    }

    #[test]
    fn test_is_hit() {
        assert!(!NotCalculated.is_hit());
        assert!(!Empty.is_hit());
        assert!(Intersects.is_hit());
        assert!(FullyInside.is_hit());
        assert!(FullyContains.is_hit());
    }
}
