//! Fluent construction of [`Filters`].
//!
//! The builder only produces a `Filters` value; translation and validation
//! happen in [`translate`](crate::translate), the same path a hand-built
//! mapping takes.

use crate::filter::{set_token, FilterValue, Filters, Literal, Operator};

/// Fluent builder for filters.
///
/// # Example
///
/// ```
/// use openf1_rest::FilterBuilder;
///
/// let filters = FilterBuilder::new()
///     .eq("session_key", 9161)
///     .eq("driver_number", 63)
///     .gte("speed", 315)
///     .lt("lap_number", 10)
///     .build();
///
/// let wire: Vec<String> = filters
///     .to_params()
///     .unwrap()
///     .iter()
///     .map(|p| p.to_wire())
///     .collect();
/// assert_eq!(
///     wire,
///     ["session_key=9161", "driver_number=63", "speed>=315", "lap_number<10"]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    filters: Filters,
}

impl FilterBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Equality. Replaces any earlier constraint on the field.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Literal>) -> Self {
        self.filters.insert(field, FilterValue::Equals(value.into()));
        self
    }

    /// Inequality (`!=`).
    pub fn ne(self, field: impl Into<String>, value: impl Into<Literal>) -> Self {
        self.compare(field, Operator::Ne, value)
    }

    /// Greater than (`>`).
    pub fn gt(self, field: impl Into<String>, value: impl Into<Literal>) -> Self {
        self.compare(field, Operator::Gt, value)
    }

    /// Greater than or equal (`>=`).
    pub fn gte(self, field: impl Into<String>, value: impl Into<Literal>) -> Self {
        self.compare(field, Operator::Gte, value)
    }

    /// Less than (`<`).
    pub fn lt(self, field: impl Into<String>, value: impl Into<Literal>) -> Self {
        self.compare(field, Operator::Lt, value)
    }

    /// Less than or equal (`<=`).
    pub fn lte(self, field: impl Into<String>, value: impl Into<Literal>) -> Self {
        self.compare(field, Operator::Lte, value)
    }

    /// Range filter. Inclusive uses `>=`/`<=`, exclusive `>`/`<`.
    ///
    /// Replaces any earlier constraint on the field.
    pub fn between(
        mut self,
        field: impl Into<String>,
        lower: impl Into<Literal>,
        upper: impl Into<Literal>,
        inclusive: bool,
    ) -> Self {
        let (lo, hi) = if inclusive {
            (Operator::Gte, Operator::Lte)
        } else {
            (Operator::Gt, Operator::Lt)
        };
        let bounds: [(Operator, Literal); 2] = [(lo, lower.into()), (hi, upper.into())];
        self.filters.insert(field, FilterValue::compare(bounds));
        self
    }

    /// Explicitly leave a field unconstrained.
    pub fn absent(mut self, field: impl Into<String>) -> Self {
        self.filters.insert(field, FilterValue::Absent);
        self
    }

    /// Remove every filter.
    pub fn clear(mut self) -> Self {
        self.filters.clear();
        self
    }

    /// The filters built so far.
    pub fn build(&self) -> Filters {
        self.filters.clone()
    }

    fn compare(mut self, field: impl Into<String>, op: Operator, value: impl Into<Literal>) -> Self {
        let field = field.into();
        let value = value.into();
        match self.filters.get_mut(&field) {
            Some(FilterValue::Compare(entries)) => set_token(entries, op.into(), value),
            _ => {
                self.filters
                    .insert(field, FilterValue::Compare(vec![(op.into(), value)]));
            }
        }
        self
    }
}

impl From<FilterBuilder> for Filters {
    fn from(builder: FilterBuilder) -> Self {
        builder.filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate;

    #[test]
    fn test_builder_matches_direct_mapping() {
        let built = FilterBuilder::new()
            .eq("session_key", 9161)
            .eq("driver_number", 63)
            .gte("speed", 315)
            .lt("lap_number", 10)
            .build();

        let direct = Filters::new()
            .with("session_key", 9161)
            .with("driver_number", 63)
            .with("speed", FilterValue::compare([(">=", 315)]))
            .with("lap_number", FilterValue::compare([("<", 10)]));

        assert_eq!(built, direct);
        assert_eq!(translate(&built).unwrap(), translate(&direct).unwrap());
    }

    #[test]
    fn test_comparisons_accumulate_on_one_field() {
        let filters = FilterBuilder::new().gt("speed", 300).lte("speed", 320).build();
        assert_eq!(
            filters.get("speed"),
            Some(&FilterValue::compare([(">", 300), ("<=", 320)]))
        );
    }

    #[test]
    fn test_comparison_replaces_equality() {
        let filters = FilterBuilder::new()
            .eq("lap_number", 5)
            .gte("lap_number", 3)
            .build();
        assert_eq!(
            filters.get("lap_number"),
            Some(&FilterValue::compare([(">=", 3)]))
        );
    }

    #[test]
    fn test_equality_replaces_comparison_in_place() {
        let filters = FilterBuilder::new()
            .gte("lap_number", 3)
            .eq("session_key", 1)
            .eq("lap_number", 5)
            .build();
        let fields: Vec<&str> = filters.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["lap_number", "session_key"]);
        assert_eq!(filters.get("lap_number"), Some(&FilterValue::equals(5)));
    }

    #[test]
    fn test_between() {
        let exclusive = FilterBuilder::new().between("lap_number", 1, 10, false).build();
        assert_eq!(
            exclusive.get("lap_number"),
            Some(&FilterValue::compare([(">", 1), ("<", 10)]))
        );

        let inclusive = FilterBuilder::new()
            .gt("lap_number", 99)
            .between("lap_number", 1, 10, true)
            .build();
        assert_eq!(
            inclusive.get("lap_number"),
            Some(&FilterValue::compare([(">=", 1), ("<=", 10)]))
        );
    }

    #[test]
    fn test_ne_and_absent() {
        let filters = FilterBuilder::new()
            .ne("compound", "SOFT")
            .absent("driver_number")
            .build();
        let params = translate(&filters).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].to_wire(), "compound!=SOFT");
    }

    #[test]
    fn test_clear_and_reuse() {
        let builder = FilterBuilder::new().eq("session_key", 1);
        let first = builder.build();
        let builder = builder.eq("driver_number", 44);
        assert_eq!(first.len(), 1);
        assert_eq!(builder.build().len(), 2);
        assert!(builder.clear().build().is_empty());
    }

    #[test]
    fn test_invalid_field_surfaces_on_translation() {
        let filters = FilterBuilder::new().eq("speed>=", 1).build();
        assert!(translate(&filters).unwrap_err().is_config_error());
    }
}
