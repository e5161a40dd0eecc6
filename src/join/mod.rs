//! Join plan generation for entity associations.

pub mod plan;
pub mod translate;

#[doc(inline)]
pub use plan::{JoinClause, JoinPlan};
#[doc(inline)]
pub use translate::{
    join_association, outer_join, translate, translate_with, AugmentFn, JoinTranslator, Relationships,
};

#[cfg(feature = "tracing")]
pub(crate) mod tracing_helpers {
    use tracing::Span;

    pub fn translate_span(entity: &str, associations: &[&str]) -> Span {
        tracing::debug_span!(
            "relation_joins.translate",
            entity = entity,
            associations = ?associations,
        )
    }
}
