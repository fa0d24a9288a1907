//! Expansion of recurring templates into transactions.

use chrono::NaiveDate;
use fluxo_shared::types::TransactionId;

use super::types::RecurringTemplate;
use crate::transaction::Transaction;

/// Recurring service.
pub struct RecurringService;

impl RecurringService {
    /// Expands every template from `start`.
    ///
    /// Each occurrence is a pending transaction with a fresh id. Occurrences
    /// whose date is not representable are dropped.
    #[must_use]
    pub fn expand(templates: &[RecurringTemplate], start: NaiveDate) -> Vec<Transaction> {
        let generated: Vec<Transaction> = templates
            .iter()
            .flat_map(|template| Self::expand_one(template, start))
            .collect();
        tracing::debug!(
            templates = templates.len(),
            generated = generated.len(),
            %start,
            "expanded recurring templates"
        );
        generated
    }

    /// Expands a single template from `start`.
    #[must_use]
    pub fn expand_one(template: &RecurringTemplate, start: NaiveDate) -> Vec<Transaction> {
        let total = template.occurrences();
        (0..total)
            .filter_map(|index| {
                let Some(date) = template.occurrence_date(start, index) else {
                    tracing::warn!(
                        description = %template.description,
                        index,
                        "recurring occurrence out of calendar range"
                    );
                    return None;
                };
                let description = if total > 1 {
                    format!("{} ({}/{total})", template.description, index + 1)
                } else {
                    template.description.clone()
                };
                Some(
                    Transaction::new(
                        TransactionId::generate(),
                        date.format("%Y-%m-%d").to_string(),
                        template.kind,
                        template.value,
                    )
                    .with_description(description)
                    .with_category(template.category.clone())
                    .with_responsibility(template.responsibility.clone())
                    .pending(),
                )
            })
            .collect()
    }
}
