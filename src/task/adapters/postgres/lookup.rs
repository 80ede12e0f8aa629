//! Transaction-scoped reference lookups used to hydrate task rows.

use super::schema::{labels, tasks_labels, users};
use super::transaction::TransactionUnit;
use crate::task::{
    domain::{Label, LabelId, TaskId, UserId},
    ports::{ReferenceLookup, TaskStoreError, TaskStoreResult},
};
use diesel::prelude::*;

/// Resolves user names and task labels inside an open transaction.
pub(super) struct TransactionLookup<'unit, 'conn> {
    unit: &'unit mut TransactionUnit<'conn>,
}

impl<'unit, 'conn> TransactionLookup<'unit, 'conn> {
    pub(super) const fn new(unit: &'unit mut TransactionUnit<'conn>) -> Self {
        Self { unit }
    }
}

impl ReferenceLookup for TransactionLookup<'_, '_> {
    fn user_name(&mut self, id: UserId) -> TaskStoreResult<String> {
        users::table
            .find(id.into_inner())
            .select(users::name)
            .first::<String>(self.unit.connection())
            .map_err(TaskStoreError::query)
    }

    fn task_labels(&mut self, id: TaskId) -> TaskStoreResult<Vec<Label>> {
        let rows = tasks_labels::table
            .inner_join(labels::table)
            .filter(tasks_labels::task_id.eq(id.into_inner()))
            .select((labels::id, labels::name))
            .order(labels::id.asc())
            .load::<(i64, String)>(self.unit.connection())
            .map_err(TaskStoreError::query)?;

        Ok(rows
            .into_iter()
            .map(|(label_id, name)| Label::new(LabelId::new(label_id), name))
            .collect())
    }
}
