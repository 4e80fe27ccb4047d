//! The inner join engine.

use std::hash::Hash;
use std::ptr;

use itertools::Itertools;

use crate::config::{ConstructFailurePolicy, JoinConfig};
use crate::error::{ConstructError, JoinError, Side};
use crate::group::Groups;
use crate::record::{OutputShape, Record};
use crate::resolve::ResolutionTable;
use crate::shape::Shape;

/// A (left, right) pair whose output record could not be constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// Position of the left record in the left input.
    pub left_index: usize,
    /// Position of the right record in the right input.
    pub right_index: usize,
    pub reason: ConstructError,
}

impl SkippedRow {
    pub fn into_error(self) -> JoinError {
        JoinError::RowConstruction {
            left_index: self.left_index,
            right_index: self.right_index,
            source: self.reason,
        }
    }
}

/// Result of projecting one matched pair.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome<O> {
    Constructed(O),
    Skipped(SkippedRow),
}

impl<O> RowOutcome<O> {
    pub fn is_constructed(&self) -> bool {
        matches!(self, RowOutcome::Constructed(_))
    }

    pub fn constructed(&self) -> Option<&O> {
        match self {
            RowOutcome::Constructed(row) => Some(row),
            RowOutcome::Skipped(_) => None,
        }
    }

    pub fn into_constructed(self) -> Option<O> {
        match self {
            RowOutcome::Constructed(row) => Some(row),
            RowOutcome::Skipped(_) => None,
        }
    }

    pub fn skipped(&self) -> Option<&SkippedRow> {
        match self {
            RowOutcome::Constructed(_) => None,
            RowOutcome::Skipped(skipped) => Some(skipped),
        }
    }
}

/// Output of [`Joiner::inner_join`]: the constructed rows in join order and
/// the pairs that were skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined<O> {
    rows: Vec<O>,
    skipped: Vec<SkippedRow>,
}

impl<O> Default for Joined<O> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<O> Joined<O> {
    pub fn rows(&self) -> &[O] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<O> {
        self.rows
    }

    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn into_parts(self) -> (Vec<O>, Vec<SkippedRow>) {
        (self.rows, self.skipped)
    }

    /// Number of constructed rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<O> FromIterator<RowOutcome<O>> for Joined<O> {
    fn from_iter<I: IntoIterator<Item = RowOutcome<O>>>(iter: I) -> Self {
        let mut joined = Joined::default();
        for outcome in iter {
            match outcome {
                RowOutcome::Constructed(row) => joined.rows.push(row),
                RowOutcome::Skipped(skipped) => joined.skipped.push(skipped),
            }
        }
        joined
    }
}

impl<O> IntoIterator for Joined<O> {
    type Item = O;
    type IntoIter = std::vec::IntoIter<O>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a, O> IntoIterator for &'a Joined<O> {
    type Item = &'a O;
    type IntoIter = std::slice::Iter<'a, O>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Joins two record collections on a key and projects each matching pair
/// into an output record.
///
/// Holds only configuration; every call builds and discards its own groups
/// and resolution table, so a `Joiner` can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Joiner {
    config: JoinConfig,
}

impl Joiner {
    pub fn new(config: JoinConfig) -> Self {
        Self { config }
    }

    pub fn with_policy(mut self, policy: ConstructFailurePolicy) -> Self {
        self.config.on_construct_failure = policy;
        self
    }

    pub fn log_skipped(mut self, log_skipped: bool) -> Self {
        self.config.log_skipped = log_skipped;
        self
    }

    pub fn config(&self) -> &JoinConfig {
        &self.config
    }

    /// Inner join of `left` and `right` on the keys produced by `left_key`
    /// and `right_key`.
    ///
    /// Rows come out grouped by left key in first-seen order, and within a
    /// key in left-major, right-minor order. Returns an empty result without
    /// inspecting any shape when either input is empty.
    ///
    /// # Errors
    ///
    /// Configuration errors (see [`JoinError::is_configuration`]) always abort.
    /// A pair whose output cannot be constructed is skipped or aborts the join
    /// according to [`JoinConfig::on_construct_failure`].
    pub fn inner_join<L, R, K, O, LF, RF>(
        &self,
        left: &[L],
        left_key: LF,
        right: &[R],
        right_key: RF,
        output: &O,
    ) -> Result<Joined<O::Output>, JoinError>
    where
        L: Record,
        R: Record,
        K: Hash + Eq,
        O: OutputShape + ?Sized,
        LF: Fn(&L) -> K,
        RF: Fn(&R) -> K,
    {
        let mut joined = Joined::default();
        self.run(left, left_key, right, right_key, output, |outcome| {
            match outcome {
                RowOutcome::Constructed(row) => joined.rows.push(row),
                RowOutcome::Skipped(skipped) => match self.config.on_construct_failure {
                    ConstructFailurePolicy::Abort => return Err(skipped.into_error()),
                    ConstructFailurePolicy::Skip => {
                        if self.config.log_skipped {
                            tracing::warn!(
                                left_index = skipped.left_index,
                                right_index = skipped.right_index,
                                reason = %skipped.reason,
                                "skipping row that could not be constructed"
                            );
                        }
                        joined.skipped.push(skipped);
                    }
                },
            }
            Ok(())
        })?;

        if !joined.skipped.is_empty() {
            tracing::debug!(
                rows = joined.rows.len(),
                skipped = joined.skipped.len(),
                "join finished with skipped rows"
            );
        }
        Ok(joined)
    }

    /// Like [`Joiner::inner_join`], but returns every pair's outcome without
    /// applying the construct-failure policy.
    pub fn outcomes<L, R, K, O, LF, RF>(
        &self,
        left: &[L],
        left_key: LF,
        right: &[R],
        right_key: RF,
        output: &O,
    ) -> Result<Vec<RowOutcome<O::Output>>, JoinError>
    where
        L: Record,
        R: Record,
        K: Hash + Eq,
        O: OutputShape + ?Sized,
        LF: Fn(&L) -> K,
        RF: Fn(&R) -> K,
    {
        let mut outcomes = Vec::new();
        self.run(left, left_key, right, right_key, output, |outcome| {
            outcomes.push(outcome);
            Ok(())
        })?;
        Ok(outcomes)
    }

    fn run<L, R, K, O, LF, RF, E>(
        &self,
        left: &[L],
        left_key: LF,
        right: &[R],
        right_key: RF,
        output: &O,
        mut emit: E,
    ) -> Result<(), JoinError>
    where
        L: Record,
        R: Record,
        K: Hash + Eq,
        O: OutputShape + ?Sized,
        LF: Fn(&L) -> K,
        RF: Fn(&R) -> K,
        E: FnMut(RowOutcome<O::Output>) -> Result<(), JoinError>,
    {
        let (Some(first_left), Some(first_right)) = (left.first(), right.first()) else {
            tracing::trace!(
                left_rows = left.len(),
                right_rows = right.len(),
                "empty join input"
            );
            return Ok(());
        };

        let left_shape = first_left.shape();
        let right_shape = first_right.shape();
        let table = ResolutionTable::build(left_shape, right_shape, output.shape())?;

        let left_groups = Groups::build(left, left_key);
        let right_groups = Groups::build(right, right_key);
        tracing::debug!(
            left_rows = left.len(),
            left_keys = left_groups.len(),
            right_rows = right.len(),
            right_keys = right_groups.len(),
            "grouped join inputs"
        );

        for (key, left_group) in left_groups.iter() {
            let Some(right_group) = right_groups.get(key) else {
                continue;
            };
            for (&(left_index, l), &(right_index, r)) in
                left_group.iter().cartesian_product(right_group.iter())
            {
                let built = same_shape(Side::Left, left_shape, l)
                    .and_then(|()| same_shape(Side::Right, right_shape, r))
                    .and_then(|()| table.project(l, r))
                    .and_then(|values| output.construct(values));

                let outcome = match built {
                    Ok(row) => RowOutcome::Constructed(row),
                    // The table always yields one value per output field, so
                    // an arity failure means the constructor disagrees with
                    // its own shape.
                    Err(source @ ConstructError::Arity { .. }) => {
                        return Err(JoinError::OutputShapeMismatch {
                            shape: output.shape().name().to_string(),
                            source,
                        })
                    }
                    Err(reason) => RowOutcome::Skipped(SkippedRow {
                        left_index,
                        right_index,
                        reason,
                    }),
                };
                emit(outcome)?;
            }
        }
        Ok(())
    }
}

/// Records in one input must all share the shape of its first record.
fn same_shape<T: Record>(side: Side, expected: &Shape, record: &T) -> Result<(), ConstructError> {
    let found = record.shape();
    if ptr::eq(found, expected) || found == expected {
        Ok(())
    } else {
        Err(ConstructError::ShapeDrift {
            side,
            expected: expected.name().to_string(),
            found: found.name().to_string(),
        })
    }
}

/// Inner join with the default [`Joiner`], returning only the constructed rows.
///
/// Rows that cannot be constructed are skipped and logged; use
/// [`Joiner::inner_join`] to inspect them.
pub fn inner_join<L, R, K, O, LF, RF>(
    left: &[L],
    left_key: LF,
    right: &[R],
    right_key: RF,
    output: &O,
) -> Result<Vec<O::Output>, JoinError>
where
    L: Record,
    R: Record,
    K: Hash + Eq,
    O: OutputShape + ?Sized,
    LF: Fn(&L) -> K,
    RF: Fn(&R) -> K,
{
    Joiner::default()
        .inner_join(left, left_key, right, right_key, output)
        .map(Joined::into_rows)
}
