//! Shared steps for saving a website's child collections.

use tracing::{debug, warn};
use wayedge_core::error::WayedgeResult;
use wayedge_core::reconcile::{self, Desired, ReconcilePlan};
use wayedge_core::repository::ChildRepository;
use wayedge_core::validation::{Validate, ValidationErrors, validate_each};

use crate::gate::OwnedWebsite;

/// Validate `desired`, read the persisted collection and diff the two.
///
/// Nothing is written. Validation covers the whole list before the
/// store is read, with failures addressed as `field[i]`.
pub(crate) async fn plan_children<R>(
    repo: &R,
    website: &OwnedWebsite,
    field: &str,
    desired: Vec<Desired<R::Fields>>,
) -> WayedgeResult<ReconcilePlan<R::Fields>>
where
    R: ChildRepository,
    R::Fields: Validate,
{
    let mut errors = ValidationErrors::new();
    validate_each(field, &desired, &mut errors);
    errors.into_result()?;

    let existing = repo.list_by_website(website.id()).await?;
    let plan = reconcile::plan(&existing, desired);

    if !plan.dropped.is_empty() {
        warn!(
            website_id = %website.id(),
            collection = field,
            dropped = ?plan.dropped,
            "Ignoring ids not in the website's collection"
        );
    }
    debug!(
        website_id = %website.id(),
        collection = field,
        deletes = plan.to_delete.len(),
        updates = plan.to_update.len(),
        creates = plan.to_create.len(),
        "Planned reconciliation"
    );

    Ok(plan)
}

/// Reconcile a child collection and return it as re-read after commit.
pub(crate) async fn reconcile_children<R>(
    repo: &R,
    website: &OwnedWebsite,
    field: &str,
    desired: Vec<Desired<R::Fields>>,
) -> WayedgeResult<Vec<R::Record>>
where
    R: ChildRepository,
    R::Fields: Validate,
{
    let plan = plan_children(repo, website, field, desired).await?;
    repo.apply_plan(website.id(), plan).await
}
