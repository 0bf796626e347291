//! Team-based authorization of the triggering actor.
use log::*;

use crate::{
    error::{CiError, Result},
    forge::manager::ForgeManager,
};

/// Succeed when `actor` is a member of at least one of `teams` in `org`.
/// Teams are checked in order and the first membership short-circuits.
pub async fn authorize_actor(
    forge: &ForgeManager,
    org: &str,
    teams: &[String],
    actor: &str,
) -> Result<()> {
    for team in teams.iter() {
        let membership = forge.team_membership(org, team, actor).await?;

        if membership.is_member() {
            info!("{actor} is a member of {org}/{team}: authorized");
            return Ok(());
        }

        debug!("{actor} is not a member of {org}/{team}: {membership:?}");
    }

    error!("{actor} is not a member of any of {teams:?} in {org}");

    Err(CiError::unauthorized(actor, teams))
}
