//! The read interface the governor consumes.

use crate::error::VotesError;
use covenant_types::{Address, Timepoint};

/// Historical voting power, as seen by the proposal ledger.
///
/// Past lookups must be tamper-evident: a lookup at a timepoint that is not
/// strictly before `now` fails, because power at the current timepoint can
/// still change within it.
pub trait VotingPowerSource {
    /// Current voting power of `account`.
    fn get_votes(&self, account: &Address) -> u128;

    fn get_past_votes(
        &self,
        account: &Address,
        timepoint: Timepoint,
        now: Timepoint,
    ) -> Result<u128, VotesError>;

    fn get_past_total_supply(&self, timepoint: Timepoint, now: Timepoint)
        -> Result<u128, VotesError>;
}
