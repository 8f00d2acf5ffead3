use std::collections::BTreeMap;

use dashmap::DashMap;

use crate::client::CabbageError;
use crate::domain::{AccountId, Balance, Label};

#[derive(Debug, Default)]
/// Last known good balance of every account.
///
/// A slot is only ever written with a fresh successful value, so a failed refresh
/// keeps showing the previous balance instead of clearing it.
pub struct BalanceBook {
    slots: DashMap<AccountId, Balance>,
}

impl BalanceBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: AccountId) -> Option<Balance> {
        self.slots.get(&id).map(|entry| *entry)
    }

    pub fn record(&self, id: AccountId, balance: Balance) {
        self.slots.insert(id, balance);
    }

    /// Drop the slot of a removed account.
    pub fn forget(&self, id: AccountId) {
        self.slots.remove(&id);
    }

    pub fn snapshot(&self) -> BTreeMap<AccountId, Balance> {
        self.slots
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect()
    }

    /// Fill empty slots from a previously taken snapshot; existing values win.
    pub fn restore_missing(&self, snapshot: &BTreeMap<AccountId, Balance>) {
        for (id, balance) in snapshot {
            self.slots.entry(*id).or_insert(*balance);
        }
    }
}

#[derive(Debug)]
/// Result of querying one account during a refresh.
pub struct AccountOutcome {
    pub id: AccountId,
    pub label: Label,
    pub result: Result<Balance, CabbageError>,
}

#[derive(Debug)]
/// Per-account results of a balance refresh, in the order the accounts were given.
pub struct BalanceReport {
    outcomes: Vec<AccountOutcome>,
}

impl BalanceReport {
    pub(crate) fn new(outcomes: Vec<AccountOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[AccountOutcome] {
        &self.outcomes
    }

    /// Balances fetched successfully in this round.
    pub fn balances(&self) -> impl Iterator<Item = (AccountId, Balance)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok().map(|it| (outcome.id, *it)))
    }

    /// First failed account in account order.
    pub fn first_failure(&self) -> Option<&AccountOutcome> {
        self.outcomes.iter().find(|outcome| outcome.result.is_err())
    }

    /// Collapse into the fetched balances, or the first failure tagged with its account label.
    pub fn into_result(self) -> Result<Vec<(AccountId, Balance)>, CabbageError> {
        let mut balances = Vec::with_capacity(self.outcomes.len());
        for outcome in self.outcomes {
            match outcome.result {
                Ok(balance) => balances.push((outcome.id, balance)),
                Err(err) => {
                    return Err(CabbageError::Account {
                        label: outcome.label,
                        source: Box::new(err),
                    });
                }
            }
        }
        Ok(balances)
    }
}
