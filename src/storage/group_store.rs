use crate::core::balances::Balances;
use crate::core::entry::{Expense, Payment};
use crate::core::error::{LedgerError, StoreError};
use crate::core::group::Group;
use crate::core::member::MemberId;
use crate::optimization::balance_engine::BalanceEngine;
use crate::optimization::settlement::{SettlementPlan, SettlementPlanner};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Groups keyed by name, mirrored to a JSON file.
///
/// The file is read once when the store is opened and rewritten in full
/// after every successful mutation. A missing or unreadable file yields an
/// empty store. A failed mutation leaves both memory and disk untouched.
///
/// # Examples
///
/// ```
/// use fairsplit::core::member::MemberId;
/// use fairsplit::storage::group_store::GroupStore;
/// use rust_decimal_macros::dec;
///
/// let mut store = GroupStore::in_memory();
/// store.create_group("Trip", vec!["A".into(), "B".into()]).unwrap();
/// store.add_expense("Trip", &MemberId::new("A"), dec!(20), "Fuel", None).unwrap();
///
/// let balances = store.balances("Trip").unwrap();
/// assert_eq!(balances.get(&MemberId::new("B")), dec!(-10));
/// ```
#[derive(Debug)]
pub struct GroupStore {
    path: Option<PathBuf>,
    groups: BTreeMap<String, Group>,
}

impl GroupStore {
    /// Open the store backed by `path`, recovering to empty state if the
    /// file is missing or corrupt.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let groups = load_groups(&path);
        Self {
            path: Some(path),
            groups,
        }
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            groups: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Look up a group by name.
    pub fn group(&self, name: &str) -> Result<&Group, LedgerError> {
        self.groups
            .get(name.trim())
            .ok_or_else(|| LedgerError::GroupNotFound(name.trim().to_string()))
    }

    /// Create a new group. Names must be unique across the store.
    pub fn create_group(
        &mut self,
        name: &str,
        members: Vec<MemberId>,
    ) -> Result<&Group, LedgerError> {
        let group = Group::new(name, members)?;
        let key = group.name().to_string();
        if self.groups.contains_key(&key) {
            return Err(LedgerError::DuplicateGroup(key));
        }

        self.groups.insert(key.clone(), group);
        if let Err(e) = self.save() {
            self.groups.remove(&key);
            return Err(e.into());
        }
        info!("created group '{}'", key);
        Ok(&self.groups[&key])
    }

    /// Append an equally split expense to a group.
    ///
    /// `involved` defaults to every member of the group when `None`.
    pub fn add_expense(
        &mut self,
        group: &str,
        paid_by: &MemberId,
        amount: Decimal,
        description: &str,
        involved: Option<Vec<MemberId>>,
    ) -> Result<Expense, LedgerError> {
        let expense = self.update(group, |g| {
            g.add_expense(paid_by, amount, description, involved)
                .map(Expense::clone)
        })?;
        info!(
            "group '{}': {} paid {} for '{}'",
            group.trim(),
            paid_by,
            amount,
            expense.description()
        );
        Ok(expense)
    }

    /// Append an expense with explicit shares to a group.
    pub fn add_prepared_expense(
        &mut self,
        group: &str,
        expense: Expense,
    ) -> Result<Expense, LedgerError> {
        self.update(group, |g| g.add_prepared_expense(expense).map(Expense::clone))
    }

    /// Record a direct payment between two members of a group.
    pub fn record_payment(
        &mut self,
        group: &str,
        payer: &MemberId,
        payee: &MemberId,
        amount: Decimal,
    ) -> Result<Payment, LedgerError> {
        let payment = self.update(group, |g| {
            g.record_payment(payer, payee, amount).map(Payment::clone)
        })?;
        info!(
            "group '{}': {} paid {} to {}",
            group.trim(),
            payer,
            amount,
            payee
        );
        Ok(payment)
    }

    /// Current balances of a group, recomputed from its ledger.
    pub fn balances(&self, group: &str) -> Result<Balances, LedgerError> {
        BalanceEngine::compute_balances(self.group(group)?)
    }

    /// Settlement plan for a group's current balances.
    pub fn settle(
        &self,
        group: &str,
        planner: &SettlementPlanner,
    ) -> Result<SettlementPlan, LedgerError> {
        Ok(planner.plan(&self.balances(group)?))
    }

    /// Apply `f` to a copy of the named group, then commit and persist.
    ///
    /// The group is written back under the key it was found by.
    fn update<T>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Group) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let key = name.trim().to_string();
        let mut updated = self.group(&key)?.clone();
        let out = f(&mut updated)?;

        let previous = self.groups.insert(key.clone(), updated);
        if let Err(e) = self.save() {
            if let Some(previous) = previous {
                self.groups.insert(key, previous);
            }
            return Err(e.into());
        }
        Ok(out)
    }

    fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&self.groups)?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, json)?;
        fs::rename(&staging, path)?;
        debug!("saved {} group(s) to {}", self.groups.len(), path.display());
        Ok(())
    }
}

fn load_groups(path: &Path) -> BTreeMap<String, Group> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("no group store at {}, starting empty", path.display());
            return BTreeMap::new();
        }
        Err(e) => {
            warn!("cannot read group store {}: {}; starting empty", path.display(), e);
            return BTreeMap::new();
        }
    };

    match serde_json::from_str::<BTreeMap<String, Group>>(&content) {
        Ok(groups) => {
            debug!("loaded {} group(s) from {}", groups.len(), path.display());
            groups
        }
        Err(e) => {
            warn!("group store {} is corrupt: {}; starting empty", path.display(), e);
            BTreeMap::new()
        }
    }
}
