//! Pure cache reconciliation.
//!
//! Fetches for one location replace that location's slice of a collection and leave the
//! others alone, so the order in which locations finish does not matter.

use crate::gateway::{
	AssetMovement, EntryWithMeta, EthTransaction, LedgerAction, LimitedResponse, Location, Trade,
};
use crate::store::HistoricData;

use std::collections::HashSet;

/// A record that can be excluded from accounting by identifier
pub trait Ignorable {
	fn ignore_key(&self) -> String;
}

/// A record that belongs to one data source
pub trait Located {
	fn location(&self) -> &Location;
}

impl Ignorable for Trade {
	fn ignore_key(&self) -> String {
		self.trade_id.clone()
	}
}

impl Ignorable for AssetMovement {
	fn ignore_key(&self) -> String {
		self.identifier.clone()
	}
}

impl Ignorable for LedgerAction {
	fn ignore_key(&self) -> String {
		self.identifier.to_string()
	}
}

impl Ignorable for EthTransaction {
	fn ignore_key(&self) -> String {
		format!("{}{}{}", self.tx_hash, self.nonce, self.from_address)
	}
}

impl Located for Trade {
	fn location(&self) -> &Location {
		&self.location
	}
}

impl Located for AssetMovement {
	fn location(&self) -> &Location {
		&self.location
	}
}

impl Located for LedgerAction {
	fn location(&self) -> &Location {
		&self.location
	}
}

/// Replace the entries of `location` with `fetched`.
///
/// Entries of other locations keep their order and come first. `found` and `limit` are
/// taken from the response as is, not summed across locations.
pub fn merge_location<T: Located + Clone>(
	existing: &HistoricData<EntryWithMeta<T>>,
	location: &Location,
	fetched: LimitedResponse<EntryWithMeta<T>>,
) -> HistoricData<EntryWithMeta<T>> {
	let mut data: Vec<_> = existing
		.data
		.iter()
		.filter(|e| e.entry.location() != location)
		.cloned()
		.collect();
	data.extend(fetched.entries);

	HistoricData {
		data,
		found: fetched.entries_found,
		limit: fetched.entries_limit,
	}
}

/// Drop every entry of `location`, reducing `found` by the number removed.
pub fn remove_location<T: Located + Clone>(
	existing: &HistoricData<EntryWithMeta<T>>,
	location: &Location,
) -> HistoricData<EntryWithMeta<T>> {
	let data: Vec<_> = existing
		.data
		.iter()
		.filter(|e| e.entry.location() != location)
		.cloned()
		.collect();
	let removed = existing.data.len() - data.len();

	HistoricData {
		data,
		found: existing.found.saturating_sub(removed),
		limit: existing.limit,
	}
}

/// Set each entry's accounting flag to whether its key is in `ignored_ids`.
pub fn flag_ignored<T: Ignorable>(entries: &mut [EntryWithMeta<T>], ignored_ids: &[String]) {
	let ignored: HashSet<&str> = ignored_ids.iter().map(String::as_str).collect();
	for entry in entries {
		entry.ignored_in_accounting = ignored.contains(entry.entry.ignore_key().as_str());
	}
}

/// Copy of `existing` with flags re-derived from `ignored_ids`.
pub fn apply_ignored_flags<T: Ignorable + Clone>(
	existing: &HistoricData<EntryWithMeta<T>>,
	ignored_ids: &[String],
) -> HistoricData<EntryWithMeta<T>> {
	let mut updated = existing.clone();
	flag_ignored(&mut updated.data, ignored_ids);
	updated
}
