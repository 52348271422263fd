//! Storage-related types for the platform core.

use std::str::FromStr;

/// Storage tables for the data collections the core owns.
///
/// This enum provides type safety for storage operations by replacing
/// string literals with strongly typed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageTable {
	/// Table holding order records keyed by order id.
	Orders,
	/// Table holding search popularity partitions keyed by region.
	Searches,
}

impl StorageTable {
	/// Returns the string representation of the table name.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageTable::Orders => "orders",
			StorageTable::Searches => "searches",
		}
	}

	/// Returns an iterator over all StorageTable variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[Self::Orders, Self::Searches].into_iter()
	}
}

impl FromStr for StorageTable {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"orders" => Ok(Self::Orders),
			"searches" => Ok(Self::Searches),
			_ => Err(()),
		}
	}
}

impl From<StorageTable> for &'static str {
	fn from(table: StorageTable) -> Self {
		table.as_str()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn names_roundtrip() {
		for table in StorageTable::all() {
			assert_eq!(table.as_str().parse::<StorageTable>(), Ok(table));
		}
		assert!("menus".parse::<StorageTable>().is_err());
	}
}
