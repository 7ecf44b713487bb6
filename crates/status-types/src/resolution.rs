//! Resolved status values produced by the status resolver.

use crate::OrderStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of deriving an order's status from the two contract reads.
///
/// Malformed chain data is kept distinguishable from "not yet available" so
/// callers decide whether to surface it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum StatusResolution {
	/// The inbox read has not produced data yet.
	#[default]
	Pending,
	/// The status label derived from the reads.
	Resolved(OrderStatus),
	/// The inbox reported a status code outside the active table.
	Invalid(u8),
}

impl StatusResolution {
	/// Returns the resolved status, if any.
	pub fn status(&self) -> Option<OrderStatus> {
		match self {
			StatusResolution::Resolved(status) => Some(*status),
			_ => None,
		}
	}

	/// Returns true if the status is resolved and terminal.
	pub fn is_terminal(&self) -> bool {
		self.status().is_some_and(|status| status.is_terminal())
	}
}

impl fmt::Display for StatusResolution {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StatusResolution::Pending => write!(f, "unresolved"),
			StatusResolution::Resolved(status) => write!(f, "{}", status),
			StatusResolution::Invalid(code) => write!(f, "invalid status code {}", code),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_accessors() {
		assert_eq!(StatusResolution::Pending.status(), None);
		assert_eq!(StatusResolution::Invalid(9).status(), None);
		assert_eq!(
			StatusResolution::Resolved(OrderStatus::Accepted).status(),
			Some(OrderStatus::Accepted)
		);

		assert!(StatusResolution::Resolved(OrderStatus::Claimed).is_terminal());
		assert!(!StatusResolution::Resolved(OrderStatus::Pending).is_terminal());
		assert!(!StatusResolution::Invalid(9).is_terminal());
	}

	#[test]
	fn test_display() {
		assert_eq!(StatusResolution::Pending.to_string(), "unresolved");
		assert_eq!(
			StatusResolution::Resolved(OrderStatus::Filled).to_string(),
			"filled"
		);
		assert_eq!(
			StatusResolution::Invalid(99).to_string(),
			"invalid status code 99"
		);
	}

	#[test]
	fn test_serialization_is_tagged() {
		let json = serde_json::to_value(StatusResolution::Resolved(OrderStatus::Pending)).unwrap();
		assert_eq!(json["kind"], "resolved");
		assert_eq!(json["value"], "pending");

		let json = serde_json::to_value(StatusResolution::Invalid(42)).unwrap();
		assert_eq!(json["kind"], "invalid");
		assert_eq!(json["value"], 42);
	}
}
