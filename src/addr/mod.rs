//! Endpoint addresses and the rules that classify them.
//!
//! Two families are recognised:
//! - `Ipv4`: dotted-decimal literals (e.g. `192.0.2.1`)
//! - `Ipv6`: colon-hextet literals (e.g. `2001:db8::1`)
//!
//! Anything else is `Family::Unknown`. The family of a text value is decided
//! by which grammar it matches, so "is IPv4" and "is a valid IPv4 literal"
//! are the same question.

mod address;
mod ipv4;
mod ipv6;
mod raw;
mod storage;
pub use self::address::Address;
pub use self::ipv4::{Ipv4, is_valid_ipv4, parse_ipv4, format_ipv4};
pub use self::ipv6::{Ipv6, is_valid_ipv6, parse_ipv6, format_ipv6};
pub use self::raw::{FromSockAddr, ToSockAddr};
pub use self::storage::{IpStorage, SockIp, TextIp};

/// Port number. Wider than `u16` so that sentinels and out-of-range values
/// can be stored and reported as invalid instead of being rejected.
pub type Port = i32;

/// Lets the OS pick the port when binding.
pub const RANDOM_PORT: Port = 0;
/// Marks an address whose port has not been set.
pub const INVALID_PORT: Port = -1;
/// Lowest port accepted by [`has_valid_port`].
pub const MIN_VALID_PORT: Port = 1024;
/// Highest port accepted by [`has_valid_port`].
pub const MAX_VALID_PORT: Port = 65535;

/// Loopback literal used by [`Address::localhost`].
pub const LOCAL_IP: &str = "127.0.0.1";
/// Placeholder literal for "no particular interface".
pub const INVALID_IP: &str = "0.0.0.0";

/// Protocol family of an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
	Ipv4,
	Ipv6,
	Unknown,
}

impl Family {
	/// Returns the libc constant for this family.
	///
	/// `Unknown` maps to `AF_UNSPEC`.
	#[inline]
	pub fn raw(self) -> libc::c_int {
		match self {
			Family::Ipv4 => libc::AF_INET,
			Family::Ipv6 => libc::AF_INET6,
			Family::Unknown => libc::AF_UNSPEC,
		}
	}

	/// Maps a libc family tag back to a `Family`.
	///
	/// Every tag other than `AF_INET` and `AF_INET6` is `Unknown`.
	#[inline]
	pub fn from_raw(raw: libc::c_int) -> Self {
		match raw {
			libc::AF_INET => Family::Ipv4,
			libc::AF_INET6 => Family::Ipv6,
			_ => Family::Unknown,
		}
	}
}

/*
  The mapping:
  ┌─────────┬───────────┬───────────────┐
  │ Family  │ Constant  │ Value (Linux) │
  ├─────────┼───────────┼───────────────┤
  │ Ipv4    │ AF_INET   │ 2             │
  ├─────────┼───────────┼───────────────┤
  │ Ipv6    │ AF_INET6  │ 10            │
  ├─────────┼───────────┼───────────────┤
  │ Unknown │ AF_UNSPEC │ 0             │
  └─────────┴───────────┴───────────────┘
  Any other tag read from a sockaddr (AF_UNIX, AF_PACKET, ...) is Unknown.
*/

/// Trait for address family markers.
///
/// Each marker knows its family, its binary octet layout, and the grammar
/// that turns text into octets.
pub trait Domain {
	/// Binary form of an address in this family.
	type Octets: Copy;

	const FAMILY: Family;

	/// Parses a literal of this family, `None` if the text doesn't match.
	fn parse(text: &str) -> Option<Self::Octets>;

	/// Renders octets as a literal of this family.
	fn format(octets: &Self::Octets) -> String;

	/// Returns the libc constant for this address family.
	#[inline]
	fn raw() -> libc::c_int {
		Self::FAMILY.raw()
	}
}

/// Result of classifying a text IP.
///
/// The `Ipv4` and `Ipv6` variants only ever hold text that passed the
/// matching grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classified<'a> {
	Ipv4(&'a str),
	Ipv6(&'a str),
	Invalid(&'a str),
}

impl<'a> Classified<'a> {
	pub fn family(&self) -> Family {
		match self {
			Classified::Ipv4(_) => Family::Ipv4,
			Classified::Ipv6(_) => Family::Ipv6,
			Classified::Invalid(_) => Family::Unknown,
		}
	}

	/// Returns the classified text, valid or not.
	pub fn text(&self) -> &'a str {
		match *self {
			Classified::Ipv4(text) | Classified::Ipv6(text) | Classified::Invalid(text) => text,
		}
	}

	pub fn is_valid(&self) -> bool {
		!matches!(self, Classified::Invalid(_))
	}
}

/// Classifies `text` as IPv4, IPv6, or invalid.
///
/// IPv4 is tried first; the two grammars are disjoint (a dotted quad has no
/// colons, an IPv6 literal always has at least two).
pub fn classify(text: &str) -> Classified<'_> {
	if is_valid_ipv4(text) {
		Classified::Ipv4(text)
	} else if is_valid_ipv6(text) {
		Classified::Ipv6(text)
	} else {
		Classified::Invalid(text)
	}
}

/// Returns true if `port` lies in `[MIN_VALID_PORT, MAX_VALID_PORT]`.
///
/// `RANDOM_PORT` is settable but never valid.
#[inline]
pub fn has_valid_port(port: Port) -> bool {
	(MIN_VALID_PORT..=MAX_VALID_PORT).contains(&port)
}
