use std::borrow::Cow;
use std::fmt;

use tracing::trace;

use crate::addr::{Domain, Family, Ipv4, Ipv6, classify};

/// Backing store for the IP half of an [`Address`](crate::Address).
///
/// `Default` must produce the cleared state, whose family is `Unknown`.
pub trait IpStorage: Clone + Default {
	/// Replaces the stored IP. Never fails; invalid text is kept as-is
	/// or recorded as rejected.
	fn store(&mut self, ip: &str);

	/// Returns the IP as text.
	fn ip(&self) -> Cow<'_, str>;

	/// Returns the family of the stored IP.
	fn family(&self) -> Family;

	/// Resets to the cleared state.
	fn clear(&mut self) {
		*self = Self::default();
	}
}

/// Keeps the IP as the text it was given.
///
/// Family is recomputed from the text on every query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TextIp(String);

impl TextIp {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl IpStorage for TextIp {
	fn store(&mut self, ip: &str) {
		self.0.clear();
		self.0.push_str(ip);
	}

	fn ip(&self) -> Cow<'_, str> {
		Cow::Borrowed(&self.0)
	}

	fn family(&self) -> Family {
		classify(&self.0).family()
	}

	fn clear(&mut self) {
		self.0.clear();
	}
}

/// Keeps the IP as a `sockaddr_storage`.
///
/// Family comes from the `ss_family` tag alone. Text that isn't an IPv4 or
/// IPv6 literal leaves the storage zeroed (`AF_UNSPEC`) and is remembered
/// only so it can be echoed back.
#[derive(Clone)]
pub struct SockIp {
	storage: libc::sockaddr_storage,
	rejected: String,
}

impl SockIp {
	/// Returns the raw storage. Only the family tag and address bytes are
	/// populated; the port is left at zero.
	pub fn as_storage(&self) -> &libc::sockaddr_storage {
		&self.storage
	}

	fn v4_octets(&self) -> [u8; 4] {
		// ss_family == AF_INET, so the storage holds a sockaddr_in
		let sin = unsafe { &*(&self.storage as *const libc::sockaddr_storage as *const libc::sockaddr_in) };
		sin.sin_addr.s_addr.to_ne_bytes()
	}

	fn v6_octets(&self) -> [u8; 16] {
		let sin6 = unsafe { &*(&self.storage as *const libc::sockaddr_storage as *const libc::sockaddr_in6) };
		sin6.sin6_addr.s6_addr
	}

	fn put_v4(&mut self, octets: [u8; 4]) {
		let sin = libc::sockaddr_in {
			sin_family: libc::AF_INET as libc::sa_family_t,
			sin_port: 0,
			sin_addr: libc::in_addr {
				s_addr: u32::from_ne_bytes(octets),
			},
			sin_zero: [0; 8],
		};
		// sockaddr_storage is large and aligned enough for any sockaddr
		unsafe {
			std::ptr::write(&mut self.storage as *mut libc::sockaddr_storage as *mut libc::sockaddr_in, sin);
		}
	}

	fn put_v6(&mut self, octets: [u8; 16]) {
		let sin6 = libc::sockaddr_in6 {
			sin6_family: libc::AF_INET6 as libc::sa_family_t,
			sin6_port: 0,
			sin6_flowinfo: 0,
			sin6_addr: libc::in6_addr {
				s6_addr: octets,
			},
			sin6_scope_id: 0,
		};
		unsafe {
			std::ptr::write(&mut self.storage as *mut libc::sockaddr_storage as *mut libc::sockaddr_in6, sin6);
		}
	}
}

impl Default for SockIp {
	fn default() -> Self {
		Self {
			storage: unsafe { std::mem::zeroed() },
			rejected: String::new(),
		}
	}
}

impl IpStorage for SockIp {
	fn store(&mut self, ip: &str) {
		self.clear();
		if let Some(octets) = Ipv4::parse(ip) {
			self.put_v4(octets);
		} else if let Some(octets) = Ipv6::parse(ip) {
			self.put_v6(octets);
		} else {
			trace!(ip, "not an IP literal, storage left as AF_UNSPEC");
			self.rejected.push_str(ip);
		}
	}

	fn ip(&self) -> Cow<'_, str> {
		match self.family() {
			Family::Ipv4 => Cow::Owned(Ipv4::format(&self.v4_octets())),
			Family::Ipv6 => Cow::Owned(Ipv6::format(&self.v6_octets())),
			Family::Unknown => Cow::Borrowed(&self.rejected),
		}
	}

	fn family(&self) -> Family {
		Family::from_raw(libc::c_int::from(self.storage.ss_family))
	}
}

impl fmt::Debug for SockIp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SockIp")
			.field("ss_family", &self.storage.ss_family)
			.field("ip", &self.ip())
			.finish()
	}
}

/*
SockIp layout after store():
- "192.0.2.1"   -> sockaddr_in  { AF_INET,  port 0, 192.0.2.1 }
- "2001:db8::1" -> sockaddr_in6 { AF_INET6, port 0, 2001:db8::1, flow 0, scope 0 }
- "bad"         -> all zero (AF_UNSPEC), rejected = "bad"
The port is owned by Address, not by the storage.
*/

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn text_keeps_input_verbatim() {
		let mut ip = TextIp::default();
		assert_eq!(ip.family(), Family::Unknown);

		ip.store("0:0:0:0:0:0:0:1");
		assert_eq!(ip.ip(), "0:0:0:0:0:0:0:1");
		assert_eq!(ip.family(), Family::Ipv6);

		ip.store(" junk ");
		assert_eq!(ip.as_str(), " junk ");
		assert_eq!(ip.family(), Family::Unknown);

		ip.clear();
		assert_eq!(ip, TextIp::default());
	}

	#[test]
	fn sock_reads_family_from_tag() {
		let mut ip = SockIp::default();
		assert_eq!(ip.family(), Family::Unknown);
		assert_eq!(ip.as_storage().ss_family, 0);

		ip.store("192.0.2.1");
		assert_eq!(ip.family(), Family::Ipv4);
		assert_eq!(libc::c_int::from(ip.as_storage().ss_family), libc::AF_INET);
		assert_eq!(ip.ip(), "192.0.2.1");

		ip.store("2001:0DB8::0001");
		assert_eq!(ip.family(), Family::Ipv6);
		assert_eq!(ip.ip(), "2001:db8::1");
	}

	#[test]
	fn sock_rejects_into_unspec() {
		let mut ip = SockIp::default();
		ip.store("10.0.0.1");
		ip.store("999.0.0.1");
		assert_eq!(ip.family(), Family::Unknown);
		assert_eq!(ip.as_storage().ss_family, 0);
		assert_eq!(ip.ip(), "999.0.0.1");

		ip.clear();
		assert_eq!(ip.ip(), "");
	}
}
