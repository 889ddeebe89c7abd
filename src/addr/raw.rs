use tracing::debug;

use crate::addr::{Address, Domain, Family, IpStorage, Ipv4, Ipv6, Port, parse_ipv4, parse_ipv6};
use crate::error::AddressError;

/// Trait for address types that can be handed to the OS as a raw sockaddr.
pub trait ToSockAddr {
	/// Calls the provided closure with a pointer to the raw sockaddr and its size.
	/// Returns None if the address has no OS form (unknown family, or a
	/// port outside `0..=65535`).
	fn with_raw<F, R>(&self, f: F) -> Option<R>
	where
		F: FnOnce(*const libc::sockaddr, libc::socklen_t) -> R;
}
/*
The sockaddr is built on with_raw's stack frame and only lives while the
closure runs, so sockaddr_in and sockaddr_in6 (different sizes) can share
one entry point without returning a dangling pointer:

	addr.with_raw(|ptr, len| unsafe { libc::bind(fd, ptr, len) })
*/

/// Trait for address types that can be created from a raw sockaddr.
pub trait FromSockAddr: Sized {
	/// Creates an address from raw sockaddr storage.
	///
	/// The family tag is read first and decides how the rest is read.
	///
	/// # Safety
	/// `addr` must point to at least `len` readable bytes.
	unsafe fn from_sockaddr(addr: *const libc::sockaddr, len: libc::socklen_t) -> Result<Self, AddressError>;
}

impl<S: IpStorage> ToSockAddr for Address<S> {
	fn with_raw<F, R>(&self, f: F) -> Option<R>
	where
		F: FnOnce(*const libc::sockaddr, libc::socklen_t) -> R,
	{
		let port = u16::try_from(self.port()).ok()?;
		match self.family() {
			Family::Ipv4 => {
				let octets = parse_ipv4(&self.ip())?;
				let raw = libc::sockaddr_in {
					sin_family: Ipv4::raw() as libc::sa_family_t,
					sin_port: port.to_be(),
					sin_addr: libc::in_addr {
						s_addr: u32::from_ne_bytes(octets),
					},
					sin_zero: [0; 8],
				};
				let ptr = &raw as *const _ as *const libc::sockaddr;
				let len = std::mem::size_of::<libc::sockaddr_in>() as libc::socklen_t;
				Some(f(ptr, len))
			}
			Family::Ipv6 => {
				let octets = parse_ipv6(&self.ip())?;
				let raw = libc::sockaddr_in6 {
					sin6_family: Ipv6::raw() as libc::sa_family_t,
					sin6_port: port.to_be(),
					sin6_flowinfo: 0,
					sin6_addr: libc::in6_addr {
						s6_addr: octets,
					},
					sin6_scope_id: 0,
				};
				let ptr = &raw as *const _ as *const libc::sockaddr;
				let len = std::mem::size_of::<libc::sockaddr_in6>() as libc::socklen_t;
				Some(f(ptr, len))
			}
			Family::Unknown => None,
		}
	}
}

impl<S: IpStorage> FromSockAddr for Address<S> {
	unsafe fn from_sockaddr(addr: *const libc::sockaddr, len: libc::socklen_t) -> Result<Self, AddressError> {
		if (len as usize) < std::mem::size_of::<libc::sa_family_t>() {
			return Err(AddressError::Truncated { len });
		}
		let tag = libc::c_int::from(unsafe { (*addr).sa_family });

		match Family::from_raw(tag) {
			Family::Ipv4 => {
				if (len as usize) < std::mem::size_of::<libc::sockaddr_in>() {
					return Err(AddressError::Truncated { len });
				}
				let raw = unsafe { &*(addr as *const libc::sockaddr_in) };
				let ip = Ipv4::format(&raw.sin_addr.s_addr.to_ne_bytes());
				Ok(Self::new(&ip, Port::from(u16::from_be(raw.sin_port))))
			}
			Family::Ipv6 => {
				if (len as usize) < std::mem::size_of::<libc::sockaddr_in6>() {
					return Err(AddressError::Truncated { len });
				}
				let raw = unsafe { &*(addr as *const libc::sockaddr_in6) };
				let ip = Ipv6::format(&raw.sin6_addr.s6_addr);
				Ok(Self::new(&ip, Port::from(u16::from_be(raw.sin6_port))))
			}
			Family::Unknown => {
				debug!(family = tag, "sockaddr has no IPv4/IPv6 form");
				Err(AddressError::UnsupportedFamily { family: tag })
			}
		}
	}
}
