use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::SocketAddr;
use std::str::FromStr;

use crate::addr::{
	Family, IpStorage, LOCAL_IP, INVALID_PORT, Port, TextIp,
	has_valid_port, is_valid_ipv4, is_valid_ipv6, parse_ipv4, parse_ipv6,
};
use crate::error::AddressError;

/// Network endpoint: an IP and a port.
///
/// Both halves are stored as given and validated only when asked, so any
/// `(ip, port)` pair can be held. `S` picks how the IP is stored:
/// [`TextIp`] (the default) or [`SockIp`](crate::SockIp).
///
/// The default value is the cleared address: empty IP, [`INVALID_PORT`].
///
/// # Example
///
/// ```
/// # use inetaddr::{Address, Family};
/// let addr: Address = Address::new("2001:db8::1", 8443);
/// assert_eq!(addr.family(), Family::Ipv6);
/// assert!(addr.is_valid());
/// assert_eq!(addr.to_string(), "[2001:db8::1]:8443");
/// ```
#[derive(Clone)]
pub struct Address<S: IpStorage = TextIp> {
	ip: S,
	port: Port,
}

impl<S: IpStorage> Address<S> {
	/// Creates an address from an IP literal and a port.
	pub fn new(ip: &str, port: Port) -> Self {
		let mut addr = Self::default();
		addr.set_ip(ip);
		addr.set_port(port);
		addr
	}

	/// Creates a loopback address (`127.0.0.1`) on `port`.
	pub fn localhost(port: Port) -> Self {
		Self::new(LOCAL_IP, port)
	}

	/// Returns the IP as text.
	///
	/// With [`TextIp`] this is exactly what was set. With
	/// [`SockIp`](crate::SockIp) valid literals come back in canonical form,
	/// so `"0:0:0:0:0:0:0:1"` reads back as `"::1"`; the set/get round trip
	/// is lossless only for [`TextIp`].
	pub fn ip(&self) -> Cow<'_, str> {
		self.ip.ip()
	}

	/// Returns the port.
	pub fn port(&self) -> Port {
		self.port
	}

	/// Returns the backing IP storage.
	pub fn storage(&self) -> &S {
		&self.ip
	}

	pub fn family(&self) -> Family {
		self.ip.family()
	}

	/// True if both the IP and the port are valid.
	pub fn is_valid(&self) -> bool {
		self.has_valid_ip() && self.has_valid_port()
	}

	/// True if the IP matches the grammar of its family.
	pub fn has_valid_ip(&self) -> bool {
		match self.family() {
			Family::Ipv4 => is_valid_ipv4(&self.ip()),
			Family::Ipv6 => is_valid_ipv6(&self.ip()),
			Family::Unknown => false,
		}
	}

	/// True if the port lies in `[MIN_VALID_PORT, MAX_VALID_PORT]`.
	pub fn has_valid_port(&self) -> bool {
		has_valid_port(self.port)
	}

	/// Replaces the IP. Invalid text is accepted and stored.
	pub fn set_ip(&mut self, ip: &str) {
		self.ip.store(ip);
	}

	/// Replaces the port. Out-of-range values are accepted and stored.
	pub fn set_port(&mut self, port: Port) {
		self.port = port;
	}

	/// Resets to the cleared address.
	pub fn clear(&mut self) {
		self.ip.clear();
		self.port = INVALID_PORT;
	}

	/// Moves the value out, leaving `self` cleared.
	pub fn take(&mut self) -> Self {
		std::mem::take(self)
	}

	/// Re-stores this address in another backend.
	pub fn convert<T: IpStorage>(&self) -> Address<T> {
		Address::new(&self.ip(), self.port)
	}

	/// Converts to a `std::net::SocketAddr` for the binding layer.
	///
	/// Needs a valid IP and a port that fits in `u16`; the port does not
	/// have to be in the valid range, so `RANDOM_PORT` converts.
	pub fn to_socket_addr(&self) -> Result<SocketAddr, AddressError> {
		let port = u16::try_from(self.port).map_err(|_| self.invalid("port out of range"))?;
		let ip = self.ip();
		let addr = match self.family() {
			Family::Ipv4 => parse_ipv4(&ip).map(|octets| SocketAddr::from((octets, port))),
			Family::Ipv6 => parse_ipv6(&ip).map(|octets| SocketAddr::from((octets, port))),
			Family::Unknown => None,
		};
		addr.ok_or_else(|| self.invalid("not an IP literal"))
	}

	fn invalid(&self, reason: &'static str) -> AddressError {
		AddressError::Invalid { addr: self.to_string(), reason }
	}
}

impl<S: IpStorage> Default for Address<S> {
	fn default() -> Self {
		Self {
			ip: S::default(),
			port: INVALID_PORT,
		}
	}
}

impl<A: IpStorage, B: IpStorage> PartialEq<Address<B>> for Address<A> {
	fn eq(&self, other: &Address<B>) -> bool {
		self.port == other.port && self.ip() == other.ip()
	}
}

impl<S: IpStorage> Eq for Address<S> {}

impl<S: IpStorage> Hash for Address<S> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.ip().hash(state);
		self.port.hash(state);
	}
}

impl<S: IpStorage> fmt::Debug for Address<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Address")
			.field("ip", &self.ip())
			.field("port", &self.port)
			.field("family", &self.family())
			.finish()
	}
}

/// Canonical rendering:
/// - IPv4: `192.0.2.1:8080`
/// - IPv6: `[2001:db8::1]:8080`
/// - anything else: `Invalid_IP(text):port`, with the port written as
///   `Invalid_Port(n)` when it is out of range
impl<S: IpStorage> fmt::Display for Address<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let ip = self.ip();
		match self.family() {
			Family::Ipv4 => write!(f, "{}:{}", ip, self.port),
			Family::Ipv6 => write!(f, "[{}]:{}", ip, self.port),
			Family::Unknown if self.has_valid_port() => write!(f, "Invalid_IP({}):{}", ip, self.port),
			Family::Unknown => write!(f, "Invalid_IP({}):Invalid_Port({})", ip, self.port),
		}
	}
}

/// Parses `ip:port` or `[ip]:port`.
///
/// Only the shape is checked: `"bad:80"` parses into an address whose
/// family is `Unknown`. IPv6 literals must be bracketed, and only IPv6
/// literals may be: `"[192.0.2.1]:80"` is rejected.
impl<S: IpStorage> FromStr for Address<S> {
	type Err = AddressError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let missing_port = || AddressError::MissingPort { input: s.to_owned() };

		let (ip, port) = match s.strip_prefix('[') {
			Some(rest) => {
				let (ip, rest) = rest
					.split_once(']')
					.ok_or_else(|| AddressError::UnclosedBracket { input: s.to_owned() })?;
				if !is_valid_ipv6(ip) {
					return Err(AddressError::Invalid {
						addr: s.to_owned(),
						reason: "only IPv6 literals are bracketed",
					});
				}
				(ip, rest.strip_prefix(':').ok_or_else(missing_port)?)
			}
			None => {
				let (ip, port) = s.rsplit_once(':').ok_or_else(missing_port)?;
				if ip.contains(':') {
					return Err(AddressError::Invalid {
						addr: s.to_owned(),
						reason: "IPv6 literal must be bracketed",
					});
				}
				(ip, port)
			}
		};

		let port = port.parse::<Port>().map_err(|_| AddressError::BadPort {
			input: s.to_owned(),
			port: port.to_owned(),
		})?;
		Ok(Self::new(ip, port))
	}
}

impl<S: IpStorage> From<SocketAddr> for Address<S> {
	fn from(addr: SocketAddr) -> Self {
		Self::new(&addr.ip().to_string(), Port::from(addr.port()))
	}
}
