mod addr;
mod error;

pub use self::error::AddressError;
pub use self::addr::{Address, Family, Classified, Domain, Ipv4, Ipv6, Port,
					 IpStorage, TextIp, SockIp, ToSockAddr, FromSockAddr,
					 classify, has_valid_port,
					 is_valid_ipv4, parse_ipv4, format_ipv4,
					 is_valid_ipv6, parse_ipv6, format_ipv6};
pub use self::addr::{RANDOM_PORT, INVALID_PORT, MIN_VALID_PORT, MAX_VALID_PORT,
					 LOCAL_IP, INVALID_IP};
