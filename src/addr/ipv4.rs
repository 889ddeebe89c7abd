use crate::addr::{Domain, Family};

/// IPv4 address family marker.
///
/// Addresses in this family are 32 bits wide (e.g., 192.168.1.1).
pub struct Ipv4;

impl Domain for Ipv4 {
	type Octets = [u8; 4];

	const FAMILY: Family = Family::Ipv4;

	#[inline]
	fn parse(text: &str) -> Option<[u8; 4]> {
		parse_ipv4(text)
	}

	#[inline]
	fn format(octets: &[u8; 4]) -> String {
		format_ipv4(octets)
	}
}

/// Returns true if `text` is a strict dotted-decimal IPv4 literal.
///
/// Exactly four groups, each `0..=255`, no leading zeros except a lone `0`,
/// nothing before or after.
pub fn is_valid_ipv4(text: &str) -> bool {
	parse_ipv4(text).is_some()
}

/// Parses a strict dotted-decimal IPv4 literal into its octets.
pub fn parse_ipv4(text: &str) -> Option<[u8; 4]> {
	let mut octets = [0u8; 4];
	let mut groups = text.split('.');
	for octet in octets.iter_mut() {
		*octet = parse_octet(groups.next()?)?;
	}
	match groups.next() {
		None => Some(octets),
		Some(_) => None,
	}
}

/// Renders octets as `a.b.c.d`.
pub fn format_ipv4(octets: &[u8; 4]) -> String {
	format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], octets[3])
}

fn parse_octet(group: &str) -> Option<u8> {
	let digits = group.as_bytes();
	if digits.is_empty() || digits.len() > 3 || !digits.iter().all(u8::is_ascii_digit) {
		return None;
	}
	if digits.len() > 1 && digits[0] == b'0' {
		return None;
	}
	let value = digits.iter().fold(0u16, |acc, &d| acc * 10 + u16::from(d - b'0'));
	u8::try_from(value).ok()
}

/*
Accepted octet shapes, left to right:
- 25[0-5]       250..=255
- 2[0-4]d       200..=249
- 1dd           100..=199
- [1-9]?d       0..=99, no leading zero
Three digits max keeps the fold inside u16 (999 at worst).
*/

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_dotted_quads() {
		for text in ["0.0.0.0", "127.0.0.1", "192.0.2.1", "255.255.255.255", "10.0.0.1", "1.22.199.250"] {
			assert!(is_valid_ipv4(text), "{text}");
		}
		assert_eq!(parse_ipv4("192.0.2.1"), Some([192, 0, 2, 1]));
	}

	#[test]
	fn rejects_out_of_range_octets() {
		assert!(!is_valid_ipv4("256.0.0.1"));
		assert!(!is_valid_ipv4("1.2.3.300"));
		assert!(!is_valid_ipv4("1.2.3.1000"));
	}

	#[test]
	fn rejects_wrong_group_count() {
		assert!(!is_valid_ipv4("1.2.3"));
		assert!(!is_valid_ipv4("1.2.3.4.5"));
		assert!(!is_valid_ipv4(""));
		assert!(!is_valid_ipv4("..."));
		assert!(!is_valid_ipv4("1.2.3."));
	}

	#[test]
	fn rejects_leading_zeros_and_garbage() {
		assert!(!is_valid_ipv4("01.2.3.4"));
		assert!(!is_valid_ipv4("1.2.3.00"));
		assert!(!is_valid_ipv4(" 1.2.3.4"));
		assert!(!is_valid_ipv4("1.2.3.4 "));
		assert!(!is_valid_ipv4("1.2.3.4\n"));
		assert!(!is_valid_ipv4("+1.2.3.4"));
		assert!(!is_valid_ipv4("1.2.3.4:80"));
		assert!(!is_valid_ipv4("a.b.c.d"));
		assert!(!is_valid_ipv4("１.2.3.4"));
	}

	#[test]
	fn formats_octets() {
		assert_eq!(format_ipv4(&[10, 0, 0, 255]), "10.0.0.255");
	}
}
