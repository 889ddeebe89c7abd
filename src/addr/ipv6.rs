use crate::addr::{Domain, Family};
use crate::addr::ipv4::{format_ipv4, parse_ipv4};

/// IPv6 address family marker.
///
/// Addresses in this family are 128 bits wide (e.g., ::1).
pub struct Ipv6;

impl Domain for Ipv6 {
	type Octets = [u8; 16];

	const FAMILY: Family = Family::Ipv6;

	#[inline]
	fn parse(text: &str) -> Option<[u8; 16]> {
		parse_ipv6(text)
	}

	#[inline]
	fn format(octets: &[u8; 16]) -> String {
		format_ipv6(octets)
	}
}

/// Returns true if `text` is an IPv6 literal in RFC 4291 textual form.
///
/// `::`, `::1` and `0:0:0:0:0:0:0:1` are all accepted.
pub fn is_valid_ipv6(text: &str) -> bool {
	parse_ipv6(text).is_some()
}

/// Parses an RFC 4291 IPv6 literal into its octets.
///
/// Accepts eight groups of 1-4 hex digits, or fewer groups around a single
/// `::`. The last 32 bits may be written as a dotted quad. Zone suffixes
/// (`%eth0`), brackets and whitespace are rejected.
pub fn parse_ipv6(text: &str) -> Option<[u8; 16]> {
	let mut groups = [0u16; 8];

	match text.find("::") {
		None => {
			if parse_groups(text, &mut groups, true)? != 8 {
				return None;
			}
		}
		Some(at) => {
			let (head, tail) = (&text[..at], &text[at + 2..]);
			if tail.contains("::") {
				return None;
			}
			let mut front = [0u16; 8];
			let mut back = [0u16; 8];
			let n_front = if head.is_empty() { 0 } else { parse_groups(head, &mut front, false)? };
			let n_back = if tail.is_empty() { 0 } else { parse_groups(tail, &mut back, true)? };
			// "::" stands for at least one zero group
			if n_front + n_back > 7 {
				return None;
			}
			groups[..n_front].copy_from_slice(&front[..n_front]);
			groups[8 - n_back..].copy_from_slice(&back[..n_back]);
		}
	}

	let mut octets = [0u8; 16];
	for (i, group) in groups.iter().enumerate() {
		octets[2 * i..2 * i + 2].copy_from_slice(&group.to_be_bytes());
	}
	Some(octets)
}

/// Parses colon-separated groups into `out`, returning how many were written.
///
/// With `dotted_tail`, the final piece may be a dotted quad counting as two
/// groups.
fn parse_groups(part: &str, out: &mut [u16; 8], dotted_tail: bool) -> Option<usize> {
	let mut count = 0;
	let mut pieces = part.split(':').peekable();
	while let Some(piece) = pieces.next() {
		if dotted_tail && pieces.peek().is_none() && piece.contains('.') {
			let [a, b, c, d] = parse_ipv4(piece)?;
			if count + 2 > out.len() {
				return None;
			}
			out[count] = u16::from_be_bytes([a, b]);
			out[count + 1] = u16::from_be_bytes([c, d]);
			count += 2;
		} else {
			if count == out.len() {
				return None;
			}
			out[count] = parse_hextet(piece)?;
			count += 1;
		}
	}
	Some(count)
}

fn parse_hextet(piece: &str) -> Option<u16> {
	if piece.is_empty() || piece.len() > 4 || !piece.bytes().all(|b| b.is_ascii_hexdigit()) {
		return None;
	}
	u16::from_str_radix(piece, 16).ok()
}

/// Renders octets in RFC 5952 canonical form.
///
/// Lowercase hex, no leading zeros, the longest run of two or more zero
/// groups collapsed to `::` (leftmost on ties). IPv4-mapped addresses keep
/// their dotted tail (`::ffff:192.0.2.1`).
pub fn format_ipv6(octets: &[u8; 16]) -> String {
	if octets[..10].iter().all(|&b| b == 0) && octets[10] == 0xff && octets[11] == 0xff {
		return format!("::ffff:{}", format_ipv4(&[octets[12], octets[13], octets[14], octets[15]]));
	}

	let groups: [u16; 8] = std::array::from_fn(|i| u16::from_be_bytes([octets[2 * i], octets[2 * i + 1]]));
	let join = |groups: &[u16]| {
		groups.iter().map(|g| format!("{:x}", g)).collect::<Vec<_>>().join(":")
	};

	match longest_zero_run(&groups) {
		Some((start, len)) => format!("{}::{}", join(&groups[..start]), join(&groups[start + len..])),
		None => join(&groups),
	}
}

/// Finds the longest run (length >= 2) of zero groups as `(start, len)`.
fn longest_zero_run(groups: &[u16; 8]) -> Option<(usize, usize)> {
	let mut best: Option<(usize, usize)> = None;
	let mut i = 0;
	while i < groups.len() {
		if groups[i] != 0 {
			i += 1;
			continue;
		}
		let start = i;
		while i < groups.len() && groups[i] == 0 {
			i += 1;
		}
		let len = i - start;
		if len >= 2 && best.is_none_or(|(_, best_len)| len > best_len) {
			best = Some((start, len));
		}
	}
	best
}

/*
RFC 4291 section 2.2 text forms, all accepted here:
  1. x:x:x:x:x:x:x:x          full, 1-4 hex digits per group
  2. x:x::x                   one "::" standing for 1+ zero groups
  3. x:x:x:x:x:x:d.d.d.d      low 32 bits as a dotted quad (also after "::")

Rejected: ":::", two "::" runs, a lone leading/trailing ':' ("1::2:", ":1::2"),
groups of 5+ digits, nine or more groups, "%zone" suffixes.
*/

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_special_literals() {
		assert!(is_valid_ipv6("::"));
		assert!(is_valid_ipv6("::1"));
		assert!(is_valid_ipv6("0:0:0:0:0:0:0:1"));
		assert_eq!(parse_ipv6("::1"), parse_ipv6("0:0:0:0:0:0:0:1"));
		assert_eq!(parse_ipv6("::"), Some([0; 16]));
	}

	#[test]
	fn accepts_full_and_compressed_forms() {
		for text in [
			"2001:0db8:85a3:0000:0000:8a2e:0370:7334",
			"2001:db8:85a3:0:0:8A2E:370:7334",
			"2001:db8::1",
			"fe80::",
			"::ffff:192.0.2.1",
			"64:ff9b::192.0.2.33",
			"1:2:3:4:5:6:7::",
			"::2:3:4:5:6:7:8",
			"1:2:3:4:5:6:1.2.3.4",
			"1::8",
		] {
			assert!(is_valid_ipv6(text), "{text}");
		}
	}

	#[test]
	fn rejects_malformed_literals() {
		for text in [
			"",
			":",
			":::",
			"1:::2",
			"1::2::3",
			"1:2:3:4:5:6:7:8:9",
			"1:2:3:4:5:6:7",
			"1:2:3:4:5:6:7:8::",
			"::1:2:3:4:5:6:7:8",
			":1:2:3:4:5:6:7",
			"1:2:3:4:5:6:7:",
			"12345::1",
			"g::1",
			"fe80::1%eth0",
			"[::1]",
			" ::1",
			"::1 ",
			"1.2.3.4",
			"::1.2.3",
			"1.2.3.4::",
			"1:2:3:4:5:6:7:1.2.3.4",
			"1:2:",
			":1:2:",
			"0",
		] {
			assert!(!is_valid_ipv6(text), "{text}");
		}
	}

	#[test]
	fn parses_to_network_order_octets() {
		let octets = parse_ipv6("2001:db8::ff00:42:8329").unwrap();
		assert_eq!(&octets[..4], &[0x20, 0x01, 0x0d, 0xb8]);
		assert_eq!(&octets[10..], &[0xff, 0x00, 0x00, 0x42, 0x83, 0x29]);

		let mapped = parse_ipv6("::ffff:192.0.2.1").unwrap();
		assert_eq!(&mapped[10..], &[0xff, 0xff, 192, 0, 2, 1]);
	}

	#[test]
	fn formats_canonically() {
		let canon = |text: &str| format_ipv6(&parse_ipv6(text).unwrap());
		assert_eq!(canon("0:0:0:0:0:0:0:1"), "::1");
		assert_eq!(canon("::"), "::");
		assert_eq!(canon("2001:0DB8:0000:0000:0000:0000:0000:0001"), "2001:db8::1");
		assert_eq!(canon("2001:db8:0:1:1:1:1:1"), "2001:db8:0:1:1:1:1:1");
		assert_eq!(canon("2001:0:0:1:0:0:0:1"), "2001:0:0:1::1");
		assert_eq!(canon("2001:db8:0:0:1:0:0:1"), "2001:db8::1:0:0:1");
		assert_eq!(canon("1:2:3:4:5:6:7::"), "1:2:3:4:5:6:7:0");
		assert_eq!(canon("fe80::"), "fe80::");
		assert_eq!(canon("::ffff:c000:0201"), "::ffff:192.0.2.1");
	}
}
