/// Errors raised at the edges of the address model.
///
/// Queries on an [`Address`](crate::Address) never fail; these only come
/// out of parsing text and converting to or from OS representations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("missing port in {input:?}")]
    MissingPort { input: String },

    #[error("bad port {port:?} in {input:?}")]
    BadPort { input: String, port: String },

    #[error("unterminated '[' in {input:?}")]
    UnclosedBracket { input: String },

    #[error("invalid address {addr}: {reason}")]
    Invalid { addr: String, reason: &'static str },

    #[error("unsupported address family: {}", family_to_str(*.family))]
    UnsupportedFamily { family: i32 },

    #[error("sockaddr too short: {len} bytes")]
    Truncated { len: u32 },
}

/// Converts a raw family tag to a human-readable string.
fn family_to_str(family: i32) -> String {
    match family {
        libc::AF_UNSPEC => "AF_UNSPEC".into(),
        libc::AF_UNIX => "AF_UNIX".into(),
        libc::AF_INET => "AF_INET".into(),
        libc::AF_INET6 => "AF_INET6".into(),
        _ => format!("family {}", family),
    }
}

impl From<AddressError> for std::io::Error {
    fn from(err: AddressError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
    }
}
