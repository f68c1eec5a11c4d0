//! Constructor IDs for definitions written without an explicit `#id`.

/// CRC32 of the normalised definition line, `= Type` included.
///
/// Normalisation follows Telegram's schema tooling: the `#id` and trailing
/// `;` are dropped, `bytes` hashes as `string`, `flags.N?true` parameters are
/// left out, generic brackets become spaces and whitespace collapses to
/// single spaces.
pub(crate) fn tl_id(definition: &str) -> u32 {
    crc32(normalize(definition).as_bytes())
}

fn normalize(definition: &str) -> String {
    let definition = definition.trim().trim_end_matches(';');
    let mut tokens: Vec<String> = Vec::new();
    for (i, token) in definition
        .replace('<', " ")
        .replace(['>', '{', '}'], "")
        .split_whitespace()
        .enumerate()
    {
        if i == 0 {
            tokens.push(token.split('#').next().unwrap_or(token).to_owned());
            continue;
        }
        if token.contains("?true") {
            continue;
        }
        tokens.push(token.replace(":bytes", ":string").replace("?bytes", "?string"));
    }
    tokens.join(" ")
}

/// CRC-32/ISO-HDLC, bitwise.
fn crc32(data: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_bool_ids() {
        assert_eq!(tl_id("boolFalse = Bool"), 0xbc799737);
        assert_eq!(tl_id("boolTrue = Bool;"), 0x997275b5);
    }

    #[test]
    fn hashes_the_result_type() {
        assert_eq!(tl_id("inputPeerUser user_id:long access_hash:long = InputPeer"), 0xdde8a54c);
        assert_ne!(tl_id("a x:int = T"), tl_id("a x:int = U"));
    }

    #[test]
    fn normalises_before_hashing() {
        assert_eq!(
            tl_id("a  flags:# x:flags.0?true y:bytes = T;"),
            tl_id("a flags:# y:string = T"),
        );
        assert_eq!(
            tl_id("photoStrippedSize type:string bytes:bytes = PhotoSize"),
            0xe0b0bc2e,
        );
        assert_eq!(normalize("v x:Vector<long> = T"), "v x:Vector long = T");
    }

    #[test]
    fn check_value() {
        assert_eq!(crc32(b"123456789"), 0xcbf43926);
    }
}
