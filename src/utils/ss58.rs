//! SS58 address encoding for 32-byte account ids

use blake2::{Blake2b512, Digest};

const CHECKSUM_PREFIX: &[u8] = b"SS58PRE";
const CHECKSUM_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Ss58Error {
    #[error("invalid base58: {0}")]
    Base58(String),
    #[error("unsupported address length {0}")]
    Length(usize),
    #[error("address checksum mismatch")]
    Checksum,
    #[error("network prefix {0} out of range")]
    Prefix(u16),
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Blake2b512::new();
    hasher.update(CHECKSUM_PREFIX);
    hasher.update(payload);
    let hash = hasher.finalize();
    [hash[0], hash[1]]
}

fn prefix_bytes(prefix: u16) -> Result<Vec<u8>, Ss58Error> {
    match prefix {
        0..=63 => Ok(vec![prefix as u8]),
        64..=16383 => {
            let first = ((prefix & 0b0000_0000_1111_1100) as u8) >> 2;
            let second = ((prefix >> 8) as u8) | (((prefix & 0b0000_0000_0000_0011) as u8) << 6);
            Ok(vec![first | 0b0100_0000, second])
        }
        _ => Err(Ss58Error::Prefix(prefix)),
    }
}

/// Encode a public key as an SS58 address for the given network prefix
pub fn encode(account: &[u8; 32], prefix: u16) -> Result<String, Ss58Error> {
    let mut payload = prefix_bytes(prefix)?;
    payload.extend_from_slice(account);
    let check = checksum(&payload);
    payload.extend_from_slice(&check);
    Ok(bs58::encode(payload).into_string())
}

/// Decode an SS58 address into its network prefix and public key
pub fn decode(address: &str) -> Result<(u16, [u8; 32]), Ss58Error> {
    let data = bs58::decode(address)
        .into_vec()
        .map_err(|e| Ss58Error::Base58(e.to_string()))?;

    let prefix_len = match data.first() {
        Some(0..=63) => 1,
        Some(64..=127) => 2,
        _ => return Err(Ss58Error::Length(data.len())),
    };
    if data.len() != prefix_len + 32 + CHECKSUM_LEN {
        return Err(Ss58Error::Length(data.len()));
    }

    let (payload, check) = data.split_at(prefix_len + 32);
    if checksum(payload) != check {
        return Err(Ss58Error::Checksum);
    }

    let prefix = if prefix_len == 1 {
        payload[0] as u16
    } else {
        let lower = ((payload[0] << 2) | (payload[1] >> 6)) as u16;
        let upper = (payload[1] & 0b0011_1111) as u16;
        lower | (upper << 8)
    };

    let mut account = [0u8; 32];
    account.copy_from_slice(&payload[prefix_len..]);
    Ok((prefix, account))
}
