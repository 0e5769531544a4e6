/*
[INPUT]:  Split ECDSA signature parts (r, s, recovery id) as hex
[OUTPUT]: 65-byte Ethereum signature as 0x-prefixed hex
[POS]:    Auth layer - signature formatting for external signers
[UPDATE]: When signer output formats change
*/

use crate::http::{LoginError, Result};

/// Join `r`, `s` and a recovery id into `0x{r}{s}{v}`, where `v = id + 27`.
///
/// Remote signers return the recovery id as `00`/`01`; wallets expect 27/28.
pub fn format_ethereum_signature(r: &str, s: &str, v: &str) -> Result<String> {
    let r = scalar_hex(r, "r")?;
    let s = scalar_hex(s, "s")?;

    let v = v.trim_start_matches("0x");
    let recovery_id = u8::from_str_radix(v, 16)
        .map_err(|e| LoginError::InvalidSignature(format!("recovery id {v:?}: {e}")))?;
    let v = recovery_id.checked_add(27).ok_or_else(|| {
        LoginError::InvalidSignature(format!("recovery id {recovery_id} out of range"))
    })?;

    Ok(format!("0x{r}{s}{v:02x}"))
}

fn scalar_hex<'a>(value: &'a str, name: &str) -> Result<&'a str> {
    let value = value.trim_start_matches("0x");
    let bytes = hex::decode(value)
        .map_err(|e| LoginError::InvalidSignature(format!("{name} is not hex: {e}")))?;
    if bytes.len() != 32 {
        return Err(LoginError::InvalidSignature(format!(
            "{name} must be 32 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(value)
}
