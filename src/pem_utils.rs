use crate::error::{Result, TlsUtilsError};

fn encode_config() -> pem::EncodeConfig {
    pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF)
}

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    encode_pem_block(&pem)
}

/// Encode a PEM block, headers included, with LF line endings.
pub fn encode_pem_block(block: &pem::Pem) -> String {
    pem::encode_config(block, encode_config())
}

/// Decode the first PEM block found in `data`.
///
/// Text before the first `-----BEGIN` line is ignored.
pub fn decode_pem_block(data: impl AsRef<[u8]>) -> Result<pem::Pem> {
    let data = data.as_ref();
    if data.is_empty() {
        return Err(TlsUtilsError::DecodeError("input is empty".to_string()));
    }
    Ok(pem::parse(data)?)
}
