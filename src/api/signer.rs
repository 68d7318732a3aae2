use crate::Result;
use ethers::signers::{LocalWallet, Signer};
use ethers::utils::{hex, keccak256, to_checksum};

/// Name of the header carrying the output of [`sign_request`] (`X-Flashbots-Signature`).
pub const SIGNATURE_HEADER: &str = "x-flashbots-signature";

/// Text that gets personal-signed for a request body: the `0x`-prefixed hex of its keccak256 digest.
pub fn signed_message(body: &[u8]) -> String {
    format!("0x{}", hex::encode(keccak256(body)))
}

/// Signs an already serialized JSON-RPC request body.
///
/// The relay expects an EIP-191 signature over the *hex text* of the body digest,
/// not over the digest bytes nor over the body itself.
///
/// # Returns
///
/// The header value, `<checksummed address>:0x<signature>`.
///
/// # Errors
///
/// * [`crate::Error::Signing`] if the wallet fails to sign.
pub async fn sign_request(wallet: &LocalWallet, body: &[u8]) -> Result<String> {
    let signature = wallet.sign_message(signed_message(body)).await?;

    Ok(format!(
        "{}:0x{}",
        to_checksum(&wallet.address(), None),
        signature
    ))
}
