pub mod networks;
pub mod rpc_client;
pub mod signer;
pub mod types;
