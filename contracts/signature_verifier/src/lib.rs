#![no_std]

use soroban_sdk::{contract, contractimpl, Bytes, BytesN, Env};

/// Ed25519 verification exposed as a contract so callers can observe a
/// mismatch through `try_verify` instead of trapping.
#[contract]
pub struct SignatureVerifier;

#[contractimpl]
impl SignatureVerifier {
    /// Verify `signature` over `message` for `public_key`. Traps on mismatch.
    pub fn verify(env: Env, public_key: BytesN<32>, message: Bytes, signature: BytesN<64>) {
        env.crypto()
            .ed25519_verify(&public_key, &message, &signature);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};
    use soroban_sdk::{Bytes, BytesN, Env};

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[7u8; 32])
    }

    #[test]
    fn test_valid_signature() {
        let env = Env::default();
        let contract_id = env.register(SignatureVerifier, ());
        let client = SignatureVerifierClient::new(&env, &contract_id);

        let key = signing_key();
        let digest = [42u8; 32];
        let signature = key.sign(&digest);

        client.verify(
            &BytesN::from_array(&env, &key.verifying_key().to_bytes()),
            &Bytes::from_array(&env, &digest),
            &BytesN::from_array(&env, &signature.to_bytes()),
        );
    }

    #[test]
    fn test_tampered_message_rejected() {
        let env = Env::default();
        let contract_id = env.register(SignatureVerifier, ());
        let client = SignatureVerifierClient::new(&env, &contract_id);

        let key = signing_key();
        let signature = key.sign(&[42u8; 32]);

        let result = client.try_verify(
            &BytesN::from_array(&env, &key.verifying_key().to_bytes()),
            &Bytes::from_array(&env, &[43u8; 32]),
            &BytesN::from_array(&env, &signature.to_bytes()),
        );
        assert!(result.is_err());
    }
}
