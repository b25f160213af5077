//! Validate signing, verification and recovery against k256.
//!
//! Both sides sign the same prehashed digests with RFC 6979 nonces and
//! low-S normalization, so signatures and recovery ids must match exactly.

use hdkey_crypto::secp256k1::scalar::Scalar;
use hdkey_crypto::{EcdsaSignature, KeyPair};

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::FieldBytes;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn random_key(rng: &mut ChaCha20Rng) -> [u8; 32] {
    loop {
        let mut bytes = [0u8; 32];
        rng.fill(&mut bytes);
        if matches!(Scalar::from_bytes(&bytes), Some(s) if !s.is_zero()) {
            return bytes;
        }
    }
}

fn random_digest(rng: &mut ChaCha20Rng) -> [u8; 32] {
    let mut digest = [0u8; 32];
    rng.fill(&mut digest);
    digest
}

#[test]
fn test_sign_matches_k256() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x5157);

    for _ in 0..16 {
        let key = random_key(&mut rng);
        let digest = random_digest(&mut rng);

        let ours = KeyPair::from_private_bytes(&key).unwrap().sign(&digest).unwrap();

        let signing_key = SigningKey::from_bytes(&FieldBytes::from(key)).unwrap();
        let (sig, recid) = signing_key.sign_prehash_recoverable(&digest).unwrap();
        let sig_bytes = sig.to_bytes();

        assert_eq!(&ours.r[..], &sig_bytes[..32], "r mismatch for key {}", hex::encode(key));
        assert_eq!(&ours.s[..], &sig_bytes[32..], "s mismatch for key {}", hex::encode(key));
        assert_eq!(ours.recovery_id(), Some(recid.to_byte()));
    }
}

#[test]
fn test_k256_verifies_our_signatures() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xfeed);

    for _ in 0..8 {
        let kp = KeyPair::from_private_bytes(&random_key(&mut rng)).unwrap();
        let digest = random_digest(&mut rng);
        let ours = kp.sign(&digest).unwrap();

        let verifying_key = VerifyingKey::from_sec1_bytes(&kp.public_key_bytes()).unwrap();
        let sig = Signature::from_scalars(ours.r, ours.s).unwrap();
        assert!(verifying_key.verify_prehash(&digest, &sig).is_ok());
    }
}

#[test]
fn test_we_verify_k256_signatures() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xabcd);

    for _ in 0..8 {
        let key = random_key(&mut rng);
        let digest = random_digest(&mut rng);

        let signing_key = SigningKey::from_bytes(&FieldBytes::from(key)).unwrap();
        let (sig, _) = signing_key.sign_prehash_recoverable(&digest).unwrap();
        let bytes = sig.to_bytes();

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        let kp = KeyPair::from_private_bytes(&key).unwrap();
        assert!(kp.verify(&digest, &EcdsaSignature::new(r, s)));
    }
}

#[test]
fn test_recovery_matches_k256() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x7ec0);

    for _ in 0..8 {
        let kp = KeyPair::from_private_bytes(&random_key(&mut rng)).unwrap();
        let digest = random_digest(&mut rng);
        let ours = kp.sign(&digest).unwrap();
        let rec_id = ours.recovery_id().unwrap();

        let recovered = KeyPair::recover_from_signature(rec_id, &ours, &digest, true)
            .unwrap()
            .unwrap();

        let sig = Signature::from_scalars(ours.r, ours.s).unwrap();
        let recid = RecoveryId::from_byte(rec_id).unwrap();
        let reference = VerifyingKey::recover_from_prehash(&digest, &sig, recid).unwrap();

        assert_eq!(
            recovered.public_key_bytes(),
            reference.to_encoded_point(true).as_bytes()
        );
    }
}
