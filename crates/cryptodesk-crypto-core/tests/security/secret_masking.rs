//! Secret material must never appear in `Debug` output and must be wiped by
//! `zeroize`.

use cryptodesk_crypto_core::bignum::to_hex;
use cryptodesk_crypto_core::gost::KEY_LEN;
use cryptodesk_crypto_core::{generate_key_pair, GostCfb, GostIv, GostKey};
use zeroize::Zeroize;

#[test]
fn gost_key_debug_is_masked() {
    let key = GostKey::from_bytes(&[0xAB; KEY_LEN]).unwrap();
    let debug = format!("{key:?}");
    assert_eq!(debug, "GostKey(***)");
    assert!(!debug.to_lowercase().contains("ab"));
}

#[test]
fn cfb_state_debug_is_masked() {
    let key = GostKey::from_bytes(&[0x01; KEY_LEN]).unwrap();
    let iv = GostIv::from_bytes(&[0x02; 8]).unwrap();
    assert_eq!(format!("{:?}", GostCfb::new(&key, &iv)), "GostCfb(***)");
}

#[test]
fn rsa_private_exponent_never_printed() {
    let pair = generate_key_pair(128).expect("key generation should succeed");
    let d_hex = to_hex(pair.private_exponent());
    let d_dec = pair.private_exponent().to_string();

    for debug in [
        format!("{pair:?}"),
        format!("{:?}", pair.private_key()),
        format!("{:?}", pair.to_hex()),
    ] {
        assert!(debug.contains("***"), "mask missing in {debug}");
        assert!(!debug.contains(&d_hex), "d leaked (hex) in {debug}");
        assert!(!debug.contains(&d_dec), "d leaked (decimal) in {debug}");
    }
}

#[test]
fn gost_key_zeroize_wipes_bytes() {
    let mut key = GostKey::from_bytes(&[0xDE; KEY_LEN]).unwrap();
    key.zeroize();
    assert_eq!(key.expose(), &[0u8; KEY_LEN]);
}

#[test]
fn key_pair_hex_zeroize_clears_strings() {
    let mut exported = generate_key_pair(64).unwrap().to_hex();
    exported.zeroize();
    assert!(exported.private_exponent.is_empty());
    assert!(exported.modulus.is_empty());
}

#[test]
fn rsa_key_material_zeroize_clears_exponents() {
    let mut pair = generate_key_pair(64).expect("key generation should succeed");
    let mut private = pair.private_key();
    assert_ne!(pair.private_exponent().bits(), 0);

    pair.zeroize();
    private.zeroize();
    assert_eq!(pair.private_exponent().bits(), 0);
    assert_eq!(pair.modulus().bits(), 0);
    assert_eq!(private.modulus().bits(), 0);
    assert!(format!("{private:?}").contains("n_bits: 0"));
}

#[test]
fn rsa_secret_types_wipe_on_drop() {
    fn assert_zeroize_on_drop<T: zeroize::ZeroizeOnDrop>() {}
    assert_zeroize_on_drop::<cryptodesk_crypto_core::RsaKeyPair>();
    assert_zeroize_on_drop::<cryptodesk_crypto_core::RsaPrivateKey>();
    assert_zeroize_on_drop::<cryptodesk_crypto_core::KeyPairHex>();
}
