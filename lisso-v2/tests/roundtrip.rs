use lisso_core::key::{PrivacyGuardKey, SsoKey};
use lisso_core::rand_core::OsRng;
use lisso_v2::{FormatError, FramedToken, SsoError, decode, encode};
use proptest::prelude::*;

fn arb_sso_key() -> impl Strategy<Value = SsoKey> {
    prop_oneof![
        any::<[u8; 16]>().prop_map(hex::encode),
        any::<[u8; 32]>().prop_map(hex::encode),
    ]
    .prop_map(|hex| SsoKey::from_hex(&hex).unwrap())
}

proptest! {
    #[test]
    fn round_trip(plaintext in any::<String>(), key in arb_sso_key()) {
        let token = encode(&plaintext, &key, &mut OsRng).unwrap();
        prop_assert_eq!(decode(&token, &key).unwrap(), plaintext);
    }

    #[test]
    fn tokens_match_the_frame_grammar(plaintext in "[ -~]{0,64}", key in arb_sso_key()) {
        let token = encode(&plaintext, &key, &mut OsRng).unwrap();
        let rest = token.strip_prefix("~2").unwrap();
        let (iv, payload) = rest.split_at(16);
        prop_assert!(iv.bytes().all(|b| b.is_ascii_alphanumeric()));
        let payload = payload.strip_prefix('~').unwrap();
        prop_assert!(payload.bytes().all(|b| b.is_ascii_alphanumeric() || b"-_.".contains(&b)));
    }

    #[test]
    fn garbage_is_rejected(garbage in any::<String>(), key in arb_sso_key()) {
        prop_assert!(decode(&garbage, &key).is_err());
    }
}

#[test]
fn privacy_guard_key_decodes_its_own_tokens() {
    let pg = PrivacyGuardKey::from_hex(
        "456789ABCDEF012356789ABCDEF012346789ABCDEF012345789ABCDEF0123456",
    )
    .unwrap();
    let token = encode("Goodbye, Universe!", &pg, &mut OsRng).unwrap();
    assert_eq!(decode(&token, &pg).unwrap(), "Goodbye, Universe!");
}

#[test]
fn wrong_key_is_invalid_format() {
    let key = SsoKey::from_hex("6162636465666768696a6b6c6d6e6f70").unwrap();
    let other = SsoKey::from_hex("00112233445566778899AABBCCDDEEFF").unwrap();
    let token = encode("Hello, World!", &key, &mut OsRng).unwrap();
    assert!(matches!(decode(&token, &other), Err(SsoError::InvalidFormat(_))));
}

#[test]
fn tampered_ciphertext_is_rejected() {
    let key = SsoKey::from_hex("6162636465666768696a6b6c6d6e6f70").unwrap();
    let token = encode("Hello, World!", &key, &mut OsRng).unwrap();

    // one byte short of a whole block
    let parsed: FramedToken = token.parse().unwrap();
    let ciphertext = parsed.ciphertext();
    let truncated = lisso_core::base64::encode(&ciphertext[..ciphertext.len() - 1]);
    let tampered = format!("~2{}~{truncated}", parsed.iv());
    assert!(matches!(
        decode(&tampered, &key),
        Err(SsoError::InvalidFormat(FormatError::Padding))
    ));
}
