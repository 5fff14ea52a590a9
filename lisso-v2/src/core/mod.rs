mod local;

use lisso_core::version;

pub struct V2;

impl version::Version for V2 {
    const HEADER: &'static str = "~2";

    fn encrypt(
        key: &lisso_core::key::KeyMaterial,
        iv: &[u8; version::IV_LEN],
        plaintext: &[u8],
    ) -> Vec<u8> {
        local::encrypt(key, iv, plaintext)
    }

    fn decrypt(
        key: &lisso_core::key::KeyMaterial,
        iv: &[u8; version::IV_LEN],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, lisso_core::SsoError> {
        local::decrypt(key, iv, ciphertext)
    }
}
