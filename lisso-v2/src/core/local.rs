use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use lisso_core::key::KeyMaterial;
use lisso_core::version::IV_LEN;
use lisso_core::{FormatError, SsoError};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

pub(super) fn encrypt(key: &KeyMaterial, iv: &[u8; IV_LEN], plaintext: &[u8]) -> Vec<u8> {
    match key {
        KeyMaterial::Aes128(k) => Aes128CbcEnc::new(&(*k).into(), &(*iv).into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        KeyMaterial::Aes256(k) => Aes256CbcEnc::new(&(*k).into(), &(*iv).into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
    }
}

pub(super) fn decrypt(
    key: &KeyMaterial,
    iv: &[u8; IV_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, SsoError> {
    let plaintext = match key {
        KeyMaterial::Aes128(k) => Aes128CbcDec::new(&(*k).into(), &(*iv).into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        KeyMaterial::Aes256(k) => Aes256CbcDec::new(&(*k).into(), &(*iv).into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
    };
    plaintext.map_err(|_| SsoError::InvalidFormat(FormatError::Padding))
}
