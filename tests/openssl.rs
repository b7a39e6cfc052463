mod util;

use openssl::pkey::PKey;
use openssl::x509::X509Crl;
use regex::Regex;
use std::fs;
use std::process::Command;
use tlsutils::crl::synthesize_crl;
use tlsutils::encrypted_pem::{PemCipher, derive_encrypted_key, derive_encrypted_key_with_cipher};
use util::{JAN_1_2024, KeyKind};

#[test]
fn test_openssl_crate_verifies_crl() {
    for kind in [
        KeyKind::EcP256Sec1,
        KeyKind::EcP384Sec1,
        KeyKind::EcP521Sec1,
        KeyKind::RsaPkcs1,
        KeyKind::Ed25519,
    ] {
        let ca = util::generate_ca(kind);
        let leaves: Vec<String> = (3..6)
            .map(|serial| util::issue_leaf(&ca, "leaf.myca.local", serial, JAN_1_2024))
            .collect();

        let artifact = synthesize_crl(&ca.key.pem, &ca.cert_pem, &leaves).unwrap();
        let crl = X509Crl::from_pem(artifact.crl_pem.as_bytes()).expect("Failed to parse CRL");

        assert!(
            crl.verify(&ca.key.pkey).unwrap(),
            "CRL signature does not verify for {kind:?}"
        );

        let serials: Vec<String> = crl
            .get_revoked()
            .expect("CRL has no revoked certificates")
            .iter()
            .map(|revoked| {
                revoked
                    .serial_number()
                    .to_bn()
                    .unwrap()
                    .to_dec_str()
                    .unwrap()
                    .to_string()
            })
            .collect();
        assert_eq!(serials, ["3", "4", "5"]);
    }
}

#[test]
fn test_openssl_cli_reads_crl() {
    let ca = util::generate_ca(KeyKind::EcP256Sec1);
    let leaf = util::issue_leaf(&ca, "leaf.myca.local", 3, JAN_1_2024);
    let artifact = synthesize_crl(&ca.key.pem, &ca.cert_pem, &[leaf]).unwrap();

    let crl_path = std::env::temp_dir().join("tlsutils_test_crl.pem");
    fs::write(&crl_path, &artifact.crl_pem).expect("Failed to write CRL");

    let output = Command::new("openssl")
        .arg("crl")
        .arg("-in")
        .arg(&crl_path)
        .arg("-noout")
        .arg("-text")
        .output()
        .expect("Failed to execute OpenSSL command");

    assert!(
        output.status.success(),
        "OpenSSL command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let output_text = String::from_utf8_lossy(&output.stdout);
    assert!(
        output_text.contains("Version 2 (0x1)"),
        "Version field is incorrect"
    );
    assert!(
        output_text.contains("CN=myca.local") || output_text.contains("CN = myca.local"),
        "Issuer field is incorrect"
    );
    assert!(
        output_text.contains("Serial Number: 03"),
        "Revoked serial number is missing"
    );
    assert!(
        output_text.contains("Revocation Date: Jan  1 00:00:00 2024 GMT"),
        "Revocation date is incorrect"
    );

    let crl_number_regex = Regex::new(r"X509v3 CRL Number:\s*\n\s*\d+").unwrap();
    assert!(
        crl_number_regex.is_match(&output_text),
        "Missing CRL Number extension"
    );
    let next_update_regex = Regex::new(r"Next Update: .+").unwrap();
    assert!(
        next_update_regex.is_match(&output_text),
        "Missing Next Update field"
    );

    fs::remove_file(&crl_path).expect("Failed to remove test CRL");
}

#[test]
fn test_openssl_decrypts_encrypted_key() {
    for kind in [KeyKind::RsaPkcs1, KeyKind::EcP256Sec1] {
        let key = util::generate_key(kind);
        let artifact = derive_encrypted_key(&key.pem, "correct horse").unwrap();
        assert!(artifact.pem.contains("Proc-Type: 4,ENCRYPTED"));
        assert!(artifact.pem.contains("DEK-Info: AES-128-CBC,"));

        let decrypted = PKey::private_key_from_pem_passphrase(
            artifact.pem.as_bytes(),
            b"correct horse",
        )
        .expect("OpenSSL could not decrypt the key");
        assert_eq!(
            decrypted.public_key_to_der().unwrap(),
            key.pkey.public_key_to_der().unwrap()
        );

        assert!(
            PKey::private_key_from_pem_passphrase(artifact.pem.as_bytes(), b"wrong").is_err(),
            "OpenSSL accepted the wrong password"
        );
    }
}

#[test]
fn test_openssl_decrypts_every_cipher() {
    let key = util::generate_key(KeyKind::RsaPkcs1);
    for cipher in PemCipher::ALL {
        let artifact = derive_encrypted_key_with_cipher(&key.pem, "pw", cipher).unwrap();
        assert!(artifact.pem.contains(&format!("DEK-Info: {},", cipher.name())));

        let decrypted = PKey::private_key_from_pem_passphrase(artifact.pem.as_bytes(), b"pw")
            .unwrap_or_else(|e| panic!("OpenSSL could not decrypt {cipher}: {e}"));
        assert_eq!(
            decrypted.rsa().unwrap().private_key_to_der().unwrap(),
            key.pkey.rsa().unwrap().private_key_to_der().unwrap()
        );
    }
}

#[test]
fn test_decrypts_key_encrypted_by_openssl() {
    use openssl::symm::Cipher;
    use tlsutils::encrypted_pem::decrypt_pem_block;
    use tlsutils::pem_utils::decode_pem_block;

    let key = util::generate_key(KeyKind::RsaPkcs1);
    let rsa = key.pkey.rsa().unwrap();
    let encrypted = rsa
        .private_key_to_pem_passphrase(Cipher::aes_256_cbc(), b"openssl")
        .unwrap();

    let block = decode_pem_block(&encrypted).unwrap();
    assert_eq!(
        decrypt_pem_block(&block, b"openssl").unwrap(),
        rsa.private_key_to_der().unwrap()
    );
}
