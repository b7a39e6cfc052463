#![allow(dead_code)]

use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{Id, PKey, PKeyRef, Private};
use openssl::rsa::Rsa;
use openssl::x509::extension::{BasicConstraints, KeyUsage, SubjectKeyIdentifier};
use openssl::x509::{X509, X509Builder, X509Name, X509NameBuilder, X509ReqBuilder};

/// 2024-01-01T00:00:00Z
pub const JAN_1_2024: &str = "240101000000Z";
pub const JAN_1_2024_UNIX: i64 = 1_704_067_200;
const FAR_FUTURE: &str = "340101000000Z";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    EcP256Sec1,
    EcP256Pkcs8,
    EcP384Sec1,
    EcP521Sec1,
    RsaPkcs1,
    RsaPkcs8,
    Ed25519,
}

pub struct TestKey {
    pub pkey: PKey<Private>,
    pub pem: String,
}

pub fn generate_key(kind: KeyKind) -> TestKey {
    let (pkey, pem) = match kind {
        KeyKind::EcP256Sec1
        | KeyKind::EcP256Pkcs8
        | KeyKind::EcP384Sec1
        | KeyKind::EcP521Sec1 => {
            let nid = match kind {
                KeyKind::EcP384Sec1 => Nid::SECP384R1,
                KeyKind::EcP521Sec1 => Nid::SECP521R1,
                _ => Nid::X9_62_PRIME256V1,
            };
            let group = EcGroup::from_curve_name(nid).unwrap();
            let ec = EcKey::generate(&group).unwrap();
            let sec1 = ec.private_key_to_pem().unwrap();
            let pkey = PKey::from_ec_key(ec).unwrap();
            let pem = if kind == KeyKind::EcP256Pkcs8 {
                pkey.private_key_to_pem_pkcs8().unwrap()
            } else {
                sec1
            };
            (pkey, pem)
        }
        KeyKind::RsaPkcs1 | KeyKind::RsaPkcs8 => {
            let rsa = Rsa::generate(2048).unwrap();
            let pkcs1 = rsa.private_key_to_pem().unwrap();
            let pkey = PKey::from_rsa(rsa).unwrap();
            let pem = if kind == KeyKind::RsaPkcs1 {
                pkcs1
            } else {
                pkey.private_key_to_pem_pkcs8().unwrap()
            };
            (pkey, pem)
        }
        KeyKind::Ed25519 => {
            let pkey = PKey::generate_ed25519().unwrap();
            let pem = pkey.private_key_to_pem_pkcs8().unwrap();
            (pkey, pem)
        }
    };
    TestKey {
        pkey,
        pem: String::from_utf8(pem).unwrap(),
    }
}

fn name(common_name: &str) -> X509Name {
    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_nid(Nid::COMMONNAME, common_name)
        .unwrap();
    name.build()
}

fn digest_for(key: &PKeyRef<Private>) -> MessageDigest {
    if key.id() == Id::ED25519 {
        MessageDigest::null()
    } else {
        MessageDigest::sha256()
    }
}

fn base_builder(common_name: &str, serial: u32, not_before: &str, key: &TestKey) -> X509Builder {
    let mut builder = X509Builder::new().unwrap();
    builder.set_version(2).unwrap();
    let serial = BigNum::from_u32(serial).unwrap().to_asn1_integer().unwrap();
    builder.set_serial_number(&serial).unwrap();
    builder.set_subject_name(&name(common_name)).unwrap();
    builder.set_pubkey(&key.pkey).unwrap();
    builder
        .set_not_before(&Asn1Time::from_str(not_before).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::from_str(FAR_FUTURE).unwrap())
        .unwrap();
    builder
}

pub struct TestCa {
    pub key: TestKey,
    pub cert: X509,
    pub cert_pem: String,
}

/// A self-signed CA certificate for `kind` with serial number `serial`.
///
/// `key_usage` selects the KeyUsage extension: `Some(true)` grants
/// keyCertSign and cRLSign, `Some(false)` only keyCertSign, `None` omits
/// the extension.
pub fn generate_ca_with(
    kind: KeyKind,
    serial: u32,
    key_usage: Option<bool>,
    with_ski: bool,
) -> TestCa {
    let key = generate_key(kind);
    let mut builder = base_builder("myca.local", serial, JAN_1_2024, &key);
    builder.set_issuer_name(&name("myca.local")).unwrap();
    builder
        .append_extension(BasicConstraints::new().critical().ca().build().unwrap())
        .unwrap();
    match key_usage {
        Some(true) => builder
            .append_extension(
                KeyUsage::new()
                    .critical()
                    .key_cert_sign()
                    .crl_sign()
                    .build()
                    .unwrap(),
            )
            .unwrap(),
        Some(false) => builder
            .append_extension(KeyUsage::new().critical().key_cert_sign().build().unwrap())
            .unwrap(),
        None => {}
    }
    if with_ski {
        let ski = SubjectKeyIdentifier::new()
            .build(&builder.x509v3_context(None, None))
            .unwrap();
        builder.append_extension(ski).unwrap();
    }
    builder.sign(&key.pkey, digest_for(&key.pkey)).unwrap();
    let cert = builder.build();
    let cert_pem = String::from_utf8(cert.to_pem().unwrap()).unwrap();
    TestCa {
        key,
        cert,
        cert_pem,
    }
}

pub fn generate_ca(kind: KeyKind) -> TestCa {
    generate_ca_with(kind, 1, Some(true), true)
}

/// A leaf certificate issued by `ca`, returned as PEM.
pub fn issue_leaf(ca: &TestCa, common_name: &str, serial: u32, not_before: &str) -> String {
    let leaf_key = generate_key(KeyKind::EcP256Sec1);
    let mut builder = base_builder(common_name, serial, not_before, &leaf_key);
    builder.set_issuer_name(ca.cert.subject_name()).unwrap();
    builder
        .sign(&ca.key.pkey, digest_for(&ca.key.pkey))
        .unwrap();
    String::from_utf8(builder.build().to_pem().unwrap()).unwrap()
}

/// A certificate signing request, which is not a certificate.
pub fn generate_csr() -> String {
    let key = generate_key(KeyKind::EcP256Sec1);
    let mut builder = X509ReqBuilder::new().unwrap();
    builder.set_subject_name(&name("request.local")).unwrap();
    builder.set_pubkey(&key.pkey).unwrap();
    builder.sign(&key.pkey, MessageDigest::sha256()).unwrap();
    String::from_utf8(builder.build().to_pem().unwrap()).unwrap()
}
