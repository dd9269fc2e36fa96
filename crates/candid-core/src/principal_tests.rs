use crate::principal::{Principal, PrincipalClass, PrincipalError};

#[test]
fn management_canister_text() {
    assert_eq!(Principal::management_canister().to_text(), "aaaaa-aa");
}

#[test]
fn anonymous_text() {
    let anonymous = Principal::anonymous();
    assert_eq!(anonymous.to_text(), "2vxsx-fae");
    assert_eq!(anonymous.class(), Some(PrincipalClass::Anonymous));
}

#[test]
fn text_of_known_bytes() {
    let p = Principal::from_slice(&[0xca, 0xff, 0xee]).unwrap();
    assert_eq!(p.to_text(), "w7x7r-cok77-xa");

    let p = Principal::from_slice(&[0xef, 0xcd, 0xab, 0, 0, 0, 0, 0, 1]).unwrap();
    assert_eq!(p.to_text(), "2chl6-4hpzw-vqaaa-aaaaa-c");
}

#[test]
fn canister_id_text() {
    let p = Principal::from_text("rrkah-fqaaa-aaaaa-aaaaq-cai").unwrap();
    assert_eq!(p.as_slice(), &[0, 0, 0, 0, 0, 0, 0, 1, 1, 1]);
    assert_eq!(p.class(), Some(PrincipalClass::Opaque));
}

#[test]
fn parse_text() {
    assert_eq!(
        Principal::from_text("aaaaa-aa").unwrap(),
        Principal::management_canister()
    );
    let p: Principal = "w7x7r-cok77-xa".parse().unwrap();
    assert_eq!(p.as_slice(), &[0xca, 0xff, 0xee]);
}

#[test]
fn parse_accepts_uppercase() {
    let p = Principal::from_text("W7X7R-COK77-XA").unwrap();
    assert_eq!(p.as_slice(), &[0xca, 0xff, 0xee]);
}

#[test]
fn parse_rejects_bad_checksum() {
    // Same length as `w7x7r-cok77-xa`, first checksum character changed.
    let err = Principal::from_text("a7x7r-cok77-xa").unwrap_err();
    assert_eq!(err, PrincipalError::ChecksumMismatch);
}

#[test]
fn parse_rejects_bad_grouping() {
    let err = Principal::from_text("w7x7rcok77xa").unwrap_err();
    assert_eq!(
        err,
        PrincipalError::NonCanonical("w7x7r-cok77-xa".to_string())
    );
}

#[test]
fn parse_rejects_invalid_character() {
    let err = Principal::from_text("w7x7r-cok77-x1").unwrap_err();
    assert_eq!(err, PrincipalError::InvalidChar('1'));
}

#[test]
fn parse_rejects_impossible_length() {
    // six base32 characters never end on a byte boundary
    let err = Principal::from_text("aaaaa-a").unwrap_err();
    assert!(matches!(err, PrincipalError::Malformed(_)));
}

#[test]
fn parse_rejects_short_text() {
    assert_eq!(
        Principal::from_text("aa").unwrap_err(),
        PrincipalError::TooShort
    );
}

#[test]
fn from_slice_rejects_long_bytes() {
    let err = Principal::from_slice(&[0u8; 30]).unwrap_err();
    assert_eq!(err, PrincipalError::TooLong(30));
    assert_eq!(err.to_string(), "principal is 30 bytes long, at most 29 allowed");
}

#[test]
fn self_authenticating_shape() {
    let p = Principal::self_authenticating(b"public key bytes");
    assert_eq!(p.len(), 29);
    assert_eq!(p.class(), Some(PrincipalClass::SelfAuthenticating));
    assert_eq!(Principal::from_text(&p.to_text()).unwrap(), p);
}

#[test]
fn empty_has_no_class() {
    assert_eq!(Principal::management_canister().class(), None);
    assert!(Principal::management_canister().is_empty());
}

#[test]
fn serializes_as_text() {
    let p = Principal::from_slice(&[0xca, 0xff, 0xee]).unwrap();
    assert_eq!(serde_json::to_string(&p).unwrap(), "\"w7x7r-cok77-xa\"");
}

#[test]
fn class_names() {
    assert_eq!(PrincipalClass::Anonymous.name(), "anonymous");
    assert_eq!(PrincipalClass::SelfAuthenticating.name(), "self-authenticating");
}
