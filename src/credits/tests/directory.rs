use super::common::{member_id, roster, ROSTER_CSV};
use crate::credits::directory::{CsvRoster, DirectoryError, IdentityDirectory};
use crate::credits::domain::{NationalId, VerificationStatus};

#[test]
fn rostered_member_is_verified() {
    let directory = roster();
    let status = directory
        .lookup(&member_id("A123456789"))
        .expect("lookup succeeds");
    assert_eq!(status, VerificationStatus::Verified);
}

#[test]
fn unknown_id_reports_unknown() {
    let directory = roster();
    let status = directory
        .lookup(&member_id("C198765432"))
        .expect("lookup succeeds");
    assert_eq!(status, VerificationStatus::Unknown);
}

#[test]
fn registration_moves_unknown_to_pending_then_verified() {
    let directory = roster();
    let id = member_id("C198765432");

    directory.register_pending(&id).expect("registers");
    assert_eq!(
        directory.lookup(&id).expect("lookup"),
        VerificationStatus::Pending
    );

    directory.confirm_registration(&id).expect("confirms");
    assert_eq!(
        directory.lookup(&id).expect("lookup"),
        VerificationStatus::Verified
    );
}

#[test]
fn confirming_an_unregistered_id_fails() {
    let directory = roster();
    match directory.confirm_registration(&member_id("D212345678")) {
        Err(DirectoryError::NotRegistered) => {}
        other => panic!("expected NotRegistered, got {other:?}"),
    }
}

#[test]
fn re_registering_does_not_demote_a_confirmed_member() {
    let directory = roster();
    let id = member_id("C198765432");

    directory.register_pending(&id).expect("registers");
    directory.confirm_registration(&id).expect("confirms");
    directory.register_pending(&id).expect("re-registers");

    assert_eq!(
        directory.lookup(&id).expect("lookup"),
        VerificationStatus::Verified
    );
}

#[test]
fn email_comes_from_the_roster() {
    let directory = roster();

    let email = directory
        .email_for(&member_id("A123456789"))
        .expect("lookup");
    assert_eq!(email.as_deref(), Some("mei.chen@example.com"));

    // Blank email cell reads as no email on file.
    let missing = directory
        .email_for(&member_id("B287654321"))
        .expect("lookup");
    assert_eq!(missing, None);
}

#[test]
fn roster_row_count_matches_the_csv() {
    assert_eq!(roster().member_count(), 2);
}

#[test]
fn roster_with_bad_id_is_rejected() {
    let csv = "National Id,Name,Email\nnot-an-id,Someone,\n";
    match CsvRoster::from_reader(csv.as_bytes()) {
        Err(DirectoryError::InvalidRow { row: 1, .. }) => {}
        other => panic!("expected InvalidRow, got {other:?}"),
    }
}

#[test]
fn national_ids_normalize_to_uppercase() {
    let id = NationalId::parse(" a123456789 ").expect("parses");
    assert_eq!(id.as_str(), "A123456789");

    // Normalized form matches a roster loaded from uppercase data.
    let directory = roster();
    assert_eq!(
        directory.lookup(&id).expect("lookup"),
        VerificationStatus::Verified
    );
}

#[test]
fn national_id_format_is_enforced() {
    assert!(NationalId::parse("A123456789").is_ok());
    assert!(NationalId::parse("B987654321").is_ok()); // 9 marks newer resident ids
    assert!(NationalId::parse("B387654321").is_err()); // second digit must be 1, 2, or 9
    assert!(NationalId::parse("A12345678").is_err()); // too short
    assert!(NationalId::parse("1123456789").is_err()); // must start with a letter
    assert!(NationalId::parse("A12345678X").is_err()); // trailing letter
}

#[test]
fn empty_roster_still_supports_registration() {
    let directory = CsvRoster::empty();
    let id = member_id("A123456789");

    assert_eq!(
        directory.lookup(&id).expect("lookup"),
        VerificationStatus::Unknown
    );
    directory.register_pending(&id).expect("registers");
    assert_eq!(
        directory.lookup(&id).expect("lookup"),
        VerificationStatus::Pending
    );
}

#[test]
fn pending_registrations_exclude_confirmed_ids() {
    let directory = roster();
    let first = member_id("C198765432");
    let second = member_id("D212345678");

    directory.register_pending(&first).expect("registers");
    directory.register_pending(&second).expect("registers");
    directory.confirm_registration(&first).expect("confirms");

    let pending = directory.pending_registrations().expect("listable");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].0, second);
}

// Keeps the fixture honest: the roster text itself should stay parseable.
#[test]
fn fixture_roster_parses() {
    assert!(CsvRoster::from_reader(ROSTER_CSV.as_bytes()).is_ok());
}
